//! # Integration Tests
//!
//! Cross-crate tests.
//!
//! Covers:
//! - Contract sanity checks
//! - Blueprint file -> registry -> sinks, end to end
//! - Concurrent emission through shared handles

#[cfg(test)]
mod contract_tests {
    use contracts::{ChannelsBlueprint, Priority, Topic};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
        assert_eq!(Priority::default(), "info");
        assert_eq!(Topic::scoped("app", Some("db")), "app::db");
    }

    #[test]
    fn test_blueprint_survives_loader_round_trip() {
        let content = r#"
[[sinks]]
name = "trace"
sink_type = "tracing"

[[channels]]
topic = "app::db"
decoration = "topic: text"
sinks = ["trace"]
"#;
        let bp = config_loader::ConfigLoader::load_from_str(
            content,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        let toml = config_loader::ConfigLoader::to_toml(&bp).unwrap();
        let again: ChannelsBlueprint = config_loader::ConfigLoader::load_from_str(
            &toml,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(again.channels[0].topic, "app::db");
        assert_eq!(again.channels[0].sinks, vec!["trace".to_string()]);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use std::thread;

    use channels::{
        apply_blueprint, emit, CaptureBuffer, ChannelRegistry, DefaultTransmitter, MemorySink,
        SinkRef,
    };
    use config_loader::ConfigLoader;
    use contracts::{ContractError, Priority, SinkAdapter};
    use tempfile::tempdir;

    fn capturing_registry() -> (ChannelRegistry, CaptureBuffer) {
        let buffer = CaptureBuffer::new();
        let registry = ChannelRegistry::builder()
            .transmitter(DefaultTransmitter::to_writer(buffer.clone()))
            .build();
        (registry, buffer)
    }

    fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("channels.toml");
        fs::write(&path, content).unwrap();
        path
    }

    /// End-to-end: config file -> loader -> registry -> file sink and stderr fallback
    #[test]
    fn test_e2e_config_file_pipeline() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("logs").join("db.log");
        let config = format!(
            r#"
[[sinks]]
name = "db_file"
sink_type = "file"
params = {{ path = "{}" }}

[[channels]]
topic = "app::db"
decoration = "[topic/context] text\n"
context = "primary"
priority = "warn"
sinks = ["db_file"]

[[channels]]
topic = "app::noisy"
enabled = false

[[channels]]
topic = "app"
decoration = "topic: text\n"
"#,
            log_path.display()
        );
        let path = write_config(dir.path(), &config);

        let blueprint = ConfigLoader::load_from_path(&path).unwrap();
        let (registry, buffer) = capturing_registry();
        apply_blueprint(&registry, &blueprint).unwrap();

        let db = registry.create_channel("app", Some("db"));
        let noisy = registry.create_channel("app", Some("noisy"));
        let app = registry.implicit_channel("app");

        emit!(db, "pool size ", 8).unwrap();
        emit!(noisy, "spam").unwrap();
        emit!(app, "started").unwrap();

        assert_eq!(
            fs::read_to_string(&log_path).unwrap(),
            "[app::db/primary] pool size 8\n"
        );
        // Unrouted topics bypass their decoration
        assert_eq!(buffer.contents(), "started");

        let metrics = registry.metrics();
        assert_eq!(metrics.routed, 1);
        assert_eq!(metrics.fallback, 1);
        assert_eq!(metrics.suppressed, 1);
    }

    #[test]
    fn test_e2e_invalid_config_is_rejected_before_apply() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[[channels]]
topic = "app"
sinks = ["nowhere"]
"#,
        );
        let err = ConfigLoader::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { .. }));
    }

    /// Basic usage, no configuration: raw text on the default transmitter
    #[test]
    fn test_scenario_plain_fallback() {
        let (registry, buffer) = capturing_registry();
        let app = registry.create_channel("app", None);

        app.emit(["hello"]).unwrap();

        assert_eq!(buffer.contents(), "hello");
    }

    /// Decorated output, observed on a bound sink; the fallback stays raw
    #[test]
    fn test_scenario_decoration() {
        let (registry, buffer) = capturing_registry();
        let app = registry.create_channel("app", None);
        let memory = Arc::new(MemorySink::new("memory"));

        registry.set_decoration("app", "topic: text\n");
        app.emit(["raw"]).unwrap();
        registry
            .bind_sinks("app", [SinkRef::Adapter(memory.clone())])
            .unwrap();
        app.emit(["hi"]).unwrap();

        assert_eq!(buffer.contents(), "raw");
        assert_eq!(memory.messages(), vec!["app: hi\n".to_string()]);
    }

    #[test]
    fn test_scenario_suppress_then_resume() {
        let (registry, buffer) = capturing_registry();
        let app = registry.create_channel("app", None);
        let memory = Arc::new(MemorySink::new("memory"));
        registry.set_decoration("app", "topic: text\n");
        registry
            .bind_sinks("app", [SinkRef::Adapter(memory.clone())])
            .unwrap();

        registry.disable("app");
        app.emit(["ignored"]).unwrap();
        assert!(memory.messages().is_empty());

        registry.enable("app");
        app.emit(["shown"]).unwrap();
        assert_eq!(memory.messages(), vec!["app: shown\n".to_string()]);
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn test_scenario_fan_out_in_order() {
        let (registry, buffer) = capturing_registry();
        let app = registry.create_channel("app", None);
        let s1 = Arc::new(MemorySink::new("s1"));
        let s2 = Arc::new(MemorySink::new("s2"));

        registry
            .bind_sinks(
                "app",
                [SinkRef::Adapter(s1.clone()), SinkRef::Adapter(s2.clone())],
            )
            .unwrap();
        app.emit(["x"]).unwrap();

        for sink in [&s1, &s2] {
            assert_eq!(sink.records(), vec![(Priority::from("info"), "x".to_string())]);
        }
        assert_eq!(buffer.contents(), "");
    }

    struct Unready;

    impl SinkAdapter for Unready {
        fn name(&self) -> &str {
            "unready"
        }

        fn accept(&self, _level: &Priority, _message: &str) -> Result<(), ContractError> {
            Ok(())
        }

        fn validate(&self) -> Result<(), ContractError> {
            Err(ContractError::Other("no accept capability".to_string()))
        }
    }

    #[test]
    fn test_scenario_invalid_sink_leaves_binding_untouched() {
        let (registry, _buffer) = capturing_registry();
        let app = registry.create_channel("app", None);
        let s1 = Arc::new(MemorySink::new("s1"));
        registry
            .bind_sinks("app", [SinkRef::Adapter(s1.clone())])
            .unwrap();

        let err = registry
            .bind_sinks(
                "app",
                [
                    SinkRef::Adapter(Arc::new(MemorySink::new("s2"))),
                    SinkRef::Adapter(Arc::new(Unready)),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidSink { .. }));

        let err = registry
            .bind_sinks("app", [SinkRef::Named("undeclared".to_string())])
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidSink { .. }));

        app.emit(["still here"]).unwrap();
        assert_eq!(registry.describe("app").sinks, vec!["s1".to_string()]);
        assert_eq!(s1.messages(), vec!["still here".to_string()]);
    }

    #[test]
    fn test_metrics_sink_alongside_memory_sink() {
        let (registry, _buffer) = capturing_registry();
        let memory = Arc::new(MemorySink::new("memory"));
        let counted = Arc::new(observability::MetricsSink::new("counted"));

        registry
            .bind_sinks(
                "app::db",
                [SinkRef::Adapter(counted), SinkRef::Adapter(memory.clone())],
            )
            .unwrap();
        registry.set_priority("app::db", "debug");
        registry.create_channel("app", Some("db")).send("q").unwrap();

        assert_eq!(memory.records(), vec![(Priority::from("debug"), "q".to_string())]);
        observability::record_snapshot(&registry.metrics());
        observability::record_topic_count(registry.topics().len());
    }

    #[test]
    fn test_concurrent_handles_share_settings() {
        let (registry, _buffer) = capturing_registry();
        let memory = Arc::new(MemorySink::new("memory"));
        registry
            .bind_sinks("worker", [SinkRef::Adapter(memory.clone())])
            .unwrap();
        registry.set_decoration("worker", "topic|text");

        let threads: Vec<_> = (0..4)
            .map(|i| {
                let handle = registry.create_channel("worker", None);
                thread::spawn(move || {
                    for j in 0..25 {
                        handle.emit([format!("{i}-{j}")]).unwrap();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let messages = memory.messages();
        assert_eq!(messages.len(), 100);
        assert!(messages.iter().all(|m| m.starts_with("worker|")));
        assert_eq!(registry.metrics().routed, 100);
    }
}
