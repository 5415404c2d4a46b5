//! Basic Channels Example
//!
//! Creates a few channels in code, decorates and suppresses them, and routes
//! one topic to the tracing subscriber while the rest fall back to stderr.
//!
//! Run with: cargo run -p demos --bin basic_channels

use std::sync::Arc;

use channels::{
    channel, emit, note, ChannelRegistry, Decoration, MemorySink, SinkRef, StderrSink,
    TracingSink,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let registry = ChannelRegistry::new();

    // ==== Stage 1: Plain fallback ====
    let app = channel!(registry);
    emit!(app, "starting ", "demo\n")?;

    // ==== Stage 2: Decoration (applies once a sink is bound) ====
    registry.set_decoration(app.topic().clone(), "timestamp topic: text\n");
    emit!(app, "still raw on the fallback\n")?;
    registry.bind_sinks(
        app.topic().clone(),
        [SinkRef::Adapter(Arc::new(StderrSink::new("console")))],
    )?;
    emit!(app, "decorated with ", 3, " keywords")?;

    // ==== Stage 3: Suppression ====
    let chatter = channel!(registry, "chatter");
    registry.disable(chatter.topic().clone());
    emit!(chatter, "never shown")?;
    registry.enable(chatter.topic());
    emit!(chatter, "back again\n")?;

    // ==== Stage 4: Routing ====
    let db = registry.create_channel("app", Some("db"));
    let memory = Arc::new(MemorySink::new("memory"));
    registry.set_priority("app::db", "warn");
    registry.set_context("app::db", "replica-2");
    registry.set_decoration("app::db", Decoration::braced("{topic} ({context}) {text}"));
    registry.bind_sinks(
        "app::db",
        [
            SinkRef::Adapter(Arc::new(TracingSink::new("tracing"))),
            SinkRef::Adapter(memory.clone()),
        ],
    )?;
    emit!(db, "slow query: ", 412, "ms")?;

    for (level, message) in memory.records() {
        tracing::info!(%level, %message, "Captured by memory sink");
    }

    // ==== Stage 5: Implicit channel ====
    note!(registry, "implicit channel for ", module_path!(), "\n")?;

    let metrics = registry.metrics();
    tracing::info!(
        emitted = metrics.emitted,
        suppressed = metrics.suppressed,
        routed = metrics.routed,
        fallback = metrics.fallback,
        "Demo finished"
    );
    Ok(())
}
