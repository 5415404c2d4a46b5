//! ChannelRegistry - per-topic configuration and channel construction

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};
use tracing::{debug, error, instrument, warn};

use contracts::{
    ContractError, DuplicateChannelWarning, Priority, SharedSink, SinkAdapter, Topic,
};

use crate::decoration::{self, Decoration};
use crate::handle::ChannelHandle;
use crate::metrics::{ChannelMetrics, MetricsSnapshot};
use crate::transmitter::DefaultTransmitter;

/// Source of the local time used by the `timestamp` keyword
pub type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// One entry of a [`ChannelRegistry::bind_sinks`] call
#[derive(Clone)]
pub enum SinkRef {
    /// A sink passed in directly
    Adapter(SharedSink),
    /// A sink looked up in the registry's sink catalogue by name
    Named(String),
}

impl From<SharedSink> for SinkRef {
    fn from(sink: SharedSink) -> Self {
        Self::Adapter(sink)
    }
}

impl From<&str> for SinkRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for SinkRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl fmt::Debug for SinkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adapter(sink) => f.debug_tuple("Adapter").field(&sink.name()).finish(),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

/// Result of [`ChannelRegistry::register_channel`]
#[derive(Debug)]
pub struct Registration {
    pub handle: ChannelHandle,
    /// Set when the topic already had a handle; the new one replaced it
    pub warning: Option<DuplicateChannelWarning>,
}

impl Registration {
    pub fn into_handle(self) -> ChannelHandle {
        self.handle
    }
}

/// Snapshot of everything the registry knows about one topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSettings {
    pub topic: Topic,
    pub registered: bool,
    pub enabled: bool,
    pub decoration: Option<Decoration>,
    pub priority: Priority,
    pub context: Option<String>,
    /// Names of bound sinks in delivery order; empty means default transmitter
    pub sinks: Vec<String>,
}

#[derive(Default)]
struct RegistryState {
    suppressed: HashSet<Topic>,
    decoration: HashMap<Topic, Decoration>,
    priority: HashMap<Topic, Priority>,
    context: HashMap<Topic, String>,
    routing: HashMap<Topic, Vec<SharedSink>>,
    /// Topic -> number of registrations
    channels: HashMap<Topic, u64>,
    catalogue: HashMap<String, SharedSink>,
}

struct Shared {
    state: Mutex<RegistryState>,
    transmitter: DefaultTransmitter,
    clock: Clock,
    metrics: ChannelMetrics,
}

enum Delivery {
    Suppressed,
    Fallback,
    Routed {
        sinks: Vec<SharedSink>,
        level: Priority,
        template: Option<Decoration>,
        context: Option<String>,
    },
}

/// Builder for a [`ChannelRegistry`]
#[derive(Default)]
pub struct RegistryBuilder {
    transmitter: Option<DefaultTransmitter>,
    clock: Option<Clock>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the standard-error fallback
    pub fn transmitter(mut self, transmitter: DefaultTransmitter) -> Self {
        self.transmitter = Some(transmitter);
        self
    }

    /// Replace the wall clock used for timestamps
    pub fn clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        let clock: Clock = Arc::new(clock);
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> ChannelRegistry {
        ChannelRegistry {
            shared: Arc::new(Shared {
                state: Mutex::new(RegistryState::default()),
                transmitter: self.transmitter.unwrap_or_default(),
                clock: self.clock.unwrap_or_else(|| Arc::new(Local::now) as Clock),
                metrics: ChannelMetrics::new(),
            }),
        }
    }
}

/// Table of per-topic configuration shared by every channel handle.
///
/// Cloning is cheap and yields another reference to the same tables. All
/// tables sit behind one lock; sinks and the default transmitter are always
/// called after the lock is released, so a sink may emit on a channel
/// itself.
#[derive(Clone)]
pub struct ChannelRegistry {
    shared: Arc<Shared>,
}

impl ChannelRegistry {
    /// Registry with the standard-error transmitter and the local clock
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ===== Construction =====

    /// Create the handle for `topic`.
    ///
    /// Registering a topic twice replaces the entry and reports a
    /// [`DuplicateChannelWarning`]. No other per-topic table is touched, so
    /// settings made before registration stay in effect.
    pub fn register_channel(&self, topic: impl Into<Topic>) -> Registration {
        let topic = topic.into();
        let registrations = {
            let mut state = self.lock();
            let count = state.channels.entry(topic.clone()).or_insert(0);
            *count += 1;
            *count
        };

        let warning = (registrations > 1).then(|| {
            warn!(topic = %topic, registrations, "Channel already registered, overwriting");
            DuplicateChannelWarning {
                topic: topic.clone(),
            }
        });
        if warning.is_none() {
            debug!(topic = %topic, "Channel registered");
        }

        Registration {
            handle: ChannelHandle::new(self.clone(), topic),
            warning,
        }
    }

    /// Create a channel for `namespace`, or `namespace::label`.
    pub fn create_channel(&self, namespace: &str, label: Option<&str>) -> ChannelHandle {
        self.register_channel(Topic::scoped(namespace, label))
            .into_handle()
    }

    /// Handle for an already registered topic
    pub fn channel(&self, topic: &str) -> Option<ChannelHandle> {
        let state = self.lock();
        state
            .channels
            .get_key_value(topic)
            .map(|(topic, _)| ChannelHandle::new(self.clone(), topic.clone()))
    }

    /// Handle for the implicit channel of `namespace`, created on first use
    /// without a duplicate warning.
    pub fn implicit_channel(&self, namespace: &str) -> ChannelHandle {
        let mut state = self.lock();
        let topic = match state.channels.get_key_value(namespace) {
            Some((topic, _)) => topic.clone(),
            None => {
                let topic = Topic::new(namespace);
                state.channels.insert(topic.clone(), 1);
                debug!(topic = %topic, "Implicit channel created");
                topic
            }
        };
        drop(state);
        ChannelHandle::new(self.clone(), topic)
    }

    /// Emit on the implicit channel of `namespace`.
    pub fn log<I, F>(&self, namespace: &str, fragments: I) -> Result<(), ContractError>
    where
        I: IntoIterator<Item = F>,
        F: fmt::Display,
    {
        self.implicit_channel(namespace).emit(fragments)
    }

    // ===== Control =====

    /// Silence `topic`. Idempotent.
    pub fn disable(&self, topic: impl Into<Topic>) {
        let topic = topic.into();
        if self.lock().suppressed.insert(topic.clone()) {
            debug!(topic = %topic, "Channel disabled");
        }
    }

    /// Undo [`disable`](Self::disable). Idempotent.
    pub fn enable(&self, topic: impl Into<Topic>) {
        let topic = topic.into();
        if self.lock().suppressed.remove(&topic) {
            debug!(topic = %topic, "Channel enabled");
        }
    }

    pub fn suppress(&self, topic: impl Into<Topic>) {
        self.disable(topic)
    }

    pub fn unsuppress(&self, topic: impl Into<Topic>) {
        self.enable(topic)
    }

    pub fn is_enabled(&self, topic: &str) -> bool {
        !self.lock().suppressed.contains(topic)
    }

    // ===== Configuration =====

    /// Replace the decoration of `topic`.
    ///
    /// Plain strings use bare keywords; pass [`Decoration::braced`] for
    /// `{topic}`-style templates.
    pub fn set_decoration(&self, topic: impl Into<Topic>, decoration: impl Into<Decoration>) {
        let topic = topic.into();
        let decoration = decoration.into();
        debug!(topic = %topic, template = %decoration.template, "Decoration set");
        self.lock().decoration.insert(topic, decoration);
    }

    /// Replace the context string of `topic`.
    pub fn set_context(&self, topic: impl Into<Topic>, context: impl Into<String>) {
        let topic = topic.into();
        self.lock().context.insert(topic, context.into());
    }

    /// Replace the priority label of `topic`.
    pub fn set_priority(&self, topic: impl Into<Topic>, label: impl Into<Priority>) {
        let topic = topic.into();
        let label = label.into();
        debug!(topic = %topic, priority = %label, "Priority set");
        self.lock().priority.insert(topic, label);
    }

    /// Priority label of `topic`, `"info"` when unset
    pub fn priority(&self, topic: &str) -> Priority {
        self.lock().priority.get(topic).cloned().unwrap_or_default()
    }

    // ===== Routing =====

    /// Add `sink` to the catalogue under its own name, returning any sink
    /// previously registered under that name.
    pub fn register_sink(&self, sink: SharedSink) -> Option<SharedSink> {
        let name = sink.name().to_string();
        debug!(sink = %name, "Sink registered");
        self.lock().catalogue.insert(name, sink)
    }

    /// Catalogue lookup
    pub fn sink(&self, name: &str) -> Option<SharedSink> {
        self.lock().catalogue.get(name).cloned()
    }

    /// Replace the sinks bound to `topic`.
    ///
    /// Every entry is resolved and validated before anything changes: one
    /// unknown name or unready sink fails the whole call with
    /// [`ContractError::InvalidSink`] and leaves the previous binding as it
    /// was. Previously bound sinks are dropped from the table but not
    /// closed. Binding an empty list removes the routing entry.
    #[instrument(name = "registry_bind_sinks", skip(self, topic, sinks))]
    pub fn bind_sinks<I, R>(&self, topic: impl Into<Topic>, sinks: I) -> Result<(), ContractError>
    where
        I: IntoIterator<Item = R>,
        R: Into<SinkRef>,
    {
        let topic = topic.into();
        let requested: Vec<SinkRef> = sinks.into_iter().map(Into::into).collect();

        let resolved = {
            let state = self.lock();
            requested
                .into_iter()
                .map(|entry| match entry {
                    SinkRef::Adapter(sink) => Ok(sink),
                    SinkRef::Named(name) => state.catalogue.get(&name).cloned().ok_or_else(|| {
                        ContractError::invalid_sink(&topic, name, "not in sink catalogue")
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        for sink in &resolved {
            sink.validate()
                .map_err(|e| ContractError::invalid_sink(&topic, sink.name(), e.to_string()))?;
        }

        let count = resolved.len();
        {
            let mut state = self.lock();
            if resolved.is_empty() {
                state.routing.remove(&topic);
            } else {
                state.routing.insert(topic.clone(), resolved);
            }
        }
        debug!(topic = %topic, sinks = count, "Sinks bound");
        Ok(())
    }

    /// Drop the routing entry of `topic`, handing back the unbound sinks so
    /// the caller can close them.
    pub fn clear_sinks(&self, topic: &str) -> Vec<SharedSink> {
        self.lock().routing.remove(topic).unwrap_or_default()
    }

    // ===== Introspection =====

    /// Reserved status entry point; reports nothing yet.
    pub fn status(&self) {}

    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }

    /// Every topic that appears in any table, sorted
    pub fn topics(&self) -> Vec<Topic> {
        let state = self.lock();
        let topics: BTreeSet<Topic> = state
            .channels
            .keys()
            .chain(state.suppressed.iter())
            .chain(state.decoration.keys())
            .chain(state.priority.keys())
            .chain(state.context.keys())
            .chain(state.routing.keys())
            .cloned()
            .collect();
        topics.into_iter().collect()
    }

    pub fn describe(&self, topic: &str) -> ChannelSettings {
        let state = self.lock();
        ChannelSettings {
            topic: Topic::new(topic),
            registered: state.channels.contains_key(topic),
            enabled: !state.suppressed.contains(topic),
            decoration: state.decoration.get(topic).cloned(),
            priority: state.priority.get(topic).cloned().unwrap_or_default(),
            context: state.context.get(topic).cloned(),
            sinks: state
                .routing
                .get(topic)
                .map(|sinks| sinks.iter().map(|s| s.name().to_string()).collect())
                .unwrap_or_default(),
        }
    }

    // ===== Delivery =====

    /// Deliver already-joined text on `topic`.
    pub(crate) fn deliver(&self, topic: &Topic, text: &str) -> Result<(), ContractError> {
        let delivery = {
            let state = self.lock();
            if state.suppressed.contains(topic.as_str()) {
                Delivery::Suppressed
            } else {
                match state.routing.get(topic.as_str()) {
                    Some(sinks) => Delivery::Routed {
                        sinks: sinks.clone(),
                        level: state
                            .priority
                            .get(topic.as_str())
                            .cloned()
                            .unwrap_or_default(),
                        template: state.decoration.get(topic.as_str()).cloned(),
                        context: state.context.get(topic.as_str()).cloned(),
                    },
                    None => Delivery::Fallback,
                }
            }
        };

        let metrics = &self.shared.metrics;
        match delivery {
            Delivery::Suppressed => {
                metrics.inc_suppressed();
                Ok(())
            }
            Delivery::Fallback => {
                metrics.inc_emitted();
                if let Err(e) = self.shared.transmitter.transmit(text) {
                    metrics.inc_delivery_failures();
                    return Err(e.into());
                }
                metrics.inc_fallback();
                Ok(())
            }
            Delivery::Routed {
                sinks,
                level,
                template,
                context,
            } => {
                metrics.inc_emitted();
                let rendered = decoration::render(
                    topic,
                    template.as_ref(),
                    context.as_deref(),
                    text,
                    || decoration::format_timestamp((self.shared.clock)()),
                );

                for sink in &sinks {
                    if let Err(e) = sink.accept(&level, &rendered) {
                        metrics.inc_delivery_failures();
                        error!(topic = %topic, sink = sink.name(), error = %e, "Sink delivery failed");
                        return Err(e);
                    }
                }
                metrics.inc_routed();
                Ok(())
            }
        }
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChannelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ChannelRegistry")
            .field("channels", &state.channels.len())
            .field("routes", &state.routing.len())
            .field("sinks", &state.catalogue.len())
            .finish()
    }
}
