//! ChannelHandle - callable bound to one topic

use std::fmt::{self, Write};

use contracts::{ContractError, Topic};

use crate::registry::ChannelRegistry;

/// Handle to one channel.
///
/// Holds only the topic and a reference to the registry. Suppression,
/// decoration, priority, context and routing are read from the registry on
/// every call, so changes made after the handle was created apply at once.
#[derive(Clone)]
pub struct ChannelHandle {
    registry: ChannelRegistry,
    topic: Topic,
}

impl ChannelHandle {
    pub(crate) fn new(registry: ChannelRegistry, topic: Topic) -> Self {
        Self { registry, topic }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Emit a message made of `fragments`, concatenated with no separator.
    ///
    /// # Errors
    /// The first error returned by a bound sink, unchanged, or the I/O error
    /// of the default transmitter. Sinks after a failing one are skipped.
    pub fn emit<I, F>(&self, fragments: I) -> Result<(), ContractError>
    where
        I: IntoIterator<Item = F>,
        F: fmt::Display,
    {
        let text = join_fragments(fragments);
        self.registry.deliver(&self.topic, &text)
    }

    /// Emit a single, already assembled message.
    pub fn send(&self, text: &str) -> Result<(), ContractError> {
        self.registry.deliver(&self.topic, text)
    }

    /// Whether messages on this channel are currently delivered
    pub fn is_enabled(&self) -> bool {
        self.registry.is_enabled(&self.topic)
    }
}

impl fmt::Debug for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelHandle")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

/// Concatenate message fragments without separators.
pub fn join_fragments<I, F>(fragments: I) -> String
where
    I: IntoIterator<Item = F>,
    F: fmt::Display,
{
    fragments.into_iter().fold(String::new(), |mut text, fragment| {
        // Writing into a String cannot fail
        let _ = write!(text, "{fragment}");
        text
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transmitter::{CaptureBuffer, DefaultTransmitter};

    #[test]
    fn test_join_has_no_separator() {
        assert_eq!(join_fragments(["a", "b", "c"]), "abc");
        assert_eq!(join_fragments(Vec::<String>::new()), "");
        assert_eq!(join_fragments([1.5, 2.0]), "1.52");
    }

    #[test]
    fn test_handle_reads_current_state() {
        let buffer = CaptureBuffer::new();
        let registry = ChannelRegistry::builder()
            .transmitter(DefaultTransmitter::to_writer(buffer.clone()))
            .build();
        let handle = registry.create_channel("app", Some("io"));
        assert_eq!(handle.topic(), "app::io");

        registry.disable("app::io");
        assert!(!handle.is_enabled());
        handle.send("dropped").unwrap();

        registry.enable("app::io");
        assert!(handle.is_enabled());
        handle.send("kept").unwrap();

        assert_eq!(buffer.contents(), "kept");
    }
}
