//! MemorySink - keeps every accepted message in memory

use std::sync::{Mutex, PoisonError};

use contracts::{ContractError, Priority, SinkAdapter};

/// Sink that records `(level, message)` pairs in arrival order
#[derive(Debug)]
pub struct MemorySink {
    name: String,
    records: Mutex<Vec<(Priority, String)>>,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<(Priority, String)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages only, without levels
    pub fn messages(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .map(|(_, message)| message)
            .collect()
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<(Priority, String)> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl SinkAdapter for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn accept(&self, level: &Priority, message: &str) -> Result<(), ContractError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level.clone(), message.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_and_drains() {
        let sink = MemorySink::new("mem");
        sink.accept(&Priority::from("warn"), "one").unwrap();
        sink.accept(&Priority::default(), "two").unwrap();

        assert_eq!(sink.messages(), vec!["one".to_string(), "two".to_string()]);
        assert_eq!(sink.drain().len(), 2);
        assert!(sink.records().is_empty());
    }
}
