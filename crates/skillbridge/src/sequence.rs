use std::collections::HashMap;
use std::sync::Mutex;

/// Hands out unique, monotonically increasing ids per namespace (`"jobs"`, `"notification"`).
///
/// Implementations must be safe to call concurrently: two callers never observe the same id
/// for the same namespace.
pub trait SequenceGenerator: Send + Sync {
    fn next_id(&self, namespace: &str) -> Result<u64, SequenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("sequence '{namespace}' is exhausted")]
    Exhausted { namespace: String },
    #[error("sequence store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local counters; ids start at 1 so 0 stays free as the "new record" sentinel.
#[derive(Debug, Default)]
pub struct InMemorySequence {
    counters: Mutex<HashMap<String, u64>>,
}

impl InMemorySequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a namespace after `last_issued`, e.g. when seeding from existing data.
    pub fn resume_after(self, namespace: &str, last_issued: u64) -> Self {
        if let Ok(mut counters) = self.counters.lock() {
            counters.insert(namespace.to_string(), last_issued);
        }
        self
    }
}

impl SequenceGenerator for InMemorySequence {
    fn next_id(&self, namespace: &str) -> Result<u64, SequenceError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| SequenceError::Unavailable("sequence mutex poisoned".to_string()))?;
        let counter = counters.entry(namespace.to_string()).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| SequenceError::Exhausted {
                namespace: namespace.to_string(),
            })?;
        Ok(*counter)
    }
}
