use std::sync::Arc;

use dashmap::DashMap;
use parley_core::unix_millis;

/// Process-wide record of stop requests, keyed by conversation id
///
/// Stop handlers insert; in-flight generations only look up. A request
/// counts only when it arrived strictly after the generation started, so
/// stale entries from earlier turns of the same conversation are harmless
/// and never need to be cleaned up here.
#[derive(Debug, Clone, Default)]
pub struct AbortRegistry {
    requested: Arc<DashMap<String, u64>>,
}

impl AbortRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stop request for the conversation at the current time
    ///
    /// A later request for the same conversation overwrites an earlier one.
    pub fn request_stop(&self, conversation_id: &str) {
        self.requested.insert(conversation_id.to_owned(), unix_millis());
    }

    /// Whether a stop was requested strictly after `started_at` (unix ms)
    #[must_use]
    pub fn stop_requested_after(&self, conversation_id: &str, started_at: u64) -> bool {
        self.requested
            .get(conversation_id)
            .is_some_and(|requested_at| *requested_at > started_at)
    }
}
