use std::time::Duration;

use chatdash_core::event::CorrelationId;
use tokio::time::Instant;

/// An open edit form waiting for its submission.
///
/// The expiry is fixed when the form opens; idle-timer resets never extend it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub correlation: CorrelationId,
    /// Position of the edited category
    pub category: usize,
    pub expires_at: Instant,
}

impl PendingEdit {
    pub fn new(category: usize, category_name: &str, window: Duration) -> Self {
        Self {
            correlation: CorrelationId::generate(category_name),
            category,
            expires_at: Instant::now() + window,
        }
    }

    /// Whether a submission carrying `correlation` at `now` belongs to this form.
    pub fn accepts(&self, correlation: &CorrelationId, now: Instant) -> bool {
        &self.correlation == correlation && now < self.expires_at
    }
}
