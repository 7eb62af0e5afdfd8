//! Aggregated result of a bulk send

/// Counts and errors collected over one bulk send.
///
/// `sent + failed` always equals the number of messages handed to the
/// dispatcher.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Messages the backend accepted
    pub sent: usize,

    /// Messages that could not be delivered
    pub failed: usize,

    /// One `"<recipient>: <error>"` entry per failure, in request order
    pub errors: Vec<String>,
}

impl BulkOutcome {
    /// `true` when nothing failed
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of messages attempted
    pub fn total(&self) -> usize {
        self.sent + self.failed
    }

    /// The error list, or [`None`] when there were no failures
    pub fn errors(&self) -> Option<&[String]> {
        if self.errors.is_empty() {
            None
        } else {
            Some(&self.errors)
        }
    }

    /// At most `limit` errors from the front of the list
    pub fn error_preview(&self, limit: usize) -> Option<Vec<String>> {
        self.errors()
            .map(|errors| errors.iter().take(limit).cloned().collect())
    }

    pub(super) fn record_sent(&mut self) {
        self.sent += 1;
    }

    pub(super) fn record_failure(&mut self, recipient: &str, error: &str) {
        self.failed += 1;
        self.errors.push(format!("{recipient}: {error}"));
    }
}
