use super::coordinator::BatchSummary;

/// Callbacks for batch progress and user-facing notices.
///
/// Implementors can drive progress bars, status lines, or any other
/// feedback. All methods have default no-op implementations.
pub trait BatchObserver: Send + Sync {
    /// A batch has started over `total` records.
    fn batch_started(&self, _total: usize) {}

    /// One record's transform has settled, successfully or not.
    fn record_settled(&self, _filename: &str, _succeeded: bool) {}

    /// The batch has completed with its final counts.
    fn batch_finished(&self, _summary: &BatchSummary) {}

    /// A transient informational message for the user. Interactive
    /// frontends clear these after a short delay; persistent errors travel
    /// through record state instead.
    fn notice(&self, _message: &str) {}

    /// Asked before a download when results are missing but records are
    /// pending: should they be processed now? Defaults to declining.
    fn confirm_process_pending(&self, _pending: usize) -> bool {
        false
    }
}

/// Silent observer for callers that don't need feedback.
pub struct NoOpObserver;

impl BatchObserver for NoOpObserver {}
