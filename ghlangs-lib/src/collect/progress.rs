/// Receives progress updates from a collection run.
pub trait Progress: Send + Sync {
    /// Set the phase label for the current operation (e.g., "Owned", "Contributed").
    fn set_phase(&self, phase: &str);

    /// Configure indeterminate progress reporting.
    ///
    /// The callback should return a message string. The total number of repositories is
    /// never known up front, so collection only ever reports this way.
    fn set_indeterminate(&self, callback: Box<dyn Fn() -> String + Send + Sync + 'static>);

    /// Finish and clear the progress indicator.
    fn done(&self);
}

/// Progress sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn set_phase(&self, _phase: &str) {}

    fn set_indeterminate(&self, _callback: Box<dyn Fn() -> String + Send + Sync + 'static>) {}

    fn done(&self) {}
}
