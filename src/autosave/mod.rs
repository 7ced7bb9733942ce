mod buffer;
mod debounce;
mod retry;

pub(crate) use buffer::{EditBuffer, SaveSnapshot};
pub(crate) use debounce::Debouncer;
pub(crate) use retry::{RetryPolicy, SaveOutcome};

/// Timing knobs for the note autosave loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AutosaveConfig {
    /// Quiet period after the last edit before a save fires.
    pub quiet_period_ms: u32,
    pub retry: RetryPolicy,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: 1000,
            retry: RetryPolicy::default(),
        }
    }
}
