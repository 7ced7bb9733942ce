use crate::api::{ApiError, ApiErrorKind, ApiResult, UpdateNoteResponse};
use crate::models::VersionToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub max_retries: u32,
    pub delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt, or `None` once retries are exhausted.
    pub fn next_delay(&self, retries_so_far: u32) -> Option<u32> {
        (retries_so_far < self.max_retries).then_some(self.delay_ms)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum SaveOutcome {
    Saved(VersionToken),
    /// Server holds a newer version than the token we sent.
    Conflict,
    Transient(ApiError),
    Cancelled,
}

impl SaveOutcome {
    pub fn classify(result: ApiResult<UpdateNoteResponse>) -> Self {
        match result {
            Ok(resp) => SaveOutcome::Saved(resp.updated_at),
            Err(e) => match e.kind {
                ApiErrorKind::Conflict => SaveOutcome::Conflict,
                ApiErrorKind::Cancelled => SaveOutcome::Cancelled,
                _ => SaveOutcome::Transient(e),
            },
        }
    }

    #[cfg(test)]
    pub fn is_retryable(&self) -> bool {
        matches!(self, SaveOutcome::Transient(_))
    }
}
