//! Batch bookkeeping types.
//!
//! A batch is ephemeral and in-memory only: it lives for one call to
//! [`run_batch`](crate::orchestrator::run_batch) and is dropped with its
//! report once the loop terminates.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, BusinessError};

/// How completed calls are counted for the final summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountingMode {
    /// Every completed call counts, success or not. This reproduces the
    /// behavior of the original client, which never inspected the
    /// response before incrementing its counter.
    #[default]
    Legacy,
    /// Only calls whose response reports success count.
    Strict,
}

impl FromStr for CountingMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(CountingMode::Legacy),
            "strict" => Ok(CountingMode::Strict),
            other => Err(AppError::Business(BusinessError::OptionParseFailed {
                option: "counting mode".to_string(),
                value: other.to_string(),
            })),
        }
    }
}

/// What a failed call does to the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep going; the original client never aborted a batch.
    #[default]
    Continue,
    /// Stop after the first failed call.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(AppError::Business(BusinessError::OptionParseFailed {
                option: "failure policy".to_string(),
                value: other.to_string(),
            })),
        }
    }
}

/// Knobs of one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub counting_mode: CountingMode,
    pub failure_policy: FailurePolicy,
    /// Pause between the last call completing and the progress surface
    /// being dismissed, so the full bar is visible for a moment.
    pub dismiss_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            counting_mode: CountingMode::default(),
            failure_policy: FailurePolicy::default(),
            dismiss_delay: Duration::from_millis(1000),
        }
    }
}

/// Result of one file within a batch, kept for the run log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOutcome {
    pub file_name: String,
    pub success: bool,
    /// Created document name on success, error text otherwise.
    pub detail: Option<String>,
}

/// Final tally of one batch run.
///
/// Invariants: `attempted <= total`, `succeeded + failed == attempted`,
/// and `attempted` grows by exactly one per completed remote call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    /// Calls that ran to completion, whatever their outcome.
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// The summary figure, per the configured [`CountingMode`].
    pub processed: usize,
    /// True when a failure stopped the batch early.
    pub aborted: bool,
    /// Per-file outcomes, in call order.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Applies the counting mode to the raw tallies.
    pub fn settle(&mut self, mode: CountingMode) {
        self.processed = match mode {
            CountingMode::Legacy => self.attempted,
            CountingMode::Strict => self.succeeded,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_mode_parse() {
        assert_eq!(
            "legacy".parse::<CountingMode>().unwrap(),
            CountingMode::Legacy
        );
        assert_eq!(
            "Strict".parse::<CountingMode>().unwrap(),
            CountingMode::Strict
        );
        assert!("lenient".parse::<CountingMode>().is_err());
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!(
            "continue".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Continue
        );
        assert_eq!(
            "ABORT".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Abort
        );
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_report_settle() {
        let mut report = BatchReport {
            total: 5,
            attempted: 5,
            succeeded: 3,
            failed: 2,
            ..Default::default()
        };

        report.settle(CountingMode::Legacy);
        assert_eq!(report.processed, 5);

        report.settle(CountingMode::Strict);
        assert_eq!(report.processed, 3);
    }
}
