//! Scheduler error types

use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinError;
use tokio::time::error::Elapsed;
use tokio_cron_scheduler::JobSchedulerError;
use wooledger_domain::WooLedgerError;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler already running")]
    AlreadyRunning,

    #[error("scheduler not running")]
    NotRunning,

    #[error("failed to create scheduler")]
    CreationFailed {
        #[source]
        source: JobSchedulerError,
    },

    #[error("failed to start scheduler")]
    StartFailed {
        #[source]
        source: JobSchedulerError,
    },

    #[error("failed to stop scheduler")]
    StopFailed {
        #[source]
        source: JobSchedulerError,
    },

    /// Usually an invalid cron expression.
    #[error("failed to register job")]
    JobRegistrationFailed {
        #[source]
        source: JobSchedulerError,
    },

    #[error("operation timed out after {duration:?}")]
    Timeout {
        duration: Duration,
        #[source]
        source: Elapsed,
    },

    #[error("task join failed")]
    TaskJoinFailed(#[from] JoinError),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let mapped = match &err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                WooLedgerError::InvalidInput(err.to_string())
            }
            SchedulerError::JobRegistrationFailed { source } => {
                WooLedgerError::Config(format!("{err}: {source}"))
            }
            _ => WooLedgerError::Internal(err.to_string()),
        };
        InfraError(mapped)
    }
}

impl From<SchedulerError> for WooLedgerError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_misuse_maps_to_invalid_input() {
        let err: WooLedgerError = SchedulerError::AlreadyRunning.into();
        assert!(matches!(err, WooLedgerError::InvalidInput(_)));

        let err: WooLedgerError = SchedulerError::NotRunning.into();
        assert!(matches!(err, WooLedgerError::InvalidInput(_)));
    }
}
