//! Cron-driven background jobs.
//!
//! Schedulers own their lifecycle explicitly: `start`/`stop`, tracked join
//! handles, a cancellation token, and timeouts around every async step.

pub mod error;
pub mod reconcile_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use reconcile_scheduler::{ReconcileScheduler, ReconcileSchedulerConfig};
