//! Periodic payment auto-reconciliation.
//!
//! Wraps [`ReconciliationService::run`] in a cron job. Each pass is bounded
//! by `job_timeout`; a failed or timed-out pass is logged and the next tick
//! runs normally.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use wooledger_core::ReconciliationService;
//! use wooledger_infra::scheduling::{
//!     ReconcileScheduler, ReconcileSchedulerConfig, SchedulerResult,
//! };
//!
//! # async fn example(service: Arc<ReconciliationService>) -> SchedulerResult<()> {
//! let mut scheduler = ReconcileScheduler::with_config(
//!     ReconcileSchedulerConfig {
//!         cron_expression: "0 0 * * * *".into(), // hourly
//!         ..Default::default()
//!     },
//!     service,
//! );
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use wooledger_core::ReconciliationService;
use wooledger_domain::{ReconcileConfig, ReconciliationReport, Result as DomainResult};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

#[derive(Debug, Clone)]
pub struct ReconcileSchedulerConfig {
    /// Six-field cron expression (seconds first).
    pub cron_expression: String,
    /// Upper bound for one reconciliation pass.
    pub job_timeout: Duration,
    pub start_timeout: Duration,
    pub stop_timeout: Duration,
    /// Timeout for awaiting the monitor task join handle.
    pub join_timeout: Duration,
}

impl Default for ReconcileSchedulerConfig {
    fn default() -> Self {
        Self::from(&ReconcileConfig::default())
    }
}

impl From<&ReconcileConfig> for ReconcileSchedulerConfig {
    fn from(config: &ReconcileConfig) -> Self {
        Self {
            cron_expression: config.cron_expression.clone(),
            job_timeout: Duration::from_secs(config.job_timeout_secs),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
            join_timeout: Duration::from_secs(5),
        }
    }
}

/// Cron scheduler for reconciliation passes with explicit lifecycle
/// management.
pub struct ReconcileScheduler {
    scheduler: Option<JobScheduler>,
    config: ReconcileSchedulerConfig,
    monitor_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    service: Arc<ReconciliationService>,
}

impl ReconcileScheduler {
    pub fn new(cron_expression: String, service: Arc<ReconciliationService>) -> Self {
        let config = ReconcileSchedulerConfig { cron_expression, ..Default::default() };
        Self::with_config(config, service)
    }

    pub fn with_config(
        config: ReconcileSchedulerConfig,
        service: Arc<ReconciliationService>,
    ) -> Self {
        Self {
            scheduler: None,
            config,
            monitor_handle: None,
            cancellation: CancellationToken::new(),
            service,
        }
    }

    /// Start the scheduler, spawning the monitoring task.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler_instance = self.build_scheduler().await?;
        let start_timeout = self.config.start_timeout;

        tokio::time::timeout(start_timeout, scheduler_instance.start())
            .await
            .map_err(|source| SchedulerError::Timeout { duration: start_timeout, source })?
            .map_err(|source| SchedulerError::StartFailed { source })?;

        self.scheduler = Some(scheduler_instance);

        let cancel = self.cancellation.clone();
        self.monitor_handle = Some(tokio::spawn(Self::monitor_task(cancel)));

        info!(
            scheduler = "reconcile",
            event = "start",
            cron = %self.config.cron_expression,
            "Reconcile scheduler started"
        );
        Ok(())
    }

    /// Stop the scheduler and wait for the monitor task to finish.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(mut scheduler) = self.scheduler.take() else {
            return Err(SchedulerError::NotRunning);
        };

        self.cancellation.cancel();

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, async move { scheduler.shutdown().await })
            .await
            .map_err(|source| SchedulerError::Timeout { duration: stop_timeout, source })?
            .map_err(|source| SchedulerError::StopFailed { source })?;

        if let Some(handle) = self.monitor_handle.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|source| SchedulerError::Timeout { duration: join_timeout, source })??;
        }

        info!(scheduler = "reconcile", event = "stop", "Reconcile scheduler stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    async fn build_scheduler(&self) -> SchedulerResult<JobScheduler> {
        let scheduler =
            JobScheduler::new().await.map_err(|source| SchedulerError::CreationFailed { source })?;
        let service = self.service.clone();
        let job_timeout = self.config.job_timeout;

        let job = Job::new_async(self.config.cron_expression.as_str(), move |_id, _lock| {
            let service = service.clone();
            Box::pin(async move {
                let started = Instant::now();
                match tokio::time::timeout(job_timeout, Self::run_pass(&service)).await {
                    Ok(Ok(report)) => {
                        debug!(
                            scheduler = "reconcile",
                            event = "job_complete",
                            examined = report.examined,
                            marked_paid = report.marked_paid.len(),
                            failed = report.failed.len(),
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Reconciliation pass finished"
                        );
                    }
                    Ok(Err(err)) => {
                        error!(
                            scheduler = "reconcile",
                            error = %err,
                            error_kind = err.label(),
                            "Reconciliation pass failed"
                        );
                    }
                    Err(_) => {
                        warn!(
                            scheduler = "reconcile",
                            event = "job_timeout",
                            timeout_secs = job_timeout.as_secs(),
                            "Reconciliation pass timed out"
                        );
                    }
                }
            })
        })
        .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        let job_id = job.guid();
        scheduler
            .add(job)
            .await
            .map_err(|source| SchedulerError::JobRegistrationFailed { source })?;

        debug!(cron = %self.config.cron_expression, job_id = %job_id, "Registered reconciliation job");
        Ok(scheduler)
    }

    async fn run_pass(service: &ReconciliationService) -> DomainResult<ReconciliationReport> {
        let report = service.run().await?;
        if !report.marked_paid.is_empty() || !report.failed.is_empty() {
            info!(
                scheduler = "reconcile",
                event = "job_finished",
                marked_paid = report.marked_paid.len(),
                partially_paid = report.partially_paid,
                failed = report.failed.len(),
                "Reconciliation pass changed invoices"
            );
        }
        Ok(report)
    }

    async fn monitor_task(cancel: CancellationToken) {
        cancel.cancelled().await;
        debug!(scheduler = "reconcile", event = "monitor_cancelled", "Reconcile monitor cancelled");
    }
}

impl Drop for ReconcileScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!(
                scheduler = "reconcile",
                event = "drop_cancel",
                "ReconcileScheduler dropped while running; cancelling tasks"
            );
            self.cancellation.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use wooledger_core::{InvoiceRepository, SyncLogSink};
    use wooledger_domain::{
        Invoice, InvoiceStatus, PaymentAllocation, SyncLogEntry, WooLedgerError,
    };

    use super::*;

    struct SingleInvoice {
        invoice: Mutex<Invoice>,
        lookups: AtomicUsize,
    }

    impl SingleInvoice {
        fn new(grand_total: f64) -> Self {
            Self {
                invoice: Mutex::new(Invoice {
                    id: "PINV-0001".into(),
                    grand_total,
                    outstanding_amount: grand_total,
                    status: InvoiceStatus::Posted,
                }),
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl InvoiceRepository for SingleInvoice {
        async fn unpaid_posted_invoices(&self) -> DomainResult<Vec<Invoice>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let invoice = self.invoice.lock().await;
            Ok(if invoice.status == InvoiceStatus::Posted { vec![invoice.clone()] } else { vec![] })
        }

        async fn allocations_for(&self, invoice_id: &str) -> DomainResult<Vec<PaymentAllocation>> {
            Ok(vec![PaymentAllocation {
                payment_entry: "PE-0001".into(),
                invoice_id: invoice_id.into(),
                allocated_amount: 100.0,
            }])
        }

        async fn mark_paid(&self, _invoice_id: &str) -> DomainResult<bool> {
            let mut invoice = self.invoice.lock().await;
            if invoice.status != InvoiceStatus::Posted {
                return Ok(false);
            }
            invoice.status = InvoiceStatus::Paid;
            invoice.outstanding_amount = 0.0;
            Ok(true)
        }
    }

    struct NullLog;

    #[async_trait]
    impl SyncLogSink for NullLog {
        async fn record(&self, _entry: SyncLogEntry) -> DomainResult<i64> {
            Ok(1)
        }

        async fn recent(&self, _limit: usize) -> DomainResult<Vec<SyncLogEntry>> {
            Err(WooLedgerError::Internal("not kept".into()))
        }
    }

    fn service(repo: Arc<SingleInvoice>) -> Arc<ReconciliationService> {
        Arc::new(ReconciliationService::new(repo, Arc::new(NullLog)))
    }

    fn fast_config() -> ReconcileSchedulerConfig {
        ReconcileSchedulerConfig {
            cron_expression: "*/1 * * * * *".into(), // every second
            job_timeout: Duration::from_secs(2),
            start_timeout: Duration::from_secs(2),
            stop_timeout: Duration::from_secs(2),
            join_timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn config_follows_reconcile_settings() {
        let config = ReconcileSchedulerConfig::from(&ReconcileConfig {
            enabled: true,
            cron_expression: "0 0 * * * *".into(),
            job_timeout_secs: 42,
        });
        assert_eq!(config.cron_expression, "0 0 * * * *");
        assert_eq!(config.job_timeout, Duration::from_secs(42));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn lifecycle_runs_successfully() {
        let repo = Arc::new(SingleInvoice::new(100.0));
        let mut scheduler = ReconcileScheduler::with_config(fast_config(), service(repo));

        scheduler.start().await.expect("start succeeds");
        assert!(scheduler.is_running());
        tokio::time::sleep(Duration::from_secs(2)).await;
        scheduler.stop().await.expect("stop succeeds");

        assert!(!scheduler.is_running());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn double_start_is_rejected() {
        let repo = Arc::new(SingleInvoice::new(100.0));
        let mut scheduler = ReconcileScheduler::with_config(fast_config(), service(repo));

        scheduler.start().await.expect("first start");
        let err = scheduler.start().await.expect_err("second start fails");
        assert!(matches!(err, SchedulerError::AlreadyRunning));
        scheduler.stop().await.expect("stop succeeds");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stop_without_start_is_rejected() {
        let repo = Arc::new(SingleInvoice::new(100.0));
        let mut scheduler = ReconcileScheduler::with_config(fast_config(), service(repo));

        let err = scheduler.stop().await.expect_err("not running");
        assert!(matches!(err, SchedulerError::NotRunning));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn restart_after_stop_succeeds() {
        let repo = Arc::new(SingleInvoice::new(100.0));
        let mut scheduler = ReconcileScheduler::with_config(fast_config(), service(repo));

        scheduler.start().await.expect("start succeeds");
        scheduler.stop().await.expect("stop succeeds");
        assert!(!scheduler.is_running());

        scheduler.start().await.expect("start again");
        scheduler.stop().await.expect("stop again");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn invalid_cron_fails_registration() {
        let repo = Arc::new(SingleInvoice::new(100.0));
        let config = ReconcileSchedulerConfig {
            cron_expression: "every now and then".into(),
            ..fast_config()
        };
        let mut scheduler = ReconcileScheduler::with_config(config, service(repo));

        let err = scheduler.start().await.expect_err("bad cron");
        assert!(matches!(err, SchedulerError::JobRegistrationFailed { .. }));
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn run_pass_settles_fully_allocated_invoice() {
        let repo = Arc::new(SingleInvoice::new(100.0));
        let service = service(repo.clone());

        let report = ReconcileScheduler::run_pass(&service).await.expect("pass succeeds");
        assert_eq!(report.marked_paid, vec!["PINV-0001".to_string()]);

        let again = ReconcileScheduler::run_pass(&service).await.expect("second pass");
        assert_eq!(again.examined, 0);
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 2);
    }
}
