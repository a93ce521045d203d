//! SQLite-backed local ledger used by the reconciliation engine.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;
use tracing::warn;
use wooledger_core::InvoiceRepository;
use wooledger_domain::{Invoice, InvoiceStatus, PaymentAllocation, Result as DomainResult};

use super::manager::{map_join_error, map_sql_error, DbManager, SqliteConnection};

pub struct SqliteInvoiceRepository {
    db: Arc<DbManager>,
}

impl SqliteInvoiceRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert or replace an invoice.
    pub async fn save_invoice(&self, invoice: &Invoice) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let invoice = invoice.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO invoices (id, grand_total, outstanding_amount, status, modified_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    grand_total = excluded.grand_total,
                    outstanding_amount = excluded.outstanding_amount,
                    status = excluded.status,
                    modified_at = excluded.modified_at",
                params![
                    invoice.id,
                    invoice.grand_total,
                    invoice.outstanding_amount,
                    invoice.status.to_string(),
                    Utc::now().timestamp(),
                ],
            )
            .map(|_| ())
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Record a payment allocation against an existing invoice.
    pub async fn add_allocation(&self, allocation: &PaymentAllocation) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let allocation = allocation.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO payment_allocations (payment_entry, invoice_id, allocated_amount)
                 VALUES (?1, ?2, ?3)",
                params![allocation.payment_entry, allocation.invoice_id, allocation.allocated_amount],
            )
            .map(|_| ())
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Look up a single invoice.
    pub async fn find(&self, invoice_id: &str) -> DomainResult<Option<Invoice>> {
        let db = Arc::clone(&self.db);
        let invoice_id = invoice_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Invoice>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT id, grand_total, outstanding_amount, status FROM invoices WHERE id = ?1",
                params![invoice_id],
                map_invoice_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    fn fetch_unpaid(conn: &SqliteConnection) -> DomainResult<Vec<Invoice>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, grand_total, outstanding_amount, status FROM invoices
                 WHERE status = 'posted' ORDER BY id",
            )
            .map_err(map_sql_error)?;
        let rows = stmt.query_map([], map_invoice_row).map_err(map_sql_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
    }

    fn fetch_allocations(
        conn: &SqliteConnection,
        invoice_id: &str,
    ) -> DomainResult<Vec<PaymentAllocation>> {
        let mut stmt = conn
            .prepare(
                "SELECT payment_entry, invoice_id, allocated_amount FROM payment_allocations
                 WHERE invoice_id = ?1 ORDER BY id",
            )
            .map_err(map_sql_error)?;
        let rows = stmt
            .query_map(params![invoice_id], |row| {
                Ok(PaymentAllocation {
                    payment_entry: row.get(0)?,
                    invoice_id: row.get(1)?,
                    allocated_amount: row.get(2)?,
                })
            })
            .map_err(map_sql_error)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
    }

    /// Conditional transition committed in its own transaction.
    fn transition_to_paid(conn: &mut SqliteConnection, invoice_id: &str) -> DomainResult<bool> {
        let tx = conn.transaction().map_err(map_sql_error)?;
        let changed = tx
            .execute(
                "UPDATE invoices SET status = 'paid', modified_at = ?2
                 WHERE id = ?1 AND status = 'posted'",
                params![invoice_id, Utc::now().timestamp()],
            )
            .map_err(map_sql_error)?;
        tx.commit().map_err(map_sql_error)?;
        Ok(changed == 1)
    }
}

#[async_trait]
impl InvoiceRepository for SqliteInvoiceRepository {
    async fn unpaid_posted_invoices(&self) -> DomainResult<Vec<Invoice>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Invoice>> {
            let conn = db.get_connection()?;
            Self::fetch_unpaid(&conn)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn allocations_for(&self, invoice_id: &str) -> DomainResult<Vec<PaymentAllocation>> {
        let db = Arc::clone(&self.db);
        let invoice_id = invoice_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<PaymentAllocation>> {
            let conn = db.get_connection()?;
            Self::fetch_allocations(&conn, &invoice_id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn mark_paid(&self, invoice_id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let invoice_id = invoice_id.to_string();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let mut conn = db.get_connection()?;
            Self::transition_to_paid(&mut conn, &invoice_id)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_invoice_row(row: &Row<'_>) -> rusqlite::Result<Invoice> {
    let id: String = row.get(0)?;
    let status_raw: String = row.get(3)?;
    let status = parse_status(&id, &status_raw);

    Ok(Invoice { id, grand_total: row.get(1)?, outstanding_amount: row.get(2)?, status })
}

fn parse_status(id: &str, raw: &str) -> InvoiceStatus {
    match raw.parse::<InvoiceStatus>() {
        Ok(status) => status,
        Err(err) => {
            warn!(
                invoice_id = %id,
                raw_status = %raw,
                error = %err,
                "invalid invoice status in ledger, treating as draft"
            );
            InvoiceStatus::Draft
        }
    }
}
