//! WooCommerce payment method → mode of payment lookup.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use tokio::task;
use wooledger_core::ModeOfPaymentRepository;
use wooledger_domain::Result as DomainResult;

use super::manager::{map_join_error, map_sql_error, DbManager};

pub struct SqliteModeOfPaymentRepository {
    db: Arc<DbManager>,
}

impl SqliteModeOfPaymentRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    pub async fn set_mapping(&self, woocommerce_method: &str, mode_of_payment: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let method = woocommerce_method.to_string();
        let mode = mode_of_payment.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO mode_of_payment_map (woocommerce_method, mode_of_payment) VALUES (?1, ?2)
                 ON CONFLICT(woocommerce_method) DO UPDATE SET mode_of_payment = excluded.mode_of_payment",
                params![method, mode],
            )
            .map(|_| ())
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl ModeOfPaymentRepository for SqliteModeOfPaymentRepository {
    async fn mode_of_payment_for(&self, woocommerce_method: &str) -> DomainResult<Option<String>> {
        let db = Arc::clone(&self.db);
        let method = woocommerce_method.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<String>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT mode_of_payment FROM mode_of_payment_map WHERE woocommerce_method = ?1",
                params![method],
                |row| row.get(0),
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn lookup_is_parameterized_and_exact() {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager = DbManager::new(temp_dir.path().join("test.db"), 1).expect("manager created");
        manager.run_migrations().expect("migrations applied");
        let repo = SqliteModeOfPaymentRepository::new(Arc::new(manager));

        repo.set_mapping("stripe", "Credit Card").await.unwrap();
        repo.set_mapping("stripe", "Card").await.unwrap();

        assert_eq!(repo.mode_of_payment_for("stripe").await.unwrap().as_deref(), Some("Card"));
        assert_eq!(repo.mode_of_payment_for("' OR '1'='1").await.unwrap(), None);
        assert_eq!(repo.mode_of_payment_for("bacs").await.unwrap(), None);
    }
}
