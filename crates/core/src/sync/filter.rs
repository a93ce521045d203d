//! Query fragments that restrict a listing to records changed since the
//! last successful sync.

use chrono::{NaiveDateTime, Timelike};
use wooledger_domain::ConnectionSettings;

/// Listings that accept incremental filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEntity {
    Products,
    Customers,
}

/// Naive ISO-8601 rendering of the sync cursor. Microseconds are only
/// included when present.
pub fn format_sync_cursor(cursor: NaiveDateTime) -> String {
    if cursor.nanosecond() / 1_000 == 0 {
        cursor.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        cursor.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Filter fragment (without a leading separator) for `entity`.
///
/// Returns an empty string when there is nothing to filter on or when
/// `ignore_filters` asks for a full re-pull. `status=publish` only ever
/// applies to products.
pub fn incremental_filter(
    entity: SyncEntity,
    settings: &ConnectionSettings,
    ignore_filters: bool,
) -> String {
    if ignore_filters {
        return String::new();
    }

    let mut conditions = Vec::with_capacity(2);
    if let Some(cursor) = settings.last_sync {
        conditions.push(format!("modified_after={}", format_sync_cursor(cursor)));
    }
    if entity == SyncEntity::Products && settings.sync_only_published {
        conditions.push("status=publish".to_string());
    }
    conditions.join("&")
}
