//! Data-fetch layer: incremental filters and page walking over the remote
//! REST API.

pub mod filter;
pub mod pagination;
pub mod ports;

pub use filter::{format_sync_cursor, incremental_filter, SyncEntity};
pub use pagination::PaginationWalker;
