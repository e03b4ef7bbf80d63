//! Overview table routes - all transactions visible to the upstream token
//!
//! Structure:
//! - api.rs: JSON endpoints

pub mod api;

pub use api::{
    api_transactions,
    api_transactions_filter,
    api_transactions_page,
    api_transactions_refresh,
    api_transactions_reset,
    api_transactions_schools,
    api_transactions_sort,
    api_transactions_summary,
    api_transactions_toggle_school,
    api_transactions_toggle_status,
};
