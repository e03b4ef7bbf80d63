//! School table routes - transactions of one selected school
//!
//! Structure:
//! - api.rs: JSON endpoints

pub mod api;

pub use api::{
    api_school_filter,
    api_school_page,
    api_school_refresh,
    api_school_reset,
    api_school_sort,
    api_school_summary,
    api_school_toggle_school,
    api_school_toggle_status,
    api_school_view,
};
