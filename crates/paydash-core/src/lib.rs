//! Core transaction table logic
//!
//! Normalizes raw upstream transactions into [`TransactionRecord`]s and
//! drives the filter/sort/paginate [`TableEngine`] behind each session view.

pub mod engine;
pub mod error;
pub mod filter;
pub mod models;
pub mod reports;
pub mod session;
pub mod sort;
pub mod time;
pub mod types;

pub use engine::{PageState, TableEngine, TableView, ViewPreferences, ViewPreferencesUpdate};
pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity};
pub use filter::{FilterPatch, FilterState};
pub use models::{records_from_values, RawTransaction, SearchField, TransactionRecord};
pub use reports::{StatusSummary, SummaryResponse};
pub use session::{
    Preferences, PreferencesUpdate, Session, SessionPreferences, SessionStore, ViewSnapshot, ViewState,
};
pub use sort::SortState;
pub use types::{SortDirection, SortField, StatusTone, TransactionStatus};
