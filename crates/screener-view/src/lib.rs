#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/screener/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Presentation layer for the stock screener.
//!
//! - [`FilterBuilder`](filters::FilterBuilder) - Builds the filter list
//! - [`ResultTable`](results::ResultTable) - Projects and formats result rows
//! - [`DetailView`](detail::DetailView) - Company statements by type and year
//! - [`AppState`](state::AppState) - Screen state and its transitions
//! - [`Notification`](notify::Notification) - Auto-dismissing user messages

/// Company detail rendering.
pub mod detail;
/// Filter list editing.
pub mod filters;
/// Value formatting rules.
pub mod format;
/// DataFrame export.
pub mod frame;
/// User notifications.
pub mod notify;
/// Result table rendering.
pub mod results;
/// Application state store.
pub mod state;

pub use detail::{CompanySummary, DetailView, PivotRow, StatementPivot, YearFilter};
pub use filters::{FilterBuilder, FilterEdit};
pub use format::NOT_AVAILABLE;
pub use frame::write_parquet;
pub use notify::{Notification, Severity};
pub use results::{
    Column, ColumnSource, ColumnVisibility, FinancialColumn, ResultTable, build_columns,
};
pub use state::{AppState, EMPTY_STATE, RequestKind, RequestTicket, ResultsPanel};
