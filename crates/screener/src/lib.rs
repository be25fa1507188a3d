#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/screener/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Stock screener client.
//!
//! # Example
//!
//! ```rust,ignore
//! use screener::{Filter, Operator, ResultsPanel, Session};
//!
//! #[tokio::main]
//! async fn main() -> screener::Result<()> {
//!     let mut session = Session::from_env()?;
//!     session.load_fields().await;
//!
//!     session
//!         .state_mut()
//!         .push_filter(Filter::new("sector", Operator::Eq, "Technology"))?;
//!     session.run_query().await;
//!
//!     if let ResultsPanel::Table(table) = session.state().await.results_panel() {
//!         println!("{}", table.summary());
//!     }
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use screener_core::*;

// View layer
pub use screener_view as view;
pub use screener_view::{
    AppState, CompanySummary, DetailView, FilterBuilder, FilterEdit, Notification, ResultTable,
    ResultsPanel, Severity, StatementPivot, YearFilter,
};

// Backends
#[cfg(feature = "http")]
pub use screener_http::{
    API_BASE_ENV, ClientConfig, DEFAULT_API_BASE, HttpScreenerClient, TIMEOUT_ENV,
};

mod session;
pub use session::{Dispatch, Session};
