#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/screener/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the stock screener client.
//!
//! This crate provides the foundational abstractions shared by every other crate:
//!
//! - [`ScreenerApi`](api::ScreenerApi) - The remote screener service
//! - [`ScreenRequest`](query::ScreenRequest) - Filters plus pagination and columns
//! - [`Row`](types::Row) - A screen result with optional nested statements
//! - [`CompanyDetail`](types::CompanyDetail) - One company's full financials
//! - [`ScreenerError`](error::ScreenerError) - Error taxonomy

/// The remote screener service trait.
pub mod api;
/// Error types for screener operations.
pub mod error;
/// Request-side types (filters, operators, pagination).
pub mod query;
/// Response-side types (rows, statements, company detail).
pub mod types;

// Re-export commonly used items at crate root
pub use api::ScreenerApi;
pub use error::{Result, ScreenerError};
pub use query::{DEFAULT_LIMIT, Filter, Operator, Pagination, ScreenRequest};
pub use types::{
    CompanyDetail, FieldsResponse, FinancialEntry, LatestFinancials, MetricMap, Row,
    ScreenResponse, StatementKind,
};
