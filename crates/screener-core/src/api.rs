//! The screener API seam.
//!
//! [`ScreenerApi`] is the one trait every transport implements. The view
//! layer and the dispatching session only ever talk to this trait, so tests
//! and alternative backends can stand in for the HTTP client.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    query::ScreenRequest,
    types::{CompanyDetail, Row},
};

/// Remote screener service.
///
/// Each call is an independent request/response round trip. Implementations
/// do not cache, retry, or de-duplicate requests.
#[async_trait]
pub trait ScreenerApi: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "HTTP").
    fn name(&self) -> &str;

    /// Fetches the list of fields that can be filtered on and displayed.
    async fn fields(&self) -> Result<Vec<String>>;

    /// Runs a screen query and returns the matching rows.
    async fn screen(&self, request: &ScreenRequest) -> Result<Vec<Row>>;

    /// Fetches one company's attributes and full financial history.
    async fn company(&self, symbol: &str) -> Result<CompanyDetail>;
}
