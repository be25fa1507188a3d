//! Query dispatcher driving [`AppState`] over a [`ScreenerApi`].

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use screener_core::{Row, ScreenerApi};
use screener_view::{AppState, RequestTicket};

/// What happened to a dispatch attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Refused locally; no request was sent.
    Refused,
    /// Sent, and the response was applied to the state.
    Applied,
    /// Sent, but a newer request of the same kind was issued before the
    /// response arrived. The response was dropped.
    Superseded,
}

impl Dispatch {
    fn from_applied(applied: bool) -> Self {
        if applied { Self::Applied } else { Self::Superseded }
    }
}

/// A screener session: one [`AppState`] and the backend it talks to.
///
/// Dispatch methods take `&self`, so requests may overlap. The state lock is
/// held only while a request is started and while its response is applied,
/// never across the round trip. When two requests of the same kind overlap,
/// the one issued last owns the state and the older response is reported as
/// [`Dispatch::Superseded`].
///
/// There is no caching, retrying or cancellation.
///
/// # Example
///
/// ```rust,ignore
/// use screener::{Filter, Operator, Session};
///
/// let mut session = Session::from_env()?;
/// session.load_fields().await;
/// session.state_mut().push_filter(Filter::new("sector", Operator::Eq, "Technology"))?;
/// session.run_query().await;
/// println!("{}", session.state().await.result_table().summary());
/// ```
pub struct Session {
    api: Arc<dyn ScreenerApi>,
    state: RwLock<AppState>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("Session");
        out.field("api", &self.api.name());
        match self.state.try_read() {
            Ok(state) => out.field("state", &*state),
            Err(_) => out.field("state", &"<locked>"),
        };
        out.finish()
    }
}

impl Session {
    /// Create a session over any backend.
    #[must_use]
    pub fn new(api: Arc<dyn ScreenerApi>) -> Self {
        Self {
            api,
            state: RwLock::new(AppState::new()),
        }
    }

    /// Create a session over the HTTP client configured from the environment.
    #[cfg(feature = "http")]
    pub fn from_env() -> screener_core::Result<Self> {
        Self::with_http(screener_http::ClientConfig::from_env()?)
    }

    /// Create a session over the HTTP client with an explicit configuration.
    #[cfg(feature = "http")]
    pub fn with_http(config: screener_http::ClientConfig) -> screener_core::Result<Self> {
        debug!(base_url = %config.base_url(), "Using HTTP backend");
        let client = screener_http::HttpScreenerClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Returns the backend.
    #[must_use]
    pub fn api(&self) -> &Arc<dyn ScreenerApi> {
        &self.api
    }

    /// Locks the screen state for reading.
    ///
    /// Drop the guard before awaiting a dispatch on the same session.
    pub async fn state(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().await
    }

    /// Locks the screen state for local edits while other tasks share the session.
    pub async fn write_state(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().await
    }

    /// Returns the screen state for local edits, without locking.
    pub fn state_mut(&mut self) -> &mut AppState {
        self.state.get_mut()
    }

    /// Fetches the field list.
    pub async fn load_fields(&self) -> Dispatch {
        let ticket = self.state.write().await.begin_fields();
        let result = self.api.fields().await;
        Dispatch::from_applied(self.state.write().await.fields_loaded(ticket, result))
    }

    /// Runs the current filters as a screen query.
    pub async fn run_query(&self) -> Dispatch {
        let begun = self.state.write().await.begin_query();
        let Some((ticket, request)) = begun else {
            return Dispatch::Refused;
        };
        debug!(
            provider = self.api.name(),
            generation = ticket.generation(),
            filters = request.filters.len(),
            "Dispatching screen query"
        );
        let result = self.api.screen(&request).await;
        if let Ok(rows) = &result {
            info!(rows = rows.len(), "Screen query finished");
        }
        Dispatch::from_applied(self.state.write().await.query_finished(ticket, result))
    }

    /// Opens the company of the result row at `index`.
    pub async fn open_row(&self, index: usize) -> Dispatch {
        let begun = self.state.write().await.begin_company(index);
        match begun {
            Some((ticket, symbol)) => self.fetch_company(ticket, &symbol).await,
            None => Dispatch::Refused,
        }
    }

    /// Opens a company directly by symbol, bypassing the result rows.
    pub async fn open_symbol(&self, symbol: &str) -> Dispatch {
        let row = Row::new(
            [("symbol".to_string(), serde_json::Value::from(symbol))]
                .into_iter()
                .collect(),
        );
        let begun = self.state.write().await.begin_row_click(&row);
        match begun {
            Some((ticket, symbol)) => self.fetch_company(ticket, &symbol).await,
            None => Dispatch::Refused,
        }
    }

    async fn fetch_company(&self, ticket: RequestTicket, symbol: &str) -> Dispatch {
        debug!(provider = self.api.name(), symbol, "Fetching company detail");
        let result = self.api.company(symbol).await;
        Dispatch::from_applied(self.state.write().await.company_loaded(ticket, result))
    }

    /// Closes the company detail.
    pub async fn close_detail(&self) {
        self.state.write().await.close_detail();
    }
}
