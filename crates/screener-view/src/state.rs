//! Application state store.
//!
//! [`AppState`] holds everything the screen shows and changes only through
//! the transition methods below. None of them perform I/O: a `begin_*`
//! call hands out a [`RequestTicket`] plus whatever the caller must send,
//! and the matching completion method folds the response back in.
//!
//! Tickets carry a per-kind generation. A completion whose generation is no
//! longer current belongs to a superseded request and is dropped, so a slow
//! response can never overwrite the display state of a newer one.

use chrono::{DateTime, Utc};
use screener_core::{
    CompanyDetail, Filter, Pagination, Result, Row, ScreenRequest, ScreenerError,
};
use tracing::{debug, error, warn};

use crate::detail::DetailView;
use crate::filters::{FilterBuilder, FilterEdit};
use crate::notify::Notification;
use crate::results::{Column, ColumnVisibility, ResultTable, build_columns};

/// Text of the panel shown instead of an empty table.
pub const EMPTY_STATE: &str = "No data found. Please try a different query.";

/// The three request kinds the screen issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// `GET /fields`.
    Fields,
    /// `POST /screener`.
    Screen,
    /// `GET /company/{symbol}`.
    Company,
}

/// Proof that a request was started, presented again on completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use = "a request ticket must be handed back to its completion method"]
pub struct RequestTicket {
    kind: RequestKind,
    generation: u64,
}

impl RequestTicket {
    /// Returns the request kind.
    pub const fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Returns the generation this request was issued under.
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Slot {
    generation: u64,
    in_flight: bool,
}

/// What the results area currently shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultsPanel {
    /// A request is in flight.
    Loading,
    /// No rows to show; carries the empty-state text.
    Empty(&'static str),
    /// Rendered rows.
    Table(ResultTable),
}

/// Everything the screener screen displays.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    fields: Vec<String>,
    filters: FilterBuilder,
    columns: Vec<Column>,
    visibility: ColumnVisibility,
    rows: Vec<Row>,
    page: Pagination,
    requested_columns: Option<Vec<String>>,
    detail: Option<DetailView>,
    notification: Option<Notification>,
    fields_slot: Slot,
    screen_slot: Slot,
    company_slot: Slot,
}

impl AppState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, kind: RequestKind) -> &mut Slot {
        match kind {
            RequestKind::Fields => &mut self.fields_slot,
            RequestKind::Screen => &mut self.screen_slot,
            RequestKind::Company => &mut self.company_slot,
        }
    }

    fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        let slot = self.slot_mut(kind);
        slot.generation += 1;
        slot.in_flight = true;
        RequestTicket {
            kind,
            generation: slot.generation,
        }
    }

    /// Marks a ticket's request as finished. Returns false for stale tickets.
    fn settle(&mut self, ticket: RequestTicket) -> bool {
        let slot = self.slot_mut(ticket.kind);
        if slot.generation != ticket.generation {
            debug!(
                kind = ?ticket.kind,
                stale = ticket.generation,
                current = slot.generation,
                "Dropping superseded response"
            );
            return false;
        }
        slot.in_flight = false;
        true
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// Returns the last fetched field list.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the current filters.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        self.filters.filters()
    }

    /// Returns every renderable column.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column visibility set.
    #[must_use]
    pub fn visibility(&self) -> &ColumnVisibility {
        &self.visibility
    }

    /// Returns the rows of the last successful query.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the current result window.
    #[must_use]
    pub fn page(&self) -> Pagination {
        self.page
    }

    /// Returns true while any request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.fields_slot.in_flight || self.screen_slot.in_flight || self.company_slot.in_flight
    }

    /// Returns the open company detail, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    /// Returns the open company detail for tab/year changes.
    pub fn detail_mut(&mut self) -> Option<&mut DetailView> {
        self.detail.as_mut()
    }

    /// Returns the current notification, if any.
    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Renders the results area.
    #[must_use]
    pub fn results_panel(&self) -> ResultsPanel {
        if self.is_loading() {
            ResultsPanel::Loading
        } else if self.rows.is_empty() {
            ResultsPanel::Empty(EMPTY_STATE)
        } else {
            ResultsPanel::Table(self.result_table())
        }
    }

    /// Renders the rows through the visible columns.
    #[must_use]
    pub fn result_table(&self) -> ResultTable {
        ResultTable::render(&self.rows, &self.columns, &self.visibility)
    }

    // ------------------------------------------------------------------
    // Local edits
    // ------------------------------------------------------------------

    /// Appends a default filter.
    pub fn add_filter(&mut self) -> usize {
        self.filters.add(&self.fields)
    }

    /// Appends a fully specified filter.
    pub fn push_filter(&mut self, filter: Filter) -> Result<usize> {
        self.filters.push(filter, &self.fields)
    }

    /// Removes a filter by index.
    pub fn remove_filter(&mut self, index: usize) -> Option<Filter> {
        self.filters.remove(index)
    }

    /// Edits one filter.
    pub fn update_filter(&mut self, index: usize, edit: FilterEdit) -> Result<()> {
        self.filters.update(index, edit, &self.fields)
    }

    /// Returns the column visibility set for editing.
    pub fn visibility_mut(&mut self) -> &mut ColumnVisibility {
        &mut self.visibility
    }

    /// Shows exactly the named columns.
    ///
    /// Returns the names that match no column. Fails without changing the
    /// visible set when none of the names match.
    pub fn show_columns<I, S>(&mut self, fields: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut visibility = self.visibility.clone();
        let unknown = visibility.set(fields, &self.columns);
        if visibility.project(&self.columns).is_empty() {
            let known: Vec<&str> = self.columns.iter().map(|c| c.field.as_str()).collect();
            return Err(ScreenerError::InvalidParameter(format!(
                "No known columns in {unknown:?}. Available: {}",
                known.join(", ")
            )));
        }
        if !unknown.is_empty() {
            warn!(?unknown, "Ignoring unknown columns");
        }
        self.visibility = visibility;
        Ok(unknown)
    }

    /// Sets the result window used by the next query.
    pub fn set_page(&mut self, page: Pagination) {
        self.page = page;
    }

    /// Sets an explicit server-side column projection for the next query.
    pub fn set_requested_columns(&mut self, columns: Option<Vec<String>>) {
        self.requested_columns = columns;
    }

    /// Clears the notification.
    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Clears the notification if it has outlived its display time.
    pub fn expire_notification(&mut self, now: DateTime<Utc>) {
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notification = None;
        }
    }

    /// Closes the company detail.
    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    // ------------------------------------------------------------------
    // Field list
    // ------------------------------------------------------------------

    /// Starts loading the field list.
    pub fn begin_fields(&mut self) -> RequestTicket {
        self.issue(RequestKind::Fields)
    }

    /// Applies the field list response. Returns false if the ticket was stale.
    ///
    /// On success the column set is rebuilt and every column becomes visible.
    /// On failure the field list is left empty.
    pub fn fields_loaded(&mut self, ticket: RequestTicket, result: Result<Vec<String>>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        match result {
            Ok(fields) => {
                self.columns = build_columns(&fields);
                self.visibility = ColumnVisibility::all(&self.columns);
                self.fields = fields;
            }
            Err(e) => {
                error!(error = %e, "Error loading fields");
                self.fields.clear();
                self.notification = Some(Notification::fields_failed());
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Screen query
    // ------------------------------------------------------------------

    /// Starts a screen query.
    ///
    /// Returns `None` and raises a warning when there are no filters; no
    /// request may be sent in that case.
    pub fn begin_query(&mut self) -> Option<(RequestTicket, ScreenRequest)> {
        if self.filters.is_empty() {
            warn!("Refusing to run a screen without filters");
            self.notification = Some(Notification::no_filters());
            return None;
        }

        let mut request = ScreenRequest::with_page(self.filters.filters().to_vec(), self.page);
        if let Some(columns) = &self.requested_columns {
            request = request.with_columns(columns.clone());
        }
        Some((self.issue(RequestKind::Screen), request))
    }

    /// Applies a screen response. Returns false if the ticket was stale.
    ///
    /// Rows are replaced wholesale; a failure clears them.
    pub fn query_finished(&mut self, ticket: RequestTicket, result: Result<Vec<Row>>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        match result {
            Ok(rows) if rows.is_empty() => {
                self.rows.clear();
                self.notification = Some(Notification::no_results());
            }
            Ok(rows) => {
                self.notification = Some(Notification::found(rows.len()));
                self.rows = rows;
            }
            Err(e) => {
                error!(error = %e, "Query error");
                self.rows.clear();
                self.notification = Some(Notification::query_failed(&e.user_reason()));
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Company detail
    // ------------------------------------------------------------------

    /// Starts loading the company of the row at `index`.
    ///
    /// Returns `None` and raises an error when the row does not exist or
    /// carries no symbol.
    pub fn begin_company(&mut self, index: usize) -> Option<(RequestTicket, String)> {
        let symbol = self.rows.get(index).and_then(Row::symbol).map(str::to_string);
        self.begin_company_for(symbol.as_deref())
    }

    /// Starts loading the company of a clicked row.
    pub fn begin_row_click(&mut self, row: &Row) -> Option<(RequestTicket, String)> {
        self.begin_company_for(row.symbol())
    }

    fn begin_company_for(&mut self, symbol: Option<&str>) -> Option<(RequestTicket, String)> {
        match symbol {
            Some(symbol) => Some((self.issue(RequestKind::Company), symbol.to_string())),
            None => {
                warn!("Row selected without a symbol");
                self.notification = Some(Notification::invalid_row());
                None
            }
        }
    }

    /// Applies a company response. Returns false if the ticket was stale.
    ///
    /// On success a fresh [`DetailView`] opens; on failure nothing opens.
    pub fn company_loaded(&mut self, ticket: RequestTicket, result: Result<CompanyDetail>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        match result {
            Ok(detail) => self.detail = Some(DetailView::new(detail)),
            Err(e) => {
                error!(error = %e, "Company details error");
                self.notification = Some(Notification::company_failed());
            }
        }
        true
    }
}
