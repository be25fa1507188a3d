//! Detail renderer for one company's financial statements.
//!
//! A [`DetailView`] is created from a freshly fetched [`CompanyDetail`] and
//! owns the tab and year selection. Both reset whenever a new view is built.

use std::collections::HashMap;

use screener_core::{CompanyDetail, FinancialEntry};
use serde_json::Value;

use crate::format::{self, NOT_AVAILABLE};
use crate::results::header_label;

/// Which fiscal years the statements are restricted to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum YearFilter {
    /// Every year present.
    #[default]
    All,
    /// A single fiscal year.
    Year(i32),
}

impl YearFilter {
    /// Returns true if an entry of `year` passes the filter.
    #[must_use]
    pub const fn matches(&self, year: i32) -> bool {
        match self {
            Self::All => true,
            Self::Year(y) => *y == year,
        }
    }
}

/// One metric row of a pivoted statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PivotRow {
    /// Metric name.
    pub metric: String,
    /// Formatted values, aligned with [`StatementPivot::years`].
    pub cells: Vec<String>,
}

/// A statement pivoted so metrics are rows and fiscal years are columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementPivot {
    /// Statement name.
    pub statement: String,
    /// Tab label.
    pub label: String,
    /// Column years, newest first.
    pub years: Vec<i32>,
    /// Metric rows, in first-seen order.
    pub rows: Vec<PivotRow>,
}

impl StatementPivot {
    /// Pivots the entries of one statement over the given years.
    #[must_use]
    pub fn build<'a, I>(statement: &str, entries: I, years: &[i32]) -> Self
    where
        I: IntoIterator<Item = &'a FinancialEntry>,
    {
        let mut order: Vec<&str> = Vec::new();
        let mut values: HashMap<&str, HashMap<i32, &Value>> = HashMap::new();

        for entry in entries.into_iter().filter(|e| e.statement == statement) {
            for (metric, value) in &entry.data {
                let by_year = values.entry(metric.as_str()).or_insert_with(|| {
                    order.push(metric.as_str());
                    HashMap::new()
                });
                by_year.insert(entry.fiscal_year, value);
            }
        }

        let rows = order
            .into_iter()
            .map(|metric| {
                let by_year = &values[metric];
                PivotRow {
                    metric: metric.to_string(),
                    cells: years
                        .iter()
                        .map(|y| format::cell(by_year.get(y).copied()))
                        .collect(),
                }
            })
            .collect();

        Self {
            statement: statement.to_string(),
            label: header_label(statement),
            years: years.to_vec(),
            rows,
        }
    }
}

/// Header block describing the company.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanySummary {
    /// `SYMBOL - Short Name`.
    pub title: String,
    /// `Sector | Industry | Exchange`.
    pub subtitle: String,
    /// Labelled facts, in display order.
    pub facts: Vec<(&'static str, String)>,
}

impl CompanySummary {
    /// Builds the summary from company attributes.
    #[must_use]
    pub fn from_detail(detail: &CompanyDetail) -> Self {
        let text = |key: &str| match detail.attribute(key) {
            None | Some(Value::Null) => String::new(),
            Some(v) => format::raw(v),
        };
        let grouped = |key: &str| match detail.attribute(key) {
            Some(v) if is_truthy(v) => match v {
                Value::Number(n) => format::group_number(n),
                other => format::raw(other),
            },
            _ => NOT_AVAILABLE.to_string(),
        };
        let dollars = |key: &str| match detail.attribute(key) {
            Some(v) if is_truthy(v) => match v {
                Value::Number(n) => format::currency(n),
                other => format!("${}", format::raw(other)),
            },
            _ => NOT_AVAILABLE.to_string(),
        };

        Self {
            title: format!("{} - {}", text("symbol"), text("short_name")),
            subtitle: format!(
                "{} | {} | {}",
                text("sector"),
                text("industry"),
                text("exchange")
            ),
            facts: vec![
                ("Full Name", text("long_name")),
                ("Country", text("country")),
                ("Employees", grouped("full_time_employees")),
                ("Market", text("market")),
                ("Exchange", text("exchange")),
                ("Market Cap", dollars("market_cap")),
            ],
        }
    }
}

/// Zero, empty strings, `false` and `null` count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// One company's statements with tab and year selection.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailView {
    detail: CompanyDetail,
    year_filter: YearFilter,
    active_tab: usize,
}

impl DetailView {
    /// Opens a view on freshly fetched data, with all years and the first tab.
    #[must_use]
    pub fn new(detail: CompanyDetail) -> Self {
        Self {
            detail,
            year_filter: YearFilter::All,
            active_tab: 0,
        }
    }

    /// Returns the underlying company data.
    #[must_use]
    pub fn detail(&self) -> &CompanyDetail {
        &self.detail
    }

    /// Returns the company header block.
    #[must_use]
    pub fn summary(&self) -> CompanySummary {
        CompanySummary::from_detail(&self.detail)
    }

    /// Returns true if the company has any financial entries.
    #[must_use]
    pub fn has_financials(&self) -> bool {
        !self.detail.financials.is_empty()
    }

    /// Distinct fiscal years across every entry, newest first.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.detail.financials.iter().map(|f| f.fiscal_year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    /// Years shown as pivot columns under the current filter.
    #[must_use]
    pub fn visible_years(&self) -> Vec<i32> {
        self.years()
            .into_iter()
            .filter(|y| self.year_filter.matches(*y))
            .collect()
    }

    /// Returns the current year filter.
    #[must_use]
    pub fn year_filter(&self) -> YearFilter {
        self.year_filter
    }

    /// Changes the year filter.
    ///
    /// The active tab is left alone. If the filtered entries no longer have
    /// that many statement types, [`active_pivot`](Self::active_pivot) yields
    /// `None` until a tab or year is chosen that exists.
    pub fn select_year(&mut self, filter: YearFilter) {
        self.year_filter = filter;
    }

    /// Entries passing the year filter, in server order.
    pub fn filtered(&self) -> impl Iterator<Item = &FinancialEntry> + '_ {
        self.detail
            .financials
            .iter()
            .filter(|f| self.year_filter.matches(f.fiscal_year))
    }

    /// Distinct statement types among the filtered entries, in first-seen order.
    #[must_use]
    pub fn statement_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for entry in self.filtered() {
            if !types.contains(&entry.statement.as_str()) {
                types.push(&entry.statement);
            }
        }
        types
    }

    /// Tab labels, one per statement type.
    #[must_use]
    pub fn tabs(&self) -> Vec<String> {
        self.statement_types()
            .into_iter()
            .map(header_label)
            .collect()
    }

    /// Returns the index of the active tab.
    #[must_use]
    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    /// Activates a tab. Returns false and keeps the current tab if `index`
    /// does not exist.
    pub fn select_tab(&mut self, index: usize) -> bool {
        if index < self.statement_types().len() {
            self.active_tab = index;
            true
        } else {
            false
        }
    }

    /// Activates the tab of a statement by name.
    pub fn select_statement(&mut self, statement: &str) -> bool {
        let position = self.statement_types().iter().position(|s| *s == statement);
        position.is_some_and(|index| self.select_tab(index))
    }

    /// Pivots one statement under the current year filter.
    #[must_use]
    pub fn pivot(&self, statement: &str) -> StatementPivot {
        StatementPivot::build(statement, self.filtered(), &self.visible_years())
    }

    /// Pivots every statement, one per tab.
    #[must_use]
    pub fn pivots(&self) -> Vec<StatementPivot> {
        let years = self.visible_years();
        self.statement_types()
            .into_iter()
            .map(|s| StatementPivot::build(s, self.filtered(), &years))
            .collect()
    }

    /// Pivots the statement of the active tab.
    #[must_use]
    pub fn active_pivot(&self) -> Option<StatementPivot> {
        let types = self.statement_types();
        types.get(self.active_tab).map(|s| self.pivot(s))
    }
}
