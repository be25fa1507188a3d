//! Response types of the screener API.
//!
//! This module defines the records the server sends back:
//!
//! - [`Row`] - One screen result, keyed by field name
//! - [`StatementKind`] - Financial statement categories
//! - [`LatestFinancials`] - Most recent statements nested under a row
//! - [`CompanyDetail`] - Company attributes plus every financial entry
//! - [`FinancialEntry`] - One statement of one fiscal year
//!
//! JSON objects keep the server's key order, so columns and metric rows
//! render in the order the server produced them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::ScreenerError;

/// Flat mapping from metric name to value.
pub type MetricMap = Map<String, Value>;

/// Financial statement category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatementKind {
    /// Income statement.
    #[serde(rename = "income_statement")]
    Income,
    /// Balance sheet.
    #[serde(rename = "balancesheet_statement")]
    BalanceSheet,
    /// Cash flow statement.
    #[serde(rename = "cashflow_statement")]
    CashFlow,
}

impl StatementKind {
    /// Order in which statements are searched for a metric.
    pub const LOOKUP_ORDER: [Self; 3] = [Self::Income, Self::BalanceSheet, Self::CashFlow];

    /// Returns the name the server uses for this statement.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::Income => "income_statement",
            Self::BalanceSheet => "balancesheet_statement",
            Self::CashFlow => "cashflow_statement",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for StatementKind {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LOOKUP_ORDER
            .into_iter()
            .find(|kind| kind.wire_name() == s)
            .ok_or_else(|| ScreenerError::InvalidParameter(format!("Unknown statement: {s}")))
    }
}

/// Most recent financial statements attached to a screen result.
///
/// Each statement is optional; statements the client does not know about
/// are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestFinancials {
    /// Income statement metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_statement: Option<MetricMap>,
    /// Balance sheet metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balancesheet_statement: Option<MetricMap>,
    /// Cash flow metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cashflow_statement: Option<MetricMap>,
}

impl LatestFinancials {
    /// Returns the metrics of one statement, if present.
    #[must_use]
    pub fn statement(&self, kind: StatementKind) -> Option<&MetricMap> {
        match kind {
            StatementKind::Income => self.income_statement.as_ref(),
            StatementKind::BalanceSheet => self.balancesheet_statement.as_ref(),
            StatementKind::CashFlow => self.cashflow_statement.as_ref(),
        }
    }

    /// Returns a mutable slot for one statement.
    pub fn statement_mut(&mut self, kind: StatementKind) -> &mut Option<MetricMap> {
        match kind {
            StatementKind::Income => &mut self.income_statement,
            StatementKind::BalanceSheet => &mut self.balancesheet_statement,
            StatementKind::CashFlow => &mut self.cashflow_statement,
        }
    }

    /// Sets the metrics of one statement.
    #[must_use]
    pub fn with_statement(mut self, kind: StatementKind, metrics: MetricMap) -> Self {
        *self.statement_mut(kind) = Some(metrics);
        self
    }

    /// Finds a metric by searching statements in [`StatementKind::LOOKUP_ORDER`].
    ///
    /// The first statement that defines the key wins, even when the value it
    /// holds is `null`.
    #[must_use]
    pub fn lookup(&self, metric: &str) -> Option<&Value> {
        StatementKind::LOOKUP_ORDER
            .iter()
            .filter_map(|kind| self.statement(*kind))
            .find_map(|metrics| metrics.get(metric))
    }
}

/// One screen result.
///
/// Company attributes are kept as a loosely-typed map keyed by field name;
/// nested statements live in [`Row::latest_financials`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Most recent financial statements, when the server attached them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_financials: Option<LatestFinancials>,
    /// Every other attribute of the row.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Row {
    /// Creates a row from its attributes.
    #[must_use]
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            latest_financials: None,
            attributes,
        }
    }

    /// Attaches latest financial statements.
    #[must_use]
    pub fn with_financials(mut self, financials: LatestFinancials) -> Self {
        self.latest_financials = Some(financials);
        self
    }

    /// Returns an attribute by field name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Returns the row's symbol when it is a non-empty string.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.get("symbol")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Looks up a metric in the nested statements.
    #[must_use]
    pub fn financial(&self, metric: &str) -> Option<&Value> {
        self.latest_financials.as_ref()?.lookup(metric)
    }
}

/// One statement of one fiscal year.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialEntry {
    /// Fiscal year the statement covers.
    pub fiscal_year: i32,
    /// Statement name, e.g. `income_statement`.
    pub statement: String,
    /// Metric values of the statement.
    #[serde(default)]
    pub data: MetricMap,
}

impl FinancialEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(fiscal_year: i32, statement: impl Into<String>, data: MetricMap) -> Self {
        Self {
            fiscal_year,
            statement: statement.into(),
            data,
        }
    }
}

/// Company attributes and its full financial history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetail {
    /// Company attributes keyed by column name.
    pub company: Map<String, Value>,
    /// Every statement of every fiscal year, in server order.
    #[serde(default)]
    pub financials: Vec<FinancialEntry>,
}

impl CompanyDetail {
    /// Returns a company attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.company.get(key)
    }
}

/// Body of `GET /fields`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsResponse {
    /// Field names, in server order.
    pub fields: Vec<String>,
}

/// Body of `POST /screener`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenResponse {
    /// Matching rows.
    #[serde(default)]
    pub results: Vec<Row>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metrics(value: Value) -> MetricMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_lookup_prefers_income_statement() {
        let fin = LatestFinancials::default()
            .with_statement(StatementKind::Income, metrics(json!({"revenue": 10})))
            .with_statement(StatementKind::BalanceSheet, metrics(json!({"revenue": 20})));
        assert_eq!(fin.lookup("revenue"), Some(&json!(10)));
    }

    #[test]
    fn test_lookup_falls_through_in_order() {
        let fin = LatestFinancials::default()
            .with_statement(StatementKind::CashFlow, metrics(json!({"total_debt": 3})))
            .with_statement(StatementKind::BalanceSheet, metrics(json!({"total_debt": 2})));
        assert_eq!(fin.lookup("total_debt"), Some(&json!(2)));
        assert_eq!(fin.lookup("pe_ratio"), None);
    }

    #[test]
    fn test_lookup_stops_at_explicit_null() {
        let fin = LatestFinancials::default()
            .with_statement(StatementKind::Income, metrics(json!({"net_income": null})))
            .with_statement(StatementKind::CashFlow, metrics(json!({"net_income": 5})));
        assert_eq!(fin.lookup("net_income"), Some(&Value::Null));
    }

    #[test]
    fn test_row_deserialize() {
        let row: Row = serde_json::from_value(json!({
            "symbol": "AAPL",
            "sector": "Technology",
            "latest_financials": {
                "income_statement": {"revenue": 391035000000.0},
                "unknown_statement": {"x": 1}
            }
        }))
        .unwrap();

        assert_eq!(row.symbol(), Some("AAPL"));
        assert_eq!(row.get("sector"), Some(&json!("Technology")));
        assert!(row.get("latest_financials").is_none());
        assert_eq!(row.financial("revenue"), Some(&json!(391035000000.0)));
        let keys: Vec<&String> = row.attributes.keys().collect();
        assert_eq!(keys, ["symbol", "sector"]);
    }

    #[test]
    fn test_row_symbol_requires_non_empty_string() {
        let row: Row = serde_json::from_value(json!({"symbol": ""})).unwrap();
        assert_eq!(row.symbol(), None);
        let row: Row = serde_json::from_value(json!({"sector": "Energy"})).unwrap();
        assert_eq!(row.symbol(), None);
        assert_eq!(row.financial("revenue"), None);
    }

    #[test]
    fn test_statement_kind_names() {
        assert_eq!(
            "balancesheet_statement".parse::<StatementKind>().unwrap(),
            StatementKind::BalanceSheet
        );
        assert!("ratios".parse::<StatementKind>().is_err());
    }

    #[test]
    fn test_company_detail_deserialize() {
        let detail: CompanyDetail = serde_json::from_value(json!({
            "company": {"symbol": "AAPL", "short_name": "Apple Inc."},
            "financials": [
                {"fiscal_year": 2024, "statement": "income_statement", "data": {"revenue": 1}}
            ]
        }))
        .unwrap();
        assert_eq!(detail.attribute("symbol"), Some(&json!("AAPL")));
        assert_eq!(detail.financials[0].fiscal_year, 2024);
        assert_eq!(detail.financials[0].data["revenue"], json!(1));
    }
}
