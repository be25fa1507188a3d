//! Result renderer.
//!
//! Turns screen rows into a table: base columns come from the server's field
//! list, and five synthetic financial columns are appended whose values are
//! looked up in each row's nested statements.

use std::collections::HashSet;

use screener_core::Row;
use serde_json::Value;

use crate::format::{self, NOT_AVAILABLE};

/// Field-name fragments that mark statement bookkeeping rather than a
/// company attribute.
const BOOKKEEPING_FRAGMENTS: [&str; 4] = ["fiscal_year", "statement", "key", "value"];

/// Field holding the nested statements of a row.
const LATEST_FINANCIALS: &str = "latest_financials";

/// Display column derived from nested statement data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FinancialColumn {
    /// Total revenue.
    Revenue,
    /// Net income.
    NetIncome,
    /// Total assets.
    TotalAssets,
    /// Total debt.
    TotalDebt,
    /// Price-to-earnings ratio.
    PeRatio,
}

impl FinancialColumn {
    /// Synthetic columns in display order.
    pub const ALL: [Self; 5] = [
        Self::Revenue,
        Self::NetIncome,
        Self::TotalAssets,
        Self::TotalDebt,
        Self::PeRatio,
    ];

    /// Returns the metric key looked up in the statements.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::NetIncome => "net_income",
            Self::TotalAssets => "total_assets",
            Self::TotalDebt => "total_debt",
            Self::PeRatio => "pe_ratio",
        }
    }

    /// Returns the column header.
    #[must_use]
    pub const fn header(&self) -> &'static str {
        match self {
            Self::Revenue => "REVENUE",
            Self::NetIncome => "NET INCOME",
            Self::TotalAssets => "TOTAL ASSETS",
            Self::TotalDebt => "TOTAL DEBT",
            Self::PeRatio => "P/E RATIO",
        }
    }

    /// Finds the synthetic column for a field name.
    #[must_use]
    pub fn from_field(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.field() == field)
    }

    /// Formats a raw value for this column.
    #[must_use]
    pub fn format(&self, value: Option<&Value>) -> String {
        match value {
            v if format::is_missing(v) => NOT_AVAILABLE.to_string(),
            Some(Value::Number(n)) if *self == Self::PeRatio => format::ratio(n),
            Some(Value::Number(n)) => format::currency(n),
            Some(other) => format::raw(other),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

/// Where a column's values come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnSource {
    /// Read directly from the row's attributes.
    Attribute,
    /// Looked up in the row's nested statements.
    Financial(FinancialColumn),
}

/// One renderable column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Column {
    /// Field name.
    pub field: String,
    /// Header label.
    pub header: String,
    /// Value source.
    pub source: ColumnSource,
}

impl Column {
    /// Creates a base column, deriving its header from the field name.
    #[must_use]
    pub fn attribute(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            header: header_label(&field),
            field,
            source: ColumnSource::Attribute,
        }
    }

    /// Creates a synthetic financial column.
    #[must_use]
    pub fn financial(column: FinancialColumn) -> Self {
        Self {
            field: column.field().to_string(),
            header: column.header().to_string(),
            source: ColumnSource::Financial(column),
        }
    }

    /// Renders this column's cell for a row.
    #[must_use]
    pub fn cell(&self, row: &Row) -> String {
        match self.source {
            ColumnSource::Financial(column) => column.format(row.financial(column.field())),
            ColumnSource::Attribute => match row.get(&self.field) {
                v if format::is_missing(v) => NOT_AVAILABLE.to_string(),
                Some(value) => format::raw(value),
                None => NOT_AVAILABLE.to_string(),
            },
        }
    }
}

/// Converts `field_name` into `FIELD NAME`.
#[must_use]
pub fn header_label(field: &str) -> String {
    field.replace('_', " ").to_uppercase()
}

/// Returns true for fields that describe nested statement bookkeeping.
#[must_use]
pub fn is_bookkeeping(field: &str) -> bool {
    field == LATEST_FINANCIALS || BOOKKEEPING_FRAGMENTS.iter().any(|frag| field.contains(frag))
}

/// Builds the full column list: base columns, then the synthetic ones.
///
/// Bookkeeping fields are dropped, and base fields sharing a name with a
/// synthetic column give way to it.
#[must_use]
pub fn build_columns(fields: &[String]) -> Vec<Column> {
    fields
        .iter()
        .filter(|f| !is_bookkeeping(f) && FinancialColumn::from_field(f).is_none())
        .map(|f| Column::attribute(f.as_str()))
        .chain(FinancialColumn::ALL.into_iter().map(Column::financial))
        .collect()
}

/// User-selected subset of columns to display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    visible: HashSet<String>,
}

impl ColumnVisibility {
    /// Makes every given column visible.
    #[must_use]
    pub fn all(columns: &[Column]) -> Self {
        Self {
            visible: columns.iter().map(|c| c.field.clone()).collect(),
        }
    }

    /// Returns true if the field is visible.
    #[must_use]
    pub fn is_visible(&self, field: &str) -> bool {
        self.visible.contains(field)
    }

    /// Shows a field.
    pub fn show(&mut self, field: impl Into<String>) {
        self.visible.insert(field.into());
    }

    /// Hides a field.
    pub fn hide(&mut self, field: &str) {
        self.visible.remove(field);
    }

    /// Flips a field's visibility, returning the new state.
    pub fn toggle(&mut self, field: &str) -> bool {
        if self.visible.remove(field) {
            false
        } else {
            self.visible.insert(field.to_string());
            true
        }
    }

    /// Replaces the visible set, keeping only names of known columns.
    ///
    /// Returns the names that matched no column, in input order.
    pub fn set<I, S>(&mut self, fields: I, columns: &[Column]) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unknown = Vec::new();
        self.visible.clear();
        for field in fields {
            let field = field.as_ref();
            if columns.iter().any(|c| c.field == field) {
                self.visible.insert(field.to_string());
            } else {
                unknown.push(field.to_string());
            }
        }
        unknown
    }

    /// Returns the visible columns in display order.
    #[must_use]
    pub fn project<'a>(&self, columns: &'a [Column]) -> Vec<&'a Column> {
        columns.iter().filter(|c| self.is_visible(&c.field)).collect()
    }
}

/// A rendered result grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultTable {
    /// Visible columns, in display order.
    pub columns: Vec<Column>,
    /// One formatted row per result, aligned with `columns`.
    pub cells: Vec<Vec<String>>,
}

impl ResultTable {
    /// Renders rows through the visible columns.
    #[must_use]
    pub fn render(rows: &[Row], columns: &[Column], visibility: &ColumnVisibility) -> Self {
        let columns: Vec<Column> = visibility.project(columns).into_iter().cloned().collect();
        let cells = rows
            .iter()
            .map(|row| columns.iter().map(|c| c.cell(row)).collect())
            .collect();
        Self { columns, cells }
    }

    /// Returns the header labels.
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the caption shown above the grid.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} companies found", self.cells.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::{LatestFinancials, StatementKind};
    use serde_json::json;

    fn row(value: Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_columns_drops_bookkeeping() {
        let columns = build_columns(&fields(&[
            "symbol",
            "sector",
            "market_cap",
            "fiscal_year",
            "statement",
            "key",
            "value",
            "latest_financials",
            "revenue",
            "pe_ratio",
        ]));
        let names: Vec<&str> = columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(
            names,
            [
                "symbol",
                "sector",
                "market_cap",
                "revenue",
                "net_income",
                "total_assets",
                "total_debt",
                "pe_ratio"
            ]
        );
        assert_eq!(columns[2].header, "MARKET CAP");
        assert_eq!(columns[7].header, "P/E RATIO");
    }

    #[test]
    fn test_bookkeeping_matches_fragments() {
        assert!(is_bookkeeping("statement_type"));
        assert!(is_bookkeeping("enterprise_value"));
        assert!(is_bookkeeping("monkey"));
        assert!(!is_bookkeeping("market_cap"));
    }

    #[test]
    fn test_financial_cells() {
        let r = row(json!({
            "symbol": "AAPL",
            "latest_financials": {
                "income_statement": {"revenue": 391035000000i64, "pe_ratio": 37.2881},
                "balancesheet_statement": {"revenue": 1, "total_assets": 364980000000i64, "total_debt": "see notes"},
                "cashflow_statement": {"net_income": null}
            }
        }));
        let cell = |c: FinancialColumn| Column::financial(c).cell(&r);

        assert_eq!(cell(FinancialColumn::Revenue), "$391,035,000,000");
        assert_eq!(cell(FinancialColumn::TotalAssets), "$364,980,000,000");
        assert_eq!(cell(FinancialColumn::TotalDebt), "see notes");
        assert_eq!(cell(FinancialColumn::NetIncome), NOT_AVAILABLE);
        assert_eq!(cell(FinancialColumn::PeRatio), "37.29");
    }

    #[test]
    fn test_row_without_financials_shows_markers() {
        let r = row(json!({"symbol": "XYZ"}));
        for column in FinancialColumn::ALL {
            assert_eq!(Column::financial(column).cell(&r), NOT_AVAILABLE);
        }

        let r = Row::default().with_financials(LatestFinancials::default().with_statement(
            StatementKind::Income,
            serde_json::Map::new(),
        ));
        assert_eq!(Column::financial(FinancialColumn::Revenue).cell(&r), NOT_AVAILABLE);
    }

    #[test]
    fn test_missing_marker_is_column_independent() {
        let r = row(json!({"sector": null, "country": "N/A"}));
        assert_eq!(Column::attribute("sector").cell(&r), NOT_AVAILABLE);
        assert_eq!(Column::attribute("country").cell(&r), NOT_AVAILABLE);
        assert_eq!(Column::attribute("industry").cell(&r), NOT_AVAILABLE);
        for column in FinancialColumn::ALL {
            assert_eq!(column.format(Some(&Value::Null)), NOT_AVAILABLE);
            assert_eq!(column.format(None), NOT_AVAILABLE);
        }
    }

    #[test]
    fn test_base_cells_render_raw() {
        let r = row(json!({"market_cap": 3500000000000i64, "sector": "Technology"}));
        assert_eq!(Column::attribute("market_cap").cell(&r), "3500000000000");
        assert_eq!(Column::attribute("sector").cell(&r), "Technology");
    }

    #[test]
    fn test_visibility_projection_keeps_order() {
        let columns = build_columns(&fields(&["symbol", "sector", "country"]));
        let mut visibility = ColumnVisibility::all(&columns);
        visibility.hide("sector");
        assert!(!visibility.toggle("revenue"));
        assert!(visibility.toggle("revenue"));
        visibility.hide("net_income");

        let projected: Vec<&str> = visibility
            .project(&columns)
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(
            projected,
            ["symbol", "country", "revenue", "total_assets", "total_debt", "pe_ratio"]
        );

        let unknown = visibility.set(["pe_ratio", "symbol", "bogus"], &columns);
        assert_eq!(unknown, ["bogus"]);
        let projected: Vec<&str> = visibility
            .project(&columns)
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(projected, ["symbol", "pe_ratio"]);
    }

    #[test]
    fn test_render_table() {
        let columns = build_columns(&fields(&["sector", "symbol"]));
        let mut visibility = ColumnVisibility::default();
        visibility.set(["symbol", "revenue"], &columns);

        let rows = vec![
            row(json!({"sector": "Technology", "symbol": "AAPL",
                "latest_financials": {"income_statement": {"revenue": 100}}})),
            row(json!({"sector": "Technology", "symbol": "MSFT"})),
        ];
        let table = ResultTable::render(&rows, &columns, &visibility);

        assert_eq!(table.headers(), ["SYMBOL", "REVENUE"]);
        assert_eq!(table.cells, vec![vec!["AAPL", "$100"], vec!["MSFT", "N/A"]]);
        assert_eq!(table.summary(), "2 companies found");
    }
}
