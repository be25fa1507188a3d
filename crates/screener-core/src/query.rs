//! Screen query types.
//!
//! This module defines the request side of the screener API:
//!
//! - [`Operator`] - Comparison applied by a filter
//! - [`Filter`] - A single field/operator/value condition
//! - [`Pagination`] - Limit/offset window over the result set
//! - [`ScreenRequest`] - The full body posted to `/screener`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScreenerError;

/// Default page size used by the screener API.
pub const DEFAULT_LIMIT: u32 = 100;

/// Comparison operator of a [`Filter`].
///
/// The wire spelling of [`Operator::Contains`] is `like`, which is what the
/// backend matches against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Equality.
    #[default]
    #[serde(rename = "=")]
    Eq,
    /// Strictly greater than.
    #[serde(rename = ">")]
    Gt,
    /// Strictly less than.
    #[serde(rename = "<")]
    Lt,
    /// Greater than or equal.
    #[serde(rename = ">=")]
    Ge,
    /// Less than or equal.
    #[serde(rename = "<=")]
    Le,
    /// Substring match.
    #[serde(rename = "like", alias = "contains")]
    Contains,
}

impl Operator {
    /// All operators, in the order they are offered to the user.
    pub const ALL: [Self; 6] = [
        Self::Eq,
        Self::Gt,
        Self::Lt,
        Self::Ge,
        Self::Le,
        Self::Contains,
    ];

    /// Returns the label shown to the user.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Contains => "contains",
        }
    }

    /// Returns the spelling sent to the server.
    #[must_use]
    pub const fn wire(&self) -> &'static str {
        match self {
            Self::Contains => "like",
            other => other.label(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Operator {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" | "==" => Ok(Self::Eq),
            ">" => Ok(Self::Gt),
            "<" => Ok(Self::Lt),
            ">=" => Ok(Self::Ge),
            "<=" => Ok(Self::Le),
            "contains" | "like" | "~" => Ok(Self::Contains),
            other => Err(ScreenerError::InvalidParameter(format!(
                "Unknown operator: {other}. Supported: =, >, <, >=, <=, contains"
            ))),
        }
    }
}

/// A single field/operator/value condition of a screen query.
///
/// The value is an opaque string; the server decides how to compare it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filter {
    /// Field name, one of the server-provided fields.
    pub field: String,
    /// Comparison operator.
    pub op: Operator,
    /// Right-hand side of the comparison.
    pub value: String,
}

impl Filter {
    /// Creates a new filter.
    #[must_use]
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

/// Parses `field<op>value` expressions such as `sector=Technology`,
/// `market_cap>=1000000` or `short_name~Apple` (`~` meaning *contains*).
///
/// Whitespace around the field and the value is trimmed.
impl FromStr for Filter {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let start = s.find(['=', '<', '>', '~']).ok_or_else(|| {
            ScreenerError::InvalidParameter(format!("Missing operator in filter: {s}"))
        })?;

        let rest = &s[start..];
        let op_len = if rest.starts_with(">=") || rest.starts_with("<=") || rest.starts_with("==")
        {
            2
        } else {
            1
        };
        let op: Operator = rest[..op_len].parse()?;

        let field = s[..start].trim();
        if field.is_empty() {
            return Err(ScreenerError::InvalidParameter(format!(
                "Missing field in filter: {s}"
            )));
        }

        Ok(Self::new(field, op, rest[op_len..].trim()))
    }
}

/// Limit/offset window over the result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of rows to return.
    pub limit: u32,
    /// Number of rows to skip.
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Creates a new window.
    #[must_use]
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Returns the window immediately after this one.
    #[must_use]
    pub const fn next_page(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }

    /// Returns the window immediately before this one, clamped at zero.
    #[must_use]
    pub const fn previous_page(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_sub(self.limit),
        }
    }
}

/// Body posted to the `/screener` endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRequest {
    /// Filters, in the order the user built them.
    pub filters: Vec<Filter>,
    /// Maximum number of rows to return.
    pub limit: u32,
    /// Number of rows to skip.
    pub offset: u32,
    /// Explicit column projection, or `null` for the server default.
    pub columns: Option<Vec<String>>,
}

impl ScreenRequest {
    /// Creates a request with the default window and no column projection.
    #[must_use]
    pub fn new(filters: Vec<Filter>) -> Self {
        Self::with_page(filters, Pagination::default())
    }

    /// Creates a request for a specific window.
    #[must_use]
    pub fn with_page(filters: Vec<Filter>, page: Pagination) -> Self {
        Self {
            filters,
            limit: page.limit,
            offset: page.offset,
            columns: None,
        }
    }

    /// Sets an explicit column projection.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Returns the window this request covers.
    #[must_use]
    pub const fn page(&self) -> Pagination {
        Pagination::new(self.limit, self.offset)
    }
}
