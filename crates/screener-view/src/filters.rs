//! Filter builder.
//!
//! Keeps the ordered list of filters a screen query is built from. Every
//! operation is a local mutation; nothing here touches the network.

use screener_core::{Filter, Operator, Result, ScreenerError};

/// One edit applied to an existing filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterEdit {
    /// Change the field.
    Field(String),
    /// Change the operator.
    Op(Operator),
    /// Change the value.
    Value(String),
}

/// Ordered list of filters.
///
/// Duplicate fields and empty values are allowed and passed through as-is.
/// Field names are checked against the known field list whenever that list
/// is non-empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterBuilder {
    filters: Vec<Filter>,
}

impl FilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the filters in order.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns the number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true if there are no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Appends a filter on the first known field with `=` and an empty value.
    ///
    /// Returns the index of the new filter.
    pub fn add(&mut self, known_fields: &[String]) -> usize {
        let field = known_fields.first().cloned().unwrap_or_default();
        self.filters.push(Filter::new(field, Operator::Eq, ""));
        self.filters.len() - 1
    }

    /// Appends a fully specified filter.
    pub fn push(&mut self, filter: Filter, known_fields: &[String]) -> Result<usize> {
        check_field(&filter.field, known_fields)?;
        self.filters.push(filter);
        Ok(self.filters.len() - 1)
    }

    /// Removes the filter at `index`, returning it.
    ///
    /// Out-of-range indices leave the list untouched.
    pub fn remove(&mut self, index: usize) -> Option<Filter> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    /// Applies one edit to the filter at `index`.
    pub fn update(&mut self, index: usize, edit: FilterEdit, known_fields: &[String]) -> Result<()> {
        let len = self.filters.len();
        let filter = self.filters.get_mut(index).ok_or_else(|| {
            ScreenerError::InvalidParameter(format!("filter index {index} out of range (len {len})"))
        })?;

        match edit {
            FilterEdit::Field(field) => {
                check_field(&field, known_fields)?;
                filter.field = field;
            }
            FilterEdit::Op(op) => filter.op = op,
            FilterEdit::Value(value) => filter.value = value,
        }
        Ok(())
    }

    /// Removes every filter.
    pub fn clear(&mut self) {
        self.filters.clear();
    }
}

fn check_field(field: &str, known_fields: &[String]) -> Result<()> {
    if known_fields.is_empty() || known_fields.iter().any(|f| f == field) {
        Ok(())
    } else {
        Err(ScreenerError::InvalidParameter(format!("Unknown field: {field}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<String> {
        vec!["sector".to_string(), "symbol".to_string()]
    }

    #[test]
    fn test_add_defaults_to_first_field() {
        let mut builder = FilterBuilder::new();
        assert_eq!(builder.add(&fields()), 0);
        assert_eq!(builder.filters()[0], Filter::new("sector", Operator::Eq, ""));

        builder.add(&[]);
        assert_eq!(builder.filters()[1].field, "");
    }

    #[test]
    fn test_remove_by_index() {
        let mut builder = FilterBuilder::new();
        builder.add(&fields());
        builder.add(&fields());
        builder
            .update(1, FilterEdit::Field("symbol".into()), &fields())
            .unwrap();

        let removed = builder.remove(0).unwrap();
        assert_eq!(removed.field, "sector");
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.filters()[0].field, "symbol");
        assert!(builder.remove(5).is_none());
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_update_each_part() {
        let mut builder = FilterBuilder::new();
        builder.add(&fields());
        builder
            .update(0, FilterEdit::Op(Operator::Contains), &fields())
            .unwrap();
        builder
            .update(0, FilterEdit::Value("Tech".into()), &fields())
            .unwrap();
        assert_eq!(
            builder.filters()[0],
            Filter::new("sector", Operator::Contains, "Tech")
        );
    }

    #[test]
    fn test_update_rejects_unknown_field_and_index() {
        let mut builder = FilterBuilder::new();
        builder.add(&fields());
        assert!(
            builder
                .update(0, FilterEdit::Field("nope".into()), &fields())
                .is_err()
        );
        assert!(
            builder
                .update(3, FilterEdit::Value("x".into()), &fields())
                .is_err()
        );
        assert_eq!(builder.filters()[0].field, "sector");
    }

    #[test]
    fn test_duplicates_and_empty_values_pass_through() {
        let mut builder = FilterBuilder::new();
        let f = Filter::new("sector", Operator::Eq, "");
        builder.push(f.clone(), &fields()).unwrap();
        builder.push(f.clone(), &fields()).unwrap();
        assert_eq!(builder.filters(), &[f.clone(), f]);
    }
}
