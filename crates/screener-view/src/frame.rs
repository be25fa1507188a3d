//! Export of rendered grids as polars DataFrames.

use polars::prelude::*;
use screener_core::{Result, ScreenerError};

use crate::detail::StatementPivot;
use crate::results::ResultTable;

fn polars_err(e: PolarsError) -> ScreenerError {
    ScreenerError::Other(format!("DataFrame error: {e}"))
}

impl ResultTable {
    /// Returns the grid as a DataFrame with one string column per visible
    /// column, named after its field.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let values: Vec<&str> = self.cells.iter().map(|row| row[i].as_str()).collect();
                Column::new(column.field.as_str().into(), values)
            })
            .collect();
        DataFrame::new(columns).map_err(polars_err)
    }
}

impl StatementPivot {
    /// Returns the pivot as a DataFrame: a `metric` column followed by one
    /// string column per fiscal year.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.years.len() + 1);
        let metrics: Vec<&str> = self.rows.iter().map(|r| r.metric.as_str()).collect();
        columns.push(Column::new("metric".into(), metrics));

        for (i, year) in self.years.iter().enumerate() {
            let values: Vec<&str> = self.rows.iter().map(|r| r.cells[i].as_str()).collect();
            columns.push(Column::new(year.to_string().into(), values));
        }
        DataFrame::new(columns).map_err(polars_err)
    }
}

/// Writes a DataFrame to a parquet file.
pub fn write_parquet(df: &mut DataFrame, path: &std::path::Path) -> Result<u64> {
    let file = std::fs::File::create(path)
        .map_err(|e| ScreenerError::Other(format!("cannot create {}: {e}", path.display())))?;
    ParquetWriter::new(file).finish(df).map_err(polars_err)
}
