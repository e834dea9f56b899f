use crate::{EtlError, EtlResult};
use polars::prelude::*;

/// Name of the key column of every normalized table.
pub const START_YEAR: &str = "start_year";

/// A normalized per-sheet dataset: one `start_year` row per financial year and
/// one `f64` column per region (Tables L and Q) or per category (Table O).
#[derive(Debug, Clone)]
pub struct YearTable {
    pub dataset: String,
    pub dataframe: DataFrame,
}

impl YearTable {
    /// Wrap a DataFrame, coercing `start_year` to `i32` and every other column to `f64`.
    ///
    /// # Errors
    /// - `Format` if there is no `start_year` column
    /// - Polars errors if a column cannot be cast
    pub fn from_df(dataset: impl Into<String>, mut dataframe: DataFrame) -> EtlResult<Self> {
        let dataset = dataset.into();
        let names: Vec<String> = dataframe
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        if !names.iter().any(|name| name == START_YEAR) {
            return Err(EtlError::format(
                &dataset,
                format!("normalized table has no '{START_YEAR}' column"),
            ));
        }

        for name in &names {
            let target = if name == START_YEAR {
                DataType::Int32
            } else {
                DataType::Float64
            };
            let casted = dataframe.column(name)?.cast(&target)?;
            dataframe.with_column(casted)?;
        }

        Ok(Self { dataset, dataframe })
    }

    pub fn height(&self) -> usize {
        self.dataframe.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.dataframe
            .get_column_names()
            .iter()
            .any(|c| c.as_str() == name)
    }

    /// Every column except `start_year`, in frame order.
    pub fn value_columns(&self) -> Vec<String> {
        self.dataframe
            .get_column_names()
            .iter()
            .filter(|c| c.as_str() != START_YEAR)
            .map(|c| c.to_string())
            .collect()
    }

    /// Distinct start years, ascending.
    pub fn start_years(&self) -> EtlResult<Vec<i32>> {
        let mut years: Vec<i32> = self
            .dataframe
            .column(START_YEAR)?
            .i32()?
            .into_iter()
            .flatten()
            .collect();
        years.sort_unstable();
        years.dedup();
        Ok(years)
    }

    /// The single value of `column` in `start_year`.
    ///
    /// # Errors
    /// - `MissingData` if the column does not exist, no row has that year, or the cell is empty
    /// - `AmbiguousData` if more than one row has that year
    pub fn value(&self, column: &str, start_year: i32) -> EtlResult<f64> {
        if !self.has_column(column) {
            return Err(EtlError::missing(&self.dataset, column, start_year));
        }

        let matched = self
            .dataframe
            .clone()
            .lazy()
            .filter(col(START_YEAR).eq(lit(start_year)))
            .select([col(column)])
            .collect()?;

        match matched.height() {
            0 => Err(EtlError::missing(&self.dataset, column, start_year)),
            1 => matched
                .column(column)?
                .f64()?
                .get(0)
                .filter(|v| !v.is_nan())
                .ok_or_else(|| EtlError::missing(&self.dataset, column, start_year)),
            rows => Err(EtlError::AmbiguousData {
                dataset: self.dataset.clone(),
                key: column.to_string(),
                start_year,
                rows,
            }),
        }
    }
}
