/// Macro to create a [`YearTable`](crate::year_table::YearTable) from column vectors.
///
/// The first argument names the dataset; the columns must include `start_year`.
///
/// Usage:
/// ```rust
/// # use aes_energy_etl::prelude::*;
/// # use aes_energy_etl::year_table;
/// let table = year_table!("Table L";
///     "start_year" => [2008, 2009],
///     "Victoria" => [41_000.0, 42_000.0],
/// )?;
/// assert_eq!(table.value("Victoria", 2009)?, 42_000.0);
/// # EtlResult::Ok(())
/// ```
#[macro_export]
macro_rules! year_table {
    ($dataset:expr; $($name:expr => $val:expr),+ $(,)?) => {{
        use $crate::year_table::YearTable;
        use polars::prelude::df;
        let df_result = df! { $($name => $val),+ };
        match df_result {
            Ok(df) => YearTable::from_df($dataset, df),
            Err(e) => Err(e.into()),
        }
    }};
}

// ================================================
// UNIT TESTS
// ================================================
#[cfg(test)]
mod tests {
    use crate::EtlError;

    #[test]
    fn test_year_table_macro() {
        let table = year_table!("Table Q production";
            "start_year" => [2008, 2009, 2010],
            "Victoria" => [1.0, 2.0, 3.0],
            "Queensland" => [4.0, 5.0, 6.0],
        )
        .expect("Failed to create YearTable from macro");

        assert_eq!(table.dataset, "Table Q production");
        assert_eq!(table.height(), 3);
        assert_eq!(table.value_columns(), vec!["Victoria", "Queensland"]);
    }

    #[test]
    fn test_year_table_macro_requires_start_year() {
        let result = year_table!("Table L"; "Victoria" => [1.0]);
        assert!(matches!(result, Err(EtlError::Format { .. })));
    }
}
