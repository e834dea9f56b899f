//! Gas volume to energy conversion.
//!
//! Table Q publishes gas in million cubic metres. The Guide to the Australian
//! Energy Statistics gives 37.9 MJ/m³ for natural gas, i.e. 0.0379 PJ per Mcm.
//! Conversion must run exactly once per table, after reshaping and before the
//! load; it is not idempotent and does not guard against a second pass.

use crate::EtlResult;
use crate::year_table::YearTable;
use polars::prelude::*;

/// Petajoules per million cubic metres of natural gas.
pub const MCM_TO_PJ: f64 = 0.0379;

/// `round(value_mcm * 0.0379, 3)`
pub fn mcm_to_pj(value_mcm: f64) -> f64 {
    (value_mcm * MCM_TO_PJ * 1000.0).round() / 1000.0
}

/// Rescale every value column of a Mcm table to PJ; `start_year` is left as is.
pub fn convert_to_petajoules(table: &YearTable) -> EtlResult<YearTable> {
    let mut df = table.dataframe.clone();
    for name in table.value_columns() {
        let converted: Vec<Option<f64>> = df
            .column(&name)?
            .f64()?
            .into_iter()
            .map(|v| v.map(mcm_to_pj))
            .collect();
        df.with_column(Series::new(name.as_str().into(), converted))?;
    }

    Ok(YearTable {
        dataset: table.dataset.clone(),
        dataframe: df,
    })
}
