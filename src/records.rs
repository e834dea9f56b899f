//! # Record Assembly
//!
//! Aligns the four normalized datasets by region and start year and produces
//! the rows the store receives: one [`ConsumptionRecord`] and one
//! [`GenerationRecord`] per (region, year).
//!
//! Lookups key Tables L and Q by region name and Table O by region
//! abbreviation. Each lookup must hit exactly one row:
//! - no row, an unknown column or an empty cell → `MissingData`
//! - several rows → `AmbiguousData`
//!
//! Assembly is pure; nothing is written until every record for every region
//! has been built.

use crate::region::RegionCatalog;
use crate::reshape::{END_START_YEAR, FIRST_START_YEAR, TOTAL, TOTAL_NON_RENEWABLE, TOTAL_RENEWABLE};
use crate::year_table::YearTable;
use crate::{EtlError, EtlResult};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionRecord {
    pub region_id: u32,
    pub start_year: i32,
    /// GWh
    pub electricity_usage: f64,
    /// PJ
    pub gas_usage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    pub region_id: u32,
    pub start_year: i32,
    pub non_renewable_electricity_total: f64,
    pub renewable_electricity_total: f64,
    pub total_electricity_generation: f64,
    /// PJ
    pub total_gas_generation: f64,
}

/// Everything the loader needs, already reshaped and converted.
#[derive(Debug, Clone)]
pub struct NormalizedDatasets {
    /// Table L, GWh, one column per region name.
    pub electricity_consumption: YearTable,
    /// Table Q consumption, PJ, one column per region name.
    pub gas_consumption: YearTable,
    /// Table Q production, PJ, one column per region name.
    pub gas_generation: YearTable,
    /// Table O, GWh, one table per region abbreviation with the three totals as columns.
    pub electricity_generation: BTreeMap<String, YearTable>,
}

/// Records staged for one load.
#[derive(Debug, Clone, Default)]
pub struct StagedRecords {
    pub consumption: Vec<ConsumptionRecord>,
    pub generation: Vec<GenerationRecord>,
}

impl StagedRecords {
    pub fn len(&self) -> usize {
        self.consumption.len() + self.generation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumption.is_empty() && self.generation.is_empty()
    }
}

// ================================================
// PUBLIC FUNCTIONS
// ================================================

/// Build the consumption and generation records for every region in `regions`.
///
/// The years iterated are every start year within `[FIRST_START_YEAR, END_START_YEAR)`
/// that any of the datasets publishes; each dataset must supply all of them.
///
/// # Errors
/// - `Referential` if a Table O dataset is keyed by an abbreviation the catalog does not know
/// - `MissingData` if no dataset has a year in range
/// - `MissingData` / `AmbiguousData` from any lookup
/// - `Format` for a negative value
pub fn assemble_records(
    regions: &RegionCatalog,
    datasets: &NormalizedDatasets,
) -> EtlResult<StagedRecords> {
    if let Some(unknown) = datasets
        .electricity_generation
        .keys()
        .find(|abbreviation| regions.by_abbreviation(abbreviation).is_err())
    {
        return Err(EtlError::Referential(format!(
            "electricity generation dataset '{unknown}' does not match any region abbreviation"
        )));
    }

    let years = loaded_years(datasets)?;

    let mut staged = StagedRecords::default();

    for region in regions {
        let generation = datasets
            .electricity_generation
            .get(&region.abbreviation)
            .ok_or_else(|| {
                EtlError::missing(
                    format!("electricity generation ({})", region.abbreviation),
                    &region.abbreviation,
                    years[0],
                )
            })?;

        for &year in &years {
            staged.consumption.push(ConsumptionRecord {
                region_id: region.id,
                start_year: year,
                electricity_usage: non_negative(&datasets.electricity_consumption, &region.name, year)?,
                gas_usage: non_negative(&datasets.gas_consumption, &region.name, year)?,
            });

            staged.generation.push(GenerationRecord {
                region_id: region.id,
                start_year: year,
                non_renewable_electricity_total: non_negative(generation, TOTAL_NON_RENEWABLE, year)?,
                renewable_electricity_total: non_negative(generation, TOTAL_RENEWABLE, year)?,
                total_electricity_generation: non_negative(generation, TOTAL, year)?,
                total_gas_generation: non_negative(&datasets.gas_generation, &region.name, year)?,
            });
        }
        debug!(region = %region.name, years = years.len(), "assembled region");
    }

    Ok(staged)
}

// ================================================
// PRIVATE FUNCTIONS
// ================================================

/// Union of the in-range start years of every dataset, ascending. Never empty.
fn loaded_years(datasets: &NormalizedDatasets) -> EtlResult<Vec<i32>> {
    let mut years = BTreeSet::new();
    let tables = [
        &datasets.electricity_consumption,
        &datasets.gas_consumption,
        &datasets.gas_generation,
    ]
    .into_iter()
    .chain(datasets.electricity_generation.values());
    for table in tables {
        years.extend(
            table
                .start_years()?
                .into_iter()
                .filter(|y| (FIRST_START_YEAR..END_START_YEAR).contains(y)),
        );
    }

    if years.is_empty() {
        return Err(EtlError::missing(
            "all datasets",
            format!("any start year in {FIRST_START_YEAR}..{END_START_YEAR}"),
            FIRST_START_YEAR,
        ));
    }
    Ok(years.into_iter().collect())
}

fn non_negative(table: &YearTable, column: &str, year: i32) -> EtlResult<f64> {
    let value = table.value(column, year)?;
    if value < 0.0 {
        return Err(EtlError::format(
            &table.dataset,
            format!("negative value {value} for '{column}' in {year}"),
        ));
    }
    Ok(value)
}
