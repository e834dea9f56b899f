//! # Reshaping
//!
//! Turns a [`RawSheetTable`] into a [`YearTable`]:
//!
//! 1. **Orientation.** Rows-are-categories sheets (Table O) keep only the three
//!    generation totals and are pivoted so every former year column becomes a
//!    row. Rows-are-years sheets pass through.
//! 2. **Years.** Each "YYYY-YY" label becomes the integer `start_year`; the
//!    label itself is discarded. Only `FIRST_START_YEAR <= start_year < END_START_YEAR`
//!    is kept.
//! 3. **Zero fill.** Value columns the template declares as unpublished are
//!    added with `0.0` in every row.

use crate::extract::RawSheetTable;
use crate::template::{Orientation, SheetTemplate};
use crate::year_table::{START_YEAR, YearTable};
use crate::{EtlError, EtlResult};
use polars::prelude::*;
use tracing::debug;

/// First financial start year loaded. Table O has no data before 2008-09.
pub const FIRST_START_YEAR: i32 = 2008;

/// Exclusive upper bound; the last year loaded is 2019-20.
pub const END_START_YEAR: i32 = 2020;

pub const TOTAL_NON_RENEWABLE: &str = "Total non-renewable";
pub const TOTAL_RENEWABLE: &str = "Total renewable";
pub const TOTAL: &str = "Total";

/// Categories kept from a rows-are-categories sheet, in output column order.
pub const GENERATION_CATEGORIES: [&str; 3] = [TOTAL_NON_RENEWABLE, TOTAL_RENEWABLE, TOTAL];

// ================================================
// PUBLIC FUNCTIONS
// ================================================

/// Start year of a financial year label: "2008-09" → 2008.
///
/// Accepts a hyphen or an en dash between the parts; surrounding whitespace is
/// ignored. Returns `None` for anything else.
pub fn parse_start_year(label: &str) -> Option<i32> {
    let chars: Vec<char> = label.trim().chars().collect();
    if chars.len() != 7 || !matches!(chars[4], '-' | '–') {
        return None;
    }
    if !chars[..4].iter().chain(&chars[5..]).all(char::is_ascii_digit) {
        return None;
    }
    chars[..4].iter().collect::<String>().parse().ok()
}

/// Swap rows and columns of a category table.
///
/// Takes `(category, value per period)` rows and the period labels, and
/// returns `(period, value per category)` rows with categories kept in input
/// order. Periods missing from a short category row read as NaN.
pub fn pivot_categories(rows: &[(String, Vec<f64>)], periods: &[String]) -> Vec<(String, Vec<f64>)> {
    periods
        .iter()
        .enumerate()
        .map(|(j, period)| {
            let values = rows
                .iter()
                .map(|(_, values)| values.get(j).copied().unwrap_or(f64::NAN))
                .collect();
            (period.clone(), values)
        })
        .collect()
}

/// Normalize one extracted sheet.
///
/// # Errors
/// - `Format` if a category sheet lacks one of the three totals or repeats one
/// - `Format` if a financial year label does not read as "YYYY-YY"
pub fn reshape(table: &RawSheetTable, template: &SheetTemplate) -> EtlResult<YearTable> {
    let location = template.location();

    let (columns, year_rows) = match template.orientation {
        Orientation::RowsAreYears => {
            let rows: Vec<(String, Vec<f64>)> = table
                .rows
                .iter()
                .map(|row| (row.label.clone(), row.values()))
                .collect();
            (table.value_headers().to_vec(), rows)
        }
        Orientation::RowsAreCategories => {
            let categories = select_categories(table, &location)?;
            let columns = GENERATION_CATEGORIES.iter().map(|c| c.to_string()).collect();
            (columns, pivot_categories(&categories, table.value_headers()))
        }
    };

    let df = year_frame(&location, &columns, &year_rows)?;
    let source_rows = df.height();

    let mut df = df
        .lazy()
        .filter(
            col(START_YEAR)
                .gt_eq(lit(FIRST_START_YEAR))
                .and(col(START_YEAR).lt(lit(END_START_YEAR))),
        )
        .collect()?;

    for name in &template.zero_fill {
        if !columns.contains(name) {
            df.with_column(Series::new(name.as_str().into(), vec![0.0_f64; df.height()]))?;
        }
    }

    debug!(
        sheet = %location,
        source_rows,
        kept_rows = df.height(),
        "reshaped sheet"
    );
    YearTable::from_df(location, df)
}

// ================================================
// PRIVATE FUNCTIONS
// ================================================

/// The three total rows of a category sheet, in [`GENERATION_CATEGORIES`] order.
fn select_categories(table: &RawSheetTable, location: &str) -> EtlResult<Vec<(String, Vec<f64>)>> {
    let mut selected = Vec::with_capacity(GENERATION_CATEGORIES.len());

    for category in GENERATION_CATEGORIES {
        let mut matches = table.rows.iter().filter(|row| row.label == category);
        let row = matches.next();
        if matches.next().is_some() {
            return Err(EtlError::format(
                location,
                format!("category '{category}' appears more than once"),
            ));
        }
        if let Some(row) = row {
            selected.push((category.to_string(), row.values()));
        }
    }

    if selected.len() < GENERATION_CATEGORIES.len() {
        let found: Vec<&str> = selected.iter().map(|(c, _)| c.as_str()).collect();
        return Err(EtlError::format(
            location,
            format!(
                "expected categories {GENERATION_CATEGORIES:?}, found only {found:?}"
            ),
        ));
    }

    Ok(selected)
}

/// Build the `start_year` + value column frame from labeled year rows.
fn year_frame(
    location: &str,
    columns: &[String],
    year_rows: &[(String, Vec<f64>)],
) -> EtlResult<DataFrame> {
    let start_years = year_rows
        .iter()
        .map(|(label, _)| {
            parse_start_year(label).ok_or_else(|| {
                EtlError::format(
                    location,
                    format!("'{label}' is not a financial year label of the form YYYY-YY"),
                )
            })
        })
        .collect::<EtlResult<Vec<i32>>>()?;

    let mut frame_columns = Vec::with_capacity(columns.len() + 1);
    frame_columns.push(Series::new(START_YEAR.into(), start_years).into_column());
    for (i, name) in columns.iter().enumerate() {
        let values: Vec<f64> = year_rows
            .iter()
            .map(|(_, values)| values.get(i).copied().unwrap_or(f64::NAN))
            .collect();
        frame_columns.push(Series::new(name.as_str().into(), values).into_column());
    }

    Ok(DataFrame::new(frame_columns)?)
}
