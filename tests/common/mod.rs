//! Stub workbook writers shared by the integration tests.
//!
//! The stubs mimic the published layout: a title above four skipped rows, an
//! unlabeled first header cell in column B, a unit marker row under the header
//! and free-text notes below the data.

#![allow(dead_code)]

use aes_energy_etl::prelude::*;
use aes_energy_etl::template::{TABLE_L_WORKBOOK, TABLE_O_WORKBOOK, TABLE_Q_WORKBOOK};
use rust_xlsxwriter::{Workbook, XlsxError};
use std::path::Path;

pub const HEADER_ROW: u32 = 4;

pub struct SheetSpec {
    pub name: String,
    pub headers: Vec<String>,
    pub unit: Option<String>,
    pub rows: Vec<(String, Vec<f64>)>,
    pub notes: usize,
}

pub fn label(year: i32) -> String {
    format!("{year}-{:02}", (year + 1) % 100)
}

// Deterministic source values

pub fn electricity_use(region_id: u32, year: i32) -> f64 {
    region_id as f64 * 10_000.0 + year as f64
}

pub fn gas_use_mcm(region_id: u32, year: i32) -> f64 {
    region_id as f64 * 100.0 + (year - 2000) as f64
}

pub fn gas_production_mcm(region_id: u32, year: i32) -> f64 {
    region_id as f64 * 1_000.0 + (year - 2000) as f64
}

pub fn non_renewable(region_id: u32, year: i32) -> f64 {
    region_id as f64 * 500.0 + (year - 2000) as f64
}

pub fn renewable(region_id: u32, year: i32) -> f64 {
    region_id as f64 * 50.0 + (year - 2000) as f64
}

pub fn write_workbook(path: &Path, sheets: &[SheetSpec]) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        worksheet.write_string(0, 0, format!("Stub of {}", sheet.name))?;

        for (i, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string(HEADER_ROW, 2 + i as u16, header)?;
        }

        let mut row = HEADER_ROW + 1;
        if let Some(unit) = &sheet.unit {
            worksheet.write_string(row, 2, unit)?;
            row += 1;
        }

        for (row_label, values) in &sheet.rows {
            worksheet.write_string(row, 1, row_label)?;
            for (i, value) in values.iter().enumerate() {
                worksheet.write_number(row, 2 + i as u16, *value)?;
            }
            row += 1;
        }

        for n in 0..sheet.notes {
            worksheet.write_string(row, 1, format!("Note {}: see the guide", n + 1))?;
            row += 1;
        }
    }
    workbook.save(path)
}

/// A rows-are-years sheet with one column per region name.
pub fn years_sheet(
    name: &str,
    unit: &str,
    regions: &[&Region],
    years: impl IntoIterator<Item = i32>,
    value: impl Fn(u32, i32) -> f64,
    notes: usize,
) -> SheetSpec {
    SheetSpec {
        name: name.to_string(),
        headers: regions.iter().map(|r| r.name.clone()).collect(),
        unit: Some(unit.to_string()),
        rows: years
            .into_iter()
            .map(|y| (label(y), regions.iter().map(|r| value(r.id, y)).collect()))
            .collect(),
        notes,
    }
}

/// A rows-are-categories Table O sheet for one region.
pub fn generation_sheet(region: &Region, years: impl IntoIterator<Item = i32>) -> SheetSpec {
    let years: Vec<i32> = years.into_iter().collect();
    let per_year = |f: fn(u32, i32) -> f64| -> Vec<f64> { years.iter().map(|&y| f(region.id, y)).collect() };
    let total: Vec<f64> = years
        .iter()
        .map(|&y| non_renewable(region.id, y) + renewable(region.id, y))
        .collect();

    SheetSpec {
        name: format!("{} FY", region.abbreviation),
        headers: years.iter().map(|&y| label(y)).collect(),
        unit: Some("GWh".to_string()),
        rows: vec![
            ("Black coal".to_string(), per_year(non_renewable)),
            ("Total non-renewable".to_string(), per_year(non_renewable)),
            ("Wind".to_string(), per_year(renewable)),
            ("Total renewable".to_string(), per_year(renewable)),
            ("Total".to_string(), total),
        ],
        notes: 2,
    }
}

/// Write Tables L, O and Q in the 2022 layout for every region of `regions`.
pub fn write_aes_workbooks(dir: &Path, regions: &RegionCatalog) -> Result<(), XlsxError> {
    let all: Vec<&Region> = regions.iter().collect();
    let producing: Vec<&Region> = all
        .iter()
        .copied()
        .filter(|r| r.name != "Tasmania")
        .collect();

    write_workbook(
        &dir.join(TABLE_L_WORKBOOK),
        &[years_sheet("Aus", "GWh", &all, 1990..=2020, electricity_use, 3)],
    )?;

    write_workbook(
        &dir.join(TABLE_Q_WORKBOOK),
        &[
            years_sheet(
                "Consumption physical units",
                "Mcm",
                &all,
                1990..=2020,
                gas_use_mcm,
                3,
            ),
            years_sheet(
                "Production physical units",
                "Mcm",
                &producing,
                1990..=2020,
                gas_production_mcm,
                4,
            ),
        ],
    )?;

    // The national sheet reaches back to 1989-90; state sheets start in 2008-09
    let sheets: Vec<SheetSpec> = all
        .iter()
        .map(|r| {
            if r.abbreviation == "AUS" {
                generation_sheet(r, 1989..=2020)
            } else {
                generation_sheet(r, 2008..=2020)
            }
        })
        .collect();
    write_workbook(&dir.join(TABLE_O_WORKBOOK), &sheets)
}
