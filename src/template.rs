//! # Sheet Templates
//!
//! Declarative description of every source sheet the pipeline reads.
//!
//! A [`SheetTemplate`] says where a sheet lives (workbook file + sheet name),
//! where its header row is (`skip_rows`), which columns belong to it
//! (`columns`, e.g. `B:J`), how it is oriented and how many note rows trail
//! the data. Differences between sheets are expressed here as data: the
//! whole-country Table O sheet simply declares a wider column range than the
//! per-region sheets.
//!
//! ## Quick Start
//! ```rust
//! # use aes_energy_etl::prelude::*;
//! let regions = RegionCatalog::australia();
//! let catalog = TemplateCatalog::aes_2022(&regions)?;
//! let aus = catalog.get("table_o_aus").unwrap();
//! assert_eq!(aus.sheet, "AUS FY");
//! assert_eq!(aus.column_range()?.width(), 33);
//! # EtlResult::Ok(())
//! ```

pub mod column_range;

use self::column_range::ColumnRange;
use crate::region::RegionCatalog;
use crate::{EtlError, EtlResult};
use bon::Builder;
use garde::Validate;
use std::collections::HashSet;

pub const TABLE_L_WORKBOOK: &str = "Australian Energy Statistics 2022 Table L.xlsx";
pub const TABLE_O_WORKBOOK: &str = "Australian Energy Statistics 2022 Table O.xlsx";
pub const TABLE_Q_WORKBOOK: &str = "Australian Energy Statistics 2022 Table Q.xlsx";

// ===============================================
// TEMPLATE VOCABULARY
// ===============================================

/// What a sheet's rows represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// One row per financial year, one column per region.
    RowsAreYears,
    /// One row per generation category, one column per financial year.
    RowsAreCategories,
}

impl Orientation {
    /// Canonical header given to the unlabeled first column.
    pub fn label_header(&self) -> &'static str {
        match self {
            Orientation::RowsAreYears => "Financial Year",
            Orientation::RowsAreCategories => "Source",
        }
    }
}

/// Unit the sheet's values are published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceUnit {
    GigawattHours,
    MillionCubicMetres,
}

impl SourceUnit {
    pub fn label(&self) -> &'static str {
        match self {
            SourceUnit::GigawattHours => "GWh",
            SourceUnit::MillionCubicMetres => "Mcm",
        }
    }

    /// Whether values must be rescaled to petajoules before loading.
    pub fn needs_conversion(&self) -> bool {
        matches!(self, SourceUnit::MillionCubicMetres)
    }
}

/// Which normalized dataset a sheet feeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dataset {
    ElectricityConsumption,
    GasConsumption,
    GasGeneration,
    /// Table O sheet for one region, keyed by its abbreviation.
    ElectricityGeneration { abbreviation: String },
}

// ===============================================
// SHEET TEMPLATE
// ===============================================

#[derive(Debug, Clone, Validate, Builder)]
#[garde(allow_unvalidated)]
pub struct SheetTemplate {
    /// Unique key within a catalog.
    #[garde(length(min = 1))]
    #[builder(into)]
    pub id: String,

    /// Workbook file name, relative to the data directory.
    #[garde(length(min = 1))]
    #[builder(into)]
    pub workbook: String,

    #[garde(length(min = 1))]
    #[builder(into)]
    pub sheet: String,

    /// Rows above the header row.
    #[garde(range(max = 1000))]
    #[builder(default = 4)]
    pub skip_rows: u32,

    /// Column span such as `B:J`; the first column holds the row labels.
    #[garde(custom(validate_columns))]
    #[builder(into)]
    pub columns: String,

    pub orientation: Orientation,

    /// Note rows trailing the data block.
    #[garde(range(max = 100))]
    #[builder(default)]
    pub note_rows: usize,

    pub unit: SourceUnit,

    pub dataset: Dataset,

    /// Header texts that must be present.
    #[builder(default)]
    pub expected_headers: Vec<String>,

    /// Value columns the source does not publish; filled with 0.0 after reshaping.
    #[builder(default)]
    pub zero_fill: Vec<String>,
}

fn validate_columns(value: &String, _context: &()) -> garde::Result {
    let range: ColumnRange = value.parse().map_err(garde::Error::new)?;
    if range.width() < 2 {
        return Err(garde::Error::new(
            "column range needs a label column and at least one value column",
        ));
    }
    Ok(())
}

impl SheetTemplate {
    pub fn column_range(&self) -> EtlResult<ColumnRange> {
        self.columns
            .parse()
            .map_err(|e: String| EtlError::Config(format!("template '{}': {e}", self.id)))
    }

    /// Human readable location for log lines and errors, e.g. `Table L.xlsx/Aus`.
    pub fn location(&self) -> String {
        format!("{}/{}", self.workbook, self.sheet)
    }
}

// ===============================================
// TEMPLATE CATALOG
// ===============================================

/// Validated, ordered set of templates for one load run.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<SheetTemplate>,
}

// Table O sheets and their column spans. The national sheet publishes more
// fuel categories than the state sheets.
const TABLE_O_SHEETS: [(&str, &str); 8] = [
    ("AUS", "B:AH"),
    ("NSW", "B:O"),
    ("VIC", "B:O"),
    ("QLD", "B:O"),
    ("WA", "B:O"),
    ("SA", "B:O"),
    ("TAS", "B:O"),
    ("NT", "B:O"),
];

impl TemplateCatalog {
    /// Validate and wrap a list of templates.
    ///
    /// # Errors
    /// - Any template failing field validation
    /// - Duplicate template ids
    /// - A Table O template whose abbreviation is not in `regions`
    /// - A dataset other than electricity generation declared more than once
    pub fn new(templates: Vec<SheetTemplate>, regions: &RegionCatalog) -> EtlResult<Self> {
        let mut ids = HashSet::new();
        let mut datasets = HashSet::new();

        for template in &templates {
            template
                .validate()
                .map_err(|report| EtlError::Config(format!("template '{}': {report}", template.id)))?;

            if !ids.insert(template.id.as_str()) {
                return Err(EtlError::Config(format!(
                    "duplicate template id '{}'",
                    template.id
                )));
            }

            if let Dataset::ElectricityGeneration { abbreviation } = &template.dataset {
                regions.by_abbreviation(abbreviation)?;
            }

            if !datasets.insert(template.dataset.clone()) {
                return Err(EtlError::Config(format!(
                    "template '{}' feeds dataset {:?} which another template already feeds",
                    template.id, template.dataset
                )));
            }
        }

        Ok(Self { templates })
    }

    /// Layout of the 2022 edition of the Australian Energy Statistics tables.
    pub fn aes_2022(regions: &RegionCatalog) -> EtlResult<Self> {
        let all_regions = regions.names();

        let mut templates = vec![
            SheetTemplate::builder()
                .id("table_l")
                .workbook(TABLE_L_WORKBOOK)
                .sheet("Aus")
                .columns("B:J")
                .orientation(Orientation::RowsAreYears)
                .note_rows(3)
                .unit(SourceUnit::GigawattHours)
                .dataset(Dataset::ElectricityConsumption)
                .expected_headers(all_regions.clone())
                .build(),
            SheetTemplate::builder()
                .id("table_q_consumption")
                .workbook(TABLE_Q_WORKBOOK)
                .sheet("Consumption physical units")
                .columns("B:J")
                .orientation(Orientation::RowsAreYears)
                .note_rows(3)
                .unit(SourceUnit::MillionCubicMetres)
                .dataset(Dataset::GasConsumption)
                .expected_headers(all_regions.clone())
                .build(),
        ];

        // Tasmania has no gas production column
        let not_produced = vec!["Tasmania".to_string()];
        let producing: Vec<String> = all_regions
            .iter()
            .filter(|name| !not_produced.contains(name))
            .cloned()
            .collect();
        templates.push(
            SheetTemplate::builder()
                .id("table_q_production")
                .workbook(TABLE_Q_WORKBOOK)
                .sheet("Production physical units")
                .columns("B:I")
                .orientation(Orientation::RowsAreYears)
                .note_rows(4)
                .unit(SourceUnit::MillionCubicMetres)
                .dataset(Dataset::GasGeneration)
                .expected_headers(producing)
                .zero_fill(not_produced)
                .build(),
        );

        for (abbreviation, columns) in TABLE_O_SHEETS {
            templates.push(
                SheetTemplate::builder()
                    .id(format!("table_o_{}", abbreviation.to_lowercase()))
                    .workbook(TABLE_O_WORKBOOK)
                    .sheet(format!("{abbreviation} FY"))
                    .columns(columns)
                    .orientation(Orientation::RowsAreCategories)
                    .unit(SourceUnit::GigawattHours)
                    .dataset(Dataset::ElectricityGeneration {
                        abbreviation: abbreviation.to_string(),
                    })
                    .build(),
            );
        }

        Self::new(templates, regions)
    }

    pub fn templates(&self) -> &[SheetTemplate] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&SheetTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
