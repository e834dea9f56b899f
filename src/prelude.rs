//! # Prelude
//!
//! Re-exports the types needed to configure and run a load with a single `use`.
//!
//! ## Example
//!
//! ```rust
//! # use aes_energy_etl::prelude::*;
//! let regions = RegionCatalog::australia();
//! let templates = TemplateCatalog::aes_2022(&regions)?;
//! let pipeline = Pipeline::builder()
//!     .regions(regions)
//!     .templates(templates)
//!     .data_dir("data")
//!     .build();
//! assert_eq!(pipeline.regions().len(), 8);
//! # EtlResult::Ok(())
//! ```

// Package result and error types
pub use crate::{EtlError, EtlResult};

// Configuration and catalogs
pub use crate::config::PipelineConfig;
pub use crate::region::{Region, RegionCatalog};
pub use crate::template::{Dataset, Orientation, SheetTemplate, SourceUnit, TemplateCatalog};

// Pipeline stages
pub use crate::extract::{RawSheetTable, extract_range, extract_sheet};
pub use crate::pipeline::{Pipeline, normalize_sheet, run};
pub use crate::records::{
    ConsumptionRecord, GenerationRecord, NormalizedDatasets, StagedRecords, assemble_records,
};
pub use crate::reshape::{END_START_YEAR, FIRST_START_YEAR, parse_start_year, pivot_categories, reshape};
pub use crate::units::{MCM_TO_PJ, convert_to_petajoules, mcm_to_pj};
pub use crate::year_table::{START_YEAR, YearTable};

// Storage
pub use crate::storage::{EnergyStore, LoadSummary};

// Polars types that appear in the public API
pub use polars::prelude::{DataFrame, PolarsError};
