//! # Pipeline
//!
//! Runs the whole load in order:
//!
//! 1. provision the schema
//! 2. extract and reshape every templated sheet, converting Mcm tables to PJ
//! 3. assemble consumption and generation records for every region and year
//! 4. write everything in one transaction
//!
//! Any extraction or reshaping error stops the run before the first write.
//!
//! ## Quick Start
//! ```rust,no_run
//! # use aes_energy_etl::prelude::*;
//! let config = PipelineConfig::from_env()?;
//! let summary = run(&config)?;
//! println!("{} consumption rows", summary.consumption_records);
//! # EtlResult::Ok(())
//! ```

use crate::config::PipelineConfig;
use crate::extract::extract_sheet;
use crate::records::{NormalizedDatasets, assemble_records};
use crate::region::RegionCatalog;
use crate::reshape::reshape;
use crate::storage::{EnergyStore, LoadSummary};
use crate::template::{Dataset, SheetTemplate, TemplateCatalog};
use crate::units::convert_to_petajoules;
use crate::year_table::YearTable;
use crate::{EtlError, EtlResult};
use bon::Builder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[derive(Debug, Clone, Builder)]
pub struct Pipeline {
    regions: RegionCatalog,
    templates: TemplateCatalog,
    #[builder(into)]
    data_dir: PathBuf,
}

impl Pipeline {
    /// Australian regions and the 2022 workbook layout, read from `data_dir`.
    pub fn aes_2022(data_dir: impl Into<PathBuf>) -> EtlResult<Self> {
        let regions = RegionCatalog::australia();
        let templates = TemplateCatalog::aes_2022(&regions)?;
        Ok(Self::builder()
            .regions(regions)
            .templates(templates)
            .data_dir(data_dir)
            .build())
    }

    pub fn regions(&self) -> &RegionCatalog {
        &self.regions
    }

    pub fn templates(&self) -> &TemplateCatalog {
        &self.templates
    }

    /// Extract, reshape and convert every templated sheet.
    ///
    /// # Errors
    /// - Any extraction or reshaping error
    /// - `Config` if no template feeds one of the three region-keyed datasets
    #[instrument(level = "info", skip(self), fields(data_dir = %self.data_dir.display()))]
    pub fn normalize(&self) -> EtlResult<NormalizedDatasets> {
        let mut by_region = BTreeMap::new();
        let mut electricity_generation = BTreeMap::new();

        for template in self.templates.templates() {
            let table = normalize_sheet(&self.data_dir, template)?;
            match &template.dataset {
                Dataset::ElectricityGeneration { abbreviation } => {
                    electricity_generation.insert(abbreviation.clone(), table);
                }
                other => {
                    by_region.insert(dataset_key(other), table);
                }
            }
        }

        let mut take = |dataset: Dataset| {
            by_region.remove(dataset_key(&dataset)).ok_or_else(|| {
                EtlError::Config(format!("no template feeds dataset {dataset:?}"))
            })
        };

        Ok(NormalizedDatasets {
            electricity_consumption: take(Dataset::ElectricityConsumption)?,
            gas_consumption: take(Dataset::GasConsumption)?,
            gas_generation: take(Dataset::GasGeneration)?,
            electricity_generation,
        })
    }

    /// Provision `store`, normalize every sheet and load the records.
    pub fn run(&self, store: &mut EnergyStore) -> EtlResult<LoadSummary> {
        store.ensure_schema()?;
        let datasets = self.normalize()?;
        let staged = assemble_records(&self.regions, &datasets)?;
        info!(
            consumption = staged.consumption.len(),
            generation = staged.generation.len(),
            "records staged"
        );
        store.load(&self.regions, &staged)
    }
}

/// Run the 2022 pipeline against the store named by `config`.
///
/// The connection is opened here and closed when this returns, on success or failure.
pub fn run(config: &PipelineConfig) -> EtlResult<LoadSummary> {
    let pipeline = Pipeline::aes_2022(config.data_dir())?;
    let mut store = EnergyStore::open_path(&config.database_path)?;
    info!(database = %config.database_path.display(), "store opened");
    pipeline.run(&mut store)
}

/// Extractor → Reshaper → UnitConverter for one template.
pub fn normalize_sheet(data_dir: &Path, template: &SheetTemplate) -> EtlResult<YearTable> {
    let raw = extract_sheet(data_dir, template)?;
    let table = reshape(&raw, template)?;
    if template.unit.needs_conversion() {
        convert_to_petajoules(&table)
    } else {
        Ok(table)
    }
}

fn dataset_key(dataset: &Dataset) -> &'static str {
    match dataset {
        Dataset::ElectricityConsumption => "electricity_consumption",
        Dataset::GasConsumption => "gas_consumption",
        Dataset::GasGeneration => "gas_generation",
        Dataset::ElectricityGeneration { .. } => "electricity_generation",
    }
}
