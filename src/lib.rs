//! # AES Energy ETL
//!
//! Loads the Australian Energy Statistics workbooks into a relational store keyed
//! by region and financial year.
//!
//! ## Features
//! - **Template driven**: every source sheet is described by a [`template::SheetTemplate`];
//!   a new sheet shape is a new template, not new code
//! - **Both orientations**: rows-are-years sheets (Tables L and Q) and
//!   rows-are-categories sheets (Table O, pivoted on the way in)
//! - **Unit conversion**: gas volumes in Mcm are rescaled to PJ
//! - **Atomic load**: regions and records are written in one SQLite transaction
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aes_energy_etl::prelude::*;
//!
//! let pipeline = Pipeline::aes_2022("data")?;
//! let mut store = EnergyStore::open_path("energy.db")?;
//! let summary = pipeline.run(&mut store)?;
//!
//! println!("regions: {}", summary.regions);
//! println!("consumption rows: {}", summary.consumption_records);
//! println!("generation rows: {}", summary.generation_records);
//! # EtlResult::Ok(())
//! ```
//!
//! ## Stored Schema
//! - `regions(region_id, region_name)`
//! - `energy_consumption(id, region_id, financial_start_year, electricity_usage, gas_usage)`
//! - `energy_generation(id, region_id, financial_start_year, non_renewable_electricity_total,
//!   renewable_electricity_total, total_electricity_generation, total_gas_generation)`
//!
//! ## Notes
//! - Only the start year of a financial year is stored; "2008-09" is stored as 2008
//! - Only start years 2008 to 2019 are loaded
//! - Electricity is in GWh, gas in PJ

pub mod config;
pub mod error;
pub mod extract;
pub mod macros;
pub mod pipeline;
pub mod prelude;
pub mod records;
pub mod region;
pub mod reshape;
pub mod storage;
pub mod template;
pub mod units;
pub mod year_table;

pub use error::EtlError;

pub type EtlResult<T> = Result<T, EtlError>;
