//! SQLite store for the normalized energy tables.
//!
//! The store owns one connection for the life of a run. [`EnergyStore::ensure_schema`]
//! provisions the tables; [`EnergyStore::load`] writes regions and records in a
//! single transaction that is committed once or rolled back entirely.

pub mod schema;

use crate::records::{ConsumptionRecord, GenerationRecord, StagedRecords};
use crate::region::RegionCatalog;
use crate::{EtlError, EtlResult};
use rusqlite::{Connection, Transaction, params};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Row counts written by one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub regions: usize,
    pub consumption_records: usize,
    pub generation_records: usize,
}

pub struct EnergyStore {
    conn: Connection,
}

impl EnergyStore {
    pub fn open_path(path: impl AsRef<Path>) -> EtlResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> EtlResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> EtlResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Underlying connection, for read-only collaborators such as a query layer.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create `regions`, `energy_consumption` and `energy_generation` if absent.
    pub fn ensure_schema(&self) -> EtlResult<()> {
        schema::init(&self.conn)?;
        info!("schema ready");
        Ok(())
    }

    /// Insert every region, then every staged record, in one transaction.
    ///
    /// # Errors
    /// - `Referential` if a record's region is not in `regions`
    /// - `Storage` for any rejected statement, including a re-run against a loaded store
    /// - `Transaction` if the commit or the rollback fails
    ///
    /// On any error nothing from this call is left in the store.
    #[instrument(level = "info", skip_all, fields(regions = regions.len(), records = staged.len()))]
    pub fn load(&mut self, regions: &RegionCatalog, staged: &StagedRecords) -> EtlResult<LoadSummary> {
        let tx = self.conn.transaction()?;

        match stage(&tx, regions, staged) {
            Ok(summary) => {
                tx.commit()
                    .map_err(|e| EtlError::Transaction(format!("commit failed: {e}")))?;
                info!(
                    regions = summary.regions,
                    consumption = summary.consumption_records,
                    generation = summary.generation_records,
                    "load committed"
                );
                Ok(summary)
            }
            Err(err) => {
                tx.rollback().map_err(|e| {
                    EtlError::Transaction(format!("rollback after '{err}' failed: {e}"))
                })?;
                warn!(error = %err, "load rolled back");
                Err(err)
            }
        }
    }

    /// User tables present in the store, sorted by name.
    pub fn table_names(&self) -> EtlResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for name in rows {
            names.push(name?);
        }
        Ok(names)
    }

    /// Row count of one of the schema tables.
    pub fn count_rows(&self, table: &str) -> EtlResult<i64> {
        if !schema::TABLES.contains(&table) {
            return Err(EtlError::Config(format!("'{table}' is not a store table")));
        }
        let count = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count)
    }

    /// Stored regions as (id, name), ordered by id.
    pub fn regions(&self) -> EtlResult<Vec<(u32, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT region_id, region_name FROM regions ORDER BY region_id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn consumption_records(&self) -> EtlResult<Vec<ConsumptionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT region_id, financial_start_year, electricity_usage, gas_usage
             FROM energy_consumption ORDER BY region_id, financial_start_year",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ConsumptionRecord {
                region_id: row.get(0)?,
                start_year: row.get(1)?,
                electricity_usage: row.get(2)?,
                gas_usage: row.get(3)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn generation_records(&self) -> EtlResult<Vec<GenerationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT region_id, financial_start_year, non_renewable_electricity_total,
                    renewable_electricity_total, total_electricity_generation, total_gas_generation
             FROM energy_generation ORDER BY region_id, financial_start_year",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(GenerationRecord {
                region_id: row.get(0)?,
                start_year: row.get(1)?,
                non_renewable_electricity_total: row.get(2)?,
                renewable_electricity_total: row.get(3)?,
                total_electricity_generation: row.get(4)?,
                total_gas_generation: row.get(5)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

// ================================================
// PRIVATE FUNCTIONS
// ================================================

fn stage(
    tx: &Transaction<'_>,
    regions: &RegionCatalog,
    staged: &StagedRecords,
) -> EtlResult<LoadSummary> {
    // Regions first, otherwise the foreign keys of the record tables fail
    let mut insert_region =
        tx.prepare("INSERT INTO regions (region_id, region_name) VALUES (?1, ?2)")?;
    for region in regions {
        insert_region.execute(params![region.id, region.name])?;
    }

    let mut insert_consumption = tx.prepare(
        "INSERT INTO energy_consumption
           (region_id, financial_start_year, electricity_usage, gas_usage)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for r in &staged.consumption {
        check_region(regions, r.region_id, r.start_year)?;
        insert_consumption.execute(params![
            r.region_id,
            r.start_year,
            r.electricity_usage,
            r.gas_usage
        ])?;
    }

    let mut insert_generation = tx.prepare(
        "INSERT INTO energy_generation
           (region_id, financial_start_year, non_renewable_electricity_total,
            renewable_electricity_total, total_electricity_generation, total_gas_generation)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for r in &staged.generation {
        check_region(regions, r.region_id, r.start_year)?;
        insert_generation.execute(params![
            r.region_id,
            r.start_year,
            r.non_renewable_electricity_total,
            r.renewable_electricity_total,
            r.total_electricity_generation,
            r.total_gas_generation
        ])?;
    }

    Ok(LoadSummary {
        regions: regions.len(),
        consumption_records: staged.consumption.len(),
        generation_records: staged.generation.len(),
    })
}

fn check_region(regions: &RegionCatalog, region_id: u32, start_year: i32) -> EtlResult<()> {
    if regions.contains_id(region_id) {
        Ok(())
    } else {
        Err(EtlError::Referential(format!(
            "record for {start_year} references region {region_id}, which is not in the catalog"
        )))
    }
}
