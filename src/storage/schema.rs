use rusqlite::Connection;

/// Tables in creation order; `regions` first because the others reference it.
pub const TABLES: [&str; 3] = ["regions", "energy_consumption", "energy_generation"];

/// Create the three tables if they do not exist. Safe to run on a provisioned store.
pub(crate) fn init(conn: &Connection) -> rusqlite::Result<()> {
    // Ensure foreign keys are enforced (disabled by default in SQLite).
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS regions (
          region_id INTEGER PRIMARY KEY AUTOINCREMENT,
          region_name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS energy_consumption (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          region_id INTEGER NOT NULL REFERENCES regions(region_id),
          financial_start_year INTEGER NOT NULL,
          electricity_usage REAL NOT NULL CHECK (electricity_usage >= 0),
          gas_usage REAL NOT NULL CHECK (gas_usage >= 0),
          UNIQUE (region_id, financial_start_year)
        );

        CREATE TABLE IF NOT EXISTS energy_generation (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          region_id INTEGER NOT NULL REFERENCES regions(region_id),
          financial_start_year INTEGER NOT NULL,
          non_renewable_electricity_total REAL NOT NULL CHECK (non_renewable_electricity_total >= 0),
          renewable_electricity_total REAL NOT NULL CHECK (renewable_electricity_total >= 0),
          total_electricity_generation REAL NOT NULL CHECK (total_electricity_generation >= 0),
          total_gas_generation REAL NOT NULL CHECK (total_gas_generation >= 0),
          UNIQUE (region_id, financial_start_year)
        );
        "#,
    )?;

    Ok(())
}
