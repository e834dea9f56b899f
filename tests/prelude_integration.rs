//! # Integration Tests for the Prelude
//!
//! Checks that a single `use aes_energy_etl::prelude::*` is enough to configure
//! a pipeline, stage records by hand and load them.

use aes_energy_etl::prelude::*;

#[test]
fn test_prelude_imports_catalogs() {
    let regions = RegionCatalog::australia();
    let templates = TemplateCatalog::aes_2022(&regions).unwrap();

    assert_eq!(regions.by_abbreviation("NSW").unwrap().id, 3);
    assert_eq!(templates.get("table_l").unwrap().unit, SourceUnit::GigawattHours);
    assert_eq!(
        templates.get("table_o_vic").unwrap().orientation,
        Orientation::RowsAreCategories
    );
}

#[test]
fn test_prelude_imports_polars_types() {
    let df_type_name = std::any::type_name::<DataFrame>();
    let err_type_name = std::any::type_name::<PolarsError>();

    assert!(df_type_name.contains("DataFrame"));
    assert!(err_type_name.contains("PolarsError"));
}

#[test]
fn test_prelude_year_constants() {
    assert_eq!(FIRST_START_YEAR, 2008);
    assert_eq!(END_START_YEAR, 2020);
    assert_eq!(parse_start_year("2019-20"), Some(2019));
    assert_eq!(START_YEAR, "start_year");
}

#[test]
fn test_prelude_hand_staged_load() {
    let regions = RegionCatalog::australia().subset(&["Tasmania"]).unwrap();
    let staged = StagedRecords {
        consumption: vec![ConsumptionRecord {
            region_id: 8,
            start_year: 2010,
            electricity_usage: 10_500.0,
            gas_usage: mcm_to_pj(200.0),
        }],
        generation: vec![GenerationRecord {
            region_id: 8,
            start_year: 2010,
            non_renewable_electricity_total: 1_000.0,
            renewable_electricity_total: 9_000.0,
            total_electricity_generation: 10_000.0,
            total_gas_generation: 0.0,
        }],
    };

    let mut store = EnergyStore::open_in_memory().unwrap();
    store.ensure_schema().unwrap();
    let summary = store.load(&regions, &staged).unwrap();

    assert_eq!(summary.regions, 1);
    assert_eq!(store.consumption_records().unwrap(), staged.consumption);
    assert_eq!(store.regions().unwrap(), vec![(8, "Tasmania".to_string())]);
}
