//! Runner Integration Tests
//!
//! Drives complete runs from JSON configuration through to an exported
//! history file, then reads the file back into a fresh history.

use approx::assert_relative_eq;
use hearth_market::{HistoryExport, MetricsHistory};
use hearth_runner::{HousingSimulation, RunConfig, RunnerError};
use std::path::PathBuf;
use uuid::Uuid;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("hearth-{}-{}.json", name, Uuid::new_v4()))
}

const RUN_JSON: &str = r#"{
    "ticks": 15,
    "log_every": 5,
    "market": {
        "dwelling_count": 40,
        "participant_count": 50,
        "turnover_in": 3,
        "turnover_out": 3,
        "seed": 99
    }
}"#;

#[test]
fn test_run_from_json_and_export() {
    let _ = env_logger::try_init();

    let path = temp_path("export");
    let config = RunConfig::from_json(RUN_JSON).unwrap().with_export_path(&path);

    let mut simulation = HousingSimulation::new(config).unwrap();
    let results = simulation.run().unwrap();

    assert_eq!(results.ticks, 15);
    assert_eq!(results.export_path.as_deref(), Some(path.as_path()));
    assert_eq!(results.final_statistics.total_dwellings, 40);

    let json = std::fs::read_to_string(&path).unwrap();
    let export = HistoryExport::from_json(&json).unwrap();
    assert_eq!(export.run_id, results.run_id);
    assert_eq!(export.records.len(), 16);
    assert_eq!(export.records.last(), Some(&results.final_statistics));

    let mut history = MetricsHistory::new(100).unwrap();
    assert_eq!(history.import_json(&json).unwrap(), 16);
    let gini: Vec<(u64, f64)> = history.time_series("gini").collect();
    assert_relative_eq!(gini[15].1, results.final_statistics.gini);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let config = RunConfig::from_json(RUN_JSON).unwrap();
        let mut simulation = HousingSimulation::new(config).unwrap();
        simulation.run().unwrap()
    };

    let a = run();
    let b = run();

    assert_ne!(a.run_id, b.run_id);
    assert_eq!(a.total_sales, b.total_sales);
    assert_eq!(a.final_statistics.housed, b.final_statistics.housed);
    assert_relative_eq!(a.final_statistics.gini, b.final_statistics.gini);
    assert_relative_eq!(
        a.final_statistics.mean_dwelling_value,
        b.final_statistics.mean_dwelling_value
    );
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_path("config");
    std::fs::write(&path, RUN_JSON).unwrap();

    let config = RunConfig::from_file(&path).unwrap();
    assert_eq!(config.ticks, 15);
    assert_eq!(config.market.seed, Some(99));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_unwritable_export_path() {
    let config = RunConfig::from_json(RUN_JSON)
        .unwrap()
        .with_ticks(1)
        .with_export_path("/nonexistent/hearth/history.json");

    let mut simulation = HousingSimulation::new(config).unwrap();
    assert!(matches!(simulation.run(), Err(RunnerError::Io { .. })));
}

#[test]
fn test_zero_ticks_exports_initial_snapshot() {
    let path = temp_path("initial");
    let config = RunConfig::from_json(RUN_JSON)
        .unwrap()
        .with_ticks(0)
        .with_export_path(&path);

    let results = HousingSimulation::new(config).unwrap().run().unwrap();
    assert_eq!(results.ticks, 0);

    let export = HistoryExport::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(export.records.len(), 1);
    assert_eq!(export.records[0].tick, 0);

    let _ = std::fs::remove_file(&path);
}
