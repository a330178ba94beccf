//! End-to-end tests through the command layer
//!
//! These tests verify:
//! - Text import into a store (counts, tombstones, labels)
//! - select_all / select_where semantics
//! - Index build, indexed lookup, and the missing-index fallback
//! - Inserts with and without index maintenance
//! - sort and join as a pipeline
//! - DIRTY artifacts rejected by every reader

use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use transitdb::commands;
use transitdb::{Line, TransitError, Vehicle};

// =============================================================================
// Helper Functions
// =============================================================================

const LINE_IMPORT: &str = "\
Code,Card,Name,Color
1,S,Downtown,Blue
*3,N,Harbor,Red
2,F,Airport,Green
";

const VEHICLE_IMPORT: &str = "\
Prefix,Date,Seats,LineCode,Model,Category
AA001,2019-03-10,42,1,TorinoX,urban
AA002,2020-06-01,NULO,1,Millennium,articulated
AA003,2021-11-23,28,3,Apache,urban
";

struct Fixture {
    _temp: TempDir,
    dir: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().to_path_buf();
        Self { _temp: temp, dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn import_lines(&self) -> PathBuf {
        let csv = self.path("lines.csv");
        fs::write(&csv, LINE_IMPORT).unwrap();
        let store = self.path("lines.bin");
        commands::create_table::<Line>(&csv, &store).unwrap();
        store
    }

    fn import_vehicles(&self) -> PathBuf {
        let csv = self.path("vehicles.csv");
        fs::write(&csv, VEHICLE_IMPORT).unwrap();
        let store = self.path("vehicles.bin");
        commands::create_table::<Vehicle>(&csv, &store).unwrap();
        store
    }
}

fn new_line(code: i32, name: &str) -> Line {
    Line::new(true, code, b'N', name.into(), "Yellow".into())
}

/// Flip a store's status byte back to DIRTY, as an interrupted write
/// would leave it.
fn corrupt_status(path: &Path) {
    let mut file = OpenOptions::new().write(true).open(path).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();
    file.write_all(b"0").unwrap();
}

// =============================================================================
// Import Tests
// =============================================================================

#[test]
fn test_create_table_counts_live_and_removed() {
    let fx = Fixture::new();
    let csv = fx.path("lines.csv");
    fs::write(&csv, LINE_IMPORT).unwrap();

    let stats = commands::create_table::<Line>(&csv, &fx.path("lines.bin")).unwrap();

    assert_eq!(stats.live, 2);
    assert_eq!(stats.removed, 1);
}

#[test]
fn test_create_table_stores_header_labels() {
    let fx = Fixture::new();
    let store = fx.import_lines();

    let selection = commands::select_all::<Line>(&store).unwrap();
    assert_eq!(selection.labels, vec!["Code", "Card", "Name", "Color"]);
}

#[test]
fn test_create_table_decodes_null_fields() {
    let fx = Fixture::new();
    let store = fx.import_vehicles();

    let selection = commands::select_all::<Vehicle>(&store).unwrap();
    let nulled = selection
        .records
        .iter()
        .find(|v| v.prefix == "AA002")
        .unwrap();

    assert_eq!(nulled.seats, -1);
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_select_all_filters_removed_records() {
    let fx = Fixture::new();
    let store = fx.import_lines();

    let selection = commands::select_all::<Line>(&store).unwrap();
    let codes: Vec<i32> = selection.records.iter().map(|l| l.code).collect();

    // The starred record (code 3) is tombstoned and never served.
    assert_eq!(codes, vec![1, 2]);
}

#[test]
fn test_select_where_matches_text_field() {
    let fx = Fixture::new();
    let store = fx.import_lines();

    let selection = commands::select_where::<Line>(&store, "color", "Green").unwrap();

    assert_eq!(selection.records.len(), 1);
    assert_eq!(selection.records[0].code, 2);
}

#[test]
fn test_select_where_no_match_is_empty_not_error() {
    let fx = Fixture::new();
    let store = fx.import_lines();

    let selection = commands::select_where::<Line>(&store, "name", "Nowhere").unwrap();
    assert!(selection.records.is_empty());
}

#[test]
fn test_select_where_never_serves_removed_records() {
    let fx = Fixture::new();
    let store = fx.import_lines();

    let selection = commands::select_where::<Line>(&store, "name", "Harbor").unwrap();
    assert!(selection.records.is_empty());
}

#[test]
fn test_select_where_unknown_field_fails() {
    let fx = Fixture::new();
    let store = fx.import_lines();

    let result = commands::select_where::<Line>(&store, "wheels", "4");
    assert!(matches!(result, Err(TransitError::UnknownField(_))));
}

#[test]
fn test_select_where_on_foreign_key_returns_every_match() {
    let fx = Fixture::new();
    let store = fx.import_vehicles();

    let selection = commands::select_where::<Vehicle>(&store, "line_code", "1").unwrap();
    assert_eq!(selection.records.len(), 2);
}

// =============================================================================
// Index Tests
// =============================================================================

#[test]
fn test_create_index_then_indexed_lookup() {
    let fx = Fixture::new();
    let store = fx.import_lines();
    let index = fx.path("lines.idx");

    let keys = commands::create_index::<Line>(&store, &index).unwrap();
    assert_eq!(keys, 2);

    let found = commands::select_with_index::<Line>(&store, &index, 2).unwrap();
    assert_eq!(found.records.len(), 1);
    assert_eq!(found.records[0].name, "Airport");

    // The tombstoned code 3 was never indexed.
    let missing = commands::select_with_index::<Line>(&store, &index, 3).unwrap();
    assert!(missing.records.is_empty());
}

#[test]
fn test_select_with_index_falls_back_without_index_file() {
    let fx = Fixture::new();
    let store = fx.import_lines();

    let found =
        commands::select_with_index::<Line>(&store, &fx.path("absent.idx"), 1).unwrap();
    assert_eq!(found.records.len(), 1);
    assert_eq!(found.records[0].name, "Downtown");
}

#[test]
fn test_create_index_rejects_duplicate_keys() {
    let fx = Fixture::new();
    let store = fx.path("lines.bin");
    let csv = fx.path("dup.csv");
    fs::write(&csv, "Code,Card,Name,Color\n5,S,A,Red\n5,N,B,Blue\n").unwrap();
    commands::create_table::<Line>(&csv, &store).unwrap();

    let result = commands::create_index::<Line>(&store, &fx.path("lines.idx"));
    assert!(matches!(result, Err(TransitError::DuplicateKey(5))));
}

// =============================================================================
// Insert Tests
// =============================================================================

#[test]
fn test_insert_appends_records() {
    let fx = Fixture::new();
    let store = fx.import_lines();

    commands::insert(&store, &[new_line(9, "Express")]).unwrap();

    let selection = commands::select_all::<Line>(&store).unwrap();
    let codes: Vec<i32> = selection.records.iter().map(|l| l.code).collect();
    assert_eq!(codes, vec![1, 2, 9]);
}

#[test]
fn test_insert_with_index_keeps_index_current() {
    let fx = Fixture::new();
    let store = fx.import_lines();
    let index = fx.path("lines.idx");
    commands::create_index::<Line>(&store, &index).unwrap();

    commands::insert_with_index(&store, &index, &[new_line(9, "Express")]).unwrap();

    let found = commands::select_with_index::<Line>(&store, &index, 9).unwrap();
    assert_eq!(found.records.len(), 1);
    assert_eq!(found.records[0].name, "Express");
}

#[test]
fn test_insert_with_index_requires_an_index() {
    let fx = Fixture::new();
    let store = fx.import_lines();

    let result =
        commands::insert_with_index(&store, &fx.path("absent.idx"), &[new_line(9, "X")]);
    assert!(matches!(result, Err(TransitError::IndexUnavailable(_))));
}

// =============================================================================
// Sort and Join Tests
// =============================================================================

#[test]
fn test_sort_then_join_pipeline() {
    let fx = Fixture::new();
    let lines = fx.import_lines();
    let vehicles = fx.import_vehicles();

    let sorted_lines = fx.path("lines.sorted.bin");
    let sorted_vehicles = fx.path("vehicles.sorted.bin");

    let stats = commands::sort::<Line>(&lines, &sorted_lines).unwrap();
    assert_eq!(stats.kept, 2);
    assert_eq!(stats.dropped, 1);
    commands::sort::<Vehicle>(&vehicles, &sorted_vehicles).unwrap();

    let result = commands::join(&sorted_vehicles, &sorted_lines).unwrap();

    // Vehicles AA001 and AA002 ride line 1; AA003's line 3 was removed
    // from the line store, so it pairs with nothing.
    assert_eq!(result.pairs.len(), 2);
    for (vehicle, line) in &result.pairs {
        assert_eq!(vehicle.line_code, line.code);
        assert_eq!(line.code, 1);
    }
}

#[test]
fn test_join_with_no_common_keys_reports_no_pairs() {
    let fx = Fixture::new();

    let lines_csv = fx.path("lines.csv");
    fs::write(&lines_csv, "Code,Card,Name,Color\n7,S,Ring,White\n").unwrap();
    let vehicles_csv = fx.path("vehicles.csv");
    fs::write(
        &vehicles_csv,
        "Prefix,Date,Seats,LineCode,Model,Category\nZZ900,2018-01-01,30,4,Apache,urban\n",
    )
    .unwrap();

    let lines = fx.path("lines.bin");
    let vehicles = fx.path("vehicles.bin");
    commands::create_table::<Line>(&lines_csv, &lines).unwrap();
    commands::create_table::<Vehicle>(&vehicles_csv, &vehicles).unwrap();

    let sorted_lines = fx.path("lines.sorted.bin");
    let sorted_vehicles = fx.path("vehicles.sorted.bin");
    commands::sort::<Line>(&lines, &sorted_lines).unwrap();
    commands::sort::<Vehicle>(&vehicles, &sorted_vehicles).unwrap();

    let result = commands::join(&sorted_vehicles, &sorted_lines).unwrap();
    assert!(result.pairs.is_empty());
}

// =============================================================================
// Consistency Tests
// =============================================================================

#[test]
fn test_readers_reject_dirty_store() {
    let fx = Fixture::new();
    let store = fx.import_lines();
    corrupt_status(&store);

    assert!(matches!(
        commands::select_all::<Line>(&store),
        Err(TransitError::Inconsistent(_))
    ));
    assert!(matches!(
        commands::select_where::<Line>(&store, "code", "1"),
        Err(TransitError::Inconsistent(_))
    ));
    assert!(matches!(
        commands::sort::<Line>(&store, &fx.path("sorted.bin")),
        Err(TransitError::Inconsistent(_))
    ));
}

#[test]
fn test_join_rejects_dirty_input() {
    let fx = Fixture::new();
    let lines = fx.import_lines();
    let vehicles = fx.import_vehicles();

    let sorted_lines = fx.path("lines.sorted.bin");
    let sorted_vehicles = fx.path("vehicles.sorted.bin");
    commands::sort::<Line>(&lines, &sorted_lines).unwrap();
    commands::sort::<Vehicle>(&vehicles, &sorted_vehicles).unwrap();
    corrupt_status(&sorted_vehicles);

    let result = commands::join(&sorted_vehicles, &sorted_lines);
    assert!(matches!(result, Err(TransitError::Inconsistent(_))));
}
