//! Tests for the sorted merge join
//!
//! These tests verify:
//! - One emitted pair per matching (detail, dimension) combination
//! - Zero pairs on disjoint key sets
//! - Termination when either side is exhausted

use std::path::Path;

use tempfile::TempDir;
use transitdb::join::merge_join;
use transitdb::{Line, RecordStore, Vehicle};

// =============================================================================
// Helper Functions
// =============================================================================

fn line_store(path: &Path, codes: &[i32]) -> RecordStore<Line> {
    let labels = ["Code", "Card", "Name", "Color"]
        .map(str::to_string)
        .to_vec();
    let mut store = RecordStore::create(path, labels).unwrap();
    for &code in codes {
        let line = Line::new(true, code, b'S', format!("Line {}", code), "Red".into());
        store.append(&line).unwrap();
    }
    store.mark_clean().unwrap();
    store
}

fn vehicle_store(path: &Path, line_codes: &[i32]) -> RecordStore<Vehicle> {
    let labels = ["Prefix", "Date", "Seats", "LineCode", "Model", "Category"]
        .map(str::to_string)
        .to_vec();
    let mut store = RecordStore::create(path, labels).unwrap();
    for (i, &code) in line_codes.iter().enumerate() {
        let vehicle = Vehicle::new(
            true,
            format!("V{:04}", i),
            "2020-06-01".into(),
            40,
            code,
            "TorinoX".into(),
            "urban".into(),
        );
        store.append(&vehicle).unwrap();
    }
    store.mark_clean().unwrap();
    store
}

// =============================================================================
// Cardinality Tests
// =============================================================================

#[test]
fn test_join_emits_one_pair_per_match() {
    let temp = TempDir::new().unwrap();
    let mut lines = line_store(&temp.path().join("lines.bin"), &[1, 2, 3]);
    let mut vehicles = vehicle_store(&temp.path().join("vehicles.bin"), &[1, 1, 3, 3, 3]);

    let pairs = merge_join(&mut lines, &mut vehicles).unwrap();

    // Line 1 matches 2 vehicles, line 3 matches 3: 5 pairs in total,
    // line 2 matches none.
    assert_eq!(pairs.len(), 5);
    for (vehicle, line) in &pairs {
        assert_eq!(vehicle.line_code, line.code);
    }

    let joined_codes: Vec<i32> = pairs.iter().map(|(v, _)| v.line_code).collect();
    assert_eq!(joined_codes, vec![1, 1, 3, 3, 3]);
}

#[test]
fn test_join_disjoint_keys_yields_no_pairs() {
    let temp = TempDir::new().unwrap();
    let mut lines = line_store(&temp.path().join("lines.bin"), &[1, 3, 5]);
    let mut vehicles = vehicle_store(&temp.path().join("vehicles.bin"), &[2, 4, 6]);

    let pairs = merge_join(&mut lines, &mut vehicles).unwrap();
    assert!(pairs.is_empty());
}

#[test]
fn test_join_stops_when_detail_side_exhausts() {
    let temp = TempDir::new().unwrap();
    let mut lines = line_store(&temp.path().join("lines.bin"), &[1, 2, 3, 4, 5]);
    let mut vehicles = vehicle_store(&temp.path().join("vehicles.bin"), &[2]);

    let pairs = merge_join(&mut lines, &mut vehicles).unwrap();

    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].1.code, 2);
}

#[test]
fn test_join_stops_when_dimension_side_exhausts() {
    let temp = TempDir::new().unwrap();
    let mut lines = line_store(&temp.path().join("lines.bin"), &[3]);
    let mut vehicles = vehicle_store(&temp.path().join("vehicles.bin"), &[1, 2, 3, 3, 9]);

    let pairs = merge_join(&mut lines, &mut vehicles).unwrap();
    assert_eq!(pairs.len(), 2);
}

#[test]
fn test_join_skips_tombstoned_records() {
    let temp = TempDir::new().unwrap();

    let labels = ["Code", "Card", "Name", "Color"]
        .map(str::to_string)
        .to_vec();
    let mut lines = RecordStore::create(&temp.path().join("lines.bin"), labels).unwrap();
    lines
        .append(&Line::new(true, 1, b'N', "A".into(), "Red".into()))
        .unwrap();
    lines
        .append(&Line::new(false, 2, b'N', "B".into(), "Blue".into()))
        .unwrap();
    lines.mark_clean().unwrap();

    let mut vehicles = vehicle_store(&temp.path().join("vehicles.bin"), &[1, 2]);

    let pairs = merge_join(&mut lines, &mut vehicles).unwrap();

    // The removed line 2 never pairs.
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].1.code, 1);
}
