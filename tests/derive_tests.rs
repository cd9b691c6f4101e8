//! Integration tests for the `Record` derive macro.
//!
//! These tests verify that `#[derive(Record)]` generates correct tables by
//! actually using the derived implementations.

use caloview::{MCCollection, MCParticle, Record, Table};

// ============================================================================
// Basic Record Derive Tests
// ============================================================================

#[derive(Record, Debug, Clone, PartialEq)]
#[record(table = "CellTable", rows = "cells")]
struct Cell {
    cell_id: u64,
    #[record(unit = "GeV")]
    e: f64,
    x: f32,
    layer: i32,
}

fn cells() -> Vec<Cell> {
    vec![
        Cell {
            cell_id: 7,
            e: 0.5,
            x: 1.0,
            layer: 0,
        },
        Cell {
            cell_id: 3,
            e: 1.25,
            x: -2.0,
            layer: 4,
        },
        Cell {
            cell_id: 9,
            e: 0.0,
            x: 0.5,
            layer: 2,
        },
    ]
}

#[test]
fn test_columns_follow_row_order() {
    let table = CellTable::new(cells());

    assert_eq!(table.cell_id, vec![7, 3, 9]);
    assert_eq!(table.e, vec![0.5, 1.25, 0.0]);
    assert_eq!(table.x, vec![1.0, -2.0, 0.5]);
    assert_eq!(table.layer, vec![0, 4, 2]);
}

#[test]
fn test_named_rows_accessor() {
    let table = CellTable::new(cells());
    assert_eq!(table.cells(), cells().as_slice());
    assert_eq!(table.len(), 3);
    assert!(!table.is_empty());
}

#[test]
fn test_empty_table() {
    let table = CellTable::new(Vec::new());
    assert!(table.is_empty());
    assert!(table.cell_id.is_empty());
    assert!(table.e.is_empty());
}

#[test]
fn test_iteration() {
    let table = CellTable::new(cells());

    let ids: Vec<u64> = table.iter().map(|c| c.cell_id).collect();
    assert_eq!(ids, vec![7, 3, 9]);

    let mut total = 0.0;
    for cell in &table {
        total += cell.e;
    }
    assert_eq!(total, 1.75);
}

#[test]
fn test_from_iterator() {
    let table: CellTable = cells().into_iter().filter(|c| c.e > 0.0).collect();
    assert_eq!(table.cell_id, vec![7, 3]);
}

#[test]
fn test_default_table_is_empty() {
    let table = CellTable::default();
    assert_eq!(table.len(), 0);
}

// ============================================================================
// Record / Table Trait Tests
// ============================================================================

#[test]
fn test_field_names_in_declaration_order() {
    assert_eq!(Cell::FIELD_NAMES, &["cell_id", "e", "x", "layer"]);
}

#[test]
fn test_inspect_fields_formatting() {
    let fields = cells()[1].inspect_fields();

    assert_eq!(
        fields,
        vec![
            ("cell_id", "3".to_string()),
            ("e", "1.2500 GeV".to_string()),
            ("x", "-2.0000".to_string()),
            ("layer", "4".to_string()),
        ]
    );
}

#[test]
fn test_table_trait_round_trip() {
    fn build<T: Table>(rows: Vec<T::Row>) -> T {
        T::from_rows(rows)
    }

    let table: CellTable = build(cells());
    assert_eq!(Table::rows(&table).len(), 3);
    assert_eq!(Table::rows(&table)[2].cell_id, 9);
}

#[test]
fn test_default_rows_accessor_name() {
    #[derive(Record, Debug, Clone)]
    #[record(table = "PairTable")]
    struct Pair {
        a: i32,
        b: [i32; 2],
    }

    let table = PairTable::new(vec![Pair { a: 1, b: [2, 3] }]);
    assert_eq!(table.rows().len(), 1);
    assert_eq!(table.b, vec![[2, 3]]);
    assert_eq!(table.rows()[0].inspect_fields()[1], ("b", "[2, 3]".to_string()));
}

// ============================================================================
// Built-in Records
// ============================================================================

#[test]
fn test_mc_particle_field_names() {
    assert!(MCParticle::FIELD_NAMES.contains(&"energy"));
    assert!(MCParticle::FIELD_NAMES.contains(&"pathlength"));
    assert_eq!(MCParticle::FIELD_NAMES[0], "pdg");
}

#[test]
fn test_mc_collection_is_a_table() {
    let table = MCCollection::from_rows(Vec::new());
    assert!(table.particles().is_empty());
    assert!(table.energy.is_empty());
}
