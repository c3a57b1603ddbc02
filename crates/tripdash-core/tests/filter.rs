use std::fs;
use std::path::PathBuf;

use polars::prelude::*;
use tripdash_core::views::total_revenue;
use tripdash_core::{ingest_bytes, observed_statuses, BookingField, BookingTable, StatusFilter};

fn fixture_table() -> BookingTable {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tripdash-parser/tests/data")
        .join("bookings.csv");
    let bytes = fs::read(path).expect("read fixture");
    ingest_bytes(&bytes).expect("ingest fixture").table
}

#[test]
fn observed_statuses_in_first_appearance_order() {
    let table = fixture_table();
    let observed = observed_statuses(&table).unwrap().unwrap();

    assert_eq!(
        observed.values,
        vec![
            ("Booked".to_string(), 6),
            ("Cancel".to_string(), 1),
            ("Pending".to_string(), 1),
        ]
    );
    assert_eq!(observed.missing, 0);
    assert_eq!(
        observed.names().collect::<Vec<_>>(),
        vec!["Booked", "Cancel", "Pending"]
    );
}

#[test]
fn default_filter_is_identity() {
    let table = fixture_table();
    let filtered = StatusFilter::default().apply(&table).unwrap();

    assert_eq!(filtered.height(), table.height());
    assert!(filtered.frame().equals_missing(table.frame()));
}

#[test]
fn selecting_every_observed_status_keeps_all_rows() {
    let table = fixture_table();
    let observed = observed_statuses(&table).unwrap().unwrap();
    let filtered = observed.selection().apply(&table).unwrap();

    assert_eq!(filtered.height(), 8);
    assert!(filtered.frame().equals_missing(table.frame()));
}

#[test]
fn observed_selection_keeps_blank_statuses() {
    let table = ingest_bytes(b"Status,Net Amount\nBooked,100\n,200\nCancel,300\n")
        .unwrap()
        .table;
    let observed = observed_statuses(&table).unwrap().unwrap();
    assert_eq!(observed.missing, 1);

    let filtered = observed.selection().apply(&table).unwrap();
    assert_eq!(filtered.height(), 3);
    assert!(filtered.frame().equals_missing(table.frame()));

    let named_only = StatusFilter::only(observed.names()).apply(&table).unwrap();
    assert_eq!(named_only.height(), 2);
}

#[test]
fn blank_statuses_can_be_selected_alone() {
    let table = BookingTable::new(
        df!("Status" => &[Some("Booked"), None, Some("Cancel"), None]).unwrap(),
    );
    let filtered = StatusFilter::only(Vec::<String>::new())
        .with_missing(true)
        .apply(&table)
        .unwrap();

    assert_eq!(filtered.height(), 2);
    assert_eq!(filtered.column(BookingField::Status).unwrap().null_count(), 2);
}

#[test]
fn booked_only() {
    let table = fixture_table();
    let filtered = StatusFilter::only(["Booked"]).apply(&table).unwrap();

    assert_eq!(filtered.height(), 6);
    assert_eq!(total_revenue(&filtered).unwrap(), Some(4000.0));
    assert_eq!(filtered.schema(), table.schema());
}

#[test]
fn empty_selection_empties_the_table() {
    let table = fixture_table();
    let filtered = StatusFilter::only(Vec::<String>::new())
        .apply(&table)
        .unwrap();

    assert_eq!(filtered.height(), 0);
    assert_eq!(filtered.frame().width(), table.frame().width());
}

#[test]
fn named_statuses_drop_blank_rows() {
    let table = BookingTable::new(
        df!("Status" => &[Some("Booked"), None, Some("Cancel")]).unwrap(),
    );

    let observed = observed_statuses(&table).unwrap().unwrap();
    assert_eq!(observed.missing, 1);

    assert_eq!(StatusFilter::all_observed().apply(&table).unwrap().height(), 3);
    assert_eq!(
        StatusFilter::only(["Booked", "Cancel"])
            .apply(&table)
            .unwrap()
            .height(),
        2
    );
}

#[test]
fn no_status_column_passes_through() {
    let table = BookingTable::new(df!("Route" => &["DEL-BOM", "BLR-GOI"]).unwrap());

    assert_eq!(observed_statuses(&table).unwrap(), None);
    assert_eq!(StatusFilter::only(["Booked"]).apply(&table).unwrap().height(), 2);
}
