use std::fs;
use std::path::PathBuf;

use polars::prelude::*;
use tripdash_core::views::{
    driver_performance, revenue_by_category, top_channels, top_routes_by_revenue, LabelAmount,
    LabelCount,
};
use tripdash_core::{ingest_bytes, BookingTable};

fn fixture_table() -> BookingTable {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tripdash-parser/tests/data")
        .join("bookings.csv");
    let bytes = fs::read(path).expect("read fixture");
    ingest_bytes(&bytes).expect("ingest fixture").table
}

fn counts(pairs: &[(&str, u64)]) -> Vec<LabelCount> {
    pairs
        .iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count: *count,
        })
        .collect()
}

fn amounts(pairs: &[(&str, f64)]) -> Vec<LabelAmount> {
    pairs
        .iter()
        .map(|(label, amount)| LabelAmount {
            label: label.to_string(),
            amount: *amount,
        })
        .collect()
}

#[test]
fn channels_rank_by_count_with_stable_ties() {
    let table = fixture_table();

    assert_eq!(
        top_channels(&table, 10).unwrap(),
        Some(counts(&[
            ("Agent A", 3),
            ("Agent B", 2),
            ("Agent C", 2),
            ("Agent D", 1),
        ]))
    );
}

#[test]
fn routes_rank_by_revenue() {
    let table = fixture_table();

    assert_eq!(
        top_routes_by_revenue(&table, 10).unwrap(),
        Some(amounts(&[
            ("DEL-BOM", 2000.0),
            ("BLR-GOI", 1200.0),
            ("PNQ-HYD", 700.0),
            ("CCU-MAA", 600.0),
        ]))
    );
}

#[test]
fn drivers_rank_by_revenue_with_stable_ties() {
    let table = fixture_table();

    assert_eq!(
        driver_performance(&table, 10).unwrap(),
        Some(amounts(&[("Ravi", 2300.0), ("Sunil", 1100.0), ("Amit", 1100.0)]))
    );
}

#[test]
fn ties_follow_first_appearance_not_label_order() {
    let table = BookingTable::new(
        df!(
            "Route" => &["ZZZ", "AAA", "MMM", "AAA", "ZZZ"],
            "Net Amount" => &[50.0f64, 25.0, 100.0, 25.0, 0.0],
        )
        .unwrap(),
    );

    assert_eq!(
        top_routes_by_revenue(&table, 10).unwrap(),
        Some(amounts(&[("MMM", 100.0), ("ZZZ", 50.0), ("AAA", 50.0)]))
    );
}

#[test]
fn rankings_are_capped() {
    let routes: Vec<String> = (0..15).map(|idx| format!("R{idx:02}")).collect();
    let revenue: Vec<f64> = (0..15).map(|idx| idx as f64).collect();
    let channels: Vec<String> = (0..15).map(|idx| format!("C{idx:02}")).collect();
    let table = BookingTable::new(
        df!(
            "Route" => routes,
            "Drivers" => channels.clone(),
            "Booked By" => channels,
            "Net Amount" => revenue,
        )
        .unwrap(),
    );

    let routes = top_routes_by_revenue(&table, 10).unwrap().unwrap();
    assert_eq!(routes.len(), 10);
    assert_eq!(routes[0].label, "R14");
    assert!(routes.windows(2).all(|pair| pair[0].amount >= pair[1].amount));

    assert_eq!(driver_performance(&table, 10).unwrap().unwrap().len(), 10);
    assert_eq!(top_channels(&table, 10).unwrap().unwrap().len(), 10);
    assert_eq!(top_channels(&table, 3).unwrap().unwrap().len(), 3);
}

#[test]
fn oversized_limit_returns_every_group() {
    let table = fixture_table();

    assert_eq!(top_channels(&table, usize::MAX).unwrap().unwrap().len(), 4);
    assert_eq!(
        top_routes_by_revenue(&table, u32::MAX as usize + 1)
            .unwrap()
            .unwrap()
            .len(),
        4
    );
    assert_eq!(driver_performance(&table, usize::MAX).unwrap().unwrap().len(), 3);
}

#[test]
fn category_shares_sum_to_one() {
    let table = fixture_table();
    let shares = revenue_by_category(&table).unwrap().unwrap();

    let categories: Vec<&str> = shares.iter().map(|entry| entry.category.as_str()).collect();
    assert_eq!(categories, vec!["OTA", "Online Agent"]);
    assert_eq!(shares[0].revenue, 2400.0);
    assert_eq!(shares[1].revenue, 2100.0);

    let total: f64 = shares.iter().map(|entry| entry.share).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!((shares[0].share - 2400.0 / 4500.0).abs() < 1e-9);
}

#[test]
fn category_shares_are_zero_without_revenue() {
    let table = BookingTable::new(
        df!(
            "Category" => &["OTA", "Online Agent"],
            "Net Amount" => &[None::<f64>, None],
        )
        .unwrap(),
    );

    let shares = revenue_by_category(&table).unwrap().unwrap();
    assert_eq!(shares.len(), 2);
    assert!(shares.iter().all(|entry| entry.revenue == 0.0 && entry.share == 0.0));
}

#[test]
fn route_view_skipped_without_route_column() {
    let table = BookingTable::new(df!("Net Amount" => &[10.0f64]).unwrap());

    assert_eq!(top_routes_by_revenue(&table, 10).unwrap(), None);
    assert_eq!(driver_performance(&table, 10).unwrap(), None);
    assert_eq!(revenue_by_category(&table).unwrap(), None);
    assert_eq!(top_channels(&table, 10).unwrap(), None);
}

#[test]
fn revenue_views_need_net_amount() {
    let table = BookingTable::new(df!("Route" => &["DEL-BOM"]).unwrap());

    assert_eq!(top_routes_by_revenue(&table, 10).unwrap(), None);
}

#[test]
fn empty_table_gives_empty_rankings() {
    let table = BookingTable::new(
        df!(
            "Route" => Vec::<&str>::new(),
            "Booked By" => Vec::<&str>::new(),
            "Net Amount" => Vec::<f64>::new(),
        )
        .unwrap(),
    );

    assert_eq!(top_routes_by_revenue(&table, 10).unwrap(), Some(Vec::new()));
    assert_eq!(top_channels(&table, 10).unwrap(), Some(Vec::new()));
}
