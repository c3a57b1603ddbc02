use polars::prelude::*;
use serde::Serialize;
use tripdash_parser::{BookingField, BookingTable};

use crate::error::Result;

const COUNT_COLUMN: &str = "count";
const REVENUE_COLUMN: &str = "revenue";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelAmount {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub revenue: f64,
    /// Fraction of the summed revenue; zero for every category when that sum is zero.
    pub share: f64,
}

/// Most frequent `Booked By` values, at most `limit`.
pub fn top_channels(table: &BookingTable, limit: usize) -> Result<Option<Vec<LabelCount>>> {
    if !table.has(BookingField::BookedBy) {
        return Ok(None);
    }
    let key = BookingField::BookedBy.column_name();

    let counts = table
        .frame()
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by_stable([col(key)])
        .agg([len().cast(DataType::Int64).alias(COUNT_COLUMN)])
        .sort([COUNT_COLUMN], descending_stable())
        .limit(row_limit(limit))
        .collect()?;

    let labels = counts.column(key)?.str()?;
    let values = counts.column(COUNT_COLUMN)?.i64()?;
    let ranked = labels
        .into_iter()
        .zip(values.into_iter())
        .filter_map(|(label, count)| {
            Some(LabelCount {
                label: label?.to_string(),
                count: count.unwrap_or(0) as u64,
            })
        })
        .collect();

    Ok(Some(ranked))
}

pub fn top_routes_by_revenue(
    table: &BookingTable,
    limit: usize,
) -> Result<Option<Vec<LabelAmount>>> {
    ranked_revenue(table, BookingField::Route, limit)
}

pub fn driver_performance(table: &BookingTable, limit: usize) -> Result<Option<Vec<LabelAmount>>> {
    ranked_revenue(table, BookingField::Drivers, limit)
}

/// Revenue per category in order of first appearance.
pub fn revenue_by_category(table: &BookingTable) -> Result<Option<Vec<CategoryShare>>> {
    let Some(totals) = revenue_by_key(table, BookingField::Category)? else {
        return Ok(None);
    };
    let grand_total: f64 = totals.iter().map(|entry| entry.amount).sum();

    let shares = totals
        .into_iter()
        .map(|entry| CategoryShare {
            share: if grand_total == 0.0 {
                0.0
            } else {
                entry.amount / grand_total
            },
            category: entry.label,
            revenue: entry.amount,
        })
        .collect();

    Ok(Some(shares))
}

fn ranked_revenue(
    table: &BookingTable,
    key: BookingField,
    limit: usize,
) -> Result<Option<Vec<LabelAmount>>> {
    if !table.has(key) || !table.has(BookingField::NetAmount) {
        return Ok(None);
    }
    let frame = grouped_revenue(table, key)
        .sort([REVENUE_COLUMN], descending_stable())
        .limit(row_limit(limit))
        .collect()?;
    Ok(Some(label_amounts(&frame, key.column_name())?))
}

fn revenue_by_key(table: &BookingTable, key: BookingField) -> Result<Option<Vec<LabelAmount>>> {
    if !table.has(key) || !table.has(BookingField::NetAmount) {
        return Ok(None);
    }
    let frame = grouped_revenue(table, key).collect()?;
    Ok(Some(label_amounts(&frame, key.column_name())?))
}

/// Sum of `Net Amount` per non-null `key`, groups kept in first-appearance order.
fn grouped_revenue(table: &BookingTable, key: BookingField) -> LazyFrame {
    let key = key.column_name();
    let amount = BookingField::NetAmount.column_name();

    table
        .frame()
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by_stable([col(key)])
        .agg([col(amount).sum().alias(REVENUE_COLUMN)])
}

fn label_amounts(frame: &DataFrame, key: &str) -> Result<Vec<LabelAmount>> {
    let labels = frame.column(key)?.str()?;
    let revenue = frame.column(REVENUE_COLUMN)?.f64()?;

    Ok(labels
        .into_iter()
        .zip(revenue.into_iter())
        .filter_map(|(label, amount)| {
            Some(LabelAmount {
                label: label?.to_string(),
                amount: amount.unwrap_or(0.0),
            })
        })
        .collect())
}

// Limits past the index range mean "no limit" rather than wrapping.
fn row_limit(limit: usize) -> IdxSize {
    IdxSize::try_from(limit).unwrap_or(IdxSize::MAX)
}

// Ties keep their first-appearance order.
fn descending_stable() -> SortMultipleOptions {
    SortMultipleOptions::default()
        .with_order_descending(true)
        .with_maintain_order(true)
}
