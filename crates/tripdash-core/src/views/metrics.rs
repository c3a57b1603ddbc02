use polars::prelude::*;
use tripdash_parser::{BookingField, BookingTable};

use crate::error::Result;

pub const CONFIRMED_STATUS: &str = "Booked";
pub const CANCELLED_STATUS: &str = "Cancel";

pub fn total_bookings(table: &BookingTable) -> u64 {
    table.height() as u64
}

/// Sum of `Net Amount`, ignoring missing amounts. An empty table sums to zero.
pub fn total_revenue(table: &BookingTable) -> Result<Option<f64>> {
    let Some(column) = table.column(BookingField::NetAmount) else {
        return Ok(None);
    };
    Ok(Some(column.f64()?.sum().unwrap_or(0.0)))
}

pub fn confirmed_count(table: &BookingTable) -> Result<Option<u64>> {
    status_count(table, CONFIRMED_STATUS)
}

pub fn cancellation_count(table: &BookingTable) -> Result<Option<u64>> {
    status_count(table, CANCELLED_STATUS)
}

/// Rows whose Status equals `status` exactly.
pub fn status_count(table: &BookingTable, status: &str) -> Result<Option<u64>> {
    let Some(column) = table.column(BookingField::Status) else {
        return Ok(None);
    };
    let count = column
        .str()?
        .into_iter()
        .filter(|value| *value == Some(status))
        .count();
    Ok(Some(count as u64))
}
