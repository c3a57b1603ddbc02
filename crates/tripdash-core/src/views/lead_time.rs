use serde::Serialize;
use tripdash_parser::{BookingField, BookingTable};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadTimeSummary {
    pub bookings: u64,
    pub mean_days: Option<f64>,
    pub min_days: Option<i64>,
    pub max_days: Option<i64>,
}

/// Describes `Advance Days` over the rows where it is known.
pub fn lead_time_summary(table: &BookingTable) -> Result<Option<LeadTimeSummary>> {
    let Some(column) = table.column(BookingField::AdvanceDays) else {
        return Ok(None);
    };

    let mut bookings = 0u64;
    let mut total = 0i64;
    let mut min_days: Option<i64> = None;
    let mut max_days: Option<i64> = None;

    for days in column.i64()?.into_iter().flatten() {
        bookings += 1;
        total += days;
        min_days = Some(min_days.map_or(days, |current| current.min(days)));
        max_days = Some(max_days.map_or(days, |current| current.max(days)));
    }

    let mean_days = (bookings > 0).then(|| total as f64 / bookings as f64);

    Ok(Some(LeadTimeSummary {
        bookings,
        mean_days,
        min_days,
        max_days,
    }))
}
