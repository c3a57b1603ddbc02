use chrono::{DateTime, Datelike, Weekday};
use polars::prelude::*;
use serde::Serialize;
use tripdash_parser::{BookingField, BookingTable};

use crate::error::Result;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayCount {
    pub weekday: &'static str,
    /// `None` when no journey falls on this weekday.
    pub count: Option<u64>,
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Journeys per weekday, always seven entries starting with Monday.
pub fn weekly_demand(table: &BookingTable) -> Result<Option<Vec<WeekdayCount>>> {
    let Some(column) = table.column(BookingField::JourneyDate) else {
        return Ok(None);
    };
    let millis = column
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;

    let mut counts = [0u64; 7];
    for value in millis.i64()?.into_iter().flatten() {
        if let Some(moment) = DateTime::from_timestamp_millis(value) {
            counts[moment.weekday().num_days_from_monday() as usize] += 1;
        }
    }

    Ok(Some(
        WEEK.iter()
            .zip(counts)
            .map(|(day, count)| WeekdayCount {
                weekday: weekday_name(*day),
                count: (count > 0).then_some(count),
            })
            .collect(),
    ))
}
