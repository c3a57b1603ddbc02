use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::{debug, warn};

use crate::errors::IngestionError;
use crate::formats::{RawCell, RawSheet};
use crate::model::{BookingField, BookingTable, DateParseSummary, FieldKind};

pub(crate) const MILLIS_PER_DAY: i64 = 86_400_000;

// Spreadsheet serial day numbers count from 1899-12-30 in the 1900 date system.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
// Serial for 9999-12-31, the last date a spreadsheet can hold.
const MAX_SERIAL: f64 = 2_958_465.0;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %B %Y",
];

const CURRENCY_MARKERS: &[&str] = &["₹", "$", "€", "£", "INR", "Rs.", "Rs"];

/// Turns a raw sheet into a booking table: recognized date columns become
/// millisecond datetimes, `Net Amount` becomes a float, every other column is
/// text, and `Advance Days` is derived when both of its inputs are present.
pub(crate) fn build_table(
    sheet: &RawSheet,
) -> Result<(BookingTable, Vec<DateParseSummary>), IngestionError> {
    let mut columns: Vec<Column> = Vec::with_capacity(sheet.headers.len() + 1);
    let mut summaries = Vec::new();
    let mut journey_millis: Option<Vec<Option<i64>>> = None;
    let mut booked_millis: Option<Vec<Option<i64>>> = None;

    for (idx, header) in sheet.headers.iter().enumerate() {
        if header == BookingField::AdvanceDays.column_name() {
            debug!("ignoring input column that collides with the derived Advance Days");
            continue;
        }
        let field = BookingField::from_column_name(header);
        let kind = field.map(|f| (f, f.kind()));

        let series = match kind {
            Some((field, FieldKind::Date)) => {
                let mut parsed = 0;
                let mut failed = 0;
                let values: Vec<Option<i64>> = sheet
                    .column_cells(idx)
                    .map(|cell| {
                        let value = parse_date_cell(cell);
                        match (&value, cell.is_empty()) {
                            (Some(_), _) => parsed += 1,
                            (None, false) => failed += 1,
                            (None, true) => {}
                        }
                        value.map(|dt| dt.and_utc().timestamp_millis())
                    })
                    .collect();

                if failed > 0 {
                    warn!(
                        column = field.column_name(),
                        failed, "date cells could not be parsed and were set to null"
                    );
                }
                summaries.push(DateParseSummary {
                    field,
                    parsed,
                    failed,
                });

                match field {
                    BookingField::JourneyDate => journey_millis = Some(values.clone()),
                    BookingField::BookedOn => booked_millis = Some(values.clone()),
                    _ => {}
                }

                Series::new(header.as_str().into(), values)
                    .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            }
            Some((_, FieldKind::Amount)) => {
                let values: Vec<Option<f64>> =
                    sheet.column_cells(idx).map(parse_amount_cell).collect();
                Series::new(header.as_str().into(), values)
            }
            _ => {
                let values: Vec<Option<String>> =
                    sheet.column_cells(idx).map(RawCell::to_text).collect();
                Series::new(header.as_str().into(), values)
            }
        };
        columns.push(series.into());
    }

    if let (Some(journey), Some(booked)) = (journey_millis, booked_millis) {
        let advance = advance_days(&journey, &booked);
        columns.push(Series::new(BookingField::AdvanceDays.column_name().into(), advance).into());
    }

    let df = DataFrame::new(columns)?;
    Ok((BookingTable::new(df), summaries))
}

/// Whole days from booking to journey, rounded toward negative infinity.
pub(crate) fn advance_days(journey: &[Option<i64>], booked: &[Option<i64>]) -> Vec<Option<i64>> {
    journey
        .iter()
        .zip(booked)
        .map(|(journey, booked)| match (journey, booked) {
            (Some(journey), Some(booked)) => Some((journey - booked).div_euclid(MILLIS_PER_DAY)),
            _ => None,
        })
        .collect()
}

pub(crate) fn parse_date_cell(cell: &RawCell) -> Option<NaiveDateTime> {
    match cell {
        RawCell::DateTime(value) => Some(*value),
        RawCell::Number(serial) => serial_to_datetime(*serial),
        RawCell::Text(text) => parse_date_text(text),
        RawCell::Bool(_) | RawCell::Empty => None,
    }
}

pub(crate) fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 || serial > MAX_SERIAL {
        return None;
    }
    let (year, month, day) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * MILLIS_PER_DAY as f64).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

pub(crate) fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

pub(crate) fn parse_amount_cell(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Number(value) => value.is_finite().then_some(*value),
        RawCell::Text(text) => parse_amount_text(text),
        RawCell::Empty | RawCell::Bool(_) | RawCell::DateTime(_) => None,
    }
}

fn parse_amount_text(text: &str) -> Option<f64> {
    let mut cleaned = text.trim().to_string();
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    let cleaned: String = cleaned
        .chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}
