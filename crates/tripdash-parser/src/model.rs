use std::collections::BTreeSet;
use std::fmt;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Columns the dashboard knows about, addressed by their exact header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingField {
    JourneyDate,
    BookedOn,
    IssuedOn,
    Status,
    NetAmount,
    BookedBy,
    Route,
    Category,
    Drivers,
    AdvanceDays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Amount,
    Text,
    Derived,
}

impl BookingField {
    /// Fields read straight from the uploaded sheet.
    pub const SOURCE: [BookingField; 9] = [
        BookingField::JourneyDate,
        BookingField::BookedOn,
        BookingField::IssuedOn,
        BookingField::Status,
        BookingField::NetAmount,
        BookingField::BookedBy,
        BookingField::Route,
        BookingField::Category,
        BookingField::Drivers,
    ];

    pub const DATES: [BookingField; 3] = [
        BookingField::JourneyDate,
        BookingField::BookedOn,
        BookingField::IssuedOn,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            BookingField::JourneyDate => "Journey Date",
            BookingField::BookedOn => "Booked On",
            BookingField::IssuedOn => "Issued On",
            BookingField::Status => "Status",
            BookingField::NetAmount => "Net Amount",
            BookingField::BookedBy => "Booked By",
            BookingField::Route => "Route",
            BookingField::Category => "Category",
            BookingField::Drivers => "Drivers",
            BookingField::AdvanceDays => "Advance Days",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            BookingField::JourneyDate | BookingField::BookedOn | BookingField::IssuedOn => {
                FieldKind::Date
            }
            BookingField::NetAmount => FieldKind::Amount,
            BookingField::AdvanceDays => FieldKind::Derived,
            _ => FieldKind::Text,
        }
    }

    /// Matches a sheet header against the source fields. The derived
    /// `Advance Days` column is never taken from input.
    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::SOURCE
            .into_iter()
            .find(|field| field.column_name() == name)
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Which recognized fields a booking table actually carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookingSchema {
    fields: BTreeSet<BookingField>,
}

impl BookingSchema {
    pub fn from_frame(df: &DataFrame) -> Self {
        let names = df.get_column_names();
        let fields = BookingField::SOURCE
            .into_iter()
            .chain(std::iter::once(BookingField::AdvanceDays))
            .filter(|field| names.iter().any(|name| name.as_str() == field.column_name()))
            .collect();
        Self { fields }
    }

    pub fn has(&self, field: BookingField) -> bool {
        self.fields.contains(&field)
    }

    pub fn missing(&self, required: &[BookingField]) -> Vec<BookingField> {
        required
            .iter()
            .copied()
            .filter(|field| !self.has(*field))
            .collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = BookingField> + '_ {
        self.fields.iter().copied()
    }
}

/// The normalized, in-memory booking dataset.
#[derive(Debug, Clone)]
pub struct BookingTable {
    df: DataFrame,
    schema: BookingSchema,
}

impl BookingTable {
    pub fn new(df: DataFrame) -> Self {
        let schema = BookingSchema::from_frame(&df);
        Self { df, schema }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_frame(self) -> DataFrame {
        self.df
    }

    pub fn schema(&self) -> &BookingSchema {
        &self.schema
    }

    pub fn has(&self, field: BookingField) -> bool {
        self.schema.has(field)
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column(&self, field: BookingField) -> Option<&Column> {
        if !self.has(field) {
            return None;
        }
        self.df.column(field.column_name()).ok()
    }

    /// Keeps the rows where `mask` is true, preserving their order.
    pub fn filter(&self, mask: &BooleanChunked) -> PolarsResult<BookingTable> {
        let df = self.df.filter(mask)?;
        Ok(BookingTable {
            df,
            schema: self.schema.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateParseSummary {
    pub field: BookingField,
    pub parsed: usize,
    pub failed: usize,
}

/// Result of one ingestion: the table plus what we learned reading it.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: BookingTable,
    pub content_hash: String,
    pub format: &'static str,
    pub date_columns: Vec<DateParseSummary>,
}
