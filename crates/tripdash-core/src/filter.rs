use std::collections::{BTreeSet, HashMap};

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;
use tripdash_parser::{BookingField, BookingTable};

use crate::error::Result;

/// Distinct Status values in order of first appearance, with row counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservedStatuses {
    pub values: Vec<(String, usize)>,
    pub missing: usize,
}

impl ObservedStatuses {
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// Selects every observed status, blanks included when the table has any.
    pub fn selection(&self) -> StatusFilter {
        StatusFilter::only(self.names()).with_missing(self.missing > 0)
    }
}

/// Returns `None` when the table has no Status column.
pub fn observed_statuses(table: &BookingTable) -> Result<Option<ObservedStatuses>> {
    let Some(column) = table.column(BookingField::Status) else {
        return Ok(None);
    };
    let status = column.str()?;

    let mut values: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut missing = 0;

    for value in status.into_iter() {
        match value {
            Some(name) => match positions.get(name) {
                Some(&pos) => values[pos].1 += 1,
                None => {
                    positions.insert(name, values.len());
                    values.push((name.to_string(), 1));
                }
            },
            None => missing += 1,
        }
    }

    Ok(Some(ObservedStatuses { values, missing }))
}

/// Which Status values to keep. The default keeps every observed status, so
/// applying it is a pass-through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    AllObserved,
    Only {
        values: BTreeSet<String>,
        /// Keep rows whose Status is blank.
        keep_missing: bool,
    },
}

impl StatusFilter {
    pub fn all_observed() -> Self {
        StatusFilter::AllObserved
    }

    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StatusFilter::Only {
            values: values.into_iter().map(Into::into).collect(),
            keep_missing: false,
        }
    }

    /// Sets whether blank-Status rows pass. No effect on `AllObserved`, which
    /// keeps them anyway.
    pub fn with_missing(self, keep: bool) -> Self {
        match self {
            StatusFilter::AllObserved => StatusFilter::AllObserved,
            StatusFilter::Only { values, .. } => StatusFilter::Only {
                values,
                keep_missing: keep,
            },
        }
    }

    /// A table without a Status column is returned unchanged.
    pub fn apply(&self, table: &BookingTable) -> Result<BookingTable> {
        let (accepted, keep_missing) = match self {
            StatusFilter::AllObserved => return Ok(table.clone()),
            StatusFilter::Only {
                values,
                keep_missing,
            } => (values, *keep_missing),
        };
        let Some(column) = table.column(BookingField::Status) else {
            debug!("status filter skipped: no Status column");
            return Ok(table.clone());
        };

        let mask: Vec<bool> = column
            .str()?
            .into_iter()
            .map(|value| match value {
                Some(status) => accepted.contains(status),
                None => keep_missing,
            })
            .collect();
        let mask = BooleanChunked::from_slice("status_mask".into(), &mask);

        let filtered = table.filter(&mask)?;
        debug!(
            accepted = accepted.len(),
            keep_missing,
            before = table.height(),
            after = filtered.height(),
            "applied status filter"
        );
        Ok(filtered)
    }
}
