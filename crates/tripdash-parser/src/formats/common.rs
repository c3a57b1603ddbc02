use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

/// A single cell as read from the source, before any column coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Display form used for headers and text columns.
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawCell::Empty => None,
            RawCell::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            RawCell::Number(value) => Some(format_number(*value)),
            RawCell::Bool(value) => Some(value.to_string()),
            RawCell::DateTime(value) => Some(value.to_string()),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// First sheet of a spreadsheet: a header row plus data rows of equal width.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawSheet {
    /// Builds a sheet from the header cells and the remaining rows. Headers are
    /// made unique and non-empty, rows are padded or cut to the header width, and
    /// rows without any content are dropped.
    pub fn from_rows(header: &[RawCell], body: impl IntoIterator<Item = Vec<RawCell>>) -> Self {
        let headers = normalize_headers(header);
        let width = headers.len();

        let rows = body
            .into_iter()
            .filter(|row| !is_blank_row(row))
            .map(|mut row| {
                row.resize(width, RawCell::Empty);
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &RawCell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }
}

pub(crate) fn normalize_headers(header: &[RawCell]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(header.len());
    let mut occurrences: HashMap<String, usize> = HashMap::new();

    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell
                .to_text()
                .unwrap_or_else(|| format!("column_{}", idx + 1));
            let count = occurrences.entry(base.clone()).or_insert(0);
            *count += 1;

            let mut name = if *count == 1 {
                base.clone()
            } else {
                format!("{base}_{count}")
            };
            while used.contains(&name) {
                *count += 1;
                name = format!("{base}_{count}");
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

/// Returns true when a row carries no content at all.
pub(crate) fn is_blank_row(row: &[RawCell]) -> bool {
    row.iter().all(RawCell::is_empty)
}
