use csv::ReaderBuilder;

use crate::errors::IngestionError;
use crate::formats::common::{is_blank_row, RawCell, RawSheet};
use crate::registry::SpreadsheetFormat;

const FORMAT_NAME: &str = "csv";

/// Comma separated UTF-8 text with a header row. Every cell is read as text
/// and left to column coercion.
pub struct CsvFormat;

impl SpreadsheetFormat for CsvFormat {
    fn name(&self) -> &'static str {
        FORMAT_NAME
    }

    fn read(&self, bytes: &[u8]) -> Result<RawSheet, IngestionError> {
        let content = std::str::from_utf8(bytes).map_err(|err| IngestionError::FormatMismatch {
            format: FORMAT_NAME,
            reason: format!("content is not valid UTF-8: {err}"),
        })?;
        if content.contains('\0') {
            return Err(IngestionError::FormatMismatch {
                format: FORMAT_NAME,
                reason: "content contains NUL bytes".to_string(),
            });
        }
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| IngestionError::Csv {
                format: FORMAT_NAME,
                source,
            })?;
            let row: Vec<RawCell> = record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(field.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        let mut rows = rows.into_iter();
        let header = rows
            .by_ref()
            .find(|row| !is_blank_row(row))
            .ok_or(IngestionError::MissingHeader {
                format: FORMAT_NAME,
            })?;

        Ok(RawSheet::from_rows(&header, rows))
    }
}
