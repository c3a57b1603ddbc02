use blake3::Hasher;
use tracing::info;

use crate::errors::IngestionError;
use crate::formats::{CsvFormat, RawSheet, WorkbookFormat};
use crate::model::IngestedTable;
use crate::normalize::build_table;

pub trait SpreadsheetFormat {
    fn name(&self) -> &'static str;
    fn read(&self, bytes: &[u8]) -> Result<RawSheet, IngestionError>;
}

/// Parses uploaded bytes into a normalized booking table, trying workbook
/// formats before delimited text.
pub fn ingest_bytes(bytes: &[u8]) -> Result<IngestedTable, IngestionError> {
    let workbook = WorkbookFormat;
    let csv = CsvFormat;
    let formats: [&dyn SpreadsheetFormat; 2] = [&workbook, &csv];
    ingest_with_formats(bytes, &formats)
}

pub fn ingest_with_formats(
    bytes: &[u8],
    formats: &[&dyn SpreadsheetFormat],
) -> Result<IngestedTable, IngestionError> {
    let mut rejections = Vec::new();

    for format in formats {
        match format.read(bytes) {
            Ok(sheet) => {
                let (table, date_columns) = build_table(&sheet)?;
                let content_hash = content_hash(bytes);
                info!(
                    format = format.name(),
                    rows = table.height(),
                    columns = table.frame().width(),
                    hash = %content_hash,
                    "ingested booking table"
                );
                return Ok(IngestedTable {
                    table,
                    content_hash,
                    format: format.name(),
                    date_columns,
                });
            }
            Err(mismatch @ IngestionError::FormatMismatch { .. }) => rejections.push(mismatch),
            Err(err) => return Err(err),
        }
    }

    Err(IngestionError::NoMatchingFormat { rejections })
}

/// blake3 hex digest identifying an upload by content.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize().to_hex().to_string()
}
