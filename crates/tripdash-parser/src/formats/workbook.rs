use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::errors::IngestionError;
use crate::formats::common::{is_blank_row, RawCell, RawSheet};
use crate::registry::SpreadsheetFormat;

const FORMAT_NAME: &str = "workbook";

// xlsx, xlsm, xlsb and ods are zip containers; legacy xls is an OLE compound file.
const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
const OLE_SIGNATURE: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Excel and OpenDocument workbooks, read through calamine. Only the first
/// worksheet is used.
pub struct WorkbookFormat;

impl SpreadsheetFormat for WorkbookFormat {
    fn name(&self) -> &'static str {
        FORMAT_NAME
    }

    fn read(&self, bytes: &[u8]) -> Result<RawSheet, IngestionError> {
        if !bytes.starts_with(ZIP_SIGNATURE) && !bytes.starts_with(OLE_SIGNATURE) {
            return Err(IngestionError::FormatMismatch {
                format: FORMAT_NAME,
                reason: "content has neither a zip nor an OLE signature".to_string(),
            });
        }

        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|source| {
                IngestionError::Workbook {
                    format: FORMAT_NAME,
                    source,
                }
            })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or(IngestionError::EmptyWorkbook {
                format: FORMAT_NAME,
            })?
            .map_err(|source| IngestionError::Workbook {
                format: FORMAT_NAME,
                source,
            })?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(raw_cell).collect::<Vec<_>>());

        let header = rows
            .by_ref()
            .find(|row| !is_blank_row(row))
            .ok_or(IngestionError::MissingHeader {
                format: FORMAT_NAME,
            })?;

        Ok(RawSheet::from_rows(&header, rows))
    }
}

fn raw_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        Data::String(text) => RawCell::Text(text.clone()),
        Data::Int(value) => RawCell::Number(*value as f64),
        Data::Float(value) => RawCell::Number(*value),
        Data::Bool(value) => RawCell::Bool(*value),
        Data::DateTime(value) => value
            .as_datetime()
            .map(RawCell::DateTime)
            .unwrap_or_else(|| RawCell::Number(value.as_f64())),
        Data::DateTimeIso(text) | Data::DurationIso(text) => RawCell::Text(text.clone()),
    }
}
