pub mod common;
pub mod csv_text;
pub mod workbook;

pub use common::{RawCell, RawSheet};
pub use csv_text::CsvFormat;
pub use workbook::WorkbookFormat;
