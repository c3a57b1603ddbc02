pub mod errors;
pub mod formats;
pub mod model;
mod normalize;
mod registry;

pub use errors::IngestionError;
pub use model::{
    BookingField, BookingSchema, BookingTable, DateParseSummary, FieldKind, IngestedTable,
};
pub use registry::{content_hash, ingest_bytes, ingest_with_formats, SpreadsheetFormat};
