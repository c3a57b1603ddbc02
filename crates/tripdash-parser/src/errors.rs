use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("{format} format mismatch: {reason}")]
    FormatMismatch {
        format: &'static str,
        reason: String,
    },

    #[error("{format} workbook could not be read: {source}")]
    Workbook {
        format: &'static str,
        #[source]
        source: calamine::Error,
    },

    #[error("{format} CSV error: {source}")]
    Csv {
        format: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{format} file does not contain any worksheets")]
    EmptyWorkbook { format: &'static str },

    #[error("{format} file has no header row")]
    MissingHeader { format: &'static str },

    #[error("failed to build booking table: {0}")]
    Polars(#[from] PolarsError),

    /// Holds the `FormatMismatch` returned by each format tried, in order.
    #[error("no spreadsheet format recognized this file ({})", join_rejections(.rejections))]
    NoMatchingFormat { rejections: Vec<IngestionError> },
}

impl IngestionError {
    /// Name of the format that raised this error, if it came from one.
    pub fn format(&self) -> Option<&'static str> {
        match self {
            IngestionError::FormatMismatch { format, .. }
            | IngestionError::Workbook { format, .. }
            | IngestionError::Csv { format, .. }
            | IngestionError::EmptyWorkbook { format }
            | IngestionError::MissingHeader { format } => Some(*format),
            IngestionError::Polars(_) | IngestionError::NoMatchingFormat { .. } => None,
        }
    }
}

fn join_rejections(rejections: &[IngestionError]) -> String {
    rejections
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
