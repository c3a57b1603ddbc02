use thiserror::Error;
use tripdash_parser::IngestionError;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Ingestion failed: {0}")]
    Ingestion(#[from] IngestionError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
