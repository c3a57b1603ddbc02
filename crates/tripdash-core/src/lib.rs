pub mod config;
pub mod currency;
pub mod error;
pub mod filter;
pub mod session;
pub mod views;

pub use config::DashboardConfig;
pub use error::{AnalyticsError, Result};
pub use filter::{observed_statuses, ObservedStatuses, StatusFilter};
pub use session::{DashboardSession, SessionCache};
pub use views::{catalog, run_dashboard, run_views, DashboardReport, ViewOutput};

pub use tripdash_parser::{
    ingest_bytes, BookingField, BookingSchema, BookingTable, IngestedTable, IngestionError,
};
