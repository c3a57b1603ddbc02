//! Analytics views over a booking table.
//!
//! Every view is a pure function of the table. The free functions in the
//! submodules return `Ok(None)` when a column they need is missing; the
//! [`AnalyticsView`] wrappers add display metadata and let [`run_views`] skip
//! a view up front based on its declared fields.

pub mod lead_time;
pub mod metrics;
pub mod rankings;
pub mod weekly;

use serde::Serialize;
use tracing::debug;
use tripdash_parser::{BookingField, BookingTable};

use crate::config::DashboardConfig;
use crate::currency::CurrencyAmount;
use crate::error::Result;

pub use lead_time::{lead_time_summary, LeadTimeSummary};
pub use metrics::{cancellation_count, confirmed_count, total_bookings, total_revenue};
pub use rankings::{
    driver_performance, revenue_by_category, top_channels, top_routes_by_revenue, CategoryShare,
    LabelAmount, LabelCount,
};
pub use weekly::{weekly_demand, WeekdayCount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Metrics,
    VisualAnalysis,
    RouteAnalysis,
    Financials,
    OperationalEfficiency,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Metrics => "Metrics",
            Section::VisualAnalysis => "Visual Analysis",
            Section::RouteAnalysis => "Route Analysis",
            Section::Financials => "Financials",
            Section::OperationalEfficiency => "Operational Efficiency",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ViewOutput {
    Count(u64),
    Currency(CurrencyAmount),
    Counts(Vec<LabelCount>),
    Amounts(Vec<LabelAmount>),
    Shares(Vec<CategoryShare>),
    Weekly(Vec<WeekdayCount>),
    LeadTime(LeadTimeSummary),
}

pub trait AnalyticsView {
    fn name(&self) -> &'static str;
    fn title(&self) -> &'static str;
    fn section(&self) -> Section;
    fn required_fields(&self) -> &'static [BookingField];
    /// `Ok(None)` means the view has nothing to show for this table.
    fn compute(
        &self,
        table: &BookingTable,
        config: &DashboardConfig,
    ) -> Result<Option<ViewOutput>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResult {
    pub name: &'static str,
    pub title: &'static str,
    pub section: Section,
    pub output: ViewOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedView {
    pub name: &'static str,
    pub missing: Vec<BookingField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub row_count: usize,
    pub results: Vec<ViewResult>,
    pub skipped: Vec<SkippedView>,
}

impl DashboardReport {
    pub fn result(&self, name: &str) -> Option<&ViewOutput> {
        self.results
            .iter()
            .find(|result| result.name == name)
            .map(|result| &result.output)
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        self.skipped.iter().any(|skipped| skipped.name == name)
    }
}

/// Runs `views` in order, skipping those whose required fields are absent.
pub fn run_views(
    table: &BookingTable,
    views: &[Box<dyn AnalyticsView>],
    config: &DashboardConfig,
) -> Result<DashboardReport> {
    let mut results = Vec::with_capacity(views.len());
    let mut skipped = Vec::new();

    for view in views {
        let missing = table.schema().missing(view.required_fields());
        if !missing.is_empty() {
            debug!(view = view.name(), ?missing, "skipping view");
            skipped.push(SkippedView {
                name: view.name(),
                missing,
            });
            continue;
        }

        match view.compute(table, config)? {
            Some(output) => results.push(ViewResult {
                name: view.name(),
                title: view.title(),
                section: view.section(),
                output,
            }),
            None => skipped.push(SkippedView {
                name: view.name(),
                missing: Vec::new(),
            }),
        }
    }

    Ok(DashboardReport {
        row_count: table.height(),
        results,
        skipped,
    })
}

pub fn run_dashboard(table: &BookingTable, config: &DashboardConfig) -> Result<DashboardReport> {
    run_views(table, &catalog(), config)
}

/// The dashboard's views in display order.
pub fn catalog() -> Vec<Box<dyn AnalyticsView>> {
    vec![
        Box::new(TotalBookings),
        Box::new(TotalRevenue),
        Box::new(ConfirmedCount),
        Box::new(CancellationCount),
        Box::new(TopChannels),
        Box::new(WeeklyDemand),
        Box::new(TopRoutes),
        Box::new(CategoryRevenue),
        Box::new(DriverPerformance),
        Box::new(BookingLeadTime),
    ]
}

pub struct TotalBookings;

impl AnalyticsView for TotalBookings {
    fn name(&self) -> &'static str {
        "total_bookings"
    }

    fn title(&self) -> &'static str {
        "Total Bookings"
    }

    fn section(&self) -> Section {
        Section::Metrics
    }

    fn required_fields(&self) -> &'static [BookingField] {
        &[]
    }

    fn compute(&self, table: &BookingTable, _: &DashboardConfig) -> Result<Option<ViewOutput>> {
        Ok(Some(ViewOutput::Count(total_bookings(table))))
    }
}

pub struct TotalRevenue;

impl AnalyticsView for TotalRevenue {
    fn name(&self) -> &'static str {
        "total_revenue"
    }

    fn title(&self) -> &'static str {
        "Total Revenue"
    }

    fn section(&self) -> Section {
        Section::Metrics
    }

    fn required_fields(&self) -> &'static [BookingField] {
        &[BookingField::NetAmount]
    }

    fn compute(
        &self,
        table: &BookingTable,
        config: &DashboardConfig,
    ) -> Result<Option<ViewOutput>> {
        Ok(total_revenue(table)?.map(|amount| {
            ViewOutput::Currency(CurrencyAmount::new(amount, &config.currency_symbol))
        }))
    }
}

pub struct ConfirmedCount;

impl AnalyticsView for ConfirmedCount {
    fn name(&self) -> &'static str {
        "confirmed_bookings"
    }

    fn title(&self) -> &'static str {
        "Confirmed Bookings"
    }

    fn section(&self) -> Section {
        Section::Metrics
    }

    fn required_fields(&self) -> &'static [BookingField] {
        &[BookingField::Status]
    }

    fn compute(&self, table: &BookingTable, _: &DashboardConfig) -> Result<Option<ViewOutput>> {
        Ok(confirmed_count(table)?.map(ViewOutput::Count))
    }
}

pub struct CancellationCount;

impl AnalyticsView for CancellationCount {
    fn name(&self) -> &'static str {
        "cancellations"
    }

    fn title(&self) -> &'static str {
        "Cancellations"
    }

    fn section(&self) -> Section {
        Section::Metrics
    }

    fn required_fields(&self) -> &'static [BookingField] {
        &[BookingField::Status]
    }

    fn compute(&self, table: &BookingTable, _: &DashboardConfig) -> Result<Option<ViewOutput>> {
        Ok(cancellation_count(table)?.map(ViewOutput::Count))
    }
}

pub struct TopChannels;

impl AnalyticsView for TopChannels {
    fn name(&self) -> &'static str {
        "top_channels"
    }

    fn title(&self) -> &'static str {
        "Top Booking Channels"
    }

    fn section(&self) -> Section {
        Section::VisualAnalysis
    }

    fn required_fields(&self) -> &'static [BookingField] {
        &[BookingField::BookedBy]
    }

    fn compute(
        &self,
        table: &BookingTable,
        config: &DashboardConfig,
    ) -> Result<Option<ViewOutput>> {
        Ok(top_channels(table, config.top_n)?.map(ViewOutput::Counts))
    }
}

pub struct WeeklyDemand;

impl AnalyticsView for WeeklyDemand {
    fn name(&self) -> &'static str {
        "weekly_demand"
    }

    fn title(&self) -> &'static str {
        "Demand by Day of Week"
    }

    fn section(&self) -> Section {
        Section::VisualAnalysis
    }

    fn required_fields(&self) -> &'static [BookingField] {
        &[BookingField::JourneyDate]
    }

    fn compute(&self, table: &BookingTable, _: &DashboardConfig) -> Result<Option<ViewOutput>> {
        Ok(weekly_demand(table)?.map(ViewOutput::Weekly))
    }
}

pub struct TopRoutes;

impl AnalyticsView for TopRoutes {
    fn name(&self) -> &'static str {
        "top_routes"
    }

    fn title(&self) -> &'static str {
        "Top 10 Routes by Revenue"
    }

    fn section(&self) -> Section {
        Section::RouteAnalysis
    }

    fn required_fields(&self) -> &'static [BookingField] {
        &[BookingField::Route, BookingField::NetAmount]
    }

    fn compute(
        &self,
        table: &BookingTable,
        config: &DashboardConfig,
    ) -> Result<Option<ViewOutput>> {
        Ok(top_routes_by_revenue(table, config.top_n)?.map(ViewOutput::Amounts))
    }
}

pub struct CategoryRevenue;

impl AnalyticsView for CategoryRevenue {
    fn name(&self) -> &'static str {
        "revenue_by_category"
    }

    fn title(&self) -> &'static str {
        "Revenue by Category (OTA vs Online Agent)"
    }

    fn section(&self) -> Section {
        Section::Financials
    }

    fn required_fields(&self) -> &'static [BookingField] {
        &[BookingField::Category, BookingField::NetAmount]
    }

    fn compute(&self, table: &BookingTable, _: &DashboardConfig) -> Result<Option<ViewOutput>> {
        Ok(revenue_by_category(table)?.map(ViewOutput::Shares))
    }
}

pub struct DriverPerformance;

impl AnalyticsView for DriverPerformance {
    fn name(&self) -> &'static str {
        "driver_performance"
    }

    fn title(&self) -> &'static str {
        "Top Performing Drivers (by Revenue)"
    }

    fn section(&self) -> Section {
        Section::OperationalEfficiency
    }

    fn required_fields(&self) -> &'static [BookingField] {
        &[BookingField::Drivers, BookingField::NetAmount]
    }

    fn compute(
        &self,
        table: &BookingTable,
        config: &DashboardConfig,
    ) -> Result<Option<ViewOutput>> {
        Ok(driver_performance(table, config.top_n)?.map(ViewOutput::Amounts))
    }
}

pub struct BookingLeadTime;

impl AnalyticsView for BookingLeadTime {
    fn name(&self) -> &'static str {
        "lead_time"
    }

    fn title(&self) -> &'static str {
        "Booking Lead Time (days)"
    }

    fn section(&self) -> Section {
        Section::OperationalEfficiency
    }

    fn required_fields(&self) -> &'static [BookingField] {
        &[BookingField::AdvanceDays]
    }

    fn compute(&self, table: &BookingTable, _: &DashboardConfig) -> Result<Option<ViewOutput>> {
        Ok(lead_time_summary(table)?.map(ViewOutput::LeadTime))
    }
}
