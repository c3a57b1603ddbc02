use std::fmt;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use tripdash_core::views::{Section, ViewResult};
use tripdash_core::{DashboardReport, IngestedTable, ObservedStatuses, ViewOutput};

const SECTIONS: [Section; 5] = [
    Section::Metrics,
    Section::VisualAnalysis,
    Section::RouteAnalysis,
    Section::Financials,
    Section::OperationalEfficiency,
];

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn number(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

/// The whole report, one block per section with each view as its own table.
/// Sections with no computed view are left out.
pub struct ReportTables<'a>(pub &'a DashboardReport);

impl fmt::Display for ReportTables<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "Rows analysed: {}", report.row_count)?;

        for section in SECTIONS {
            let views: Vec<&ViewResult> = report
                .results
                .iter()
                .filter(|result| result.section == section)
                .collect();
            if views.is_empty() {
                continue;
            }

            writeln!(f, "\n== {} ==", section.title())?;
            for view in views {
                writeln!(f, "\n{}\n{}", view.title, output_table(&view.output))?;
            }
        }

        if !report.skipped.is_empty() {
            let names: Vec<&str> = report.skipped.iter().map(|view| view.name).collect();
            writeln!(f, "\nSkipped (missing columns): {}", names.join(", "))?;
        }
        Ok(())
    }
}

pub fn output_table(output: &ViewOutput) -> Table {
    let mut table = new_table();
    match output {
        ViewOutput::Count(count) => {
            table.add_row(vec![number(count)]);
        }
        ViewOutput::Currency(amount) => {
            table.add_row(vec![number(&amount.formatted)]);
        }
        ViewOutput::Counts(entries) => {
            table.set_header(vec!["", "Bookings"]);
            for entry in entries {
                table.add_row(vec![Cell::new(&entry.label), number(entry.count)]);
            }
        }
        ViewOutput::Amounts(entries) => {
            table.set_header(vec!["", "Revenue"]);
            for entry in entries {
                table.add_row(vec![
                    Cell::new(&entry.label),
                    number(format!("{:.2}", entry.amount)),
                ]);
            }
        }
        ViewOutput::Shares(entries) => {
            table.set_header(vec!["Category", "Revenue", "Share"]);
            for entry in entries {
                table.add_row(vec![
                    Cell::new(&entry.category),
                    number(format!("{:.2}", entry.revenue)),
                    number(format!("{:.1}%", entry.share * 100.0)),
                ]);
            }
        }
        ViewOutput::Weekly(days) => {
            table.set_header(vec!["Day", "Journeys"]);
            for day in days {
                let count = day.count.map_or_else(|| "-".to_string(), |count| count.to_string());
                table.add_row(vec![Cell::new(day.weekday), number(count)]);
            }
        }
        ViewOutput::LeadTime(summary) => {
            let days = |value: Option<i64>| value.map_or_else(|| "-".to_string(), |d| d.to_string());
            table.set_header(vec!["Bookings", "Mean", "Min", "Max"]);
            table.add_row(vec![
                number(summary.bookings),
                number(
                    summary
                        .mean_days
                        .map_or_else(|| "-".to_string(), |mean| format!("{mean:.1}")),
                ),
                number(days(summary.min_days)),
                number(days(summary.max_days)),
            ]);
        }
    }
    table
}

pub fn status_table(observed: &ObservedStatuses) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Status", "Rows"]);
    for (status, rows) in &observed.values {
        table.add_row(vec![Cell::new(status), number(rows)]);
    }
    if observed.missing > 0 {
        table.add_row(vec![Cell::new("(blank)"), number(observed.missing)]);
    }
    table
}

pub fn inspect_table(ingested: &IngestedTable) -> Table {
    let mut table = new_table();
    table.add_row(vec!["Format", ingested.format]);
    table.add_row(vec!["Content hash", ingested.content_hash.as_str()]);
    table.add_row(vec!["Rows".to_string(), ingested.table.height().to_string()]);

    let fields: Vec<String> = ingested
        .table
        .schema()
        .fields()
        .map(|field| field.to_string())
        .collect();
    table.add_row(vec!["Recognized columns".to_string(), fields.join(", ")]);

    for summary in &ingested.date_columns {
        table.add_row(vec![
            summary.field.to_string(),
            format!("{} parsed, {} unreadable", summary.parsed, summary.failed),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripdash_core::{ingest_bytes, run_dashboard, DashboardConfig};

    const BOOKINGS: &[u8] = b"Journey Date,Booked On,Status,Net Amount,Route\n\
2024-03-10,2024-03-01,Booked,1200,DEL-BOM\n\
2024-03-11,2024-03-05,Cancel,800,BLR-GOI\n";

    #[test]
    fn report_groups_views_by_section() {
        let ingested = ingest_bytes(BOOKINGS).unwrap();
        let report = run_dashboard(&ingested.table, &DashboardConfig::default()).unwrap();
        let text = ReportTables(&report).to_string();

        assert!(text.starts_with("Rows analysed: 2"));
        assert!(text.contains("== Metrics =="));
        assert!(text.contains("₹2,000.00"));
        assert!(text.contains("Top 10 Routes by Revenue"));
        assert!(!text.contains("== Financials =="));
        assert!(text.contains("Skipped (missing columns): top_channels"));
    }

    #[test]
    fn blank_statuses_are_listed_last() {
        let ingested = ingest_bytes(b"Status,Route\nBooked,A\n,B\nCancel,C\n").unwrap();
        let observed = tripdash_core::observed_statuses(&ingested.table)
            .unwrap()
            .unwrap();
        let text = status_table(&observed).to_string();

        let cancel = text.find("Cancel").unwrap();
        let blank = text.find("(blank)").unwrap();
        assert!(text.contains("Booked"));
        assert!(cancel < blank);
    }

    #[test]
    fn inspect_lists_date_columns() {
        let ingested = ingest_bytes(BOOKINGS).unwrap();
        let text = inspect_table(&ingested).to_string();

        assert!(text.contains("csv"));
        assert!(text.contains(&ingested.content_hash));
        assert!(text.contains("2 parsed, 0 unreadable"));
    }
}
