use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::providers::github::PrOutcome;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

/// Green when a comment was posted, yellow when the PR had to be skipped
/// because of an API error, grey otherwise.
pub fn color_coded_outcome_cell(outcome: &PrOutcome) -> Cell {
    let cell = Cell::new(describe_outcome(outcome));
    match outcome {
        PrOutcome::FailureReported { .. } | PrOutcome::SuccessReported => {
            cell.fg(TableColor::Green)
        }
        PrOutcome::LookupFailed { .. } => cell.fg(TableColor::Yellow),
        _ => cell.fg(TableColor::DarkGrey),
    }
}

pub fn describe_outcome(outcome: &PrOutcome) -> String {
    match outcome {
        PrOutcome::NotBotAuthored { author } => format!("Skipped: authored by {author}"),
        PrOutcome::BotAuthored { author } => format!("Copilot PR by {author}"),
        PrOutcome::LookupFailed { reason } => format!("Skipped: {reason}"),
        PrOutcome::NoFailedJobs => "No failed jobs found".to_string(),
        PrOutcome::UnhandledConclusion { conclusion } => {
            format!("Nothing to report (conclusion: {conclusion})")
        }
        PrOutcome::FailureReported {
            failed_jobs,
            snippets,
        } => format!("Failure comment posted ({failed_jobs} failed jobs, {snippets} log excerpts)"),
        PrOutcome::SuccessReported => "Success comment posted".to_string(),
    }
}
