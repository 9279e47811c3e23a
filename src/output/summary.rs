use std::fmt::Write;

use comfy_table::Cell;

use crate::providers::github::MonitorReport;

use super::styling::{bright, bright_green, bright_yellow, cyan, dim};
use super::tables::{color_coded_outcome_cell, create_cyan_header, create_table};

/// Prints a human-readable summary of what the run did to stdout.
pub fn print_summary(report: &MonitorReport) {
    println!("{}", render_summary(report));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn render_summary(report: &MonitorReport) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📊", "Run Summary");

    let posted = report.comments_posted();
    let posted_display = if posted > 0 {
        bright_green(posted)
    } else {
        bright_yellow(posted)
    };

    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n",
        dim("Event:"),
        cyan(report.event),
        dim("Pull requests examined:"),
        bright_yellow(report.pull_requests.len()),
        dim("Comments posted:"),
        posted_display,
    );

    if let Some(reason) = &report.skipped {
        let _ = writeln!(output, "{} {}", bright_yellow("Nothing to do:"), reason);
        return output;
    }

    let mut table = create_table();
    table.set_header(create_cyan_header(&["Pull Request", "Outcome"]));
    for pr in &report.pull_requests {
        table.add_row(vec![
            Cell::new(format!("#{}", pr.number)),
            color_coded_outcome_cell(&pr.outcome),
        ]);
    }
    let _ = writeln!(output, "{table}");

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::github::event::EventKind;
    use crate::providers::github::monitor::PrReport;
    use crate::providers::github::PrOutcome;

    #[test]
    fn test_render_summary_skipped_event() {
        let report = MonitorReport::ignored("push");

        let output = render_summary(&report);

        assert!(output.contains("Run Summary"));
        assert!(output.contains("Nothing to do:"));
        assert!(output.contains("unhandled event type 'push'"));
    }

    #[test]
    fn test_render_summary_with_pull_requests() {
        let report = MonitorReport {
            event: EventKind::WorkflowRun,
            skipped: None,
            pull_requests: vec![
                PrReport {
                    number: 7,
                    outcome: PrOutcome::SuccessReported,
                },
                PrReport {
                    number: 8,
                    outcome: PrOutcome::NotBotAuthored {
                        author: "octocat".to_string(),
                    },
                },
            ],
        };

        let output = render_summary(&report);

        assert!(output.contains("workflow_run"));
        assert!(output.contains("Pull Request"));
        assert!(output.contains("#7"));
        assert!(output.contains("Success comment posted"));
        assert!(output.contains("Skipped: authored by octocat"));
        assert!(!output.contains("Nothing to do:"));
    }
}
