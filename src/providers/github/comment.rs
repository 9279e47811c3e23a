use std::fmt::Write;

use super::types::{Job, WorkflowRun};

/// Account mentioned in failure comments to ask for a fix.
pub const DEFAULT_MENTION: &str = "copilot";

/// Renders one job's log excerpt as a titled, fenced block.
pub fn render_job_snippet(job_name: &str, snippet: &str) -> String {
    format!("**Job: {job_name}**\n```\n{snippet}\n```")
}

/// Builds the comment posted when a workflow run fails.
///
/// `run_url` is the link to the run; `snippets` are blocks produced by
/// [`render_job_snippet`]. The "Error Logs" section is omitted when no
/// snippet could be collected.
pub fn build_failure_comment(
    run: &WorkflowRun,
    run_url: &str,
    failed_jobs: &[Job],
    snippets: &[String],
    mention: &str,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "❌ **Workflow '{}' failed**\n", run.name);
    let _ = writeln!(output, "[View workflow run]({run_url})\n");

    output.push_str("**Failed Jobs:**\n");
    for job in failed_jobs {
        let _ = writeln!(output, "- {}", job.name);
    }
    output.push('\n');

    if !snippets.is_empty() {
        output.push_str("**Error Logs:**\n\n");
        for snippet in snippets {
            output.push_str(snippet);
            output.push_str("\n\n");
        }
    }

    output.push_str("---\n");
    let _ = writeln!(
        output,
        "@{mention} Please review the failure above and fix the issues to make the workflow pass."
    );

    output
}

/// Builds the one-line comment posted when a workflow run succeeds.
pub fn build_success_comment(run: &WorkflowRun, run_url: &str) -> String {
    format!(
        "✅ **Workflow '{}' completed successfully!**\n\n[View workflow run]({run_url})",
        run.name
    )
}
