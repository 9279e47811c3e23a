use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{LooperError, Result};

use super::bots::is_bot_author;
use super::client::GitHubClient;
use super::comment::{
    build_failure_comment, build_success_comment, render_job_snippet, DEFAULT_MENTION,
};
use super::event::{Event, EventKind};
use super::snippet::{extract_snippet, DEFAULT_SNIPPET_LINES};
use super::types::{links, Job, PullRequestEvent, WorkflowRun, WorkflowRunEvent};

/// Settings that shape the comments posted back to pull requests.
#[derive(Debug, Clone)]
pub struct CommentOptions {
    /// Maximum number of log lines quoted per failed job
    pub snippet_lines: usize,
    /// Account mentioned in the failure trailer, without the `@`
    pub mention: String,
}

impl Default for CommentOptions {
    fn default() -> Self {
        Self {
            snippet_lines: DEFAULT_SNIPPET_LINES,
            mention: DEFAULT_MENTION.to_string(),
        }
    }
}

/// What happened to one pull request while handling an event.
///
/// Every variant is a "continue with the next pull request" result. Failures
/// that must abort the whole run are returned as `Err` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PrOutcome {
    /// The author is not a Copilot account.
    NotBotAuthored { author: String },
    /// A Copilot pull request seen on a `pull_request` event; nothing is posted.
    BotAuthored { author: String },
    /// Pull request details or its jobs could not be fetched.
    LookupFailed { reason: String },
    /// The run failed but none of its jobs concluded with `failure`.
    NoFailedJobs,
    /// The run concluded with something other than success or failure.
    UnhandledConclusion { conclusion: String },
    FailureReported { failed_jobs: usize, snippets: usize },
    SuccessReported,
}

impl PrOutcome {
    pub fn posted_comment(&self) -> bool {
        matches!(self, Self::FailureReported { .. } | Self::SuccessReported)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrReport {
    pub number: u64,
    #[serde(flatten)]
    pub outcome: PrOutcome,
}

/// Summary of a single invocation.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub event: EventKind,
    /// Why the event was not examined further, when it wasn't.
    pub skipped: Option<String>,
    pub pull_requests: Vec<PrReport>,
}

impl MonitorReport {
    pub fn skipped(event: EventKind, reason: impl Into<String>) -> Self {
        Self {
            event,
            skipped: Some(reason.into()),
            pull_requests: Vec::new(),
        }
    }

    /// Report for an event kind the monitor does not handle.
    pub fn ignored(event_name: &str) -> Self {
        info!("Ignoring event type: {event_name}");
        Self::skipped(
            EventKind::Other,
            format!("unhandled event type '{event_name}'"),
        )
    }

    pub fn comments_posted(&self) -> usize {
        self.pull_requests
            .iter()
            .filter(|pr| pr.outcome.posted_comment())
            .count()
    }
}

/// Reacts to workflow results on pull requests opened by Copilot.
pub struct CopilotMonitor {
    client: GitHubClient,
    options: CommentOptions,
}

impl CopilotMonitor {
    pub fn new(client: GitHubClient, options: CommentOptions) -> Self {
        Self { client, options }
    }

    /// Routes a decoded event to its handler.
    pub async fn handle(&self, event: &Event) -> Result<MonitorReport> {
        match event {
            Event::WorkflowRun(event) => self.handle_workflow_run(event).await,
            Event::PullRequest(event) => Ok(Self::handle_pull_request(event)),
            Event::Other(name) => Ok(MonitorReport::ignored(name)),
        }
    }

    /// Handles a `workflow_run` event.
    ///
    /// Each associated pull request is processed in turn. Lookup failures
    /// only skip the pull request they concern; a failure to post a comment
    /// aborts the remaining pull requests.
    pub async fn handle_workflow_run(&self, event: &WorkflowRunEvent) -> Result<MonitorReport> {
        let run = &event.workflow_run;

        if !run.is_completed() {
            info!(
                "Workflow run {} is not completed (status: {}), skipping",
                run.id, run.status
            );
            return Ok(MonitorReport::skipped(
                EventKind::WorkflowRun,
                format!("run status is '{}'", run.status),
            ));
        }

        if run.pull_requests.is_empty() {
            info!("Workflow run {} has no associated pull requests, skipping", run.id);
            return Ok(MonitorReport::skipped(
                EventKind::WorkflowRun,
                "no associated pull requests",
            ));
        }

        let mut pull_requests = Vec::with_capacity(run.pull_requests.len());
        for pr in &run.pull_requests {
            let outcome = self.process_pull_request(run, pr.number).await?;
            pull_requests.push(PrReport {
                number: pr.number,
                outcome,
            });
        }

        Ok(MonitorReport {
            event: EventKind::WorkflowRun,
            skipped: None,
            pull_requests,
        })
    }

    /// Handles a `pull_request` event. Purely informational: it needs no
    /// client, so no API calls are made and nothing is posted.
    pub fn handle_pull_request(event: &PullRequestEvent) -> MonitorReport {
        let pr = &event.pull_request;
        let author = pr.user.login.clone();

        let outcome = if is_bot_author(&author) {
            info!("Detected Copilot PR #{}: {} {}", pr.number, pr.title, pr.html_url);
            PrOutcome::BotAuthored { author }
        } else {
            info!(
                "PR #{} is not from Copilot (user: {}, type: {}), skipping",
                pr.number, pr.user.login, pr.user.kind
            );
            PrOutcome::NotBotAuthored { author }
        };

        MonitorReport {
            event: EventKind::PullRequest,
            skipped: None,
            pull_requests: vec![PrReport {
                number: pr.number,
                outcome,
            }],
        }
    }

    async fn process_pull_request(&self, run: &WorkflowRun, number: u64) -> Result<PrOutcome> {
        let pr = match self.client.get_pull_request(number).await {
            Ok(pr) => pr,
            Err(e) => {
                warn!("Error checking if PR #{number} is from Copilot: {e}");
                return Ok(PrOutcome::LookupFailed {
                    reason: e.to_string(),
                });
            }
        };

        if !is_bot_author(&pr.user.login) {
            info!("PR #{number} is not from Copilot, skipping");
            return Ok(PrOutcome::NotBotAuthored {
                author: pr.user.login,
            });
        }

        info!(
            "Processing Copilot PR #{number} ({} -> {}) for workflow run {}",
            pr.head.ref_, pr.base.ref_, run.id
        );

        match run.conclusion() {
            "failure" => self.report_failure(number, run).await,
            "success" => self.report_success(number, run).await,
            other => {
                info!("Workflow run {} concluded with '{other}', nothing to report", run.id);
                Ok(PrOutcome::UnhandledConclusion {
                    conclusion: other.to_string(),
                })
            }
        }
    }

    async fn report_failure(&self, number: u64, run: &WorkflowRun) -> Result<PrOutcome> {
        info!("Workflow '{}' failed for PR #{number}", run.name);

        let jobs = match self.client.list_jobs(run.id).await {
            Ok(jobs) => jobs,
            Err(e) => {
                warn!("Failed to get jobs for workflow run {}: {e}", run.id);
                return Ok(PrOutcome::LookupFailed {
                    reason: format!("failed to get workflow jobs: {e}"),
                });
            }
        };

        let failed_jobs: Vec<Job> = jobs.into_iter().filter(Job::is_failed).collect();
        if failed_jobs.is_empty() {
            info!("No failed jobs found for workflow run {}", run.id);
            return Ok(PrOutcome::NoFailedJobs);
        }

        let mut snippets = Vec::new();
        for job in &failed_jobs {
            debug!("Fetching logs for job '{}' ({}, status: {})", job.name, job.id, job.status);
            let logs = match self.client.get_job_logs(job.id).await {
                Ok(logs) => logs,
                Err(e) => {
                    warn!("Failed to get logs for job {}: {e}", job.id);
                    continue;
                }
            };

            let snippet = extract_snippet(&logs, self.options.snippet_lines);
            if !snippet.is_empty() {
                snippets.push(render_job_snippet(&job.name, &snippet));
            }
        }

        let body = build_failure_comment(
            run,
            &self.run_url(run),
            &failed_jobs,
            &snippets,
            &self.options.mention,
        );
        self.post_comment(number, &body).await?;

        info!("Posted failure comment to PR #{number}");
        Ok(PrOutcome::FailureReported {
            failed_jobs: failed_jobs.len(),
            snippets: snippets.len(),
        })
    }

    async fn report_success(&self, number: u64, run: &WorkflowRun) -> Result<PrOutcome> {
        info!("Workflow '{}' succeeded for PR #{number}", run.name);

        let body = build_success_comment(run, &self.run_url(run));
        self.post_comment(number, &body).await?;

        info!("Posted success comment to PR #{number}");
        Ok(PrOutcome::SuccessReported)
    }

    async fn post_comment(&self, number: u64, body: &str) -> Result<()> {
        self.client
            .create_comment(number, body)
            .await
            .map_err(|e| LooperError::Comment {
                number,
                source: Box::new(e),
            })
    }

    fn run_url(&self, run: &WorkflowRun) -> String {
        if run.html_url.is_empty() {
            links::workflow_run_url(self.client.repository(), run.id)
        } else {
            run.html_url.clone()
        }
    }
}
