use serde::{Deserialize, Serialize};

/// Payload of a `workflow_run` webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRunEvent {
    #[serde(default)]
    pub action: String,
    pub workflow_run: WorkflowRun,
    #[serde(default)]
    pub repository: Option<Repository>,
}

/// Payload of a `pull_request` webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    #[serde(default)]
    pub action: String,
    pub pull_request: PullRequest,
    #[serde(default)]
    pub repository: Option<Repository>,
}

/// GitHub Actions workflow run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowRun {
    /// Unique identifier for the workflow run
    pub id: u64,
    /// Name of the workflow
    #[serde(default)]
    pub name: String,
    /// Status of the run (queued, in_progress, completed)
    #[serde(default)]
    pub status: String,
    /// Conclusion of the run, `null` until the run completes
    #[serde(default)]
    pub conclusion: Option<String>,
    /// Web URL of the run
    #[serde(default)]
    pub html_url: String,
    /// Pull requests whose head matches this run
    #[serde(default)]
    pub pull_requests: Vec<PullRequest>,
}

impl WorkflowRun {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn conclusion(&self) -> &str {
        self.conclusion.as_deref().unwrap_or("")
    }
}

/// A pull request.
///
/// The summaries embedded in a workflow run only carry the number and the
/// head/base refs, so everything else defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub head: Head,
    #[serde(default)]
    pub base: Base,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub login: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Head {
    #[serde(rename = "ref", default)]
    pub ref_: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Base {
    #[serde(rename = "ref", default)]
    pub ref_: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub full_name: String,
}

/// Job within a GitHub Actions workflow run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Job {
    /// Unique identifier for the job
    pub id: u64,
    /// Name of the job
    pub name: String,
    /// Status of the job
    #[serde(default)]
    pub status: String,
    /// Conclusion of the job
    #[serde(default)]
    pub conclusion: Option<String>,
}

impl Job {
    pub fn is_failed(&self) -> bool {
        self.conclusion.as_deref() == Some("failure")
    }
}

/// Response from GitHub API for workflow jobs.
#[derive(Debug, Deserialize)]
pub struct JobsResponse {
    #[serde(default)]
    pub total_count: u64,
    pub jobs: Vec<Job>,
}

/// Body of a new issue comment.
#[derive(Debug, Serialize)]
pub struct Comment<'a> {
    pub body: &'a str,
}

/// Links for GitHub resources.
pub mod links {
    /// Generate URL for a workflow run.
    pub fn workflow_run_url(repository: &str, run_id: u64) -> String {
        format!("https://github.com/{repository}/actions/runs/{run_id}")
    }
}
