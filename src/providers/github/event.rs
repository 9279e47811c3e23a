use serde::Serialize;
use std::fmt;

use crate::error::Result;

use super::types::{PullRequestEvent, WorkflowRunEvent};

/// Event kinds the monitor distinguishes, from `GITHUB_EVENT_NAME`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    WorkflowRun,
    PullRequest,
    Other,
}

impl EventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "workflow_run" => Self::WorkflowRun,
            "pull_request" => Self::PullRequest,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorkflowRun => f.write_str("workflow_run"),
            Self::PullRequest => f.write_str("pull_request"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// A decoded webhook payload.
#[derive(Debug, Clone)]
pub enum Event {
    WorkflowRun(WorkflowRunEvent),
    PullRequest(PullRequestEvent),
    /// An event kind the monitor does not handle; the payload is not decoded.
    Other(String),
}

impl Event {
    /// Decodes `payload` according to the event `name`.
    pub fn parse(name: &str, payload: &str) -> Result<Self> {
        let event = match EventKind::from_name(name) {
            EventKind::WorkflowRun => Self::WorkflowRun(serde_json::from_str(payload)?),
            EventKind::PullRequest => Self::PullRequest(serde_json::from_str(payload)?),
            EventKind::Other => Self::Other(name.to_string()),
        };
        Ok(event)
    }

    pub fn action(&self) -> &str {
        match self {
            Self::WorkflowRun(event) => &event.action,
            Self::PullRequest(event) => &event.action,
            Self::Other(_) => "",
        }
    }

    /// `owner/name` of the repository named in the payload, if any.
    pub fn repository(&self) -> Option<&str> {
        let repository = match self {
            Self::WorkflowRun(event) => event.repository.as_ref(),
            Self::PullRequest(event) => event.repository.as_ref(),
            Self::Other(_) => None,
        }?;

        Some(repository.full_name.as_str()).filter(|name| !name.is_empty())
    }
}
