mod bots;
mod client;
mod comment;
pub(crate) mod event;
pub(crate) mod monitor;
mod snippet;
mod types;

pub use client::{GitHubClient, DEFAULT_API_URL};
pub use comment::DEFAULT_MENTION;
pub use event::Event;
pub use monitor::{CommentOptions, CopilotMonitor, MonitorReport, PrOutcome};
pub use snippet::DEFAULT_SNIPPET_LINES;
