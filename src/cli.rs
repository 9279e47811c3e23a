use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::Config;
use crate::output;
use crate::providers::github::{CommentOptions, CopilotMonitor, Event, GitHubClient, MonitorReport};

#[derive(Parser)]
#[command(name = "copilot-looper")]
#[command(
    author,
    version,
    about = "Reports GitHub Actions results back to Copilot pull requests",
    long_about = None
)]
pub struct Cli {
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "")]
    event_name: String,

    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Repository in 'owner/repo' form; defaults to the one in the event payload
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    #[arg(long, env = "GITHUB_RUN_ID")]
    run_id: Option<String>,

    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Maximum number of log lines quoted per failed job
    #[arg(long)]
    snippet_lines: Option<usize>,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the run report as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    pretty: bool,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        let token = non_empty(self.token.as_ref())
            .or_else(|| non_empty(config.github.token.as_ref()))
            .map(Token::from)
            .context("GITHUB_TOKEN environment variable is required")?;

        info!("Event type: {}", self.event_name);
        if let Some(run_id) = &self.run_id {
            info!("Run ID: {run_id}");
        }

        let event_path = self
            .event_path
            .as_ref()
            .context("GITHUB_EVENT_PATH environment variable is required")?;

        info!("Reading event data from: {}", event_path.display());
        let payload = std::fs::read_to_string(event_path)
            .with_context(|| format!("Failed to read event file: {}", event_path.display()))?;
        info!("Successfully read {} bytes of event data", payload.len());

        let event = Event::parse(&self.event_name, &payload)
            .with_context(|| format!("Failed to parse {} event", self.event_name))?;

        let report = match &event {
            Event::Other(name) => MonitorReport::ignored(name),
            Event::PullRequest(pr_event) => {
                info!("Event action: {}", event.action());
                CopilotMonitor::handle_pull_request(pr_event)
            }
            Event::WorkflowRun(_) => {
                info!("Event action: {}", event.action());
                let monitor = self.build_monitor(&config, &event, token)?;
                monitor
                    .handle(&event)
                    .await
                    .with_context(|| format!("Failed to handle {} event", self.event_name))?
            }
        };

        output::print_summary(&report);
        self.write_report(&report)?;

        info!("Monitor completed successfully");
        Ok(())
    }

    fn build_monitor(&self, config: &Config, event: &Event, token: Token) -> Result<CopilotMonitor> {
        let repository = non_empty(self.repository.as_ref())
            .or_else(|| non_empty(config.github.repository.as_ref()))
            .or_else(|| event.repository().map(str::to_string))
            .context("GITHUB_REPOSITORY environment variable is required")?;
        info!("Repository: {repository}");

        let api_url = non_empty(self.api_url.as_ref()).unwrap_or_else(|| config.github.base_url.clone());

        let client = GitHubClient::new(&api_url, &repository, token)?;
        let options = CommentOptions {
            snippet_lines: self.snippet_lines.unwrap_or(config.comments.snippet_lines),
            mention: config.comments.mention.clone(),
        };

        Ok(CopilotMonitor::new(client, options))
    }

    fn write_report(&self, report: &MonitorReport) -> Result<()> {
        let Some(output_path) = &self.output else {
            return Ok(());
        };

        let json_output = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };

        std::fs::write(output_path, json_output)
            .with_context(|| format!("Failed to write report: {}", output_path.display()))?;
        info!("Report written to: {}", output_path.display());

        Ok(())
    }
}

/// GitHub Actions exports unset inputs as empty strings.
fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn event_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    fn create_cli(event_name: &str, event_path: Option<PathBuf>) -> Cli {
        Cli {
            token: Some("test-token".to_string()),
            event_name: event_name.to_string(),
            event_path,
            repository: None,
            run_id: Some("1".to_string()),
            api_url: None,
            snippet_lines: None,
            config: Some(PathBuf::from("nonexistent-copilot-looper.toml")),
            output: None,
            pretty: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "copilot-looper",
            "--token",
            "abc",
            "--event-name",
            "workflow_run",
            "--event-path",
            "/tmp/event.json",
            "--repository",
            "owner/repo",
            "--snippet-lines",
            "5",
            "-o",
            "report.json",
            "-p",
        ])
        .unwrap();

        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert_eq!(cli.event_name, "workflow_run");
        assert_eq!(cli.repository.as_deref(), Some("owner/repo"));
        assert_eq!(cli.snippet_lines, Some(5));
        assert!(cli.pretty);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some(&"x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(Some(&"  ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[tokio::test]
    async fn test_missing_token_is_fatal() {
        let file = event_file("{}");
        let mut cli = create_cli("push", Some(file.path().to_path_buf()));
        cli.token = Some(String::new());

        let err = cli.execute().await.unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[tokio::test]
    async fn test_missing_event_path_is_fatal() {
        let cli = create_cli("workflow_run", None);

        let err = cli.execute().await.unwrap_err();
        assert!(err.to_string().contains("GITHUB_EVENT_PATH"));
    }

    #[tokio::test]
    async fn test_unreadable_event_file_is_fatal() {
        let cli = create_cli("workflow_run", Some(PathBuf::from("/nonexistent/event.json")));

        let err = cli.execute().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read event file"));
    }

    #[tokio::test]
    async fn test_malformed_event_is_fatal() {
        let file = event_file("{\"workflow_run\": ");
        let cli = create_cli("workflow_run", Some(file.path().to_path_buf()));

        let err = cli.execute().await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse workflow_run event"));
    }

    #[tokio::test]
    async fn test_unknown_event_writes_report() {
        let file = event_file("not even json");
        let report_file = NamedTempFile::new().unwrap();
        let mut cli = create_cli("push", Some(file.path().to_path_buf()));
        cli.output = Some(report_file.path().to_path_buf());

        cli.execute().await.unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(report_file.path()).unwrap()).unwrap();
        assert_eq!(report["event"], "other");
        assert!(report["skipped"].as_str().unwrap().contains("push"));
    }

    #[tokio::test]
    async fn test_repository_falls_back_to_payload() {
        let mut server = Server::new_async().await;
        let lookup = server
            .mock("GET", "/repos/payload-owner/payload-repo/pulls/3")
            .with_status(200)
            .with_body(r#"{"number": 3, "user": {"login": "someone", "type": "User"}}"#)
            .expect(1)
            .create_async()
            .await;
        let comments = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let file = event_file(
            r#"{
                "action": "completed",
                "workflow_run": {
                    "id": 10, "name": "CI", "status": "completed", "conclusion": "success",
                    "pull_requests": [{"number": 3}]
                },
                "repository": {"full_name": "payload-owner/payload-repo"}
            }"#,
        );
        let mut cli = create_cli("workflow_run", Some(file.path().to_path_buf()));
        cli.api_url = Some(server.url());

        cli.execute().await.unwrap();

        lookup.assert_async().await;
        comments.assert_async().await;
    }

    #[tokio::test]
    async fn test_comment_failure_is_fatal() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/owner/repo/pulls/3")
            .with_status(200)
            .with_body(r#"{"number": 3, "user": {"login": "copilot", "type": "Bot"}}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/repos/owner/repo/issues/3/comments")
            .with_status(500)
            .with_body("server error")
            .create_async()
            .await;

        let file = event_file(
            r#"{
                "workflow_run": {
                    "id": 10, "name": "CI", "status": "completed", "conclusion": "success",
                    "pull_requests": [{"number": 3}]
                }
            }"#,
        );
        let mut cli = create_cli("workflow_run", Some(file.path().to_path_buf()));
        cli.api_url = Some(server.url());
        cli.repository = Some("owner/repo".to_string());

        let err = cli.execute().await.unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("Failed to handle workflow_run event"));
        assert!(chain.contains("pull request #3"));
        assert!(chain.contains("500"));
    }

    #[tokio::test]
    async fn test_invalid_repository_is_fatal() {
        let file = event_file(
            r#"{
                "workflow_run": {
                    "id": 1, "name": "CI", "status": "completed", "conclusion": "success",
                    "pull_requests": [{"number": 1}]
                }
            }"#,
        );
        let mut cli = create_cli("workflow_run", Some(file.path().to_path_buf()));
        cli.repository = Some("not-a-repo".to_string());

        let err = cli.execute().await.unwrap_err();
        assert!(format!("{err:#}").contains("owner/repo"));
    }

    #[tokio::test]
    async fn test_missing_repository_is_fatal_for_workflow_run() {
        let file = event_file(
            r#"{"workflow_run": {"id": 1, "name": "CI", "status": "completed", "conclusion": "success"}}"#,
        );
        let cli = create_cli("workflow_run", Some(file.path().to_path_buf()));

        let err = cli.execute().await.unwrap_err();
        assert!(err.to_string().contains("GITHUB_REPOSITORY"));
    }

    #[tokio::test]
    async fn test_pull_request_event_needs_no_repository() {
        let file = event_file(
            r#"{"action": "opened", "pull_request": {"number": 1, "user": {"login": "regularuser", "type": "User"}}}"#,
        );
        let report_file = NamedTempFile::new().unwrap();
        let mut cli = create_cli("pull_request", Some(file.path().to_path_buf()));
        cli.output = Some(report_file.path().to_path_buf());

        cli.execute().await.unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(report_file.path()).unwrap()).unwrap();
        assert_eq!(report["event"], "pull_request");
        assert_eq!(report["pull_requests"][0]["outcome"], "not_bot_authored");
    }

    #[tokio::test]
    async fn test_pull_request_event_ignores_malformed_repository() {
        let file = event_file(
            r#"{
                "pull_request": {"number": 2, "user": {"login": "copilot", "type": "Bot"}},
                "repository": {"full_name": "also-not-a-repo"}
            }"#,
        );
        let mut cli = create_cli("pull_request", Some(file.path().to_path_buf()));
        cli.repository = Some("not-a-repo".to_string());
        cli.api_url = Some("http://127.0.0.1:9".to_string());

        cli.execute().await.unwrap();
    }
}
