use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{LooperError, Result};

use super::types::{Comment, Job, JobsResponse, PullRequest};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// GitHub REST client scoped to a single repository.
///
/// Every call is attempted exactly once; a non-success status is returned as
/// [`LooperError::Api`] with the response body attached.
pub struct GitHubClient {
    client: Client,
    api_url: Url,
    repository: String,
    token: Token,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitHub API base URL (e.g., "https://api.github.com")
    /// * `repository` - Repository path in format "owner/repo"
    /// * `token` - Token sent as a bearer credential
    pub fn new(base_url: &str, repository: &str, token: Token) -> Result<Self> {
        validate_repository(repository)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            HeaderName::from_static("x-github-api-version"),
            HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .user_agent(concat!("copilot-looper/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| LooperError::Config(format!("Failed to create HTTP client: {e}")))?;

        // Without the trailing slash `Url::join` would drop the last path
        // segment of GitHub Enterprise URLs such as `.../api/v3`.
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let api_url = Url::parse(&base)
            .map_err(|e| LooperError::Config(format!("Invalid base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            repository: repository.to_string(),
            token,
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Fetch a pull request by number.
    pub async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        let url = self.repo_url(&format!("pulls/{number}"))?;
        let response = self.send(self.client.get(url)).await?;
        decode(response).await
    }

    /// Fetch the jobs of a workflow run.
    pub async fn list_jobs(&self, run_id: u64) -> Result<Vec<Job>> {
        let url = self.repo_url(&format!("actions/runs/{run_id}/jobs"))?;
        let response = self.send(self.client.get(url)).await?;
        let jobs: JobsResponse = decode(response).await?;
        debug!("Workflow run {run_id} has {} jobs", jobs.total_count);
        Ok(jobs.jobs)
    }

    /// Fetch the raw log text of a job.
    pub async fn get_job_logs(&self, job_id: u64) -> Result<String> {
        let url = self.repo_url(&format!("actions/jobs/{job_id}/logs"))?;
        let response = self.send(self.client.get(url)).await?;
        Ok(response.text().await?)
    }

    /// Post a comment on a pull request. Only `201 Created` counts as success.
    pub async fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        let url = self.repo_url(&format!("issues/{number}/comments"))?;
        let request = self.client.post(url).json(&Comment { body });
        let response = self.auth_request(request).send().await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(api_error(response).await);
        }

        Ok(())
    }

    /// Helper to build authenticated requests
    fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.token.as_str())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.auth_request(request).send().await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(response)
    }

    fn repo_url(&self, path: &str) -> Result<Url> {
        let url = self
            .api_url
            .join(&format!("repos/{}/{path}", self.repository))
            .map_err(|e| LooperError::Config(format!("Invalid repository URL: {e}")))?;
        debug!("GitHub API request: {url}");
        Ok(url)
    }
}

/// Checks that `repository` has the `owner/name` shape used in REST paths.
pub fn validate_repository(repository: &str) -> Result<()> {
    let parts: Vec<&str> = repository.split('/').collect();
    if parts.len() != 2 || parts.iter().any(|part| part.trim().is_empty()) {
        return Err(LooperError::Config(format!(
            "Repository must be in format 'owner/repo', got '{repository}'"
        )));
    }
    Ok(())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn api_error(response: Response) -> LooperError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    LooperError::Api { status, message }
}
