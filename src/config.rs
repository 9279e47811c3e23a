use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::providers::github::{DEFAULT_API_URL, DEFAULT_MENTION, DEFAULT_SNIPPET_LINES};

/// Configuration file structure for copilot-looper.
///
/// Everything here can also be given on the command line or through the
/// GitHub Actions environment, which take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub comments: CommentsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubConfig {
    /// GitHub token, used when `GITHUB_TOKEN` is not set
    pub token: Option<String>,

    /// GitHub API base URL
    #[serde(default = "default_github_base_url")]
    pub base_url: String,

    /// Repository path (e.g., 'owner/repo')
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommentsConfig {
    /// Maximum number of log lines quoted per failed job
    #[serde(default = "default_snippet_lines")]
    pub snippet_lines: usize,

    /// Account mentioned when asking for a fix
    #[serde(default = "default_mention")]
    pub mention: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_github_base_url(),
            repository: None,
        }
    }
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            snippet_lines: default_snippet_lines(),
            mention: default_mention(),
        }
    }
}

fn default_github_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_snippet_lines() -> usize {
    DEFAULT_SNIPPET_LINES
}

fn default_mention() -> String {
    DEFAULT_MENTION.to_string()
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./copilot-looper.toml
    /// 3. ./copilot-looper.json
    /// 4. ./copilot-looper.yaml
    /// 5. ./copilot-looper.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.exists() {
                log::warn!("Config file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            return Self::load_from_path(path);
        }

        let candidates = [
            "copilot-looper.toml",
            "copilot-looper.json",
            "copilot-looper.yaml",
            "copilot-looper.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))
            }
        }
    }
}
