use thiserror::Error;

#[derive(Error, Debug)]
pub enum LooperError {
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to post comment on pull request #{number}")]
    Comment {
        number: u64,
        #[source]
        source: Box<LooperError>,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LooperError>;
