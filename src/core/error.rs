use std::io;
use std::time::Duration;
use thiserror::Error;

/// Unified error type for the HeartTalk client
#[derive(Error, Debug)]
pub enum HeartTalkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key was supplied by the config file or the environment
    #[error("API key not found. Set `api_key` in {0} or export COHERE_API_KEY")]
    MissingApiKey(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// Network-related errors (DNS, connect, broken body)
    #[error("Network error: {0}")]
    Transport(String),

    /// The remote call did not finish in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// The body was not JSON or carried no usable `text` field
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A send finished without an assistant reply
    #[error("No reply received: {0}")]
    NoReply(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HeartTalkError {
    /// Failures that come from talking to the remote endpoint. The chat
    /// coordinator folds all of these into "no assistant turn".
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            HeartTalkError::Transport(_)
                | HeartTalkError::Timeout(_)
                | HeartTalkError::Api { .. }
                | HeartTalkError::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for HeartTalkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HeartTalkError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            HeartTalkError::Transport(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            HeartTalkError::MalformedResponse(format!("Failed to decode body: {}", err))
        } else if let Some(status) = err.status() {
            HeartTalkError::Api {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            HeartTalkError::Transport(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for HeartTalkError {
    fn from(err: serde_json::Error) -> Self {
        HeartTalkError::MalformedResponse(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for HeartTalkError {
    fn from(err: serde_yml::Error) -> Self {
        HeartTalkError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<rustyline::error::ReadlineError> for HeartTalkError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        HeartTalkError::Input(format!("Line editor error: {}", err))
    }
}
