// src/errors.rs

use thiserror::Error;

pub type ParleyResult<T> = Result<T, ParleyError>;

/// Everything that can go wrong while talking to the chat backend or
/// setting up the process around it.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// The chat endpoint answered with a non-success status. All non-2xx
    /// codes land here uniformly.
    #[error("server returned status {status}")]
    Server { status: u16 },

    /// The request never completed.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be read as the expected JSON shape.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ParleyError {
    pub fn server_error(status: u16) -> Self {
        ParleyError::Server { status }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        ParleyError::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        ParleyError::Config {
            message: message.into(),
        }
    }
}
