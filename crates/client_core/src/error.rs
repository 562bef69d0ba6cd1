//! Failure taxonomy for backend calls and its translation to user-facing text.

use thiserror::Error;

pub const CONNECTIVITY_MESSAGE: &str = "Query failed. Is the backend running?";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from server";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No HTTP response was received (refused connection, DNS failure, timeout).
    #[error("transport failure: {0}")]
    Transport(String),
    /// Non-2xx status. `detail` is the server's own message, when it sent one.
    #[error("server returned status {status}")]
    Server { status: u16, detail: Option<String> },
    /// 2xx status whose body did not decode into the expected payload.
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl QueryError {
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Shape(err.to_string());
        }
        match err.status() {
            Some(status) => Self::Server {
                status: status.as_u16(),
                detail: None,
            },
            None => Self::Transport(err.to_string()),
        }
    }

    /// The single place where a failure becomes the message shown in the session.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            Self::Server { status, .. } => format!("Request failed: {status}"),
            Self::Transport(_) => CONNECTIVITY_MESSAGE.to_string(),
            Self::Shape(_) => UNEXPECTED_RESPONSE_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
