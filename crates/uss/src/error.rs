use thiserror::Error;

#[derive(Debug, Error)]
pub enum UssError {
    #[error("invalid USS base URL {url:?}")]
    InvalidBaseUrl { url: String },

    /// No HTTP response was received.
    #[error("USS request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The USS answered with a status other than the one the endpoint promises.
    #[error("Expected status {expected}, but got {status}")]
    UnexpectedStatus {
        expected: u16,
        status: u16,
        /// Response body, when it was JSON.
        payload: Option<serde_json::Value>,
    },

    #[error("Unexpected response format from server: {0}")]
    Decode(#[source] serde_json::Error),
}

impl UssError {
    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            UssError::UnexpectedStatus { status, .. } => Some(*status),
            UssError::Transport(e) => e.status().map(|s| s.as_u16()),
            UssError::InvalidBaseUrl { .. } | UssError::Decode(_) => None,
        }
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            UssError::UnexpectedStatus { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    /// `detail.message` of the error body, if the server sent one.
    pub fn detail_message(&self) -> Option<&str> {
        self.payload()?
            .pointer("/detail/message")
            .and_then(|m| m.as_str())
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}
