use shared::error::{FailureCode, FailureDetail};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid backend url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request could not be built: {0}")]
    InvalidRequest(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },
    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn failure_detail(&self) -> FailureDetail {
        match self {
            GatewayError::InvalidBaseUrl { .. } | GatewayError::InvalidRequest(_) => {
                FailureDetail::new(FailureCode::InvalidRequest, self.to_string())
            }
            GatewayError::Transport(_) => FailureDetail::new(FailureCode::Transport, self.to_string()),
            GatewayError::Status { status, .. } => {
                FailureDetail::http_status(*status, self.to_string())
            }
            GatewayError::Decode(_) => FailureDetail::new(FailureCode::Decode, self.to_string()),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            GatewayError::Status {
                status: status.as_u16(),
                body: String::new(),
            }
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else if err.is_builder() {
            GatewayError::InvalidRequest(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

/// Rejections raised by the controller before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("another request is still in flight")]
    Busy,
    #[error("questions can only be asked after a successful upload")]
    NotChatting,
    #[error("documents can only be chosen or uploaded before chatting; reset first")]
    NotUploading,
    #[error("filename '{requested}' does not match the selected document '{selected}'")]
    FilenameMismatch { requested: String, selected: String },
}

#[derive(Debug, Error)]
pub enum DocumentFileError {
    #[error("document name must not be empty")]
    EmptyName,
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}
