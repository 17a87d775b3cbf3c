use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCode {
    Transport,
    HttpStatus,
    Decode,
    InvalidRequest,
}

/// Diagnostic kept alongside a failed round-trip. The user only ever sees the
/// fixed fallback text; this is for logs and later inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct FailureDetail {
    pub code: FailureCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

impl FailureDetail {
    pub fn new(code: FailureCode, message: impl Into<String>) -> Self {
        Self {
            code,
            status: None,
            message: message.into(),
        }
    }

    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: FailureCode::HttpStatus,
            status: Some(status),
            message: message.into(),
        }
    }
}
