use serde::{Deserialize, Serialize};

pub const UPLOAD_PATH: &str = "/upload";
pub const QUERY_PATH: &str = "/query";
/// Multipart field repeated once per uploaded document.
pub const UPLOAD_FILES_FIELD: &str = "files";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    pub filename: String,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            filename: filename.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}
