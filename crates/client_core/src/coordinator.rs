use std::sync::Arc;

use shared::{error::FailureDetail, protocol::QueryRequest};
use tracing::{info, warn};

use crate::{gateway::DocumentGateway, selection::DocumentFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Accepted { message: String },
    Failed { detail: FailureDetail },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Answered { answer: String },
    Failed { detail: FailureDetail },
}

/// Runs the upload round-trip and reduces its result to an [`UploadOutcome`].
/// Gateway errors stop here.
pub struct UploadCoordinator {
    gateway: Arc<dyn DocumentGateway>,
}

impl UploadCoordinator {
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn upload(&self, files: &[DocumentFile]) -> UploadOutcome {
        match self.gateway.submit_upload(files).await {
            Ok(response) => {
                info!(file_count = files.len(), "documents accepted by backend");
                UploadOutcome::Accepted {
                    message: response.message,
                }
            }
            Err(err) => {
                let detail = err.failure_detail();
                warn!(file_count = files.len(), error = %detail, "upload failed");
                UploadOutcome::Failed { detail }
            }
        }
    }
}

pub struct QueryCoordinator {
    gateway: Arc<dyn DocumentGateway>,
}

impl QueryCoordinator {
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn ask(&self, question: &str, filename: &str) -> QueryOutcome {
        let request = QueryRequest::new(question, filename);
        match self.gateway.submit_query(&request).await {
            Ok(response) => {
                info!(filename, question_len = question.len(), "answer received");
                QueryOutcome::Answered {
                    answer: response.answer,
                }
            }
            Err(err) => {
                let detail = err.failure_detail();
                warn!(filename, error = %detail, "query failed");
                QueryOutcome::Failed { detail }
            }
        }
    }
}
