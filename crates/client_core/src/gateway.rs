use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::protocol::{
    QueryRequest, QueryResponse, UploadResponse, QUERY_PATH, UPLOAD_FILES_FIELD, UPLOAD_PATH,
};
use tracing::debug;
use url::Url;

use crate::{error::GatewayError, selection::DocumentFile};

/// The remote backend's two operations. Implementations report every
/// non-2xx status and transport problem as an `Err`; callers do not branch
/// on the particular variant.
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    async fn submit_upload(&self, files: &[DocumentFile]) -> Result<UploadResponse, GatewayError>;
    async fn submit_query(&self, request: &QueryRequest) -> Result<QueryResponse, GatewayError>;
}

pub struct HttpGateway {
    http: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, GatewayError> {
        let parsed = Url::parse(base_url.trim()).map_err(|e| GatewayError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn upload_form(files: &[DocumentFile]) -> Result<Form, GatewayError> {
    let mut form = Form::new();
    for file in files {
        let mut part = Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string());
        if let Some(mime_type) = file.mime_type() {
            part = part
                .mime_str(mime_type)
                .map_err(|e| GatewayError::InvalidRequest(format!("{}: {e}", file.name())))?;
        }
        form = form.part(UPLOAD_FILES_FIELD, part);
    }
    Ok(form)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        });
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))
}

#[async_trait]
impl DocumentGateway for HttpGateway {
    async fn submit_upload(&self, files: &[DocumentFile]) -> Result<UploadResponse, GatewayError> {
        debug!(
            file_count = files.len(),
            total_bytes = files.iter().map(DocumentFile::len).sum::<usize>(),
            "posting documents for indexing"
        );
        let response = self
            .http
            .post(self.endpoint(UPLOAD_PATH))
            .multipart(upload_form(files)?)
            .send()
            .await?;
        read_json(response).await
    }

    async fn submit_query(&self, request: &QueryRequest) -> Result<QueryResponse, GatewayError> {
        debug!(filename = %request.filename, "posting question");
        let response = self
            .http
            .post(self.endpoint(QUERY_PATH))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
