use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{error_message, ApiError};
use crate::model::AnalysisResult;

/// Multipart field every uploaded file is sent under.
pub const FILES_FIELD: &str = "files";
pub const ANALYZE_PATH: &str = "/analyze/";
pub const CLEAR_HISTORY_PATH: &str = "/clear_history";

/// A queued file, fully read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Transport seam between the dashboard and the analysis service.
///
/// Futures are not `Send`: on the web they run on the browser event loop.
#[async_trait(?Send)]
pub trait AnalysisBackend {
    async fn analyze(&self, files: Vec<UploadFile>) -> Result<AnalysisResult, ApiError>;
    async fn clear_history(&self) -> Result<String, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: String,
}

impl HttpBackend {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.into(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }
}

fn build_form(files: Vec<UploadFile>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for file in files {
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime)?;
        form = form.part(FILES_FIELD, part);
    }
    Ok(form)
}

#[derive(Deserialize)]
struct MessageBody {
    message: Option<String>,
}

#[async_trait(?Send)]
impl AnalysisBackend for HttpBackend {
    async fn analyze(&self, files: Vec<UploadFile>) -> Result<AnalysisResult, ApiError> {
        let count = files.len();
        let url = self.endpoint(ANALYZE_PATH);
        info!(%url, files = count, "submitting files for analysis");

        let form = build_form(files)?;
        let resp = self.client.post(&url).multipart(form).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), %message, "analysis request failed");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn clear_history(&self) -> Result<String, ApiError> {
        let url = self.endpoint(CLEAR_HISTORY_PATH);
        let resp = self.client.post(&url).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), %message, "clear history failed");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessageBody =
            serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(parsed
            .message
            .unwrap_or_else(|| "History cleared.".to_string()))
    }
}
