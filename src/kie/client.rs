use std::path::Path;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use super::error::KieError;
use super::types::{
    UploadRequest, VideoRequest, envelope_error, extract_download_url, extract_task_id,
    mime_type_for, parse_record_info,
};
use crate::job::Job;
use crate::poller::TaskApi;

pub const API_URL: &str = "https://api.kie.ai/api/v1";
pub const UPLOAD_URL: &str = "https://kieai.redpandaai.co/api/file-base64-upload";

const UPLOAD_PATH: &str = "keynote-slides-uploads";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the Kie.ai Veo video API.
#[derive(Debug, Clone)]
pub struct KieClient {
    api_key: String,
    client: Client,
    base_url: String,
    upload_url: String,
}

impl KieClient {
    pub fn new(api_key: String) -> Result<Self, KieError> {
        Self::with_urls(api_key, API_URL.to_string(), UPLOAD_URL.to_string())
    }

    /// Create a client pointing at custom endpoints (useful for testing).
    pub fn with_urls(
        api_key: String,
        base_url: String,
        upload_url: String,
    ) -> Result<Self, KieError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            upload_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /veo/generate`; returns the task id.
    pub async fn submit_task(&self, request: &VideoRequest) -> Result<String, KieError> {
        let url = format!("{}/veo/generate", self.base_url);
        debug!(%url, model = %request.model, "submitting video task");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await?;
        let body = json_body(response).await?;

        extract_task_id(&body).ok_or_else(|| KieError::MissingTaskId {
            body: body.to_string(),
        })
    }

    /// `GET /veo/record-info?taskId=...`, normalized into a [`Job`].
    ///
    /// An error envelope (`code` other than 200 and no `data`) is an
    /// [`KieError::ApiError`] even when the HTTP status is 200.
    pub async fn record_info(&self, task_id: &str) -> Result<Job, KieError> {
        let url = format!("{}/veo/record-info", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("taskId", task_id)])
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let body = json_body(response).await?;
        if let Some(err) = envelope_error(&body) {
            return Err(err);
        }

        Ok(parse_record_info(task_id, &body))
    }

    /// Upload a local image as a base64 data URI and return its public URL.
    pub async fn upload_image(&self, path: &Path) -> Result<String, KieError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let request = UploadRequest {
            base64_data: format!("data:{};base64,{}", mime_type_for(path), STANDARD.encode(&bytes)),
            upload_path: UPLOAD_PATH.to_string(),
            file_name,
        };
        debug!(path = %path.display(), size = bytes.len(), "uploading reference image");

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.api_key)
            .timeout(UPLOAD_TIMEOUT)
            .json(&request)
            .send()
            .await?;
        let body = json_body(response).await?;

        extract_download_url(&body).ok_or_else(|| KieError::MissingDownloadUrl {
            body: body.to_string(),
        })
    }

    /// Download a result URL to `path`, creating parent directories.
    pub async fn download(&self, url: &str, path: &Path) -> Result<u64, KieError> {
        let response = self.client.get(url).timeout(DOWNLOAD_TIMEOUT).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status.as_u16(), response).await);
        }
        let bytes = response.bytes().await?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "result downloaded");
        Ok(bytes.len() as u64)
    }
}

impl TaskApi for KieClient {
    type Request = VideoRequest;

    async fn submit_task(&self, request: &VideoRequest) -> Result<String, KieError> {
        KieClient::submit_task(self, request).await
    }

    async fn task_status(&self, task_id: &str) -> Result<Job, KieError> {
        self.record_info(task_id).await
    }
}

async fn api_error(status: u16, response: Response) -> KieError {
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    KieError::ApiError { status, message }
}

async fn json_body(response: Response) -> Result<Value, KieError> {
    let status = response.status();
    if !status.is_success() {
        return Err(api_error(status.as_u16(), response).await);
    }
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| KieError::InvalidResponse(format!("{e}: {text}")))
}
