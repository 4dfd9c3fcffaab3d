//! reqwest client for the summarization API

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::SummarizerApi;
use crate::config::ApiConfig;
use crate::core::{
    FileUpload, Stage, SubmissionError, SummarizeRequest, SummaryResult, UploadResult,
};

pub struct HttpSummarizerApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSummarizerApi {
    /// Create a client with the configured base URL and request timeout
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json<B>(
        &self,
        stage: Stage,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, SubmissionError>
    where
        B: serde::Serialize + Sync,
    {
        let url = self.url(path);
        tracing::debug!("POST {} ({})", url, stage);

        self.client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| SubmissionError::from_network_error(stage, e))
    }
}

async fn parse_body<T: DeserializeOwned>(
    stage: Stage,
    response: reqwest::Response,
) -> Result<T, SubmissionError> {
    let text = response
        .text()
        .await
        .map_err(|e| SubmissionError::from_network_error(stage, e))?;

    serde_json::from_str(&text).map_err(|e| SubmissionError::InvalidResponse {
        stage,
        detail: e.to_string(),
    })
}

#[async_trait]
impl SummarizerApi for HttpSummarizerApi {
    fn endpoint(&self) -> &str {
        &self.base_url
    }

    async fn upload(&self, upload: &FileUpload) -> Result<UploadResult, SubmissionError> {
        let response = self.post_json(Stage::Upload, "upload", upload).await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(SubmissionError::UploadFailed {
                status: Some(status.as_u16()),
                detail,
            });
        }

        parse_body(Stage::Upload, response).await
    }

    async fn summarize(
        &self,
        request: &SummarizeRequest,
    ) -> Result<SummaryResult, SubmissionError> {
        let response = self
            .post_json(Stage::Summarize, "summarize", request)
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(SubmissionError::SummarizeFailed {
                status: status.as_u16(),
                detail,
            });
        }

        parse_body(Stage::Summarize, response).await
    }
}
