//! Remote summarization API
//!
//! The service exposes two JSON endpoints, `POST /upload` and
//! `POST /summarize`. [`SummarizerApi`] is the seam the submission pipeline
//! talks to; [`HttpSummarizerApi`] is the reqwest implementation.

mod http;

pub use http::HttpSummarizerApi;

use async_trait::async_trait;

use crate::core::{FileUpload, SubmissionError, SummarizeRequest, SummaryResult, UploadResult};

/// Trait for the summarization service
#[async_trait]
pub trait SummarizerApi: Send + Sync {
    /// Base URL requests are sent to (for logging)
    fn endpoint(&self) -> &str;

    /// Store file content and return the key used by `summarize`
    ///
    /// Any non-2xx status is reported as `SubmissionError::UploadFailed`.
    async fn upload(&self, upload: &FileUpload) -> Result<UploadResult, SubmissionError>;

    /// Summarize pasted text or a previously uploaded file
    ///
    /// Any non-2xx status is reported as `SubmissionError::SummarizeFailed`.
    async fn summarize(&self, request: &SummarizeRequest)
        -> Result<SummaryResult, SubmissionError>;
}
