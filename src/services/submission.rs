//! Submission pipeline
//!
//! Text is summarized in one call. A file goes through three stages in strict
//! order: read the content, upload it, then summarize the uploaded key. A
//! failing stage ends the attempt and later stages never run. There are no
//! retries; the caller resubmits.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::api::SummarizerApi;
use crate::core::{
    ContentStyle, FilePayload, FileUpload, Stage, SubmissionError, SubmissionPayload,
    SummarizeRequest, SummaryResult, UploadResult,
};

/// Stages run for a text submission
pub const TEXT_STAGES: &[Stage] = &[Stage::Summarize];

/// Stages run for a file submission
pub const FILE_STAGES: &[Stage] = &[Stage::ReadFile, Stage::Upload, Stage::Summarize];

/// Stage list for a payload, in execution order
pub fn stages(payload: &SubmissionPayload) -> &'static [Stage] {
    match payload {
        SubmissionPayload::Text(_) => TEXT_STAGES,
        SubmissionPayload::File(_) => FILE_STAGES,
    }
}

/// Source of file content for the read stage
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn read_text(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads files from disk, decoding invalid UTF-8 lossily
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFiles;

#[async_trait]
impl FileSource for DiskFiles {
    async fn read_text(&self, path: &Path) -> std::io::Result<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Runs submissions against the summarization API
#[derive(Clone)]
pub struct SubmissionService {
    api: Arc<dyn SummarizerApi>,
    files: Arc<dyn FileSource>,
}

impl SubmissionService {
    pub fn new(api: Arc<dyn SummarizerApi>) -> Self {
        Self {
            api,
            files: Arc::new(DiskFiles),
        }
    }

    pub fn with_file_source(mut self, files: Arc<dyn FileSource>) -> Self {
        self.files = files;
        self
    }

    /// Run every stage for `payload` and return the parsed summary
    pub async fn submit(
        &self,
        payload: &SubmissionPayload,
        style: ContentStyle,
    ) -> Result<SummaryResult, SubmissionError> {
        tracing::debug!(
            "Submitting {} payload ({}) to {}",
            payload.kind(),
            style,
            self.api.endpoint()
        );

        match payload {
            SubmissionPayload::Text(text) => {
                self.summarize(SummarizeRequest::Text {
                    text_input: text.text.clone(),
                    content_type: style,
                })
                .await
            }
            SubmissionPayload::File(file) => {
                let upload = self.read_file(file).await?;
                let uploaded = self.upload(&upload).await?;
                self.summarize(SummarizeRequest::UploadedFile {
                    file_key: uploaded.file_key,
                    content_type: style,
                })
                .await
            }
        }
    }

    /// Read stage: load the whole file before any network call
    pub async fn read_file(&self, file: &FilePayload) -> Result<FileUpload, SubmissionError> {
        let file_content = self.files.read_text(&file.path).await.map_err(|source| {
            SubmissionError::FileReadFailed {
                path: file.path.clone(),
                source,
            }
        })?;

        tracing::debug!(
            "Read {} ({} bytes of text)",
            file.file_name,
            file_content.len()
        );

        let file_type = if file.declared_mime_type.is_empty() {
            "text/plain".to_string()
        } else {
            file.declared_mime_type.clone()
        };

        Ok(FileUpload {
            file_content,
            file_name: file.file_name.clone(),
            file_type,
        })
    }

    /// Upload stage
    pub async fn upload(&self, upload: &FileUpload) -> Result<UploadResult, SubmissionError> {
        let result = self.api.upload(upload).await?;
        tracing::debug!("Uploaded {} as {}", upload.file_name, result.file_key);
        Ok(result)
    }

    /// Summarize stage
    pub async fn summarize(
        &self,
        request: SummarizeRequest,
    ) -> Result<SummaryResult, SubmissionError> {
        let result = self.api.summarize(&request).await?;
        tracing::debug!(
            "Summary received: '{}' ({} keywords)",
            result.title,
            result.keywords.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording fakes shared by pipeline and workbench tests

    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Upload(FileUpload),
        Summarize(SummarizeRequest),
    }

    #[derive(Default)]
    pub struct MockApi {
        pub calls: Mutex<Vec<Call>>,
        pub upload_status: Option<u16>,
        pub summarize_status: Option<u16>,
        pub result: SummaryResult,
    }

    impl MockApi {
        pub fn returning(result: SummaryResult) -> Self {
            Self {
                result,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SummarizerApi for MockApi {
        fn endpoint(&self) -> &str {
            "mock://api"
        }

        async fn upload(&self, upload: &FileUpload) -> Result<UploadResult, SubmissionError> {
            self.calls.lock().unwrap().push(Call::Upload(upload.clone()));
            if let Some(status) = self.upload_status {
                return Err(SubmissionError::UploadFailed {
                    status: Some(status),
                    detail: "rejected".to_string(),
                });
            }
            Ok(UploadResult {
                file_key: format!("uploads/{}", upload.file_name),
            })
        }

        async fn summarize(
            &self,
            request: &SummarizeRequest,
        ) -> Result<SummaryResult, SubmissionError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Summarize(request.clone()));
            if let Some(status) = self.summarize_status {
                return Err(SubmissionError::SummarizeFailed {
                    status,
                    detail: "failed".to_string(),
                });
            }
            Ok(self.result.clone())
        }
    }

    /// In-memory files keyed by path
    #[derive(Default)]
    pub struct MemoryFiles(pub HashMap<PathBuf, String>);

    #[async_trait]
    impl FileSource for MemoryFiles {
        async fn read_text(&self, path: &Path) -> std::io::Result<String> {
            self.0.get(path).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file")
            })
        }
    }
}
