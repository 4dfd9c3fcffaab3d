//! Domain error types
//!
//! Validation errors are detected locally and shown inline. Submission errors
//! end the current attempt and are shown as one generic message; their detail
//! only goes to the diagnostic log.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors detected before any network call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Extension is not one of .vtt, .pdf, .txt
    #[error("Unsupported file type: {file_name} (supported: .vtt, .pdf, .txt)")]
    UnsupportedFileType { file_name: String },

    /// Neither text nor file provided for the active input
    #[error("Enter some text or upload a file.")]
    EmptyInput,

    /// File exceeds the configured size limit
    #[error("File too large: {file_name} is {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },
}

/// Pipeline stage, used to attribute transport and parse failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReadFile,
    Upload,
    Summarize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::ReadFile => "read-file",
            Stage::Upload => "upload",
            Stage::Summarize => "summarize",
        })
    }
}

/// Errors raised while a submission is running
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Failed to read {}: {source}", .path.display())]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Upload rejected by the service, or the request never completed
    #[error("File upload failed{}: {detail}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    UploadFailed { status: Option<u16>, detail: String },

    #[error("Summarize call failed (HTTP {status}): {detail}")]
    SummarizeFailed { status: u16, detail: String },

    /// Connection refused, timeout, and similar
    #[error("Network error during {stage}: {detail}")]
    Transport { stage: Stage, detail: String },

    #[error("Invalid {stage} response: {detail}")]
    InvalidResponse { stage: Stage, detail: String },
}

impl SubmissionError {
    /// Stage that produced the error
    pub fn stage(&self) -> Stage {
        match self {
            Self::FileReadFailed { .. } => Stage::ReadFile,
            Self::UploadFailed { .. } => Stage::Upload,
            Self::SummarizeFailed { .. } => Stage::Summarize,
            Self::Transport { stage, .. } | Self::InvalidResponse { stage, .. } => *stage,
        }
    }

    /// HTTP status, when the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UploadFailed { status, .. } => *status,
            Self::SummarizeFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Map a transport error of the given stage
    pub fn from_network_error(stage: Stage, e: reqwest::Error) -> Self {
        let detail = if e.is_timeout() {
            format!("request timeout: {}", e)
        } else if e.is_connect() {
            format!("connection failed: {}", e)
        } else {
            e.to_string()
        };

        match stage {
            // Upload stage never reports Transport; summarize was not attempted
            Stage::Upload => Self::UploadFailed {
                status: None,
                detail,
            },
            _ => Self::Transport { stage, detail },
        }
    }
}

/// Identity collaborator failures; shown full screen by the session gate
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Sign-in was not completed: {0}")]
    SignIn(String),

    #[error("Token request failed: {0}")]
    TokenExchange(String),

    #[error("Session could not be loaded: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Clipboard failures; logged and otherwise ignored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);
