//! Input collection for the summarizer screen
//!
//! Two tabs share one collector: pasted text and an uploaded file. Switching
//! tabs never discards the other tab's state; only the active tab feeds the
//! submission payload.

use std::path::PathBuf;

use super::errors::ValidationError;
use super::types::{FilePayload, SubmissionPayload, TextPayload};

/// Extensions accepted by the upload tab (lowercase, with dot)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".vtt", ".pdf", ".txt"];

/// Advertised upload limit
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Which input tab is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputTab {
    Text,
    #[default]
    File,
}

/// How a file reached the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    /// File picker dialog; a rejected pick clears the previous selection
    Picker,
    /// Drag and drop; a rejected drop keeps the previous selection
    Drop,
}

/// A file offered by the user, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub file_name: String,
    /// Size in bytes, when known
    pub size: Option<u64>,
}

impl FileCandidate {
    /// Build a candidate from a path on disk, reading its size if possible
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let size = std::fs::metadata(&path).ok().map(|m| m.len());
        Self {
            path,
            file_name,
            size,
        }
    }
}

/// Extension as the text from the last dot to the end, lowercased
///
/// A name without a dot yields the whole name, which never matches.
pub fn file_extension(file_name: &str) -> String {
    let lower = file_name.to_lowercase();
    match lower.rfind('.') {
        Some(idx) => lower[idx..].to_string(),
        None => lower,
    }
}

pub fn is_supported_file(file_name: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&file_extension(file_name).as_str())
}

/// MIME type declared to the upload endpoint
pub fn declared_mime_type(file_name: &str) -> &'static str {
    match file_extension(file_name).as_str() {
        ".vtt" => "text/vtt",
        ".pdf" => "application/pdf",
        _ => "text/plain",
    }
}

/// Size policy applied to selected files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimit {
    pub max_bytes: u64,
    pub enforce: bool,
}

impl Default for SizeLimit {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_FILE_BYTES,
            enforce: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputCollector {
    active_tab: InputTab,
    text: String,
    file: Option<FileCandidate>,
    error: Option<ValidationError>,
    size_limit: SizeLimit,
}

impl InputCollector {
    pub fn new(size_limit: SizeLimit) -> Self {
        Self {
            size_limit,
            ..Default::default()
        }
    }

    pub fn set_active_tab(&mut self, tab: InputTab) {
        self.active_tab = tab;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Store text as typed; trimming happens at submission
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn selected_file(&self) -> Option<&FileCandidate> {
        self.file.as_ref()
    }

    /// Inline validation error, if any
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: Option<ValidationError>) {
        self.error = error;
    }

    /// Validate and select a file
    pub fn select_file(
        &mut self,
        candidate: FileCandidate,
        origin: SelectionOrigin,
    ) -> Result<(), ValidationError> {
        match self.validate(&candidate) {
            Ok(()) => {
                tracing::debug!("Selected file {}", candidate.file_name);
                self.file = Some(candidate);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Rejected file {}: {}", candidate.file_name, e);
                if origin == SelectionOrigin::Picker {
                    self.file = None;
                }
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn validate(&self, candidate: &FileCandidate) -> Result<(), ValidationError> {
        if !is_supported_file(&candidate.file_name) {
            return Err(ValidationError::UnsupportedFileType {
                file_name: candidate.file_name.clone(),
            });
        }

        if self.size_limit.enforce {
            if let Some(size) = candidate.size {
                if size > self.size_limit.max_bytes {
                    return Err(ValidationError::FileTooLarge {
                        file_name: candidate.file_name.clone(),
                        size,
                        limit: self.size_limit.max_bytes,
                    });
                }
            }
        }

        Ok(())
    }

    /// Whether the active tab holds something to submit
    pub fn can_submit(&self) -> bool {
        match self.active_tab {
            InputTab::Text => !self.text.trim().is_empty(),
            InputTab::File => self.file.is_some(),
        }
    }

    /// Normalize the active tab into a submission payload
    pub fn payload(&self) -> Result<SubmissionPayload, ValidationError> {
        match self.active_tab {
            InputTab::Text => {
                let text = self.text.trim();
                if text.is_empty() {
                    return Err(ValidationError::EmptyInput);
                }
                Ok(SubmissionPayload::Text(TextPayload {
                    text: text.to_string(),
                }))
            }
            InputTab::File => {
                let file = self.file.as_ref().ok_or(ValidationError::EmptyInput)?;
                Ok(SubmissionPayload::File(file_payload(file)))
            }
        }
    }
}

fn file_payload(file: &FileCandidate) -> FilePayload {
    FilePayload {
        file_name: file.file_name.clone(),
        path: file.path.clone(),
        declared_mime_type: declared_mime_type(&file.file_name).to_string(),
    }
}
