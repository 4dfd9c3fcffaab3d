//! Summarizer workbench
//!
//! The screen shown once the session gate lets the user through. It owns the
//! input collector, the selected content style, the result slot and the copy
//! feedback. Submissions are split in three steps so the network call can run
//! without borrowing the workbench:
//!
//! 1. [`Workbench::begin_submit`] validates input, assigns a request id and
//!    marks the workbench as pending
//! 2. [`PendingSubmission::run`] drives the submission pipeline
//! 3. [`Workbench::finish`] applies the outcome if its id is still current
//!
//! While a submission is pending, further submissions are refused. A
//! completion whose id is not the pending one is dropped, so the slot always
//! reflects the latest accepted request.

use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

use crate::clipboard::{ClipboardWriter, CopyFeedback};
use crate::core::{
    render, BlockKey, ContentStyle, FileCandidate, InputCollector, InputTab, RenderedSummary,
    SelectionOrigin, SizeLimit, SubmissionError, SubmissionPayload, Summary, SummaryResult,
    ValidationError,
};
use crate::services::SubmissionService;

/// Message shown for any pipeline failure
pub const GENERIC_FAILURE: &str =
    "An error occurred while generating the summary. Please try again.";

/// Reasons a submission was not started
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("A summary is already being generated")]
    Busy,
}

/// A validated submission ready to run
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub id: Uuid,
    pub payload: SubmissionPayload,
    pub style: ContentStyle,
}

impl PendingSubmission {
    pub async fn run(self, service: &SubmissionService) -> CompletedSubmission {
        let outcome = service.submit(&self.payload, self.style).await;
        CompletedSubmission {
            id: self.id,
            style: self.style,
            outcome,
        }
    }
}

#[derive(Debug)]
pub struct CompletedSubmission {
    pub id: Uuid,
    pub style: ContentStyle,
    pub outcome: Result<SummaryResult, SubmissionError>,
}

/// Result shown on screen, with the style it was requested with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownResult {
    pub summary: Summary,
    pub rendered: RenderedSummary,
}

pub struct Workbench {
    input: InputCollector,
    style: ContentStyle,
    in_flight: Option<Uuid>,
    result: Option<ShownResult>,
    error: Option<String>,
    copies: CopyFeedback,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(SizeLimit::default(), CopyFeedback::default())
    }
}

impl Workbench {
    pub fn new(size_limit: SizeLimit, copies: CopyFeedback) -> Self {
        Self {
            input: InputCollector::new(size_limit),
            style: ContentStyle::default(),
            in_flight: None,
            result: None,
            error: None,
            copies,
        }
    }

    /// Build from configuration
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            config.input.size_limit(),
            CopyFeedback::new(Duration::from_millis(config.ui.copy_feedback_ms)),
        )
    }

    pub fn set_tab(&mut self, tab: InputTab) {
        self.input.set_active_tab(tab);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input.set_text(text);
    }

    /// Select a file; on rejection the message is shown inline
    pub fn select_file(
        &mut self,
        candidate: FileCandidate,
        origin: SelectionOrigin,
    ) -> Result<(), ValidationError> {
        let outcome = self.input.select_file(candidate, origin);
        self.error = outcome.as_ref().err().map(|e| e.to_string());
        outcome
    }

    pub fn set_style(&mut self, style: ContentStyle) {
        self.style = style;
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        !self.is_pending() && self.input.can_submit()
    }

    pub fn result(&self) -> Option<&ShownResult> {
        self.result.as_ref()
    }

    /// Error line shown above the submit control
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validate input and claim the in-flight slot
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitRejected> {
        if let Some(id) = self.in_flight {
            tracing::debug!("Submission refused, {} still pending", id);
            return Err(SubmitRejected::Busy);
        }

        let payload = match self.input.payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        let id = Uuid::new_v4();
        self.in_flight = Some(id);
        self.error = None;
        self.result = None;
        self.copies.clear();

        tracing::info!(
            "Submission {} started ({} input, style {})",
            id,
            payload.kind(),
            self.style
        );

        Ok(PendingSubmission {
            id,
            payload,
            style: self.style,
        })
    }

    /// Apply a completed submission; returns false if it was stale
    pub fn finish(&mut self, completed: CompletedSubmission) -> bool {
        if self.in_flight != Some(completed.id) {
            tracing::warn!("Dropping stale completion {}", completed.id);
            return false;
        }
        self.in_flight = None;

        match completed.outcome {
            Ok(result) => {
                let summary = Summary::from_result(result, completed.style);
                let rendered = render(&summary);
                tracing::info!("Submission {} completed", completed.id);
                self.result = Some(ShownResult { summary, rendered });
                self.error = None;
            }
            Err(e) => {
                tracing::error!("Submission {} failed: {}", completed.id, e);
                self.result = None;
                self.error = Some(GENERIC_FAILURE.to_string());
            }
        }
        true
    }

    /// Copy one block of the shown result; returns whether it was copied
    pub fn copy_block(
        &mut self,
        clipboard: &mut dyn ClipboardWriter,
        key: BlockKey,
        now: Instant,
    ) -> bool {
        let Some(text) = self
            .result
            .as_ref()
            .and_then(|shown| shown.rendered.copy_text(key))
        else {
            tracing::debug!("Nothing to copy for {}", key);
            return false;
        };
        self.copies.copy(clipboard, key, text, now)
    }

    pub fn is_copied(&self, key: BlockKey, now: Instant) -> bool {
        self.copies.is_confirmed(key, now)
    }
}
