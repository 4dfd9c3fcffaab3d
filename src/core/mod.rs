//! Core domain modules
//!
//! Types, validation and rendering for the summarizer. Nothing in here talks
//! to the network or the filesystem beyond reading file metadata.

pub mod errors;
pub mod input;
pub mod render;
pub mod types;

pub use errors::{AuthError, ClipboardError, Stage, SubmissionError, ValidationError};
pub use input::{FileCandidate, InputCollector, InputTab, SelectionOrigin, SizeLimit};
pub use render::{render, Block, RenderedSummary, SectionView};
pub use types::{
    BlockKey, ContentStyle, FilePayload, FileUpload, SubmissionPayload, SummarizeRequest, Summary,
    SummaryBody, SummaryResult, TextPayload, UploadResult,
};
