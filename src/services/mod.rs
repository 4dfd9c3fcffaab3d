//! Service layer for topiccut
//!
//! Services coordinate the remote API and local resources on behalf of the
//! presentation layer.

pub mod submission;

pub use submission::{DiskFiles, FileSource, SubmissionService};
