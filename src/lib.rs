//! topiccut: terminal client for the TopicCut summarization service
//!
//! This library provides:
//! - Input collection and validation for pasted text and transcript files
//! - The submission pipeline (upload, then summarize) over HTTP
//! - Style-aware rendering of summaries with per-block copy
//! - Hosted sign-in with a session gate in front of the workbench
//! - A persisted dark/light display preference

pub mod api;
pub mod app;
pub mod auth;
pub mod clipboard;
pub mod config;
pub mod core;
pub mod services;
pub mod storage;
pub mod transport;

pub use app::Workbench;
pub use config::Config;
pub use services::SubmissionService;
