//! Canonical type definitions for the summarization domain
//!
//! Wire shapes (`SummaryResult`, `UploadResult`) are parsed leniently: the
//! remote service does not guarantee every field for every content style, so
//! any missing or `null` field degrades to its empty default. The typed
//! `Summary` model is built from a wire result plus the `ContentStyle` that was
//! active when the request was submitted.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Summary presentation mode chosen before submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStyle {
    /// Q&A core summary plus a numbered topic outline
    #[default]
    Basic,
    /// A single flowing article, no core summary
    News,
    /// Like basic, with a safety tips block
    Safety,
}

impl ContentStyle {
    pub const ALL: [ContentStyle; 3] = [Self::Basic, Self::News, Self::Safety];

    /// Wire name sent as `content_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::News => "news",
            Self::Safety => "safety",
        }
    }

    /// Get display label for this style
    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "Basic content",
            Self::News => "News article",
            Self::Safety => "Safety content",
        }
    }
}

impl fmt::Display for ContentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "news" => Ok(Self::News),
            "safety" => Ok(Self::Safety),
            other => Err(format!(
                "unknown content style '{}' (expected basic, news or safety)",
                other
            )),
        }
    }
}

/// Pasted text, already trimmed and known to be non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPayload {
    pub text: String,
}

/// A validated file waiting to be read and uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub file_name: String,
    pub path: PathBuf,
    pub declared_mime_type: String,
}

/// Normalized submission candidate; exactly one input mode is active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPayload {
    Text(TextPayload),
    File(FilePayload),
}

impl SubmissionPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::File(_) => "file",
        }
    }
}

/// File content ready for the upload endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileUpload {
    pub file_content: String,
    pub file_name: String,
    pub file_type: String,
}

/// Body of `POST /summarize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SummarizeRequest {
    Text {
        text_input: String,
        content_type: ContentStyle,
    },
    UploadedFile {
        file_key: String,
        content_type: ContentStyle,
    },
}

/// Response of `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResult {
    pub file_key: String,
}

/// Treat an explicit `null` the same as a missing field
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw summary returned by `POST /summarize`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryResult {
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_summary: Option<CoreSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_summary: Option<StructuredSummary>,
}

/// Question/answer condensed summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreSummary {
    #[serde(deserialize_with = "lenient")]
    pub main_question: String,
    #[serde(deserialize_with = "lenient")]
    pub main_answer: String,
    #[serde(deserialize_with = "lenient")]
    pub sub_question: String,
    #[serde(deserialize_with = "lenient")]
    pub key_points: Vec<String>,
    /// Only sent for the safety style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_tips: Option<Vec<String>>,
}

/// Numbered topic outline, common to every style
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredSummary {
    #[serde(deserialize_with = "lenient")]
    pub introduction: String,
    #[serde(deserialize_with = "lenient")]
    pub key_topics: Vec<KeyTopic>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyTopic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_points: Option<Vec<String>>,
}

impl KeyTopic {
    /// Sub-points, empty when the service omitted them
    pub fn sub_points(&self) -> &[String] {
        self.sub_points.as_deref().unwrap_or_default()
    }
}

/// Typed render model keyed by the style the request was submitted with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub style: ContentStyle,
    pub title: String,
    pub keywords: Vec<String>,
    pub body: SummaryBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryBody {
    /// News style: the outline is composed into one article
    Article(Option<StructuredSummary>),
    /// Basic and safety styles
    Briefing {
        core: Option<CoreSummary>,
        outline: Option<StructuredSummary>,
    },
}

impl Summary {
    pub fn from_result(result: SummaryResult, style: ContentStyle) -> Self {
        let body = match style {
            ContentStyle::News => SummaryBody::Article(result.structured_summary),
            ContentStyle::Basic | ContentStyle::Safety => SummaryBody::Briefing {
                core: result.core_summary,
                outline: result.structured_summary,
            },
        };

        Self {
            style,
            title: result.title,
            keywords: result.keywords,
            body,
        }
    }
}

/// Stable identifier of a copyable block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockKey {
    Title,
    Keywords,
    CoreSummary,
    StructuredSummary,
    NewsArticle,
}

impl BlockKey {
    pub const ALL: [BlockKey; 5] = [
        Self::Title,
        Self::Keywords,
        Self::CoreSummary,
        Self::StructuredSummary,
        Self::NewsArticle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Keywords => "keywords",
            Self::CoreSummary => "core_summary",
            Self::StructuredSummary => "structured_summary",
            Self::NewsArticle => "news_article",
        }
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| format!("unknown block '{}'", s))
    }
}
