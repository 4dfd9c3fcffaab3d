//! Result rendering
//!
//! Turns a typed [`Summary`] into renderable blocks. The news style composes
//! the outline into one article and never shows the core summary; the other
//! styles show the Q&A core (with safety tips when present) followed by the
//! numbered outline. Every block carries the exact text placed on the
//! clipboard when it is copied.

use super::types::{BlockKey, CoreSummary, StructuredSummary, Summary, SummaryBody};

/// Phrase appended to a news paragraph that lists its sub-points
pub const NEWS_SUB_POINTS_SUFFIX: &str = "are the main points.";

pub const SAFETY_TIPS_LABEL: &str = "Safety tips";

const BULLET: &str = "•";

/// Question/answer section of a briefing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaBlock {
    pub question: String,
    pub answer: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicView {
    pub number: String,
    pub title: String,
    pub content: String,
    pub sub_points: Vec<String>,
}

/// One rendering strategy per style family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionView {
    /// Core summary for basic/safety styles
    Core {
        main: QaBlock,
        sub: QaBlock,
        safety_tips: Option<Vec<String>>,
    },
    /// Numbered outline for basic/safety styles
    Outline {
        introduction: String,
        topics: Vec<TopicView>,
    },
    /// Flowing article for the news style
    Article { paragraphs: Vec<String> },
}

/// A renderable, independently copyable block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub key: BlockKey,
    pub heading: &'static str,
    pub copy_text: String,
    pub section: Option<SectionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSummary {
    pub title: String,
    pub keywords: Vec<String>,
    pub blocks: Vec<Block>,
}

impl RenderedSummary {
    pub fn block(&self, key: BlockKey) -> Option<&Block> {
        self.blocks.iter().find(|b| b.key == key)
    }

    /// Text placed on the clipboard for `key`
    pub fn copy_text(&self, key: BlockKey) -> Option<&str> {
        self.block(key).map(|b| b.copy_text.as_str())
    }
}

pub fn render(summary: &Summary) -> RenderedSummary {
    let mut blocks = vec![
        Block {
            key: BlockKey::Title,
            heading: "Title",
            copy_text: summary.title.clone(),
            section: None,
        },
        Block {
            key: BlockKey::Keywords,
            heading: "Keywords",
            copy_text: hashtags(&summary.keywords),
            section: None,
        },
    ];

    match &summary.body {
        SummaryBody::Article(outline) => {
            if let Some(outline) = outline {
                blocks.push(Block {
                    key: BlockKey::NewsArticle,
                    heading: "News article",
                    copy_text: news_article(outline),
                    section: Some(SectionView::Article {
                        paragraphs: news_paragraphs(outline),
                    }),
                });
            }
        }
        SummaryBody::Briefing { core, outline } => {
            if let Some(core) = core {
                blocks.push(core_block(core));
            }
            if let Some(outline) = outline {
                blocks.push(outline_block(outline));
            }
        }
    }

    RenderedSummary {
        title: summary.title.clone(),
        keywords: summary.keywords.clone(),
        blocks,
    }
}

/// `#one #two #three`
pub fn hashtags(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("#{}", k))
        .collect::<Vec<_>>()
        .join(" ")
}

fn bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("{} {}", BULLET, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Intro paragraph followed by one paragraph per topic
pub fn news_paragraphs(outline: &StructuredSummary) -> Vec<String> {
    std::iter::once(outline.introduction.clone())
        .chain(outline.key_topics.iter().map(|topic| {
            let sub_points = topic.sub_points();
            if sub_points.is_empty() {
                topic.content.clone()
            } else {
                format!(
                    "{} {} {}",
                    topic.content,
                    sub_points.join(", "),
                    NEWS_SUB_POINTS_SUFFIX
                )
            }
        }))
        .collect()
}

pub fn news_article(outline: &StructuredSummary) -> String {
    news_paragraphs(outline).join("\n\n")
}

fn core_block(core: &CoreSummary) -> Block {
    let mut copy_text = format!(
        "{}\n{}\n\n{}\n{}",
        core.main_question,
        core.main_answer,
        core.sub_question,
        bullets(&core.key_points)
    );
    if let Some(tips) = &core.safety_tips {
        copy_text.push_str(&format!("\n\n{}:\n{}", SAFETY_TIPS_LABEL, bullets(tips)));
    }

    Block {
        key: BlockKey::CoreSummary,
        heading: "Core summary",
        copy_text,
        section: Some(SectionView::Core {
            main: QaBlock {
                question: core.main_question.clone(),
                answer: vec![core.main_answer.clone()],
            },
            sub: QaBlock {
                question: core.sub_question.clone(),
                answer: core.key_points.clone(),
            },
            safety_tips: core.safety_tips.clone(),
        }),
    }
}

fn outline_block(outline: &StructuredSummary) -> Block {
    let topics: Vec<TopicView> = outline
        .key_topics
        .iter()
        .enumerate()
        .map(|(idx, topic)| TopicView {
            number: topic
                .number
                .map(|n| n.to_string())
                .unwrap_or_else(|| (idx + 1).to_string()),
            title: topic.title.clone(),
            content: topic.content.clone(),
            sub_points: topic.sub_points().to_vec(),
        })
        .collect();

    let body = topics
        .iter()
        .map(|t| {
            format!(
                "{}. {}\n{}\n{}",
                t.number,
                t.title,
                t.content,
                bullets(&t.sub_points)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    Block {
        key: BlockKey::StructuredSummary,
        heading: "Detailed summary",
        copy_text: format!("{}\n\n{}", outline.introduction, body),
        section: Some(SectionView::Outline {
            introduction: outline.introduction.clone(),
            topics,
        }),
    }
}
