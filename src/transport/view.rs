//! Terminal views
//!
//! Each view is built as a `String` so the command handlers decide where it
//! goes. Colors come from the [`Palette`] chosen by the display preference.

use colored::{ColoredString, Colorize};

use crate::auth::GateView;
use crate::core::render::{QaBlock, TopicView, SAFETY_TIPS_LABEL};
use crate::core::{BlockKey, RenderedSummary, SectionView};
use crate::storage::DisplayMode;

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    mode: DisplayMode,
}

impl Palette {
    pub fn new(mode: DisplayMode) -> Self {
        Self { mode }
    }

    fn heading(&self, text: &str) -> ColoredString {
        match self.mode {
            DisplayMode::Dark => text.bold().cyan(),
            DisplayMode::Light => text.bold().blue(),
        }
    }

    fn accent(&self, text: &str) -> ColoredString {
        match self.mode {
            DisplayMode::Dark => text.yellow(),
            DisplayMode::Light => text.magenta(),
        }
    }

    fn muted(&self, text: &str) -> ColoredString {
        text.dimmed()
    }

    fn success(&self, text: &str) -> ColoredString {
        text.green()
    }

    fn failure(&self, text: &str) -> ColoredString {
        text.red().bold()
    }
}

pub fn dev_banner(palette: &Palette) -> String {
    format!(
        "{} authentication is skipped",
        palette.accent("[development mode]")
    )
}

pub fn gate(view: &GateView, palette: &Palette) -> String {
    match view {
        GateView::Loading => palette.muted("Loading...").to_string(),
        GateView::Error { message } => {
            format!("{} {}", palette.failure("Authentication error:"), message)
        }
        GateView::Login => format!(
            "{}\nRun {} to sign in.",
            palette.heading("Not signed in"),
            palette.accent("topiccut login")
        ),
        GateView::Authenticated { email } => {
            format!("{} {}", palette.success("Hello,"), email)
        }
        GateView::DevBypass => dev_banner(palette),
    }
}

/// Inline validation or submission error
pub fn error_line(message: &str, palette: &Palette) -> String {
    format!("{} {}", palette.failure("✗"), message)
}

/// Full result view; `copied` marks blocks with a live copy confirmation
pub fn summary(
    rendered: &RenderedSummary,
    palette: &Palette,
    copied: impl Fn(BlockKey) -> bool,
) -> String {
    let mut out = Vec::new();

    for block in &rendered.blocks {
        let marker = if copied(block.key) {
            format!(" {}", palette.success("Copied!"))
        } else {
            String::new()
        };
        out.push(format!(
            "{} {}{}",
            palette.heading(block.heading),
            palette.muted(&format!("[{}]", block.key)),
            marker
        ));

        match &block.section {
            None if block.key == BlockKey::Keywords => {
                out.push(palette.accent(&block.copy_text).to_string())
            }
            None => out.push(block.copy_text.clone()),
            Some(section) => out.extend(section_lines(section, palette)),
        }
        out.push(String::new());
    }

    while out.last().is_some_and(|line| line.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

fn section_lines(section: &SectionView, palette: &Palette) -> Vec<String> {
    match section {
        SectionView::Core {
            main,
            sub,
            safety_tips,
        } => {
            let mut lines = qa_lines(main, palette, false);
            lines.push(String::new());
            lines.extend(qa_lines(sub, palette, true));
            if let Some(tips) = safety_tips {
                lines.push(String::new());
                lines.push(palette.failure(&format!("{}:", SAFETY_TIPS_LABEL)).to_string());
                lines.extend(tips.iter().map(|tip| format!("  • {}", tip)));
            }
            lines
        }
        SectionView::Outline {
            introduction,
            topics,
        } => {
            let mut lines = vec![introduction.clone()];
            for topic in topics {
                lines.push(String::new());
                lines.extend(topic_lines(topic, palette));
            }
            lines
        }
        SectionView::Article { paragraphs } => paragraphs
            .join("\n\n")
            .lines()
            .map(String::from)
            .collect(),
    }
}

fn qa_lines(qa: &QaBlock, palette: &Palette, bulleted: bool) -> Vec<String> {
    let mut lines = vec![palette.accent(&qa.question).to_string()];
    if bulleted {
        lines.extend(qa.answer.iter().map(|line| format!("  • {}", line)));
    } else {
        lines.extend(qa.answer.iter().cloned());
    }
    lines
}

fn topic_lines(topic: &TopicView, palette: &Palette) -> Vec<String> {
    let mut lines = vec![palette
        .accent(&format!("{}. {}", topic.number, topic.title))
        .to_string()];
    if !topic.content.is_empty() {
        lines.push(topic.content.clone());
    }
    lines.extend(topic.sub_points.iter().map(|p| format!("  • {}", p)));
    lines
}
