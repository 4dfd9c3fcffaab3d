//! CLI command handlers
//!
//! Each `run_*` function backs one subcommand. Views go to stdout, progress
//! and diagnostics to stderr.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use super::view::{self, Palette};
use crate::api::HttpSummarizerApi;
use crate::app::Workbench;
use crate::auth::{
    sign_out, BrowserNavigator, GateView, HostedIdentity, IdentityProvider, SessionGate,
};
use crate::clipboard::SystemClipboard;
use crate::config::{self, Config};
use crate::core::{BlockKey, ContentStyle, FileCandidate, InputTab, SelectionOrigin};
use crate::services::{submission, SubmissionService};
use crate::storage::{DisplayPreferences, LocalStorage};

/// Everything a command needs, resolved once at startup
pub struct AppContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub dev: bool,
}

impl AppContext {
    pub fn load(config_path: Option<&Path>, dev: bool) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        let dev = dev || config.auth.dev_bypass;
        Ok(Self {
            config,
            data_dir: config::data_dir(),
            dev,
        })
    }

    fn preferences(&self) -> DisplayPreferences {
        DisplayPreferences::load(LocalStorage::in_dir(&self.data_dir))
    }

    fn palette(&self) -> Palette {
        Palette::new(self.preferences().mode())
    }

    fn identity(&self) -> Result<HostedIdentity> {
        HostedIdentity::new(self.config.auth.clone(), &self.data_dir)
    }

    /// Restore the stored session and evaluate the gate
    async fn gate_view(&self) -> Result<GateView> {
        let gate = SessionGate::new(self.dev);
        if self.dev {
            return Ok(gate.evaluate(&Default::default()));
        }
        let identity = self.identity()?;
        let session = identity.restore().await;
        Ok(gate.evaluate(&session))
    }
}

pub async fn run_login(ctx: &AppContext) -> Result<()> {
    let palette = ctx.palette();
    if ctx.dev {
        println!("{}", view::dev_banner(&palette));
        return Ok(());
    }

    let gate = SessionGate::default();
    let identity = ctx.identity()?;
    let current = gate.evaluate(&identity.restore().await);
    if matches!(current, GateView::Authenticated { .. }) {
        println!("{}", view::gate(&current, &palette));
        println!("Already signed in. Run `topiccut logout` to switch accounts.");
        return Ok(());
    }

    let session = identity
        .signin_redirect(&BrowserNavigator)
        .await
        .context("Sign-in failed")?;
    println!("{}", view::gate(&gate.evaluate(&session), &palette));
    Ok(())
}

pub async fn run_logout(ctx: &AppContext) -> Result<()> {
    let identity = ctx.identity()?;
    match sign_out(&identity, &BrowserNavigator) {
        Some(url) => {
            println!("Signed out.");
            println!("If the browser did not open, visit: {}", url);
            Ok(())
        }
        None => anyhow::bail!("Could not build the logout URL; check the [auth] configuration"),
    }
}

pub async fn run_status(ctx: &AppContext) -> Result<()> {
    let palette = ctx.palette();
    let view = ctx.gate_view().await?;
    println!("{}", view::gate(&view, &palette));
    tracing::debug!("Data directory: {}", ctx.data_dir.display());
    Ok(())
}

/// Inputs for `topiccut summarize`
#[derive(Debug, Clone, Default)]
pub struct SummarizeArgs {
    /// Text to summarize; `-` reads stdin
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    /// Tab to submit when both inputs are given
    pub tab: Option<InputTab>,
    pub style: ContentStyle,
    pub copy: Vec<BlockKey>,
    pub json: bool,
}

pub async fn run_summarize(ctx: &AppContext, args: SummarizeArgs) -> Result<()> {
    let palette = ctx.palette();

    let gate_view = ctx.gate_view().await?;
    if ctx.dev {
        eprintln!("{}", view::dev_banner(&palette));
    }
    if !gate_view.allows_workbench() {
        println!("{}", view::gate(&gate_view, &palette));
        anyhow::bail!("Sign in before summarizing");
    }

    let mut workbench = Workbench::from_config(&ctx.config);
    workbench.set_style(args.style);

    if let Some(text) = args.text.as_deref() {
        let text = if text == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        } else {
            text.to_string()
        };
        workbench.set_text(text);
    }

    if let Some(path) = &args.file {
        workbench.select_file(FileCandidate::from_path(path), SelectionOrigin::Picker)?;
    }

    let tab = match (&args.text, &args.file) {
        (Some(_), Some(_)) => args.tab.unwrap_or_default(),
        (Some(_), None) => InputTab::Text,
        _ => InputTab::File,
    };
    workbench.set_tab(tab);

    let pending = workbench.begin_submit()?;
    let stages = submission::stages(&pending.payload)
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" -> ");
    eprintln!("Generating {} ({})...", pending.style.label(), stages);

    let api = HttpSummarizerApi::new(&ctx.config.api)?;
    let service = SubmissionService::new(Arc::new(api));
    let completed = pending.run(&service).await;
    workbench.finish(completed);

    if let Some(message) = workbench.error() {
        anyhow::bail!("{}", message);
    }
    let Some(shown) = workbench.result() else {
        anyhow::bail!("No summary was produced");
    };

    if args.json {
        let blocks: Vec<_> = shown
            .rendered
            .blocks
            .iter()
            .map(|b| {
                serde_json::json!({
                    "key": b.key.as_str(),
                    "heading": b.heading,
                    "text": b.copy_text,
                })
            })
            .collect();
        let output = serde_json::json!({
            "style": shown.summary.style,
            "title": shown.rendered.title,
            "keywords": shown.rendered.keywords,
            "blocks": blocks,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let now = Instant::now();
        if !args.copy.is_empty() {
            let mut clipboard = SystemClipboard::new();
            for key in &args.copy {
                if !workbench.copy_block(&mut clipboard, *key, now) {
                    let message = format!("Could not copy {}", key);
                    eprintln!("{}", view::error_line(&message, &palette));
                }
            }
        }
        let shown = workbench
            .result()
            .context("Summary disappeared while copying")?;
        println!(
            "{}",
            view::summary(&shown.rendered, &palette, |key| workbench.is_copied(key, now))
        );
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Show,
    Toggle,
}

pub fn run_theme(ctx: &AppContext, action: ThemeAction) -> Result<()> {
    let mut prefs = ctx.preferences();
    if action == ThemeAction::Toggle {
        prefs.toggle();
    }
    println!("Display mode: {}", prefs.mode().label());
    Ok(())
}
