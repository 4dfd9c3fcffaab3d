use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use topiccut::core::{BlockKey, ContentStyle, InputTab};
use topiccut::transport;
use topiccut::transport::cli::{AppContext, SummarizeArgs, ThemeAction};

#[derive(Parser)]
#[command(name = "topiccut")]
#[command(author, version, about = "TopicCut - summarize transcripts and text from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Development mode: skip sign-in
    #[arg(long, global = true)]
    dev: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in through the hosted login page
    Login,

    /// Sign out and clear the stored session
    Logout,

    /// Show the current session
    Status,

    /// Summarize text or a transcript file
    Summarize {
        /// Text to summarize (`-` reads stdin)
        #[arg(short, long)]
        text: Option<String>,

        /// Transcript file (.vtt, .pdf, .txt)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Input to submit when both --text and --file are given
        #[arg(long, value_enum)]
        tab: Option<TabArg>,

        /// Summary style (basic, news, safety)
        #[arg(short, long, default_value = "basic")]
        style: ContentStyle,

        /// Copy a block to the clipboard (title, keywords, core-summary,
        /// structured-summary, news-article); repeatable
        #[arg(long)]
        copy: Vec<BlockKey>,

        /// Print the rendered blocks as JSON
        #[arg(long, conflicts_with = "copy")]
        json: bool,
    },

    /// Show or toggle the dark/light display mode
    Theme {
        #[arg(value_enum, default_value = "show")]
        action: ThemeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TabArg {
    Text,
    File,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "topiccut=debug"
    } else {
        "topiccut=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = AppContext::load(cli.config.as_deref(), cli.dev)?;

    match cli.command {
        Commands::Login => transport::cli::run_login(&ctx).await?,
        Commands::Logout => transport::cli::run_logout(&ctx).await?,
        Commands::Status => transport::cli::run_status(&ctx).await?,
        Commands::Summarize {
            text,
            file,
            tab,
            style,
            copy,
            json,
        } => {
            let args = SummarizeArgs {
                text,
                file,
                tab: tab.map(|t| match t {
                    TabArg::Text => InputTab::Text,
                    TabArg::File => InputTab::File,
                }),
                style,
                copy,
                json,
            };
            transport::cli::run_summarize(&ctx, args).await?;
        }
        Commands::Theme { action } => {
            let action = match action {
                ThemeArg::Show => ThemeAction::Show,
                ThemeArg::Toggle => ThemeAction::Toggle,
            };
            transport::cli::run_theme(&ctx, action)?;
        }
    }

    Ok(())
}
