use std::io;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use crate::config::{Detail, ReviewOptions, DEFAULT_MAX_QUESTIONS, DEFAULT_MODEL};
use crate::diff::GitDiffSource;
use crate::openai::{available_models, OpenAiConversation};
use crate::review::run_review;
use crate::transcript::OutputTarget;

/// CLI for llm-review: AI code review of a git diff with follow-up Q&A.
#[derive(Parser)]
#[clap(
    name = "llm-review",
    version,
    about = "Generate an AI code review from a git diff, with interactive follow-up Q&A and Markdown transcripts"
)]
pub struct Cli {
    /// Base commit for diff (default HEAD~1)
    #[clap(short = 'b', long, default_value = "HEAD~1")]
    pub base: String,

    /// Use staged changes instead of commit diff
    #[clap(short = 's', long)]
    pub staged: bool,

    /// Model ID, e.g. gpt-4o-mini
    #[clap(short = 'm', long)]
    pub model: Option<String>,

    /// Disable emoji / Unicode output
    #[clap(short = 'p', long)]
    pub plain: bool,

    /// Save review (+ Q&A) to Markdown. Supply a filename, a directory, or
    /// the value . to write to ./code-review-<timestamp>.md
    #[clap(long = "markdown", value_name = "PATH")]
    pub md_path: Option<PathBuf>,

    /// Maximum number of follow up questions (default 10)
    #[clap(long = "max-questions", default_value_t = DEFAULT_MAX_QUESTIONS)]
    pub max_questions: i64,

    /// Lists the valid model names
    #[clap(short = 'l', long)]
    pub list_models: bool,

    /// Level of detail for the review (low / medium / high)
    #[clap(short = 'd', long, value_enum, ignore_case = true, default_value_t = Detail::Medium)]
    pub detail: Detail,

    /// Show model token usage and append it to the transcript
    #[clap(short = 'u', long)]
    pub usage: bool,

    /// Additional text context for the model. Provide text in the CLI or
    /// point to a file (.txt or .md)
    #[clap(short = 'c', long, default_value = "")]
    pub context: String,
}

/// Extracted CLI entrypoint for integration tests and main().
///
/// Validates the inputs that must fail before any model call (model id,
/// markdown target), then wires the real collaborators into the pipeline.
pub async fn run(cli: Cli) -> Result<()> {
    if cli.list_models {
        println!("Models:\n{}", available_models().join("\n"));
        return Ok(());
    }

    if let Some(model) = &cli.model {
        if !available_models().contains(&model.as_str()) {
            bail!(
                "Invalid model name: {model}. Available models are: {}",
                available_models().join(", ")
            );
        }
    }

    if let Some(target) = &cli.md_path {
        if matches!(OutputTarget::from_path(target), OutputTarget::Directory(_))
            && !target.exists()
        {
            bail!(
                "The specified markdown path {} does not exist",
                target.display()
            );
        }
    }

    let model = cli.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
    info!(model = %model, base = %cli.base, staged = cli.staged, "Starting review run");

    let source = GitDiffSource::new(cli.base, cli.staged);
    let mut convo = OpenAiConversation::new(model);
    let opts = ReviewOptions {
        detail: cli.detail,
        plain: cli.plain,
        max_questions: cli.max_questions,
        show_usage: cli.usage,
        context: cli.context,
        md_path: cli.md_path,
    };

    let mut input = io::stdin().lock();
    let mut out = io::stdout();
    run_review(&source, &mut convo, &opts, &mut input, &mut out).await?;
    Ok(())
}
