use std::path::PathBuf;

use clap::ValueEnum;

/// Model used when `--model` is not given.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Upper bound on follow-up questions when `--max-questions` is not given.
pub const DEFAULT_MAX_QUESTIONS: i64 = 10;

/// Requested depth of the generated review. The value is interpolated
/// verbatim into the intro prompt and has no other behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Detail {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Detail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Detail::Low => "low",
            Detail::Medium => "medium",
            Detail::High => "high",
        })
    }
}

/// Per-run options consumed by the review pipeline.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    pub detail: Detail,
    pub plain: bool,
    pub max_questions: i64,
    pub show_usage: bool,
    /// Raw `--context` value: literal text or a path to a `.md`/`.txt` file.
    pub context: String,
    /// Markdown target, resolved once per run; `None` means no transcript is
    /// written.
    pub md_path: Option<PathBuf>,
}
