//! # transcript: assembly and persistence of the review document
//!
//! The transcript is an ordered list of Markdown section strings, not a
//! mapping: order is significant and matches the document structure. The
//! assembler is a pure function; the writer resolves the output target once
//! (directory with a generated name, or explicit file), creates missing
//! directories and writes the joined sections as UTF-8.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{error, info};

use crate::contract::UsageRecord;

pub const DOCUMENT_HEADER: &str = "# AI Code Review\n";
pub const REVIEW_HEADER: &str = "## Review\n";
pub const DIFF_HEADER: &str = "## Diff reviewed\n";
pub const CONTEXT_HEADER: &str = "## ADDITIONAL CONTEXT\n";
pub const USAGE_HEADER: &str = "## Usage\n";

/// One follow-up exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaEntry {
    pub question: String,
    pub answer: String,
}

/// Assembles the ordered section list for the final document.
///
/// The relative order is fixed: document header, review, each Q&A pair in
/// submission order, the diff, then the optional context and usage sections.
/// Context is emitted only when non-empty; usage only when requested.
pub fn assemble(
    review: &str,
    qa: &[QaEntry],
    diff: &str,
    context: &str,
    usage: Option<&[UsageRecord]>,
) -> Vec<String> {
    let mut sections = vec![DOCUMENT_HEADER.to_string()];

    sections.push(REVIEW_HEADER.to_string());
    sections.push(format!("{review}\n"));

    for entry in qa {
        sections.push(format!("### Q: {}\n", entry.question));
        sections.push(format!("{}\n", entry.answer));
    }

    sections.push(DIFF_HEADER.to_string());
    sections.push(format!("```diff\n{diff}\n```\n"));

    if !context.is_empty() {
        sections.push(CONTEXT_HEADER.to_string());
        sections.push(format!("{context}\n"));
    }

    if let Some(usage) = usage {
        let lines: Vec<String> = usage.iter().map(|record| record.to_string()).collect();
        sections.push(USAGE_HEADER.to_string());
        sections.push(format!("{}\n", lines.join("\n")));
    }

    sections
}

/// Where the document lands: a directory target gets a generated timestamped
/// filename at write time, an explicit file target is used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Directory(PathBuf),
    File(PathBuf),
}

impl OutputTarget {
    /// Classifies a user-supplied path by its shape: no file extension means
    /// a directory target.
    pub fn from_path(path: &Path) -> Self {
        if path.extension().is_none() {
            OutputTarget::Directory(path.to_path_buf())
        } else {
            OutputTarget::File(path.to_path_buf())
        }
    }

    fn resolve(&self) -> std::io::Result<PathBuf> {
        match self {
            OutputTarget::Directory(dir) => {
                fs::create_dir_all(dir)?;
                Ok(dir.join(generated_name()))
            }
            OutputTarget::File(file) => {
                if let Some(parent) = file.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                Ok(file.clone())
            }
        }
    }
}

fn generated_name() -> String {
    format!("code-review-{}.md", Local::now().format("%Y%m%d-%H%M%S")).replace(':', "-")
}

/// Writes the assembled sections, joined by newlines, as UTF-8. Returns the
/// resolved file path on success; an existing file target is overwritten.
pub fn write_to_md(target: &Path, sections: &[String]) -> std::io::Result<PathBuf> {
    let file_path = OutputTarget::from_path(target).resolve().map_err(|e| {
        error!(error = ?e, target = %target.display(), "Failed to resolve markdown target");
        e
    })?;

    fs::write(&file_path, sections.join("\n")).map_err(|e| {
        error!(error = ?e, path = %file_path.display(), "Failed to write transcript");
        e
    })?;

    info!(path = %file_path.display(), "Wrote transcript");
    Ok(file_path)
}
