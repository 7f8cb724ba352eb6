//! High-level pipeline: orchestrates one review run from diff text to
//! rendered transcript.
//!
//! The flow is linear: fetch the diff, short-circuit when it is empty,
//! resolve context, submit the intro prompt, loop on follow-up questions
//! against the same conversation, assemble the ordered sections and write
//! them when a markdown target was given.
//!
//! # Error Handling
//! The diff fetch, the intro submission and the transcript write are fatal.
//! A failed follow-up aborts the loop but the entries gathered so far are
//! kept, and the transcript is still written before the error surfaces.
//!
//! # Callable From
//! Used by the CLI and by integration tests, which supply mock/scripted
//! implementations of the [`DiffSource`] and [`Conversation`] seams plus
//! in-memory reader/writer pairs.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::{error, info, warn};

use crate::config::ReviewOptions;
use crate::context::resolve_context;
use crate::contract::{Conversation, ConversationError, DiffSource};
use crate::prompts::intro_prompt;
use crate::term::{mark, view_markdown};
use crate::transcript::{assemble, write_to_md, QaEntry};

/// What a run produced.
#[derive(Debug)]
pub enum RunOutcome {
    /// The diff was empty: nothing reviewed, nothing written.
    NoChanges,
    /// A review ran to completion.
    Reviewed {
        sections: Vec<String>,
        saved_to: Option<PathBuf>,
    },
}

/// Runs the whole pipeline against the given collaborators.
pub async fn run_review<S, C, R, W>(
    source: &S,
    convo: &mut C,
    opts: &ReviewOptions,
    input: &mut R,
    out: &mut W,
) -> Result<RunOutcome>
where
    S: DiffSource,
    C: Conversation + ?Sized,
    R: BufRead,
    W: Write + Send,
{
    let diff = source.diff().map_err(|e| anyhow!("{e}"))?;
    if diff.trim().is_empty() {
        info!("Diff is empty, nothing to review");
        writeln!(out, "No changes found – nothing to review.")?;
        return Ok(RunOutcome::NoChanges);
    }

    let context = resolve_context(&opts.context);
    let intro = intro_prompt(&diff, &context, opts.detail);

    writeln!(out, "{}  Running AI review …", mark("🧠", "[RUN]", opts.plain))?;
    let review_text = generate_review(convo, &intro, out).await?;

    let mut qa = Vec::new();
    let qa_result = q_and_a(convo, opts.max_questions, opts.plain, &mut qa, input, out).await;

    let usage = opts.show_usage.then(|| convo.usage());
    let sections = assemble(&review_text, &qa, &diff, &context, usage.as_deref());

    let saved_to = match &opts.md_path {
        Some(target) => {
            let path = write_to_md(target, &sections).context("Error writing to the file")?;
            writeln!(
                out,
                "{}  Saved transcript to {}",
                mark("💾", "[SAVED]", opts.plain),
                path.display()
            )?;
            view_markdown(&path, out)?;
            Some(path)
        }
        None => None,
    };

    if let Some(usage) = &usage {
        writeln!(out, "\nTOKEN USAGE\n")?;
        for record in usage {
            writeln!(out, "{record}")?;
        }
    }

    // Surface a failed follow-up only after the transcript has been preserved.
    qa_result?;

    Ok(RunOutcome::Reviewed { sections, saved_to })
}

/// Submits the intro prompt and renders the reply as it arrives. A failed
/// submission is fatal for the run; an empty reply becomes a placeholder so
/// the review section is never blank.
async fn generate_review<C, W>(convo: &mut C, intro: &str, out: &mut W) -> Result<String>
where
    C: Conversation + ?Sized,
    W: Write + Send,
{
    writeln!(out, "\n--- AI Code Review ---\n")?;
    let text = stream_reply(convo, intro, out).await.map_err(|e| {
        error!(error = %e, "Review generation failed");
        anyhow!("Review generation failed: {e}")
    })?;
    writeln!(out)?;

    if text.trim().is_empty() {
        warn!("Model returned no content for the review");
        return Ok("No review generated".to_string());
    }
    Ok(text)
}

/// Runs the bounded follow-up loop. Blank or end-of-input ends the loop
/// cleanly; a limit of zero or less is coerced to a single question so the
/// phase is never silently skipped.
async fn q_and_a<C, R, W>(
    convo: &mut C,
    max_questions: i64,
    plain: bool,
    qa: &mut Vec<QaEntry>,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    C: Conversation + ?Sized,
    R: BufRead,
    W: Write + Send,
{
    let max_questions = if max_questions <= 0 { 1 } else { max_questions };

    for i in 0..max_questions {
        write!(out, "\n{}  Follow-up (Enter to quit): ", mark("❓", "?", plain))?;
        out.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        let question = line.trim();
        if read == 0 || question.is_empty() {
            info!(answered = qa.len(), "Follow-up loop ended by user");
            return Ok(());
        }

        writeln!(out, "\n--- Response ---\n")?;
        let answer = match stream_reply(convo, question, out).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, question = %question, "Follow-up submission failed");
                return Err(anyhow!("Follow-up submission failed: {e}"));
            }
        };
        writeln!(out)?;

        qa.push(QaEntry {
            question: question.to_string(),
            answer,
        });

        if i == max_questions - 1 {
            writeln!(out, "Exiting: Hit max number of questions: {max_questions}")?;
        }
    }

    Ok(())
}

async fn stream_reply<C, W>(
    convo: &mut C,
    prompt: &str,
    out: &mut W,
) -> Result<String, ConversationError>
where
    C: Conversation + ?Sized,
    W: Write + Send,
{
    let mut render = |chunk: &str| {
        let _ = out.write_all(chunk.as_bytes());
        let _ = out.flush();
    };
    convo.send(prompt, &mut render).await
}
