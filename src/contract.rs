//! # contract: seams for the review pipeline's external collaborators
//!
//! This module defines the two traits the pipeline depends on instead of
//! concrete services:
//!
//! - [`DiffSource`] produces the raw diff text for one run (real
//!   implementation: a git subprocess, see [`crate::diff`]).
//! - [`Conversation`] is a stateful model exchange: every prompt submitted
//!   through one instance sees the full prior history on the model side
//!   (real implementation: the chat-completions client in
//!   [`crate::openai`]).
//!
//! ## Mocking & Testing
//! - `DiffSource` is annotated for `mockall`, exported behind the
//!   `test-export-mocks` feature so integration tests get `MockDiffSource`.
//! - `Conversation` streams through an `on_chunk` callback, which is outside
//!   what `automock` handles cleanly; tests use the hand-rolled
//!   [`scripted::ScriptedConversation`] instead, exported the same way.
//!
//! ## Error Handling
//! All trait errors are boxed trait objects; implementors convert their
//! upstream failures into a single descriptive error.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Error type for [`DiffSource`] implementations.
pub type DiffError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for [`Conversation`] implementations.
pub type ConversationError = Box<dyn std::error::Error + Send + Sync>;

/// Token accounting reported by the model for a single reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UsageRecord {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl std::fmt::Display for UsageRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "prompt: {}, completion: {}, total: {}",
            self.prompt_tokens, self.completion_tokens, self.total_tokens
        )
    }
}

/// Produces the raw diff text for one review run.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait DiffSource {
    /// Returns the diff text, or the underlying tool's diagnostic on failure.
    fn diff(&self) -> Result<String, DiffError>;
}

/// A stateful model exchange owned by a single review run.
///
/// Invariant: all prompts within a run go through the same instance, so the
/// model retains the initial review and every follow-up as context.
#[async_trait]
pub trait Conversation: Send {
    /// Submit `prompt` and return the complete reply text.
    ///
    /// `on_chunk` is invoked with each reply fragment as it arrives, in
    /// order; the concatenation of all fragments equals the returned text.
    async fn send(
        &mut self,
        prompt: &str,
        on_chunk: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<String, ConversationError>;

    /// Usage recorded for each reply so far, in submission order.
    fn usage(&self) -> Vec<UsageRecord>;
}

#[cfg(any(test, feature = "test-export-mocks"))]
pub mod scripted {
    //! Deterministic [`Conversation`] stand-in for tests.

    use std::collections::VecDeque;

    use async_trait::async_trait;

    use super::{Conversation, ConversationError, UsageRecord};

    enum Reply {
        Text(Vec<String>),
        Fail(String),
    }

    /// Pops one scripted reply per prompt and records every prompt it
    /// receives, so tests can assert on what was sent and in which order.
    pub struct ScriptedConversation {
        replies: VecDeque<Reply>,
        usage: Vec<UsageRecord>,
        /// Every prompt submitted, in submission order.
        pub prompts: Vec<String>,
    }

    impl ScriptedConversation {
        pub fn new() -> Self {
            Self {
                replies: VecDeque::new(),
                usage: Vec::new(),
                prompts: Vec::new(),
            }
        }

        /// Scripts one reply, delivered as the given fragments.
        pub fn reply(mut self, fragments: &[&str]) -> Self {
            self.replies
                .push_back(Reply::Text(fragments.iter().map(|f| f.to_string()).collect()));
            self
        }

        /// Scripts one failing submission.
        pub fn fail(mut self, message: &str) -> Self {
            self.replies.push_back(Reply::Fail(message.to_string()));
            self
        }

        /// Fixes the usage records reported through [`Conversation::usage`].
        pub fn with_usage(mut self, usage: Vec<UsageRecord>) -> Self {
            self.usage = usage;
            self
        }
    }

    impl Default for ScriptedConversation {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Conversation for ScriptedConversation {
        async fn send(
            &mut self,
            prompt: &str,
            on_chunk: &mut (dyn for<'a> FnMut(&'a str) + Send),
        ) -> Result<String, ConversationError> {
            self.prompts.push(prompt.to_string());
            match self.replies.pop_front() {
                Some(Reply::Text(fragments)) => {
                    let mut full = String::new();
                    for fragment in &fragments {
                        on_chunk(fragment);
                        full.push_str(fragment);
                    }
                    Ok(full)
                }
                Some(Reply::Fail(message)) => Err(message.into()),
                None => Err("scripted conversation exhausted".into()),
            }
        }

        fn usage(&self) -> Vec<UsageRecord> {
            self.usage.clone()
        }
    }
}
