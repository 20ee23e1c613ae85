use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{context::Context, error::Result, reply::Reply};

/// What a step sees when it runs
#[derive(Debug, Clone)]
pub struct StepInput {
    /// Values collected by earlier steps of the same dialog
    pub context: Context,
    /// The user's answer to the previous prompt; `None` when the dialog is just starting
    pub reply: Option<String>,
    /// Parameters extracted outside the dialog (e.g. a part number from a search)
    pub parameters: HashMap<String, String>,
}

impl StepInput {
    pub fn reply_text(&self) -> &str {
        self.reply.as_deref().unwrap_or_default().trim()
    }
}

/// Result of a step execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// Messages to send to the user, in order
    pub replies: Vec<Reply>,
    /// Next action to take
    pub next_action: NextAction,
}

impl StepResult {
    pub fn new(replies: Vec<Reply>, next_action: NextAction) -> Self {
        Self {
            replies,
            next_action,
        }
    }

    /// Send a prompt and move on to the following step on the next turn
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(vec![Reply::text(text)], NextAction::Continue)
    }

    /// Ask the same question again; the dialog stays on this step
    pub fn reprompt(text: impl Into<String>) -> Self {
        Self::new(vec![Reply::text(text)], NextAction::WaitForInput)
    }

    pub fn end(replies: Vec<Reply>) -> Self {
        Self::new(replies, NextAction::End)
    }
}

/// Defines what should happen after a step completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextAction {
    /// Advance to the next step; it runs with the user's next reply
    Continue,
    /// Stay on the current step and run it again with the next reply
    WaitForInput,
    /// The dialog is complete
    End,
}

/// Core trait that all dialog steps must implement
#[async_trait]
pub trait Step: Send + Sync {
    /// Identifier, unique within its dialog
    fn id(&self) -> &str;

    async fn run(&self, input: StepInput) -> Result<StepResult>;
}
