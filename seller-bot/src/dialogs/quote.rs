use async_trait::async_trait;
use dialog_flow::{DialogError, NextAction, Reply, Result, Step, StepInput, StepResult};
use parts_api::{ApiError, PartsGateway};
use std::sync::Arc;
use tracing::{info, warn};

use super::types::session_keys;

const QUOTE_PROMPT: &str = "Would you like to quote this item?";
const CHOICES: [&str; 2] = ["Yes", "No"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Yes,
    No,
}

impl Choice {
    /// Accepts only the offered answers, ignoring case and surrounding space
    pub fn parse(reply: &str) -> Result<Self> {
        let reply = reply.trim();
        if reply.eq_ignore_ascii_case("yes") {
            Ok(Choice::Yes)
        } else if reply.eq_ignore_ascii_case("no") {
            Ok(Choice::No)
        } else {
            Err(DialogError::Format {
                reply: reply.to_string(),
                expected: CHOICES.iter().map(|c| c.to_string()).collect(),
            })
        }
    }
}

fn quote_prompt() -> Reply {
    Reply::choice(QUOTE_PROMPT, &CHOICES)
}

pub struct PromptForQuote {
    id: String,
}

impl PromptForQuote {
    pub fn new() -> Self {
        Self {
            id: "prompt_for_quote".to_string(),
        }
    }
}

impl Default for PromptForQuote {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Step for PromptForQuote {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, _input: StepInput) -> Result<StepResult> {
        Ok(StepResult::new(vec![quote_prompt()], NextAction::Continue))
    }
}

/// Quotes the part found by the last search when the user answers "Yes".
/// Anything but "Yes" or "No" re-asks the question.
pub struct ConfirmQuote {
    id: String,
    gateway: Arc<dyn PartsGateway>,
}

impl ConfirmQuote {
    pub fn new(gateway: Arc<dyn PartsGateway>) -> Self {
        Self {
            id: "confirm_quote".to_string(),
            gateway,
        }
    }
}

#[async_trait]
impl Step for ConfirmQuote {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, input: StepInput) -> Result<StepResult> {
        let choice = match Choice::parse(input.reply_text()) {
            Ok(choice) => choice,
            Err(e @ DialogError::Format { .. }) => {
                warn!(error = %e, "re-prompting quote confirmation");
                return Ok(StepResult::new(
                    vec![quote_prompt()],
                    NextAction::WaitForInput,
                ));
            }
            Err(e) => return Err(e),
        };

        if choice == Choice::No {
            return Ok(StepResult::end(Vec::new()));
        }

        let part_number = input
            .parameters
            .get(session_keys::PART_NUMBER)
            .ok_or_else(|| DialogError::ContextError("no part number to quote".to_string()))?;

        info!(part_number = %part_number, "quoting part");
        let quote = self
            .gateway
            .quote_for_part(part_number)
            .await
            .map_err(|e| DialogError::Other(e.into()))?;
        let offer = quote.first_offer().ok_or_else(|| {
            DialogError::Other(
                ApiError::Decode(format!("quote for {} has no priced offer", part_number)).into(),
            )
        })?;

        Ok(StepResult::end(vec![Reply::text(format!(
            "We have this part in this store {} and costs ${:.2}",
            offer.store_name, offer.list_price
        ))]))
    }
}
