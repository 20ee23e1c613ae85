use async_trait::async_trait;
use dialog_flow::{Reply, Result, Step, StepInput, StepResult};
use tracing::info;

use super::types::session_keys;

pub struct PromptForPiece {
    id: String,
}

impl PromptForPiece {
    pub fn new() -> Self {
        Self {
            id: "prompt_for_piece".to_string(),
        }
    }
}

impl Default for PromptForPiece {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Step for PromptForPiece {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, _input: StepInput) -> Result<StepResult> {
        Ok(StepResult::prompt("Which PIECE id?"))
    }
}

pub struct PromptForKeyword {
    id: String,
}

impl PromptForKeyword {
    pub fn new() -> Self {
        Self {
            id: "prompt_for_keyword".to_string(),
        }
    }
}

impl Default for PromptForKeyword {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Step for PromptForKeyword {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, input: StepInput) -> Result<StepResult> {
        input
            .context
            .set(session_keys::PIECE, input.reply_text())
            .await;
        Ok(StepResult::prompt("Please, insert a keyword"))
    }
}

/// Terminal step of the search dialog. It acknowledges what was collected
/// and does not query the catalog.
pub struct ShowPieceInformation {
    id: String,
}

impl ShowPieceInformation {
    pub fn new() -> Self {
        Self {
            id: "show_piece_information".to_string(),
        }
    }
}

impl Default for ShowPieceInformation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Step for ShowPieceInformation {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, input: StepInput) -> Result<StepResult> {
        input
            .context
            .set(session_keys::KEYWORD, input.reply_text())
            .await;
        let piece: Option<String> = input.context.get(session_keys::PIECE).await;
        info!(piece = ?piece, keyword = %input.reply_text(), "search dialog collected piece");
        Ok(StepResult::end(vec![Reply::text("Piece info:")]))
    }
}
