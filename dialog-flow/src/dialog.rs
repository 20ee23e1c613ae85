use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    error::{DialogError, Result},
    reply::Reply,
    step::{NextAction, Step, StepInput},
    storage::ConversationSession,
};

/// An ordered script of steps. Step 0 runs when the dialog begins, every
/// later step runs with the user's answer to the previous step's prompt.
pub struct Dialog {
    pub id: String,
    steps: Vec<Arc<dyn Step>>,
}

impl Dialog {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            steps: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Start this dialog in the given session and run its first step
    pub async fn begin(&self, session: &mut ConversationSession) -> Result<ExecutionResult> {
        info!(conversation_id = %session.id, dialog_id = %self.id, "starting dialog");
        session.start_dialog(self.id.clone());
        self.advance(session, None).await
    }

    /// Feed one user reply into the session's current step.
    ///
    /// The step index only moves when the step asks to continue; a step that
    /// waits for input is run again on the next turn.
    pub async fn advance(
        &self,
        session: &mut ConversationSession,
        reply: Option<String>,
    ) -> Result<ExecutionResult> {
        let step_index = session.step_index;
        let step = self
            .steps
            .get(step_index)
            .ok_or_else(|| DialogError::StepNotFound {
                dialog: self.id.clone(),
                step: step_index,
            })?;

        debug!(
            conversation_id = %session.id,
            dialog_id = %self.id,
            step = %step.id(),
            "running dialog step"
        );

        let input = StepInput {
            context: session.collected.clone(),
            reply,
            parameters: session.parameters.clone(),
        };
        let result = step.run(input).await?;

        let status = match result.next_action {
            NextAction::Continue if step_index + 1 < self.steps.len() => {
                session.step_index = step_index + 1;
                ExecutionStatus::WaitingForInput
            }
            NextAction::Continue | NextAction::End => ExecutionStatus::Completed,
            NextAction::WaitForInput => ExecutionStatus::WaitingForInput,
        };

        debug!(dialog_id = %self.id, step = %step.id(), status = ?status, "dialog step finished");

        Ok(ExecutionResult {
            replies: result.replies,
            status,
        })
    }
}

/// Builder for creating dialogs
pub struct DialogBuilder {
    dialog: Dialog,
}

impl DialogBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            dialog: Dialog::new(id),
        }
    }

    pub fn add_step(mut self, step: Arc<dyn Step>) -> Self {
        self.dialog.steps.push(step);
        self
    }

    pub fn build(self) -> Dialog {
        self.dialog
    }
}

/// Dialogs registered at startup, looked up by id
#[derive(Default, Clone)]
pub struct DialogSet {
    dialogs: HashMap<String, Arc<Dialog>>,
}

impl DialogSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, dialog: Dialog) -> Self {
        self.dialogs.insert(dialog.id.clone(), Arc::new(dialog));
        self
    }

    pub fn get(&self, id: &str) -> Result<Arc<Dialog>> {
        self.dialogs
            .get(id)
            .cloned()
            .ok_or_else(|| DialogError::DialogNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dialogs.contains_key(id)
    }
}

/// Outcome of running one step
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub replies: Vec<Reply>,
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The dialog is still active and expects another reply
    WaitingForInput,
    /// The dialog has no outgoing transitions left
    Completed,
}
