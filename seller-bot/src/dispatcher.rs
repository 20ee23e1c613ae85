use dialog_flow::{
    Attachment, ConversationSession, DialogError, DialogSet, ExecutionResult, ExecutionStatus,
    Reply, SessionStorage,
};
use parts_api::{ApiError, PartsGateway};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{
    dialogs::{dialog_ids, session_keys},
    intent::{Intent, PART_ID_ENTITY, Recognition},
    replies,
};

/// What a turn sends back to the channel
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub conversation_id: String,
    pub replies: Vec<Reply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_dialog: Option<String>,
}

/// Failure of the branch taken in a turn. Never leaves the dispatcher;
/// it becomes an apology reply.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Dialog(#[from] DialogError),
}

impl TurnError {
    fn api_error(&self) -> Option<&ApiError> {
        match self {
            TurnError::Api(e) => Some(e),
            TurnError::Dialog(DialogError::Other(e)) => e.downcast_ref::<ApiError>(),
            TurnError::Dialog(_) => None,
        }
    }

    /// Non-technical message shown to the user
    pub fn apology(&self) -> &'static str {
        match self.api_error() {
            Some(ApiError::Auth(_)) => replies::COULD_NOT_LOG_IN,
            _ => replies::SOMETHING_WENT_WRONG,
        }
    }
}

/// Routes each turn either into the conversation's active dialog or, when
/// there is none, by the recognised intent.
pub struct IntentDispatcher {
    dialogs: DialogSet,
    gateway: Arc<dyn PartsGateway>,
    storage: Arc<dyn SessionStorage>,
}

impl IntentDispatcher {
    pub fn new(
        dialogs: DialogSet,
        gateway: Arc<dyn PartsGateway>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        Self {
            dialogs,
            gateway,
            storage,
        }
    }

    pub async fn session(
        &self,
        conversation_id: &str,
    ) -> dialog_flow::Result<Option<ConversationSession>> {
        self.storage.get(conversation_id).await
    }

    /// Run one turn and persist the session exactly once, whatever the outcome.
    ///
    /// Only storage failures are returned as errors; everything else has
    /// already been turned into a reply.
    pub async fn handle_turn(
        &self,
        conversation_id: &str,
        recognition: &Recognition,
        utterance: &str,
    ) -> dialog_flow::Result<TurnOutcome> {
        let mut session = self
            .storage
            .get(conversation_id)
            .await?
            .unwrap_or_else(|| ConversationSession::new(conversation_id));

        info!(
            conversation_id = %conversation_id,
            intent = ?recognition.intent,
            active_dialog = ?session.active_dialog_id,
            "handling turn"
        );

        let mut out = Vec::new();
        if let Err(e) = self
            .dispatch(&mut session, recognition, utterance, &mut out)
            .await
        {
            error!(
                conversation_id = %conversation_id,
                dialog_id = ?session.active_dialog_id,
                error = %e,
                "turn failed"
            );
            if session.in_dialog() {
                session.finish_dialog();
            }
            out.push(Reply::text(e.apology()));
        }

        session.touch();
        let active_dialog = session.active_dialog_id.clone();
        self.storage.save(session).await?;

        Ok(TurnOutcome {
            conversation_id: conversation_id.to_string(),
            replies: out,
            active_dialog,
        })
    }

    async fn dispatch(
        &self,
        session: &mut ConversationSession,
        recognition: &Recognition,
        utterance: &str,
        out: &mut Vec<Reply>,
    ) -> Result<(), TurnError> {
        if let Some(dialog_id) = session.active_dialog_id.clone() {
            debug!(dialog_id = %dialog_id, "resuming active dialog");
            let dialog = self.dialogs.get(&dialog_id)?;
            let result = dialog.advance(session, Some(utterance.to_string())).await?;
            Self::collect(session, result, out);
            return Ok(());
        }

        match recognition.intent {
            Intent::Search => self.search(session, recognition, out).await,
            Intent::StartSearch => self.begin(session, dialog_ids::SEARCH, out).await,
            Intent::Login => self.begin(session, dialog_ids::LOGIN, out).await,
            Intent::Shop => self.shop(out).await,
            Intent::Greetings => {
                out.push(Reply::text(replies::GREETINGS));
                Ok(())
            }
            Intent::Help => {
                out.push(Reply::text(replies::HELP));
                Ok(())
            }
            Intent::None => {
                out.push(Reply::text(replies::NONE));
                Ok(())
            }
            Intent::AddCart | Intent::RemoveCart | Intent::GetQuote | Intent::RequestQuote => {
                debug!(intent = ?recognition.intent, "intent has no action");
                Ok(())
            }
        }
    }

    async fn begin(
        &self,
        session: &mut ConversationSession,
        dialog_id: &str,
        out: &mut Vec<Reply>,
    ) -> Result<(), TurnError> {
        let dialog = self.dialogs.get(dialog_id)?;
        let result = dialog.begin(session).await?;
        Self::collect(session, result, out);
        Ok(())
    }

    fn collect(session: &mut ConversationSession, result: ExecutionResult, out: &mut Vec<Reply>) {
        out.extend(result.replies);
        if result.status == ExecutionStatus::Completed {
            info!(
                conversation_id = %session.id,
                dialog_id = ?session.active_dialog_id,
                "dialog completed"
            );
            session.finish_dialog();
        }
    }

    async fn search(
        &self,
        session: &mut ConversationSession,
        recognition: &Recognition,
        out: &mut Vec<Reply>,
    ) -> Result<(), TurnError> {
        let part_id = recognition
            .entity(PART_ID_ENTITY)
            .map(|id| id.trim().to_uppercase())
            .filter(|id| !id.is_empty());
        let Some(part_id) = part_id else {
            out.push(Reply::text(replies::MISSING_PART_ID));
            return Ok(());
        };

        out.push(Reply::text(replies::SEARCHING));
        let part = self.gateway.part_by_id(&part_id).await?;
        info!(part_id = %part_id, part_number = %part.part_number, "part found");

        session.parameters.insert(
            session_keys::PART_NUMBER.to_string(),
            part.part_number.clone(),
        );

        match part.display_image() {
            Some(url) => {
                out.push(Reply::text(format!(
                    "Sure, this is the name:\n {}, and this is an image",
                    part.part_name
                )));
                out.push(Reply::attachment(Attachment {
                    content_url: url.to_string(),
                    content_type: "image/png".to_string(),
                    name: part.part_name.clone(),
                }));
            }
            None => out.push(Reply::text(format!(
                "Sure, this is the name:\n {}",
                part.part_name
            ))),
        }

        self.begin(session, dialog_ids::QUOTE_CONFIRMATION, out)
            .await
    }

    async fn shop(&self, out: &mut Vec<Reply>) -> Result<(), TurnError> {
        let shop = self.gateway.shop_profile().await?;
        let address = shop.formatted_address()?;

        out.push(Reply::text("Sure!"));
        out.push(Reply::text(format!(
            "Here's the contact info tel:{}, cel:{}",
            shop.phone.as_deref().unwrap_or_default(),
            shop.cellphone.as_deref().unwrap_or_default()
        )));
        out.push(Reply::text(format!("Or visit the store at {}", address)));
        Ok(())
    }
}
