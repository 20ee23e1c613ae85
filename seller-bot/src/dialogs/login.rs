use async_trait::async_trait;
use dialog_flow::{DialogError, Reply, Result, Step, StepInput, StepResult};
use parts_api::{ApiError, Credentials, Party, PartsGateway};
use std::sync::Arc;
use tracing::{info, warn};

use super::types::session_keys;
use crate::replies;

pub struct PromptForUser {
    id: String,
}

impl PromptForUser {
    pub fn new() -> Self {
        Self {
            id: "prompt_for_user".to_string(),
        }
    }
}

impl Default for PromptForUser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Step for PromptForUser {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, _input: StepInput) -> Result<StepResult> {
        Ok(StepResult::prompt("What's your username?"))
    }
}

pub struct PromptForPassword {
    id: String,
}

impl PromptForPassword {
    pub fn new() -> Self {
        Self {
            id: "prompt_for_password".to_string(),
        }
    }
}

impl Default for PromptForPassword {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Step for PromptForPassword {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, input: StepInput) -> Result<StepResult> {
        input
            .context
            .set(session_keys::USER, input.reply_text())
            .await;
        Ok(StepResult::prompt("What's your password?"))
    }
}

/// Logs in with the configured partner and the collected user identity.
/// On success the new token pair replaces the process-wide one.
pub struct DoLogin {
    id: String,
    gateway: Arc<dyn PartsGateway>,
    credentials: Credentials,
}

impl DoLogin {
    pub fn new(gateway: Arc<dyn PartsGateway>, credentials: Credentials) -> Self {
        Self {
            id: "do_login".to_string(),
            gateway,
            credentials,
        }
    }
}

#[async_trait]
impl Step for DoLogin {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, input: StepInput) -> Result<StepResult> {
        let user: String = input
            .context
            .get(session_keys::USER)
            .await
            .ok_or_else(|| DialogError::ContextError("username not collected".to_string()))?;
        // The password is this step's reply and is never written to the session.
        let credentials = self
            .credentials
            .for_user(Party::new(user.clone(), input.reply_text()));

        match self.gateway.login(&credentials).await {
            Ok(()) => {
                info!(user = %user, "login succeeded");
                Ok(StepResult::end(vec![Reply::text("Login successful")]))
            }
            Err(ApiError::Auth(reason)) => {
                warn!(user = %user, reason = %reason, "login rejected");
                Ok(StepResult::end(vec![Reply::text(replies::COULD_NOT_LOG_IN)]))
            }
            Err(e) => Err(DialogError::Other(e.into())),
        }
    }
}
