//! Scripted dialogs registered at startup

pub mod login;
pub mod quote;
pub mod search;
pub mod types;

use dialog_flow::{DialogBuilder, DialogSet};
use parts_api::{Credentials, PartsGateway};
use std::sync::Arc;

pub use types::{dialog_ids, session_keys};

/// Build every dialog the bot can run. `credentials` supplies the partner
/// identity used by the login dialog.
pub fn build_dialogs(gateway: Arc<dyn PartsGateway>, credentials: &Credentials) -> DialogSet {
    let search = DialogBuilder::new(dialog_ids::SEARCH)
        .add_step(Arc::new(search::PromptForPiece::new()))
        .add_step(Arc::new(search::PromptForKeyword::new()))
        .add_step(Arc::new(search::ShowPieceInformation::new()))
        .build();

    let login = DialogBuilder::new(dialog_ids::LOGIN)
        .add_step(Arc::new(login::PromptForUser::new()))
        .add_step(Arc::new(login::PromptForPassword::new()))
        .add_step(Arc::new(login::DoLogin::new(
            gateway.clone(),
            credentials.clone(),
        )))
        .build();

    let quote = DialogBuilder::new(dialog_ids::QUOTE_CONFIRMATION)
        .add_step(Arc::new(quote::PromptForQuote::new()))
        .add_step(Arc::new(quote::ConfirmQuote::new(gateway)))
        .build();

    DialogSet::new().add(search).add(login).add(quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialog_flow::Step;
    use parts_api::{Party, testing::RecordingGateway};

    #[test]
    fn all_dialogs_are_registered() {
        let credentials = Credentials::new(Party::new("p", "pk"), Party::new("u", "uk"));
        let dialogs = build_dialogs(Arc::new(RecordingGateway::new()), &credentials);

        assert_eq!(dialogs.get(dialog_ids::SEARCH).unwrap().len(), 3);
        assert_eq!(dialogs.get(dialog_ids::LOGIN).unwrap().len(), 3);
        assert_eq!(dialogs.get(dialog_ids::QUOTE_CONFIRMATION).unwrap().len(), 2);
    }

    #[test]
    fn default_steps_match_new() {
        assert_eq!(search::PromptForPiece::default().id(), "prompt_for_piece");
        assert_eq!(search::ShowPieceInformation::default().id(), "show_piece_information");
        assert_eq!(login::PromptForUser::default().id(), "prompt_for_user");
        assert_eq!(quote::PromptForQuote::default().id(), "prompt_for_quote");
    }
}
