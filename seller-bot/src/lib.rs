pub mod config;
pub mod dialogs;
pub mod dispatcher;
pub mod intent;
pub mod replies;
pub mod server;

pub use config::{BotConfig, LogFormat};
pub use dispatcher::{IntentDispatcher, TurnError, TurnOutcome};
pub use intent::{Intent, Recognition};
pub use server::{AppState, build_router};
