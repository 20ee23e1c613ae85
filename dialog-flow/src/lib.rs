pub mod context;
pub mod dialog;
pub mod error;
pub mod reply;
pub mod step;
pub mod storage;

// Re-export commonly used types
pub use context::Context;
pub use dialog::{Dialog, DialogBuilder, DialogSet, ExecutionResult, ExecutionStatus};
pub use error::{DialogError, Result};
pub use reply::{Attachment, Reply};
pub use step::{NextAction, Step, StepInput, StepResult};
pub use storage::{ConversationSession, InMemorySessionStorage, SessionStorage};
