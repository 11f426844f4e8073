// Optimization workflow: the optimize / adjust / revert state machine,
// the async session shell, and the model gateway it drives.
// All model calls go through gateway::ModelGateway, never llm_client directly.

pub mod gateway;
pub mod handlers;
pub mod prompts;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use gateway::{GatewayError, GatewayErrorKind, LlmGateway, ModelGateway};
pub use session::TailoringSession;
pub use state::{Status, WorkflowError, WorkflowState};
