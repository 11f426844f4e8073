use std::sync::Arc;

use crate::config::Config;
use crate::schema::SchemaValidator;
use crate::workflow::ModelGateway;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-user data: sessions live in the browser.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable model gateway. Default: LlmGateway over the Anthropic client.
    pub gateway: Arc<dyn ModelGateway>,
    pub validator: Arc<dyn SchemaValidator>,
}
