use std::sync::Arc;

use crate::analysis::AtsRules;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Vocabulary, section aliases and point values. Loaded once at startup, never mutated.
    pub rules: Arc<AtsRules>,
}
