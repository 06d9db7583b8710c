use crate::{
    config::Config,
    db::Database,
    safety::{SafetyProvider, StaticSafetyTable},
    suggestions::{KeywordSuggestions, SuggestionGenerator},
};
use std::sync::Arc;

/// Per-process handles shared by every request. Holds no mutable state of
/// its own; all data lives in the database.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub suggestions: Arc<dyn SuggestionGenerator>,
    pub safety: Arc<dyn SafetyProvider>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config,
            suggestions: Arc::new(KeywordSuggestions),
            safety: Arc::new(StaticSafetyTable),
        }
    }
}
