use serde::{Deserialize, Serialize};

/// Tab-scoped key holding the serialized training session.
pub const TRAINING_SESSION_KEY: &str = "drum-trainer-training-session";

/// Profile-scoped preference keys.
pub const THEME_KEY: &str = "drum-trainer-theme";
pub const LANGUAGE_KEY: &str = "drum-trainer-language";

/// Longer queries are truncated, never rejected.
pub const MAX_QUERY_LENGTH: usize = 100;

pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.4;

/// Shown when the motivational message list is empty.
pub const FALLBACK_MESSAGE: &str = "Great job today!";

/// Tunables for the Library search.
///
/// Every field has a default, so a partial object from the page
/// (`{ "threshold": 0.3 }`) is enough to override one setting.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Field scores above this are not a match. 0.0 demands an exact substring.
    pub threshold: f64,
    pub max_query_length: usize,
    pub title_weight: f64,
    pub description_weight: f64,
    pub link_title_weight: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            threshold: DEFAULT_MATCH_THRESHOLD,
            max_query_length: MAX_QUERY_LENGTH,
            title_weight: 2.0,
            description_weight: 1.0,
            link_title_weight: 0.5,
        }
    }
}

impl SearchConfig {
    pub(crate) fn max_weight(&self) -> f64 {
        self.title_weight
            .max(self.description_weight)
            .max(self.link_title_weight)
    }
}
