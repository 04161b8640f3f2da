use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::TRAINING_SESSION_KEY;
use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Progress through the exercise sequence. This is what gets persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub current_exercise_index: usize,
    /// exercise id -> chosen lesson id
    pub selected_lessons: BTreeMap<String, String>,
    pub completed: bool,
}

impl TrainingSession {
    /// A session at the first exercise. With no exercises at all it is
    /// already complete, so `completed == (index >= total)` always holds.
    pub fn fresh(total_exercises: usize) -> Self {
        TrainingSession {
            current_exercise_index: 0,
            selected_lessons: BTreeMap::new(),
            completed: total_exercises == 0,
        }
    }

    fn is_consistent_with(&self, total_exercises: usize) -> bool {
        self.current_exercise_index <= total_exercises
            && self.completed == (self.current_exercise_index >= total_exercises)
    }

    /// Restore from `store`. Missing, unreadable, malformed or stale data all
    /// yield a fresh session.
    pub fn load(store: &dyn KeyValueStore, total_exercises: usize) -> Self {
        let raw = match store.get(TRAINING_SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::fresh(total_exercises),
            Err(e) => {
                tracing::warn!("Could not read training session: {}", e);
                return Self::fresh(total_exercises);
            }
        };

        match serde_json::from_str::<TrainingSession>(&raw) {
            Ok(session) if session.is_consistent_with(total_exercises) => session,
            Ok(session) => {
                tracing::debug!(
                    "Discarding stale training session at index {} of {}",
                    session.current_exercise_index,
                    total_exercises
                );
                Self::fresh(total_exercises)
            }
            Err(e) => {
                tracing::debug!("Discarding malformed training session: {}", e);
                Self::fresh(total_exercises)
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(TRAINING_SESSION_KEY, &json)
    }
}
