use std::collections::HashSet;
use std::rc::Rc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::session::TrainingSession;
use crate::content::{ContentModel, Lesson, ResolvedExercise};
use crate::storage::KeyValueStore;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionState {
    InProgress { index: usize },
    Completed,
}

/// Outcome of a state-changing request.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum Transition {
    /// Now at this exercise index.
    Moved { index: usize },
    Completed,
    /// Not valid in the current state; nothing changed.
    Ignored,
}

/// "Exercise 2 of 4"
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepProgress {
    pub step: usize,
    pub total: usize,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum TrainingView<'a> {
    /// The content defines no exercises.
    NoExercises,
    #[serde(rename_all = "camelCase")]
    Exercise {
        progress: StepProgress,
        exercise: &'a ResolvedExercise,
        available_lessons: Vec<&'a Lesson>,
    },
    Completed { message: &'a str },
}

/// Walks the exercise sequence one lesson pick at a time, persisting after
/// every change.
pub struct TrainingEngine {
    content: Rc<ContentModel>,
    session: TrainingSession,
    store: Box<dyn KeyValueStore>,
}

impl TrainingEngine {
    pub fn new(content: Rc<ContentModel>, store: Box<dyn KeyValueStore>) -> Self {
        let session = TrainingSession::load(store.as_ref(), content.exercises().len());
        TrainingEngine {
            content,
            session,
            store,
        }
    }

    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    pub fn content(&self) -> &ContentModel {
        &self.content
    }

    pub fn total_exercises(&self) -> usize {
        self.content.exercises().len()
    }

    pub fn state(&self) -> SessionState {
        if self.session.completed {
            SessionState::Completed
        } else {
            SessionState::InProgress {
                index: self.session.current_exercise_index,
            }
        }
    }

    pub fn current_exercise(&self) -> Option<&ResolvedExercise> {
        match self.state() {
            SessionState::InProgress { index } => self.content.exercises().get(index),
            SessionState::Completed => None,
        }
    }

    pub fn progress(&self) -> Option<StepProgress> {
        match self.state() {
            SessionState::InProgress { index } => Some(StepProgress {
                step: index + 1,
                total: self.total_exercises(),
            }),
            SessionState::Completed => None,
        }
    }

    /// Lessons of the current exercise not already picked for any exercise.
    /// If every one of them has been used, all of them are offered again.
    pub fn available_lessons(&self) -> Vec<&Lesson> {
        let exercise = match self.current_exercise() {
            Some(exercise) => exercise,
            None => return Vec::new(),
        };

        let used: HashSet<&str> = self
            .session
            .selected_lessons
            .values()
            .map(String::as_str)
            .collect();

        let fresh: Vec<&Lesson> = exercise
            .lessons
            .iter()
            .filter(|l| !used.contains(l.id.as_str()))
            .collect();

        if fresh.is_empty() {
            exercise.lessons.iter().collect()
        } else {
            fresh
        }
    }

    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Lesson> {
        let available = self.available_lessons();
        available.choose(rng).copied()
    }

    /// Record `lesson_id` for the current exercise and move on.
    pub fn advance(&mut self, lesson_id: &str) -> Transition {
        let (index, exercise_id) = match (self.state(), self.current_exercise()) {
            (SessionState::InProgress { index }, Some(exercise)) => (index, exercise.id.clone()),
            _ => {
                tracing::debug!("Ignoring advance to \"{}\": session is complete", lesson_id);
                return Transition::Ignored;
            }
        };

        self.session
            .selected_lessons
            .insert(exercise_id, lesson_id.to_string());

        let next = index + 1;
        self.session.current_exercise_index = next;
        self.session.completed = next >= self.total_exercises();
        self.persist();

        if self.session.completed {
            tracing::debug!("Training complete after {} exercises", next);
            Transition::Completed
        } else {
            tracing::debug!("Advanced to exercise {}", next);
            Transition::Moved { index: next }
        }
    }

    /// Step back one exercise. The earlier pick stays recorded until a new
    /// one overwrites it.
    pub fn go_back(&mut self) -> Transition {
        match self.state() {
            SessionState::InProgress { index } if index > 0 => {
                self.session.current_exercise_index = index - 1;
                self.persist();
                Transition::Moved { index: index - 1 }
            }
            _ => Transition::Ignored,
        }
    }

    pub fn reset(&mut self) {
        self.session = TrainingSession::fresh(self.total_exercises());
        self.persist();
    }

    pub fn view<'a>(&'a self, message: &'a str) -> TrainingView<'a> {
        if self.total_exercises() == 0 {
            return TrainingView::NoExercises;
        }
        match (self.progress(), self.current_exercise()) {
            (Some(progress), Some(exercise)) => TrainingView::Exercise {
                progress,
                exercise,
                available_lessons: self.available_lessons(),
            },
            _ => TrainingView::Completed { message },
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.session.save(self.store.as_mut()) {
            tracing::warn!("Could not save training session: {}", e);
        }
    }
}
