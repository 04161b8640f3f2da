use rand::Rng;
use serde::Serialize;

use super::engine::{SessionState, TrainingEngine, Transition};

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum StepPhase {
    /// Choosing from the available lessons.
    Picking,
    /// Looking at one lesson before confirming it.
    #[serde(rename_all = "camelCase")]
    Reviewing { lesson_id: String },
}

/// The picker/review screen for one exercise.
///
/// `confirm` fires at most once per visit to the review screen, so a
/// double tap on "Done" cannot skip an exercise. Going back to the picker
/// re-arms it.
#[derive(Clone, Debug)]
pub struct ExerciseStep {
    index: usize,
    phase: StepPhase,
    done: bool,
}

impl ExerciseStep {
    pub fn for_index(index: usize) -> Self {
        ExerciseStep {
            index,
            phase: StepPhase::Picking,
            done: false,
        }
    }

    /// A step matching wherever `engine` currently is.
    pub fn current(engine: &TrainingEngine) -> Self {
        match engine.state() {
            SessionState::InProgress { index } => Self::for_index(index),
            SessionState::Completed => Self::for_index(engine.total_exercises()),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> &StepPhase {
        &self.phase
    }

    pub fn choose(&mut self, lesson_id: &str) {
        self.phase = StepPhase::Reviewing {
            lesson_id: lesson_id.to_string(),
        };
    }

    /// Let the engine pick, then review its pick. Returns the chosen id, or
    /// `None` (and stays put) when there is nothing to pick from.
    pub fn choose_random<R: Rng + ?Sized>(&mut self, engine: &TrainingEngine, rng: &mut R) -> Option<String> {
        let id = engine.pick_random(rng)?.id.clone();
        self.choose(&id);
        Some(id)
    }

    pub fn change_lesson(&mut self) {
        self.phase = StepPhase::Picking;
        self.done = false;
    }

    /// Record the reviewed lesson and move on. Ignored when nothing is being
    /// reviewed, when this visit already confirmed, or when the engine is no
    /// longer on this step's exercise.
    pub fn confirm(&mut self, engine: &mut TrainingEngine) -> Transition {
        if engine.state() != (SessionState::InProgress { index: self.index }) {
            return Transition::Ignored;
        }
        let lesson_id = match &self.phase {
            StepPhase::Reviewing { lesson_id } if !self.done => lesson_id.clone(),
            _ => return Transition::Ignored,
        };
        self.done = true;

        let transition = engine.advance(&lesson_id);
        if let Transition::Moved { index } = transition {
            *self = Self::for_index(index);
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentModel;
    use crate::storage::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::rc::Rc;

    const LESSONS: &str = r#"
- { id: a, type: song, title: A }
- { id: b, type: song, title: B }
- { id: c, type: fundamental, title: C }
"#;

    const TRAINING: &str = r#"
exercises:
  - { id: e1, title: One, lessons: [a, b] }
  - { id: e2, title: Two, lessons: [c] }
  - { id: e3, title: Three, lessons: [a, c] }
"#;

    fn engine() -> TrainingEngine {
        let content = ContentModel::from_sources(LESSONS, TRAINING, "").unwrap();
        TrainingEngine::new(Rc::new(content), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_confirm_without_choice_is_ignored() {
        let mut e = engine();
        let mut step = ExerciseStep::current(&e);
        assert_eq!(step.confirm(&mut e), Transition::Ignored);
        assert_eq!(e.state(), SessionState::InProgress { index: 0 });
    }

    #[test]
    fn test_double_confirm_advances_once() {
        let mut e = engine();
        let mut step = ExerciseStep::current(&e);
        step.choose("a");

        assert_eq!(step.confirm(&mut e), Transition::Moved { index: 1 });
        assert_eq!(step.confirm(&mut e), Transition::Ignored);
        assert_eq!(e.state(), SessionState::InProgress { index: 1 });
    }

    #[test]
    fn test_latch_holds_until_back_to_picker() {
        let mut e = engine();
        e.advance("a");
        e.advance("c");
        let mut step = ExerciseStep::current(&e);
        assert_eq!(step.index(), 2);

        step.choose("a");
        assert_eq!(step.confirm(&mut e), Transition::Completed);
        assert_eq!(step.confirm(&mut e), Transition::Ignored);

        // Back on the same exercise, the step that already fired stays latched.
        assert_eq!(e.go_back(), Transition::Ignored);
        e.reset();
        e.advance("a");
        e.advance("c");
        assert_eq!(e.state(), SessionState::InProgress { index: 2 });
        assert_eq!(step.confirm(&mut e), Transition::Ignored);
        assert_eq!(e.state(), SessionState::InProgress { index: 2 });

        step.change_lesson();
        assert_eq!(step.phase(), &StepPhase::Picking);
        step.choose("c");
        assert_eq!(step.confirm(&mut e), Transition::Completed);
        assert_eq!(e.session().selected_lessons.get("e3").map(String::as_str), Some("c"));
    }

    #[test]
    fn test_step_for_other_exercise_is_ignored() {
        let mut e = engine();
        e.advance("a");
        let mut step = ExerciseStep::current(&e);
        step.choose("c");
        assert_eq!(e.go_back(), Transition::Moved { index: 0 });

        assert_eq!(step.confirm(&mut e), Transition::Ignored);
        assert_eq!(e.state(), SessionState::InProgress { index: 0 });
        assert_eq!(e.session().selected_lessons.get("e1").map(String::as_str), Some("a"));
        assert!(!e.session().selected_lessons.contains_key("e2"));
    }

    #[test]
    fn test_new_step_starts_in_picker() {
        let mut e = engine();
        let mut step = ExerciseStep::current(&e);
        step.choose("b");
        step.confirm(&mut e);
        assert_eq!(step.index(), 1);
        assert_eq!(step.phase(), &StepPhase::Picking);
    }

    #[test]
    fn test_choose_random() {
        let e = engine();
        let mut step = ExerciseStep::current(&e);
        let mut rng = StdRng::seed_from_u64(9);
        let id = step.choose_random(&e, &mut rng).unwrap();
        assert!(id == "a" || id == "b");
        assert_eq!(step.phase(), &StepPhase::Reviewing { lesson_id: id });
    }
}
