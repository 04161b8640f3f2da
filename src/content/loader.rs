use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{Exercise, Lesson, MotivationalMessages, ResolvedExercise, TrainingConfig};
use crate::config::FALLBACK_MESSAGE;
use crate::error::ContentError;

const BUNDLED_LESSONS: &str = include_str!("../../content/lessons.yaml");
const BUNDLED_TRAINING: &str = include_str!("../../content/training.yaml");
const BUNDLED_MESSAGES: &str = include_str!("../../content/messages.json");

/// All static content, parsed and resolved once.
///
/// Immutable after construction; engines share it behind an `Rc`.
#[derive(Clone, Debug, Default)]
pub struct ContentModel {
    lessons: Vec<Lesson>,
    by_id: HashMap<String, usize>,
    exercises: Vec<ResolvedExercise>,
    messages: Vec<String>,
}

impl ContentModel {
    /// The content compiled into the binary from `content/`.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_sources(BUNDLED_LESSONS, BUNDLED_TRAINING, BUNDLED_MESSAGES)
    }

    pub fn from_sources(
        lessons_yaml: &str,
        training_yaml: &str,
        messages_json: &str,
    ) -> Result<Self, ContentError> {
        let lessons: Vec<Lesson> = parse_yaml_list(lessons_yaml, "lessons.yaml")?;
        let training: TrainingConfig = if training_yaml.trim().is_empty() {
            TrainingConfig { exercises: Vec::new() }
        } else {
            serde_yaml::from_str(training_yaml).map_err(|error| ContentError::Yaml {
                source_name: "training.yaml",
                error,
            })?
        };
        let messages: MotivationalMessages = if messages_json.trim().is_empty() {
            MotivationalMessages::default()
        } else {
            serde_json::from_str(messages_json).map_err(|error| ContentError::Json {
                source_name: "messages.json",
                error,
            })?
        };

        Ok(Self::new(lessons, &training.exercises, messages.messages))
    }

    /// Build from already-parsed parts. Duplicate lesson ids keep the first
    /// occurrence; exercise references to unknown lessons are dropped.
    pub fn new(lessons: Vec<Lesson>, exercises: &[Exercise], messages: Vec<String>) -> Self {
        let mut kept: Vec<Lesson> = Vec::with_capacity(lessons.len());
        let mut by_id: HashMap<String, usize> = HashMap::new();

        for lesson in lessons {
            if by_id.contains_key(&lesson.id) {
                tracing::warn!("Duplicate lesson ID \"{}\", using first occurrence", lesson.id);
                continue;
            }
            by_id.insert(lesson.id.clone(), kept.len());
            kept.push(lesson);
        }

        let mut model = ContentModel {
            lessons: kept,
            by_id,
            exercises: Vec::new(),
            messages,
        };
        model.exercises = exercises.iter().map(|e| model.resolve(e)).collect();
        model
    }

    fn resolve(&self, exercise: &Exercise) -> ResolvedExercise {
        let mut lessons = Vec::with_capacity(exercise.lessons.len());
        for lesson_id in &exercise.lessons {
            match self.lesson(lesson_id) {
                Some(lesson) => lessons.push(lesson.clone()),
                None => tracing::error!(
                    "Exercise \"{}\" references unknown lesson \"{}\"",
                    exercise.id,
                    lesson_id
                ),
            }
        }

        ResolvedExercise {
            id: exercise.id.clone(),
            title: exercise.title.clone(),
            description: exercise.description.clone(),
            lessons,
        }
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.by_id.get(id).map(|&idx| &self.lessons[idx])
    }

    pub fn exercises(&self) -> &[ResolvedExercise] {
        &self.exercises
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// A motivational line for the completion screen.
    pub fn pick_message<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.messages
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(FALLBACK_MESSAGE)
    }
}

/// An empty or `null` document is an empty list.
fn parse_yaml_list<T: serde::de::DeserializeOwned>(
    text: &str,
    source_name: &'static str,
) -> Result<Vec<T>, ContentError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: Option<Vec<T>> =
        serde_yaml::from_str(text).map_err(|error| ContentError::Yaml { source_name, error })?;
    Ok(parsed.unwrap_or_default())
}
