use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LessonType {
    Song,
    DrumBeat,
    Fundamental,
}

impl LessonType {
    /// Display and grouping order.
    pub const ALL: [LessonType; 3] = [LessonType::Song, LessonType::DrumBeat, LessonType::Fundamental];

    pub fn as_str(self) -> &'static str {
        match self {
            LessonType::Song => "song",
            LessonType::DrumBeat => "drum-beat",
            LessonType::Fundamental => "fundamental",
        }
    }

    pub fn parse(s: &str) -> Option<LessonType> {
        LessonType::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LessonLink {
    pub title: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LessonLink>,
}

/// One step of `training.yaml`, lessons still as ids.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub lessons: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrainingConfig {
    pub exercises: Vec<Exercise>,
}

/// An exercise whose lesson ids have been replaced by the lessons they name.
/// Ids that did not resolve are absent.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ResolvedExercise {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub lessons: Vec<Lesson>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MotivationalMessages {
    pub messages: Vec<String>,
}
