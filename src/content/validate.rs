//! Build-time content checks.
//!
//! The runtime loader is forgiving (duplicates and dangling references are
//! logged and skipped). This validator is strict: it reports every problem so
//! a build can refuse to ship broken content.

use std::collections::HashSet;

use serde::Serialize;
use serde_yaml::Value;

use super::types::{Exercise, Lesson};
use crate::video::youtube_video_id;

const LESSON_KEYS: [&str; 7] = ["id", "type", "title", "description", "difficulty", "youtubeUrl", "links"];
const EXERCISE_KEYS: [&str; 4] = ["id", "title", "description", "lessons"];

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ValidationIssue {
    /// `lessons.yaml`, `training.yaml` or `references`.
    pub section: &'static str,
    pub message: String,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub lesson_count: usize,
    pub exercise_count: usize,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors_in(&self, section: &str) -> impl Iterator<Item = &ValidationIssue> + '_ {
        let section = section.to_string();
        self.errors.iter().filter(move |e| e.section == section)
    }

    fn error(&mut self, section: &'static str, message: String) {
        self.errors.push(ValidationIssue { section, message });
    }
}

/// `^[a-z0-9]+(-[a-z0-9]+)*$`
fn is_kebab_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('-')
        && !id.ends_with('-')
        && !id.contains("--")
        && id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false)
}

fn unknown_keys(entry: &Value, allowed: &[&str]) -> Vec<String> {
    match entry.as_mapping() {
        Some(map) => map
            .keys()
            .filter_map(|k| k.as_str())
            .filter(|k| !allowed.contains(k))
            .map(|k| k.to_string())
            .collect(),
        None => Vec::new(),
    }
}

fn entry_label(entry: &Value, index: usize) -> String {
    match entry.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => format!("\"{}\"", id),
        _ => format!("(entry {})", index + 1),
    }
}

pub fn validate_content(lessons_yaml: &str, training_yaml: &str) -> ValidationReport {
    let mut report = ValidationReport::default();
    let lesson_ids = validate_lessons(lessons_yaml, &mut report);
    validate_training(training_yaml, lesson_ids.as_ref(), &mut report);
    report
}

/// Returns the set of lesson ids seen, or `None` if the document is unusable.
fn validate_lessons(text: &str, report: &mut ValidationReport) -> Option<HashSet<String>> {
    const SECTION: &str = "lessons.yaml";

    let doc: Value = match serde_yaml::from_str(text) {
        Ok(doc) => doc,
        Err(e) => {
            report.error(SECTION, format!("YAML syntax error: {}", e));
            return None;
        }
    };
    let entries = match doc {
        Value::Sequence(entries) => entries,
        Value::Null => Vec::new(),
        _ => {
            report.error(SECTION, "must be a YAML list of lesson objects".to_string());
            return None;
        }
    };

    report.lesson_count = entries.len();
    let mut ids = HashSet::new();

    for (i, entry) in entries.iter().enumerate() {
        let label = entry_label(entry, i);

        if let Some(id) = entry.get("id").and_then(Value::as_str) {
            if !ids.insert(id.to_string()) {
                report.error(SECTION, format!("Duplicate lesson ID: {}", label));
            }
        }

        for key in unknown_keys(entry, &LESSON_KEYS) {
            report.error(SECTION, format!("Lesson {}: unknown field \"{}\"", label, key));
        }

        let lesson: Lesson = match serde_yaml::from_value(entry.clone()) {
            Ok(lesson) => lesson,
            Err(e) => {
                report.error(SECTION, format!("Lesson {}: {}", label, e));
                continue;
            }
        };

        if !is_kebab_id(&lesson.id) {
            report.error(SECTION, format!("Lesson {}: id must be lowercase kebab-case", label));
        }
        if lesson.title.trim().is_empty() {
            report.error(SECTION, format!("Lesson {}: title must not be empty", label));
        }
        if let Some(url) = &lesson.youtube_url {
            if youtube_video_id(url).is_none() {
                report.error(SECTION, format!("Lesson {}: youtubeUrl is not a YouTube video link", label));
            }
        }
        for (j, link) in lesson.links.iter().enumerate() {
            if link.title.trim().is_empty() {
                report.error(SECTION, format!("Lesson {}: link {} has an empty title", label, j + 1));
            }
            if !is_http_url(&link.url) {
                report.error(SECTION, format!("Lesson {}: link {} url must be http(s)", label, j + 1));
            }
        }
    }

    Some(ids)
}

fn validate_training(text: &str, lesson_ids: Option<&HashSet<String>>, report: &mut ValidationReport) {
    const SECTION: &str = "training.yaml";

    let doc: Value = match serde_yaml::from_str(text) {
        Ok(doc) => doc,
        Err(e) => {
            report.error(SECTION, format!("YAML syntax error: {}", e));
            return;
        }
    };
    let entries = match doc.get("exercises").and_then(Value::as_sequence) {
        Some(entries) => entries,
        None => {
            report.error(SECTION, "must contain an `exercises` list".to_string());
            return;
        }
    };

    report.exercise_count = entries.len();
    if entries.is_empty() {
        report.error(SECTION, "`exercises` must contain at least one exercise".to_string());
    }

    let mut exercise_ids = HashSet::new();
    for (i, entry) in entries.iter().enumerate() {
        let label = entry_label(entry, i);

        for key in unknown_keys(entry, &EXERCISE_KEYS) {
            report.error(SECTION, format!("Exercise {}: unknown field \"{}\"", label, key));
        }

        let exercise: Exercise = match serde_yaml::from_value(entry.clone()) {
            Ok(exercise) => exercise,
            Err(e) => {
                report.error(SECTION, format!("Exercise {}: {}", label, e));
                continue;
            }
        };

        if exercise.id.trim().is_empty() {
            report.error(SECTION, format!("Exercise {}: id must not be empty", label));
        } else if !exercise_ids.insert(exercise.id.clone()) {
            report.error(SECTION, format!("Duplicate exercise ID: {}", label));
        }
        if exercise.title.trim().is_empty() {
            report.error(SECTION, format!("Exercise {}: title must not be empty", label));
        }
        if exercise.lessons.is_empty() {
            report.error(SECTION, format!("Exercise {}: must reference at least one lesson", label));
        }

        if let Some(known) = lesson_ids {
            for lesson_id in &exercise.lessons {
                if !known.contains(lesson_id) {
                    report.error(
                        "references",
                        format!(
                            "Exercise \"{}\" references unknown lesson \"{}\"",
                            exercise.id, lesson_id
                        ),
                    );
                }
            }
        }
    }
}
