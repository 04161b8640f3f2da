//! Static lesson and exercise content: types, loading, and build-time checks.

pub mod loader;
pub mod types;
pub mod validate;

pub use loader::ContentModel;
pub use types::{Difficulty, Exercise, Lesson, LessonLink, LessonType, ResolvedExercise};
