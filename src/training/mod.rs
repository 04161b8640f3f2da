//! The guided Training wizard: one lesson per exercise, in order.

pub mod engine;
pub mod session;
pub mod step;

pub use engine::{SessionState, StepProgress, TrainingEngine, TrainingView, Transition};
pub use session::TrainingSession;
pub use step::{ExerciseStep, StepPhase};
