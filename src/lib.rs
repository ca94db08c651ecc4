//! Adaptive training plan engine.
//!
//! A stateless core that turns a user profile, an exercise catalog, and an
//! optional readiness score into a generated workout, then applies live
//! session feedback to it. The public surface is [`engine::PlanEngine`] plus
//! the JSON boundary in [`api`].

pub mod adaptation;
pub mod api;
pub mod builder;
pub mod catalog;
pub mod coaching;
pub mod config;
pub mod engine;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod overload;
pub mod readiness;
pub mod safety;
pub mod selector;

#[cfg(test)]
pub mod test_utils;

pub use adaptation::{AdaptationEngine, DifficultyFeedback, SessionFeedback};
pub use api::{handle_request, EngineRequest};
pub use catalog::{ExerciseCatalog, StaticCatalog};
pub use coaching::{ClaudeNotesGenerator, NotesGenerator, TemplatedNotesGenerator};
pub use config::EngineTables;
pub use engine::PlanEngine;
pub use errors::EngineError;
pub use models::{Exercise, GeneratedWorkout, UserProfile, WorkoutArchetype};
pub use safety::{SafetyAssessment, SafetyFilter, SafetyLevel};
