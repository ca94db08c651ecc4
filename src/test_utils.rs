//! Test utilities and helpers
//!
//! Mock data factories and fixture catalogs shared across the unit tests.
//! Only compiled for tests.

use chrono::{Duration, Utc};
use std::collections::BTreeSet;

use crate::catalog::builtin_exercises;
use crate::models::exercise::{Exercise, ExerciseType, Intensity, Mechanic};
use crate::models::history::PerformanceRecord;
use crate::models::workout::{BlockKind, ExerciseInstance, GeneratedWorkout, WorkoutBlock};

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// A plain beginner bodyweight strength exercise with the given id.
pub fn test_exercise(id: &str) -> Exercise {
  Exercise {
    id: id.to_string(),
    name: id.replace('_', " "),
    exercise_type: ExerciseType::Strength,
    intensity: Intensity::Moderate,
    primary_muscles: vec!["full_body".to_string()],
    secondary_muscles: vec![],
    equipment: BTreeSet::from(["bodyweight".to_string()]),
    contraindications: BTreeSet::new(),
    difficulty: crate::models::FitnessLevel::Beginner,
    movement_patterns: vec![],
    mechanic: Mechanic::Compound,
    progression_pathway: vec![],
  }
}

/// An exercise instance with unremarkable defaults; tests override the
/// fields they care about.
pub fn instance_for(exercise: Exercise) -> ExerciseInstance {
  ExerciseInstance {
    exercise,
    sets: 3,
    reps: Some(10),
    reps_min: None,
    reps_max: None,
    weight_kg: None,
    duration_seconds: None,
    rest_seconds: 60,
    superset_group: None,
    target_rpe: None,
  }
}

/// A single-block workout wrapping the given instances.
pub fn workout_with_instances(instances: Vec<ExerciseInstance>) -> GeneratedWorkout {
  GeneratedWorkout {
    id: "wkt-test0001".to_string(),
    name: "Test Session".to_string(),
    description: String::new(),
    archetype_id: "full_body_fitness".to_string(),
    blocks: vec![WorkoutBlock {
      name: BlockKind::Strength.to_string(),
      order: 0,
      kind: BlockKind::Strength,
      exercises: instances,
      rounds: None,
      rest_between_rounds: None,
    }],
    coaching_notes: String::new(),
    estimated_duration_min: 0,
    difficulty_rating: 1,
    metabolic_score: 50.0,
    strength_score: 50.0,
  }
}

/// A logged session `days_ago` days back with a uniform per-set RPE.
pub fn performance_record(
  exercise_id: &str,
  days_ago: i64,
  completion_rate: f64,
  load_kg: f64,
  rpe: f64,
) -> PerformanceRecord {
  PerformanceRecord {
    exercise_id: exercise_id.to_string(),
    performed_at: Utc::now() - Duration::days(days_ago),
    sets_completed: 3,
    reps_per_set: vec![10, 10, 10],
    load_kg,
    rpe_per_set: vec![rpe, rpe, rpe],
    completion_rate,
    form_score: Some(8.0),
    progression_level: Some(1),
    mastered: false,
  }
}

/// ---------------------------------------------------------------------------
/// Fixture Catalog
/// ---------------------------------------------------------------------------

/// Built-in rows trimmed to a pool where a 30-minute dynamic session places
/// every remaining strength candidate, so substitution outcomes are fully
/// determined regardless of shuffle order.
pub fn fixture_catalog() -> Vec<Exercise> {
  const IDS: &[&str] = &[
    "march_in_place",
    "leg_swings",
    "arm_circles",
    "deep_squat",
    "split_squat",
    "wall_sit",
    "glute_bridge",
    "push_up",
    "plank",
    "hamstring_stretch",
    "quad_stretch",
    "child_pose",
  ];

  builtin_exercises()
    .into_iter()
    .filter(|e| IDS.contains(&e.id.as_str()))
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fixture_catalog_covers_every_block_kind() {
    let catalog = fixture_catalog();
    assert_eq!(catalog.len(), 12);

    let strength = catalog
      .iter()
      .filter(|e| e.exercise_type == ExerciseType::Strength)
      .count();
    assert_eq!(strength, 6);
    assert!(catalog.iter().any(|e| e.exercise_type == ExerciseType::Cardio));
    assert!(catalog.iter().any(|e| e.exercise_type == ExerciseType::Stretching));
  }

  #[test]
  fn test_performance_record_factory() {
    let record = performance_record("deep_squat", 7, 0.9, 60.0, 7.0);
    assert_eq!(record.average_rpe(), Some(7.0));
    assert!((record.effective_work() - 54.0).abs() < 1e-9);
  }
}
