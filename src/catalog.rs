//! Exercise candidate source.
//!
//! The catalog is an external collaborator behind an async trait; the engine
//! only reads approved rows. A built-in library backs `StaticCatalog` and
//! doubles as the availability fallback when a remote catalog query fails.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::errors::EngineError;
use crate::models::exercise::{Exercise, ExerciseType, Intensity, Mechanic, ProgressionStep};
use crate::models::profile::FitnessLevel;

/// ---------------------------------------------------------------------------
/// Catalog Trait
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
  /// All approved exercise rows. A failure here never fails generation;
  /// the engine falls back to the built-in library.
  async fn approved_exercises(&self) -> Result<Vec<Exercise>, EngineError>;
}

/// In-memory catalog snapshot.
pub struct StaticCatalog {
  exercises: Vec<Exercise>,
}

impl StaticCatalog {
  pub fn new(exercises: Vec<Exercise>) -> Self {
    Self { exercises }
  }

  pub fn builtin() -> Self {
    Self::new(builtin_exercises())
  }
}

#[async_trait]
impl ExerciseCatalog for StaticCatalog {
  async fn approved_exercises(&self) -> Result<Vec<Exercise>, EngineError> {
    Ok(self.exercises.clone())
  }
}

/// ---------------------------------------------------------------------------
/// Built-in Exercise Library
/// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn exercise(
  id: &str,
  name: &str,
  exercise_type: ExerciseType,
  intensity: Intensity,
  mechanic: Mechanic,
  difficulty: FitnessLevel,
  primary: &[&str],
  secondary: &[&str],
  equipment: &[&str],
  patterns: &[&str],
  contraindications: &[&str],
) -> Exercise {
  Exercise {
    id: id.to_string(),
    name: name.to_string(),
    exercise_type,
    intensity,
    primary_muscles: primary.iter().map(|s| s.to_string()).collect(),
    secondary_muscles: secondary.iter().map(|s| s.to_string()).collect(),
    equipment: equipment.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
    contraindications: contraindications
      .iter()
      .map(|s| s.to_string())
      .collect::<BTreeSet<_>>(),
    difficulty,
    movement_patterns: patterns.iter().map(|s| s.to_string()).collect(),
    mechanic,
    progression_pathway: Vec::new(),
  }
}

fn step(exercise_id: &str, mastery_weeks: Option<u32>) -> ProgressionStep {
  ProgressionStep {
    exercise_id: exercise_id.to_string(),
    mastery_weeks,
  }
}

/// The seeded exercise library.
pub fn builtin_exercises() -> Vec<Exercise> {
  use ExerciseType::{Cardio, Plyometrics, Strength, Stretching};
  use FitnessLevel::{Advanced, Beginner, Intermediate};
  use Intensity::{High, Low, Moderate};
  use Mechanic::{Compound, Isolation};

  let mut exercises = vec![
    // Light cardio (warm-up pool)
    exercise(
      "jumping_jacks", "Jumping Jacks", Cardio, Low, Compound, Beginner,
      &["full_body"], &[], &["bodyweight"], &["locomotion"], &[],
    ),
    exercise(
      "march_in_place", "March in Place", Cardio, Low, Compound, Beginner,
      &["hip_flexors"], &["calves"], &["bodyweight"], &["locomotion"], &[],
    ),
    // Dynamic stretches
    exercise(
      "leg_swings", "Leg Swings", Stretching, Low, Isolation, Beginner,
      &["hip_flexors"], &["hamstrings"], &["bodyweight"], &["dynamic"], &[],
    ),
    exercise(
      "arm_circles", "Arm Circles", Stretching, Low, Isolation, Beginner,
      &["shoulders"], &[], &["bodyweight"], &["dynamic"], &[],
    ),
    exercise(
      "cat_cow", "Cat-Cow", Stretching, Low, Isolation, Beginner,
      &["spine"], &["core"], &["bodyweight"], &["dynamic", "mobility"], &[],
    ),
    exercise(
      "torso_twists", "Torso Twists", Stretching, Low, Isolation, Beginner,
      &["obliques"], &["spine"], &["bodyweight"], &["dynamic", "mobility"], &[],
    ),
    // Bodyweight strength
    exercise(
      "deep_squat", "Deep Squat", Strength, Moderate, Compound, Beginner,
      &["quadriceps", "glutes"], &["core"], &["bodyweight"], &["squat"], &[],
    ),
    exercise(
      "split_squat", "Split Squat", Strength, Moderate, Compound, Beginner,
      &["quadriceps", "glutes"], &["hamstrings"], &["bodyweight"], &["squat", "lunge"], &[],
    ),
    exercise(
      "wall_sit", "Wall Sit", Strength, Low, Isolation, Beginner,
      &["quadriceps"], &[], &["bodyweight"], &["squat", "isometric"], &[],
    ),
    exercise(
      "reverse_lunge", "Reverse Lunge", Strength, Moderate, Compound, Beginner,
      &["quadriceps", "glutes"], &["hamstrings"], &["bodyweight"], &["lunge"], &[],
    ),
    exercise(
      "glute_bridge", "Glute Bridge", Strength, Low, Isolation, Beginner,
      &["glutes"], &["hamstrings"], &["bodyweight"], &["hinge"], &[],
    ),
    exercise(
      "incline_push_up", "Incline Push-Up", Strength, Low, Compound, Beginner,
      &["chest", "triceps"], &["shoulders"], &["bodyweight"], &["push"], &[],
    ),
    exercise(
      "push_up", "Push-Up", Strength, Moderate, Compound, Beginner,
      &["chest", "triceps"], &["core"], &["bodyweight"], &["push"], &[],
    ),
    exercise(
      "decline_push_up", "Decline Push-Up", Strength, High, Compound, Intermediate,
      &["chest", "shoulders"], &["triceps"], &["bodyweight"], &["push"], &[],
    ),
    exercise(
      "plank", "Plank", Strength, Low, Isolation, Beginner,
      &["core"], &["shoulders"], &["bodyweight"], &["core", "isometric"], &[],
    ),
    exercise(
      "side_plank", "Side Plank", Strength, Moderate, Isolation, Intermediate,
      &["obliques", "core"], &[], &["bodyweight"], &["core", "isometric"], &[],
    ),
    exercise(
      "bird_dog", "Bird Dog", Strength, Low, Isolation, Beginner,
      &["core"], &["lower_back"], &["bodyweight"], &["core"], &[],
    ),
    exercise(
      "superman_hold", "Superman Hold", Strength, Low, Isolation, Beginner,
      &["lower_back"], &["glutes"], &["bodyweight"], &["core", "isometric"], &[],
    ),
    // Equipment strength
    exercise(
      "goblet_squat", "Goblet Squat", Strength, Moderate, Compound, Intermediate,
      &["quadriceps", "glutes"], &["core"], &["dumbbell"], &["squat"], &[],
    ),
    exercise(
      "dumbbell_row", "Dumbbell Row", Strength, Moderate, Compound, Beginner,
      &["back", "biceps"], &[], &["dumbbell"], &["pull"], &[],
    ),
    exercise(
      "bench_press", "Bench Press", Strength, High, Compound, Intermediate,
      &["chest", "triceps"], &["shoulders"], &["barbell", "bench"], &["push"], &[],
    ),
    exercise(
      "overhead_press", "Overhead Press", Strength, High, Compound, Intermediate,
      &["shoulders", "triceps"], &[], &["barbell"], &["push", "overhead"],
      &["shoulder_impingement"],
    ),
    exercise(
      "deadlift", "Deadlift", Strength, High, Compound, Advanced,
      &["hamstrings", "glutes"], &["lower_back"], &["barbell"], &["hinge"],
      &["herniated_disc"],
    ),
    exercise(
      "bicep_curl", "Bicep Curl", Strength, Low, Isolation, Beginner,
      &["biceps"], &[], &["dumbbell"], &["pull"], &[],
    ),
    exercise(
      "lateral_raise", "Lateral Raise", Strength, Low, Isolation, Beginner,
      &["shoulders"], &[], &["dumbbell"], &["raise"], &[],
    ),
    // Metabolic pool
    exercise(
      "burpees", "Burpees", Plyometrics, High, Compound, Intermediate,
      &["full_body"], &[], &["bodyweight"], &["squat", "push", "jump"],
      &["heart_condition"],
    ),
    exercise(
      "mountain_climbers", "Mountain Climbers", Cardio, High, Compound, Beginner,
      &["core", "shoulders"], &["hip_flexors"], &["bodyweight"], &["core", "locomotion"], &[],
    ),
    exercise(
      "high_knees", "High Knees", Cardio, High, Compound, Beginner,
      &["hip_flexors", "quadriceps"], &["calves"], &["bodyweight"], &["locomotion"], &[],
    ),
    exercise(
      "butt_kicks", "Butt Kicks", Cardio, High, Compound, Beginner,
      &["hamstrings"], &["calves"], &["bodyweight"], &["locomotion"], &[],
    ),
    exercise(
      "jump_squat", "Jump Squat", Plyometrics, High, Compound, Intermediate,
      &["quadriceps", "glutes"], &["calves"], &["bodyweight"], &["squat", "jump"], &[],
    ),
    exercise(
      "skater_hops", "Skater Hops", Plyometrics, High, Compound, Intermediate,
      &["glutes", "quadriceps"], &["calves"], &["bodyweight"], &["jump", "lateral"], &[],
    ),
    // Static stretches (cool-down pool)
    exercise(
      "hamstring_stretch", "Hamstring Stretch", Stretching, Low, Isolation, Beginner,
      &["hamstrings"], &[], &["bodyweight"], &["static"], &[],
    ),
    exercise(
      "quad_stretch", "Quad Stretch", Stretching, Low, Isolation, Beginner,
      &["quadriceps"], &[], &["bodyweight"], &["static"], &[],
    ),
    exercise(
      "chest_stretch", "Chest Stretch", Stretching, Low, Isolation, Beginner,
      &["chest"], &["shoulders"], &["bodyweight"], &["static"], &[],
    ),
    exercise(
      "child_pose", "Child's Pose", Stretching, Low, Isolation, Beginner,
      &["lower_back"], &["shoulders"], &["bodyweight"], &["static", "mobility"], &[],
    ),
    exercise(
      "calf_stretch", "Calf Stretch", Stretching, Low, Isolation, Beginner,
      &["calves"], &[], &["bodyweight"], &["static"], &[],
    ),
  ];

  // Progression pathways for the pathway-bearing movements
  for ex in &mut exercises {
    match ex.id.as_str() {
      "incline_push_up" => ex.progression_pathway = vec![step("push_up", Some(2))],
      "push_up" => ex.progression_pathway = vec![step("decline_push_up", Some(3))],
      "deep_squat" => ex.progression_pathway = vec![step("jump_squat", Some(2))],
      "split_squat" => ex.progression_pathway = vec![step("goblet_squat", Some(3))],
      _ => {}
    }
  }

  exercises
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_static_catalog_returns_builtin_rows() {
    let catalog = StaticCatalog::builtin();
    let exercises = catalog.approved_exercises().await.unwrap();

    assert!(exercises.len() >= 30);
    assert!(exercises.iter().any(|e| e.id == "deep_squat"));
    assert!(exercises.iter().any(|e| e.id == "burpees"));
  }

  #[test]
  fn test_builtin_ids_are_unique() {
    let exercises = builtin_exercises();
    let mut ids: Vec<_> = exercises.iter().map(|e| e.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), exercises.len());
  }

  #[test]
  fn test_pathways_reference_real_exercises() {
    let exercises = builtin_exercises();
    for ex in &exercises {
      for step in &ex.progression_pathway {
        assert!(
          exercises.iter().any(|e| e.id == step.exercise_id),
          "{} pathway references unknown exercise {}",
          ex.id,
          step.exercise_id
        );
      }
    }
  }
}
