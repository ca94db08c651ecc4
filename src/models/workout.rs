//! Assembled workout structures exchanged with the calling system.
//!
//! A `GeneratedWorkout` lives for one session: created by `generate`,
//! optionally rewritten by `adapt` calls, then persisted or discarded by
//! the caller.

use serde::{Deserialize, Serialize};

use crate::models::exercise::Exercise;

/// ---------------------------------------------------------------------------
/// Block Kinds
/// ---------------------------------------------------------------------------

/// Closed set of block-type tokens an archetype template may contain.
/// Adding a kind means adding a strategy row in the builder's table, not a
/// new branch in a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
  Warmup,
  Strength,
  MetabolicCircuit,
  Cooldown,
  MobilityFlow,
  AccessoryWork,
  /// Time-boxed superset block emitted by dynamic mode.
  Supersets,
}

impl std::fmt::Display for BlockKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Self::Warmup => "Warm-Up",
      Self::Strength => "Strength",
      Self::MetabolicCircuit => "Metabolic Circuit",
      Self::Cooldown => "Cool-Down",
      Self::MobilityFlow => "Mobility Flow",
      Self::AccessoryWork => "Accessory Work",
      Self::Supersets => "Supersets",
    };
    write!(f, "{}", name)
  }
}

/// ---------------------------------------------------------------------------
/// Exercise Instances and Blocks
/// ---------------------------------------------------------------------------

/// An exercise plus its session parameters. Created by the block builder;
/// only the adaptation engine touches it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseInstance {
  pub exercise: Exercise,
  pub sets: u32,
  pub reps: Option<u32>,
  pub reps_min: Option<u32>,
  pub reps_max: Option<u32>,
  pub weight_kg: Option<f64>,
  pub duration_seconds: Option<u32>,
  pub rest_seconds: u32,
  /// Superset membership: A=1, B=2, ... None outside supersets.
  pub superset_group: Option<u8>,
  pub target_rpe: Option<f64>,
}

impl ExerciseInstance {
  pub fn exercise_id(&self) -> &str {
    &self.exercise.id
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutBlock {
  pub name: String,
  pub order: u32,
  pub kind: BlockKind,
  pub exercises: Vec<ExerciseInstance>,
  pub rounds: Option<u32>,
  pub rest_between_rounds: Option<u32>,
}

/// ---------------------------------------------------------------------------
/// Generated Workout
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedWorkout {
  pub id: String,
  pub name: String,
  pub description: String,
  pub archetype_id: String,
  pub blocks: Vec<WorkoutBlock>,
  pub coaching_notes: String,
  pub estimated_duration_min: u32,
  /// 1-10.
  pub difficulty_rating: u8,
  pub metabolic_score: f64,
  pub strength_score: f64,
}

impl GeneratedWorkout {
  /// Locate an instance by exercise id across all blocks.
  pub fn find_instance(&self, exercise_id: &str) -> Option<&ExerciseInstance> {
    self
      .instances()
      .find(|instance| instance.exercise_id() == exercise_id)
  }

  pub fn contains_exercise(&self, exercise_id: &str) -> bool {
    self.find_instance(exercise_id).is_some()
  }

  pub fn instances(&self) -> impl Iterator<Item = &ExerciseInstance> {
    self.blocks.iter().flat_map(|b| b.exercises.iter())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{instance_for, test_exercise};

  #[test]
  fn test_find_instance_across_blocks() {
    let workout = GeneratedWorkout {
      id: "wkt-1".to_string(),
      name: "Test".to_string(),
      description: String::new(),
      archetype_id: "full_body".to_string(),
      blocks: vec![
        WorkoutBlock {
          name: "Warm-Up".to_string(),
          order: 0,
          kind: BlockKind::Warmup,
          exercises: vec![instance_for(test_exercise("jumping_jacks"))],
          rounds: None,
          rest_between_rounds: None,
        },
        WorkoutBlock {
          name: "Strength".to_string(),
          order: 1,
          kind: BlockKind::Strength,
          exercises: vec![instance_for(test_exercise("deep_squat"))],
          rounds: None,
          rest_between_rounds: None,
        },
      ],
      coaching_notes: String::new(),
      estimated_duration_min: 30,
      difficulty_rating: 4,
      metabolic_score: 50.0,
      strength_score: 50.0,
    };

    let found = workout.find_instance("deep_squat").unwrap();
    assert_eq!(found.exercise_id(), "deep_squat");
    assert!(workout.find_instance("burpees").is_none());
    assert!(workout.contains_exercise("jumping_jacks"));
  }
}
