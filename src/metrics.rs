//! Workout metrics: estimated duration, difficulty rating, and the
//! metabolic/strength scores surfaced on a generated workout.

use crate::models::archetype::WorkoutArchetype;
use crate::models::profile::FitnessLevel;
use crate::models::workout::{ExerciseInstance, WorkoutBlock};

/// Seconds of work assumed per rep when an instance is rep-based.
const SECONDS_PER_REP: u32 = 3;

/// ---------------------------------------------------------------------------
/// Duration
/// ---------------------------------------------------------------------------

/// Total estimated session length in minutes, rounded to the nearest minute.
pub fn estimate_duration_min(blocks: &[WorkoutBlock]) -> u32 {
  let total_seconds: u32 = blocks.iter().map(block_seconds).sum();
  ((total_seconds as f64) / 60.0).round() as u32
}

fn block_seconds(block: &WorkoutBlock) -> u32 {
  let one_round: u32 = block.exercises.iter().map(instance_seconds).sum();
  match block.rounds {
    Some(rounds) if rounds > 1 => {
      one_round * rounds + block.rest_between_rounds.unwrap_or(0) * (rounds - 1)
    }
    _ => one_round,
  }
}

fn instance_seconds(instance: &ExerciseInstance) -> u32 {
  let work = instance
    .duration_seconds
    .or_else(|| instance.reps.map(|r| r * SECONDS_PER_REP))
    .unwrap_or(0)
    * instance.sets;

  // Superset members rest after every set (the group rest lives on the last
  // member); standalone exercises skip the rest after the final set.
  let rest_sets = if instance.superset_group.is_some() {
    instance.sets
  } else {
    instance.sets.saturating_sub(1)
  };

  work + instance.rest_seconds * rest_sets
}

/// ---------------------------------------------------------------------------
/// Difficulty and Scores
/// ---------------------------------------------------------------------------

/// Average per-exercise difficulty, rounded and clamped to 1-10.
///
/// Each instance contributes a base of 3/5/8 by exercise difficulty tier,
/// +2 when the target RPE is 8 or higher, +1 when it sits in a superset.
pub fn difficulty_rating(blocks: &[WorkoutBlock]) -> u8 {
  let instances: Vec<&ExerciseInstance> =
    blocks.iter().flat_map(|b| b.exercises.iter()).collect();
  if instances.is_empty() {
    return 1;
  }

  let total: u32 = instances.iter().map(|i| instance_difficulty(i)).sum();
  let average = total as f64 / instances.len() as f64;
  (average.round() as u8).clamp(1, 10)
}

fn instance_difficulty(instance: &ExerciseInstance) -> u32 {
  let mut score = match instance.exercise.difficulty {
    FitnessLevel::Beginner => 3,
    FitnessLevel::Intermediate => 5,
    FitnessLevel::Advanced => 8,
  };
  if instance.target_rpe.is_some_and(|rpe| rpe >= 8.0) {
    score += 2;
  }
  if instance.superset_group.is_some() {
    score += 1;
  }
  score
}

/// The archetype's emphasis weights projected onto a 0-100 scale.
pub fn emphasis_scores(archetype: &WorkoutArchetype) -> (f64, f64) {
  (
    archetype.metabolic_emphasis * 100.0,
    archetype.strength_emphasis * 100.0,
  )
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::workout::BlockKind;
  use crate::test_utils::{instance_for, test_exercise};

  fn bare_block(kind: BlockKind, exercises: Vec<ExerciseInstance>) -> WorkoutBlock {
    WorkoutBlock {
      name: kind.to_string(),
      order: 0,
      kind,
      exercises,
      rounds: None,
      rest_between_rounds: None,
    }
  }

  #[test]
  fn test_rep_based_instance_uses_three_seconds_per_rep() {
    let mut instance = instance_for(test_exercise("push_up"));
    instance.sets = 3;
    instance.reps = Some(10);
    instance.duration_seconds = None;
    instance.rest_seconds = 60;

    // 3 sets x 10 reps x 3s + 2 x 60s rest = 210s
    assert_eq!(instance_seconds(&instance), 210);
  }

  #[test]
  fn test_superset_member_rests_after_every_set() {
    let mut instance = instance_for(test_exercise("push_up"));
    instance.sets = 1;
    instance.reps = None;
    instance.duration_seconds = Some(60);
    instance.rest_seconds = 30;
    instance.superset_group = Some(1);

    assert_eq!(instance_seconds(&instance), 90);
  }

  #[test]
  fn test_rounds_multiply_block_time() {
    let mut instance = instance_for(test_exercise("high_knees"));
    instance.sets = 1;
    instance.reps = None;
    instance.duration_seconds = Some(30);
    instance.rest_seconds = 60;

    let mut block = bare_block(BlockKind::MetabolicCircuit, vec![instance]);
    block.rounds = Some(2);
    block.rest_between_rounds = Some(90);

    // (30 + 0 rest after final set) x 2 rounds + 90s between = 150s
    assert_eq!(block_seconds(&block), 150);
  }

  #[test]
  fn test_duration_rounds_to_nearest_minute() {
    let mut instance = instance_for(test_exercise("plank"));
    instance.sets = 1;
    instance.reps = None;
    instance.duration_seconds = Some(100);
    instance.rest_seconds = 0;

    let blocks = vec![bare_block(BlockKind::Strength, vec![instance])];
    assert_eq!(estimate_duration_min(&blocks), 2);
  }

  #[test]
  fn test_difficulty_empty_workout_floors_at_one() {
    assert_eq!(difficulty_rating(&[]), 1);
  }

  #[test]
  fn test_difficulty_adds_rpe_and_superset_bonuses() {
    let mut hard = instance_for(test_exercise("burpees"));
    hard.exercise.difficulty = FitnessLevel::Intermediate;
    hard.target_rpe = Some(8.5);
    hard.superset_group = Some(1);

    // 5 base + 2 rpe + 1 superset = 8
    let blocks = vec![bare_block(BlockKind::Supersets, vec![hard])];
    assert_eq!(difficulty_rating(&blocks), 8);
  }

  #[test]
  fn test_emphasis_scores_scale_to_hundred() {
    let archetype = WorkoutArchetype::fallback_default();
    let (metabolic, strength) = emphasis_scores(&archetype);
    assert_eq!(metabolic, 50.0);
    assert_eq!(strength, 50.0);
  }
}
