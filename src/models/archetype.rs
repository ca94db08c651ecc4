//! Workout archetypes: named templates defining block ordering and emphasis.
//!
//! Archetypes are selected per generation call and never mutated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::profile::{FitnessLevel, Goal};
use crate::models::workout::BlockKind;

/// Inclusive readiness-score eligibility range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadinessRange {
  pub min: f64,
  pub max: f64,
}

impl ReadinessRange {
  pub fn new(min: f64, max: f64) -> Self {
    Self { min, max }
  }

  pub fn contains(&self, score: f64) -> bool {
    score >= self.min && score <= self.max
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutArchetype {
  pub id: String,
  pub name: String,
  pub description: String,
  pub goals: BTreeSet<Goal>,
  pub levels: BTreeSet<FitnessLevel>,
  pub readiness_range: ReadinessRange,
  /// Ordered block-type template instantiated by the block builder.
  pub blocks: Vec<BlockKind>,
  /// Emphasis weights in [0, 1].
  pub metabolic_emphasis: f64,
  pub strength_emphasis: f64,
}

impl WorkoutArchetype {
  /// Goal and fitness-level eligibility, ignoring readiness.
  pub fn matches_profile(&self, goal: Goal, level: FitnessLevel) -> bool {
    self.goals.contains(&goal) && self.levels.contains(&level)
  }

  pub fn readiness_eligible(&self, score: f64) -> bool {
    self.readiness_range.contains(score)
  }

  /// Hard-coded fallback when no catalog archetype matches at all.
  pub fn fallback_default() -> Self {
    Self {
      id: "full_body_fitness".to_string(),
      name: "Full Body Fitness".to_string(),
      description: "Balanced full-body session".to_string(),
      goals: BTreeSet::from([
        Goal::LoseWeight,
        Goal::BuildMuscle,
        Goal::ImproveEndurance,
        Goal::IncreaseStrength,
        Goal::GeneralFitness,
      ]),
      levels: BTreeSet::from([
        FitnessLevel::Beginner,
        FitnessLevel::Intermediate,
        FitnessLevel::Advanced,
      ]),
      readiness_range: ReadinessRange::new(0.0, 100.0),
      blocks: vec![
        BlockKind::Warmup,
        BlockKind::Strength,
        BlockKind::MetabolicCircuit,
        BlockKind::Cooldown,
      ],
      metabolic_emphasis: 0.5,
      strength_emphasis: 0.5,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_readiness_range_inclusive() {
    let range = ReadinessRange::new(50.0, 100.0);
    assert!(range.contains(50.0));
    assert!(range.contains(100.0));
    assert!(!range.contains(49.9));
  }

  #[test]
  fn test_fallback_default_is_fifty_fifty() {
    let fallback = WorkoutArchetype::fallback_default();
    assert_eq!(fallback.name, "Full Body Fitness");
    assert_eq!(fallback.metabolic_emphasis, 0.5);
    assert_eq!(fallback.strength_emphasis, 0.5);
    assert!(fallback.matches_profile(Goal::GeneralFitness, FitnessLevel::Beginner));
  }
}
