//! Exercise reference data.
//!
//! Exercises are immutable catalog rows; the engine reads them and never
//! writes them back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::profile::FitnessLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
  Strength,
  Cardio,
  Stretching,
  Plyometrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
  Low,
  Moderate,
  High,
}

/// Compound lifts anchor strength blocks; isolation work fills accessory slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanic {
  Compound,
  Isolation,
}

/// One step of an exercise's progression pathway (e.g. push_up -> decline
/// push_up). Consumed by the overload calculator's progression rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionStep {
  pub exercise_id: String,
  /// Weeks to spend at this step before reassessing; 2 weeks when unset.
  pub mastery_weeks: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: String,
  pub name: String,
  pub exercise_type: ExerciseType,
  pub intensity: Intensity,
  pub primary_muscles: Vec<String>,
  #[serde(default)]
  pub secondary_muscles: Vec<String>,
  /// Equipment tags required to perform this exercise.
  #[serde(default)]
  pub equipment: BTreeSet<String>,
  /// Medical-condition tags under which this exercise must not be prescribed.
  #[serde(default)]
  pub contraindications: BTreeSet<String>,
  pub difficulty: FitnessLevel,
  /// Movement-pattern tags ("squat", "push", "static", ...). Substitutions
  /// require at least one shared tag.
  #[serde(default)]
  pub movement_patterns: Vec<String>,
  pub mechanic: Mechanic,
  #[serde(default)]
  pub progression_pathway: Vec<ProgressionStep>,
}

impl Exercise {
  pub fn is_compound(&self) -> bool {
    self.mechanic == Mechanic::Compound
  }

  /// At least one movement-pattern tag in common.
  pub fn shares_pattern(&self, other: &Exercise) -> bool {
    self
      .movement_patterns
      .iter()
      .any(|p| other.movement_patterns.contains(p))
  }

  /// At least one primary muscle group in common.
  pub fn shares_primary_muscle(&self, other: &Exercise) -> bool {
    self
      .primary_muscles
      .iter()
      .any(|m| other.primary_muscles.contains(m))
  }

  /// The next progression step, if a pathway is defined.
  pub fn next_progression_step(&self) -> Option<&ProgressionStep> {
    self.progression_pathway.first()
  }

  /// Whether the user's equipment covers this exercise's requirements.
  pub fn equipment_available(&self, available: &BTreeSet<String>) -> bool {
    self.equipment.iter().all(|tag| available.contains(tag))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  fn squat(id: &str, patterns: &[&str]) -> Exercise {
    Exercise {
      id: id.to_string(),
      name: id.to_string(),
      exercise_type: ExerciseType::Strength,
      intensity: Intensity::Moderate,
      primary_muscles: vec!["quadriceps".to_string()],
      secondary_muscles: vec![],
      equipment: BTreeSet::from(["bodyweight".to_string()]),
      contraindications: BTreeSet::new(),
      difficulty: FitnessLevel::Beginner,
      movement_patterns: patterns.iter().map(|s| s.to_string()).collect(),
      mechanic: Mechanic::Compound,
      progression_pathway: vec![],
    }
  }

  #[test]
  fn test_shares_pattern() {
    let a = squat("deep_squat", &["squat", "knee_dominant"]);
    let b = squat("split_squat", &["squat", "lunge"]);
    let c = squat("glute_bridge", &["hinge"]);

    assert!(a.shares_pattern(&b));
    assert!(!a.shares_pattern(&c));
  }

  #[test]
  fn test_equipment_available() {
    let mut ex = squat("goblet_squat", &["squat"]);
    ex.equipment = BTreeSet::from(["dumbbell".to_string()]);

    let bodyweight_only = BTreeSet::from(["bodyweight".to_string()]);
    assert!(!ex.equipment_available(&bodyweight_only));

    let with_dumbbell =
      BTreeSet::from(["bodyweight".to_string(), "dumbbell".to_string()]);
    assert!(ex.equipment_available(&with_dumbbell));
  }
}
