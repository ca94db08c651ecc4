//! Injected engine configuration: the archetype catalog and the
//! medical-compatibility table.
//!
//! These are read-only reference tables passed into the selector and the
//! safety filter at construction, never a process-wide singleton, so tests
//! can substitute fixtures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::archetype::{ReadinessRange, WorkoutArchetype};
use crate::models::profile::{FitnessLevel, Goal};
use crate::models::workout::BlockKind;

/// ---------------------------------------------------------------------------
/// Medical Compatibility
/// ---------------------------------------------------------------------------

/// Risk ordering matters: the highest entry across a user's conditions wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityLevel {
  Safe,
  Caution,
  ModifyRequired,
  Contraindicated,
}

/// One row of the (exercise id x medical condition) compatibility table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityEntry {
  pub exercise_id: String,
  pub condition: String,
  pub level: CompatibilityLevel,
  pub note: Option<String>,
}

/// ---------------------------------------------------------------------------
/// Engine Tables
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineTables {
  pub archetypes: Vec<WorkoutArchetype>,
  pub compatibility: Vec<CompatibilityEntry>,
}

impl EngineTables {
  pub fn new(
    archetypes: Vec<WorkoutArchetype>,
    compatibility: Vec<CompatibilityEntry>,
  ) -> Self {
    Self {
      archetypes,
      compatibility,
    }
  }

  /// Highest-risk compatibility entry for an exercise across the given
  /// conditions, with the condition that produced it.
  pub fn highest_risk(
    &self,
    exercise_id: &str,
    conditions: &BTreeSet<String>,
  ) -> Option<(&CompatibilityEntry, CompatibilityLevel)> {
    self
      .compatibility
      .iter()
      .filter(|e| e.exercise_id == exercise_id && conditions.contains(&e.condition))
      .max_by_key(|e| e.level)
      .map(|e| (e, e.level))
  }
}

impl Default for EngineTables {
  fn default() -> Self {
    Self::new(builtin_archetypes(), builtin_compatibility())
  }
}

/// ---------------------------------------------------------------------------
/// Built-in Tables
/// ---------------------------------------------------------------------------

fn all_levels() -> BTreeSet<FitnessLevel> {
  BTreeSet::from([
    FitnessLevel::Beginner,
    FitnessLevel::Intermediate,
    FitnessLevel::Advanced,
  ])
}

fn all_goals() -> BTreeSet<Goal> {
  BTreeSet::from([
    Goal::LoseWeight,
    Goal::BuildMuscle,
    Goal::ImproveEndurance,
    Goal::IncreaseStrength,
    Goal::GeneralFitness,
  ])
}

/// Seeded archetype catalog. Catalog order is meaningful: the selector's
/// tie-break takes the first score-eligible match.
pub fn builtin_archetypes() -> Vec<WorkoutArchetype> {
  vec![
    WorkoutArchetype {
      id: "strength_foundation".to_string(),
      name: "Strength Foundation".to_string(),
      description: "Compound-lift focused session with accessory volume".to_string(),
      goals: BTreeSet::from([Goal::IncreaseStrength, Goal::BuildMuscle]),
      levels: all_levels(),
      readiness_range: ReadinessRange::new(50.0, 100.0),
      blocks: vec![
        BlockKind::Warmup,
        BlockKind::Strength,
        BlockKind::AccessoryWork,
        BlockKind::Cooldown,
      ],
      metabolic_emphasis: 0.3,
      strength_emphasis: 0.9,
    },
    WorkoutArchetype {
      id: "hypertrophy_builder".to_string(),
      name: "Hypertrophy Builder".to_string(),
      description: "Higher-volume muscle-building session".to_string(),
      goals: BTreeSet::from([Goal::BuildMuscle]),
      levels: BTreeSet::from([FitnessLevel::Intermediate, FitnessLevel::Advanced]),
      readiness_range: ReadinessRange::new(55.0, 100.0),
      blocks: vec![
        BlockKind::Warmup,
        BlockKind::Strength,
        BlockKind::AccessoryWork,
        BlockKind::AccessoryWork,
        BlockKind::Cooldown,
      ],
      metabolic_emphasis: 0.4,
      strength_emphasis: 0.8,
    },
    WorkoutArchetype {
      id: "metabolic_burner".to_string(),
      name: "Metabolic Burner".to_string(),
      description: "High-intensity circuit session".to_string(),
      goals: BTreeSet::from([Goal::LoseWeight, Goal::GeneralFitness]),
      levels: BTreeSet::from([FitnessLevel::Intermediate, FitnessLevel::Advanced]),
      readiness_range: ReadinessRange::new(60.0, 100.0),
      blocks: vec![
        BlockKind::Warmup,
        BlockKind::MetabolicCircuit,
        BlockKind::MetabolicCircuit,
        BlockKind::Cooldown,
      ],
      metabolic_emphasis: 0.9,
      strength_emphasis: 0.4,
    },
    WorkoutArchetype {
      id: "endurance_engine".to_string(),
      name: "Endurance Engine".to_string(),
      description: "Sustained-effort conditioning session".to_string(),
      goals: BTreeSet::from([Goal::ImproveEndurance]),
      levels: all_levels(),
      readiness_range: ReadinessRange::new(50.0, 100.0),
      blocks: vec![
        BlockKind::Warmup,
        BlockKind::MetabolicCircuit,
        BlockKind::MobilityFlow,
        BlockKind::Cooldown,
      ],
      metabolic_emphasis: 0.8,
      strength_emphasis: 0.3,
    },
    WorkoutArchetype {
      id: "full_body_fitness".to_string(),
      name: "Full Body Fitness".to_string(),
      description: "Balanced full-body session".to_string(),
      goals: BTreeSet::from([Goal::GeneralFitness, Goal::LoseWeight, Goal::BuildMuscle]),
      levels: all_levels(),
      readiness_range: ReadinessRange::new(40.0, 100.0),
      blocks: vec![
        BlockKind::Warmup,
        BlockKind::Strength,
        BlockKind::MetabolicCircuit,
        BlockKind::Cooldown,
      ],
      metabolic_emphasis: 0.5,
      strength_emphasis: 0.5,
    },
    WorkoutArchetype {
      id: "recovery_mobility".to_string(),
      name: "Recovery & Mobility".to_string(),
      description: "Low-strain movement session for low-readiness days".to_string(),
      goals: all_goals(),
      levels: all_levels(),
      readiness_range: ReadinessRange::new(0.0, 55.0),
      blocks: vec![BlockKind::Warmup, BlockKind::MobilityFlow, BlockKind::Cooldown],
      metabolic_emphasis: 0.2,
      strength_emphasis: 0.2,
    },
  ]
}

pub fn builtin_compatibility() -> Vec<CompatibilityEntry> {
  fn entry(
    exercise_id: &str,
    condition: &str,
    level: CompatibilityLevel,
    note: Option<&str>,
  ) -> CompatibilityEntry {
    CompatibilityEntry {
      exercise_id: exercise_id.to_string(),
      condition: condition.to_string(),
      level,
      note: note.map(|n| n.to_string()),
    }
  }

  vec![
    entry(
      "jump_squat",
      "knee_arthritis",
      CompatibilityLevel::Contraindicated,
      Some("High-impact landing load"),
    ),
    entry(
      "deep_squat",
      "knee_arthritis",
      CompatibilityLevel::ModifyRequired,
      Some("Limit depth to pain-free range"),
    ),
    entry(
      "burpees",
      "heart_condition",
      CompatibilityLevel::Contraindicated,
      None,
    ),
    entry(
      "high_knees",
      "heart_condition",
      CompatibilityLevel::ModifyRequired,
      Some("Keep effort conversational"),
    ),
    entry(
      "overhead_press",
      "shoulder_impingement",
      CompatibilityLevel::Contraindicated,
      None,
    ),
    entry(
      "deadlift",
      "hypertension",
      CompatibilityLevel::Caution,
      Some("Avoid breath holding"),
    ),
    entry(
      "plank",
      "pregnancy",
      CompatibilityLevel::ModifyRequired,
      Some("Elevate hands, shorten holds"),
    ),
  ]
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_compatibility_level_ordering() {
    assert!(CompatibilityLevel::Safe < CompatibilityLevel::Caution);
    assert!(CompatibilityLevel::Caution < CompatibilityLevel::ModifyRequired);
    assert!(CompatibilityLevel::ModifyRequired < CompatibilityLevel::Contraindicated);
  }

  #[test]
  fn test_highest_risk_across_conditions() {
    let tables = EngineTables::default();
    let conditions =
      BTreeSet::from(["knee_arthritis".to_string(), "hypertension".to_string()]);

    // jump_squat: contraindicated via knee_arthritis
    let (entry, level) = tables.highest_risk("jump_squat", &conditions).unwrap();
    assert_eq!(level, CompatibilityLevel::Contraindicated);
    assert_eq!(entry.condition, "knee_arthritis");

    // No entries for push_up
    assert!(tables.highest_risk("push_up", &conditions).is_none());
  }

  #[test]
  fn test_builtin_archetypes_cover_all_goals() {
    let archetypes = builtin_archetypes();
    for goal in all_goals() {
      assert!(
        archetypes.iter().any(|a| a.goals.contains(&goal)),
        "no archetype covers {}",
        goal
      );
    }
  }
}
