//! User profile and constraint inputs to the plan engine.
//!
//! The profile is supplied by the caller per request; the engine never
//! persists it. Readiness is an opaque 0-100 scalar computed elsewhere.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::history::PerformanceRecord;

/// Default readiness when the scoring service supplied nothing.
pub const DEFAULT_READINESS: f64 = 75.0;

/// ---------------------------------------------------------------------------
/// Goal and Fitness Level
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
  LoseWeight,
  BuildMuscle,
  ImproveEndurance,
  IncreaseStrength,
  GeneralFitness,
}

impl std::fmt::Display for Goal {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::LoseWeight => write!(f, "lose_weight"),
      Self::BuildMuscle => write!(f, "build_muscle"),
      Self::ImproveEndurance => write!(f, "improve_endurance"),
      Self::IncreaseStrength => write!(f, "increase_strength"),
      Self::GeneralFitness => write!(f, "general_fitness"),
    }
  }
}

/// Shared scale for user level and exercise difficulty.
/// Ordering matters: candidates above the user's level are filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
  Beginner,
  Intermediate,
  Advanced,
}

impl FitnessLevel {
  pub fn is_beginner(self) -> bool {
    self == Self::Beginner
  }
}

impl std::fmt::Display for FitnessLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Beginner => write!(f, "beginner"),
      Self::Intermediate => write!(f, "intermediate"),
      Self::Advanced => write!(f, "advanced"),
    }
  }
}

impl std::str::FromStr for FitnessLevel {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "beginner" => Ok(Self::Beginner),
      "intermediate" => Ok(Self::Intermediate),
      "advanced" => Ok(Self::Advanced),
      _ => Err(format!("Unknown fitness level: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Injuries and Movement Restrictions
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjuryStatus {
  Active,
  Recovering,
  Resolved,
}

/// One entry in the user's injury history. Only `Active` injuries
/// influence the safety filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjuryRecord {
  pub injury_type: String,
  pub status: InjuryStatus,
  /// Exercise ids that must never be prescribed while this injury is active.
  #[serde(default)]
  pub avoid_completely: Vec<String>,
  /// Exercise id -> required modification while this injury is active.
  #[serde(default)]
  pub modifications: BTreeMap<String, String>,
}

impl InjuryRecord {
  pub fn is_active(&self) -> bool {
    self.status == InjuryStatus::Active
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
  Avoid,
  Modify,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementRestriction {
  pub exercise_ids: Vec<String>,
  pub kind: RestrictionKind,
  pub detail: String,
}

/// ---------------------------------------------------------------------------
/// User Profile
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
  pub id: String,
  pub goal: Goal,
  pub fitness_level: FitnessLevel,
  /// Equipment tags available to the user (e.g. "bodyweight", "dumbbell").
  #[serde(default)]
  pub equipment: BTreeSet<String>,
  #[serde(default)]
  pub injuries: Vec<InjuryRecord>,
  #[serde(default)]
  pub medical_conditions: BTreeSet<String>,
  #[serde(default)]
  pub restrictions: Vec<MovementRestriction>,
  /// Historical one-rep-max estimates, exercise id -> kg.
  #[serde(default)]
  pub one_rep_max_kg: BTreeMap<String, f64>,
  pub preferred_duration_min: u32,
  /// Raw readiness score from the external scoring service, if any.
  pub readiness_score: Option<f64>,
  /// Most-recent-first performance records per exercise, supplied by the
  /// session-logging collaborator.
  #[serde(default)]
  pub history: BTreeMap<String, Vec<PerformanceRecord>>,
}

impl UserProfile {
  /// Readiness clamped to [0, 100], defaulting to 75 when absent.
  pub fn readiness(&self) -> f64 {
    self.readiness_score.unwrap_or(DEFAULT_READINESS).clamp(0.0, 100.0)
  }

  pub fn one_rep_max_for(&self, exercise_id: &str) -> Option<f64> {
    self.one_rep_max_kg.get(exercise_id).copied()
  }

  pub fn history_for(&self, exercise_id: &str) -> &[PerformanceRecord] {
    self
      .history
      .get(exercise_id)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub fn active_injuries(&self) -> impl Iterator<Item = &InjuryRecord> {
    self.injuries.iter().filter(|i| i.is_active())
  }
}

impl Default for UserProfile {
  /// Engine-internal default used when `generate` receives no profile.
  fn default() -> Self {
    Self {
      id: "default".to_string(),
      goal: Goal::GeneralFitness,
      fitness_level: FitnessLevel::Beginner,
      equipment: BTreeSet::from(["bodyweight".to_string()]),
      injuries: Vec::new(),
      medical_conditions: BTreeSet::new(),
      restrictions: Vec::new(),
      one_rep_max_kg: BTreeMap::new(),
      preferred_duration_min: 45,
      readiness_score: None,
      history: BTreeMap::new(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
