//! Safety filter: injury, medical-condition, and restriction screening.
//!
//! Every candidate pool passes through here before an exercise can be
//! placed in a block, and again whenever the adaptation engine substitutes
//! mid-session. A contraindicated exercise must never be downgraded into a
//! safe list.

use serde::{Deserialize, Serialize};

use crate::config::{CompatibilityLevel, EngineTables};
use crate::models::exercise::Exercise;
use crate::models::profile::{RestrictionKind, UserProfile};

/// ---------------------------------------------------------------------------
/// Assessment Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
  Safe,
  Modify,
  Contraindicated,
}

/// Transient per-exercise, per-assessment result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyAssessment {
  pub level: SafetyLevel,
  pub risk_factors: Vec<String>,
  pub modifications: Vec<String>,
  pub reasoning: Vec<String>,
}

impl SafetyAssessment {
  fn safe() -> Self {
    Self {
      level: SafetyLevel::Safe,
      risk_factors: Vec::new(),
      modifications: Vec::new(),
      reasoning: Vec::new(),
    }
  }

  pub fn is_safe(&self) -> bool {
    self.level == SafetyLevel::Safe
  }

  pub fn is_contraindicated(&self) -> bool {
    self.level == SafetyLevel::Contraindicated
  }

  fn escalate(&mut self, level: SafetyLevel) {
    if level > self.level {
      self.level = level;
    }
  }
}

/// Partition of a candidate pool, plus substitution candidates for every
/// contraindicated exercise.
#[derive(Debug, Clone)]
pub struct SafetyPartition {
  pub safe: Vec<Exercise>,
  pub modify: Vec<(Exercise, SafetyAssessment)>,
  pub contraindicated: Vec<(Exercise, SafetyAssessment)>,
  /// Contraindicated exercise id -> up to 3 safe alternatives sharing at
  /// least one movement-pattern tag.
  pub substitutions: Vec<(String, Vec<Exercise>)>,
}

/// ---------------------------------------------------------------------------
/// Safety Filter
/// ---------------------------------------------------------------------------

const MAX_SUBSTITUTIONS: usize = 3;

pub struct SafetyFilter<'a> {
  tables: &'a EngineTables,
}

impl<'a> SafetyFilter<'a> {
  pub fn new(tables: &'a EngineTables) -> Self {
    Self { tables }
  }

  /// Assess one exercise against the profile's injuries, conditions,
  /// restrictions, and the medical-compatibility table, in that order.
  /// The most conservative applicable outcome always wins.
  pub fn assess(&self, exercise: &Exercise, profile: &UserProfile) -> SafetyAssessment {
    let mut assessment = SafetyAssessment::safe();

    // (1) Active-injury avoid list: hard stop.
    for injury in profile.active_injuries() {
      if injury.avoid_completely.iter().any(|id| id == &exercise.id) {
        assessment.level = SafetyLevel::Contraindicated;
        assessment.reasoning.push(format!(
          "Avoided completely while {} is active",
          injury.injury_type
        ));
        return assessment;
      }
    }

    // (2) Active-injury modifications.
    for injury in profile.active_injuries() {
      if let Some(modification) = injury.modifications.get(&exercise.id) {
        assessment.escalate(SafetyLevel::Modify);
        assessment.modifications.push(modification.clone());
        assessment
          .reasoning
          .push(format!("Modified for active {}", injury.injury_type));
      }
    }

    // (3) Exercise contraindication tags vs medical conditions: hard stop.
    for tag in &exercise.contraindications {
      if profile.medical_conditions.contains(tag) {
        assessment.level = SafetyLevel::Contraindicated;
        assessment
          .reasoning
          .push(format!("Contraindicated for {}", tag));
        return assessment;
      }
    }

    // (4) Movement restrictions naming this exercise.
    for restriction in &profile.restrictions {
      if restriction.exercise_ids.iter().any(|id| id == &exercise.id) {
        match restriction.kind {
          RestrictionKind::Avoid => {
            assessment.level = SafetyLevel::Contraindicated;
            assessment
              .reasoning
              .push(format!("Movement restriction: {}", restriction.detail));
            return assessment;
          }
          RestrictionKind::Modify => {
            assessment.escalate(SafetyLevel::Modify);
            assessment.modifications.push(restriction.detail.clone());
            assessment
              .reasoning
              .push("Movement restriction requires modification".to_string());
          }
        }
      }
    }

    // (5) Medical-compatibility table: highest risk entry across all of the
    // user's conditions escalates the assessment.
    if let Some((entry, level)) = self
      .tables
      .highest_risk(&exercise.id, &profile.medical_conditions)
    {
      match level {
        CompatibilityLevel::Contraindicated => {
          assessment.level = SafetyLevel::Contraindicated;
          assessment
            .reasoning
            .push(format!("Incompatible with {}", entry.condition));
        }
        CompatibilityLevel::ModifyRequired => {
          assessment.escalate(SafetyLevel::Modify);
          if let Some(note) = &entry.note {
            assessment.modifications.push(note.clone());
          }
          assessment
            .reasoning
            .push(format!("Modification required for {}", entry.condition));
        }
        CompatibilityLevel::Caution => {
          assessment
            .risk_factors
            .push(format!("Caution with {}", entry.condition));
          if let Some(note) = &entry.note {
            assessment.risk_factors.push(note.clone());
          }
        }
        CompatibilityLevel::Safe => {}
      }
    }

    assessment
  }

  /// Partition a candidate pool into safe / modify / contraindicated, with
  /// substitution candidates for each contraindicated item.
  pub fn partition(&self, candidates: &[Exercise], profile: &UserProfile) -> SafetyPartition {
    let mut safe = Vec::new();
    let mut modify = Vec::new();
    let mut contraindicated = Vec::new();

    for exercise in candidates {
      let assessment = self.assess(exercise, profile);
      match assessment.level {
        SafetyLevel::Safe => safe.push(exercise.clone()),
        SafetyLevel::Modify => modify.push((exercise.clone(), assessment)),
        SafetyLevel::Contraindicated => contraindicated.push((exercise.clone(), assessment)),
      }
    }

    let substitutions = contraindicated
      .iter()
      .map(|(exercise, _)| {
        (
          exercise.id.clone(),
          self.alternatives(exercise, candidates, profile),
        )
      })
      .collect();

    SafetyPartition {
      safe,
      modify,
      contraindicated,
      substitutions,
    }
  }

  /// Up to 3 alternatives sharing at least one movement-pattern tag with the
  /// excluded exercise, each re-assessed as safe.
  pub fn alternatives(
    &self,
    excluded: &Exercise,
    pool: &[Exercise],
    profile: &UserProfile,
  ) -> Vec<Exercise> {
    pool
      .iter()
      .filter(|candidate| candidate.id != excluded.id)
      .filter(|candidate| candidate.shares_pattern(excluded))
      .filter(|candidate| self.assess(candidate, profile).is_safe())
      .take(MAX_SUBSTITUTIONS)
      .cloned()
      .collect()
  }

  /// Alternatives for a pain-signal substitution: same primary muscle group,
  /// safe, beginner difficulty first.
  pub fn alternatives_by_muscle(
    &self,
    excluded: &Exercise,
    pool: &[Exercise],
    profile: &UserProfile,
  ) -> Vec<Exercise> {
    let mut matches: Vec<Exercise> = pool
      .iter()
      .filter(|candidate| candidate.id != excluded.id)
      .filter(|candidate| candidate.shares_primary_muscle(excluded))
      .filter(|candidate| self.assess(candidate, profile).is_safe())
      .cloned()
      .collect();
    matches.sort_by_key(|candidate| candidate.difficulty);
    matches
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
