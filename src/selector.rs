//! Archetype selector: picks the workout template for a generation call.

use tracing::debug;

use crate::config::EngineTables;
use crate::models::archetype::WorkoutArchetype;
use crate::models::profile::UserProfile;

/// Below this readiness the selector steers toward recovery-flavored
/// archetypes when one is eligible.
const LOW_READINESS_THRESHOLD: f64 = 50.0;

pub struct ArchetypeSelector<'a> {
  tables: &'a EngineTables,
}

impl<'a> ArchetypeSelector<'a> {
  pub fn new(tables: &'a EngineTables) -> Self {
    Self { tables }
  }

  /// Selection cascade:
  /// 1. goal + level matches whose readiness range contains the score,
  ///    tie-broken toward "Recovery"/"Mobility" names on low-readiness days;
  /// 2. any goal + level match, ignoring the score;
  /// 3. the hard-coded Full Body Fitness default.
  pub fn select(&self, profile: &UserProfile) -> WorkoutArchetype {
    let score = profile.readiness();

    let matches: Vec<&WorkoutArchetype> = self
      .tables
      .archetypes
      .iter()
      .filter(|a| a.matches_profile(profile.goal, profile.fitness_level))
      .collect();

    let score_eligible: Vec<&WorkoutArchetype> = matches
      .iter()
      .copied()
      .filter(|a| a.readiness_eligible(score))
      .collect();

    if !score_eligible.is_empty() {
      if score < LOW_READINESS_THRESHOLD {
        if let Some(recovery) = score_eligible
          .iter()
          .find(|a| a.name.contains("Recovery") || a.name.contains("Mobility"))
        {
          debug!(archetype = %recovery.id, score, "low-readiness recovery tie-break");
          return (*recovery).clone();
        }
      }
      // First score-eligible match in catalog order.
      return score_eligible[0].clone();
    }

    if let Some(first) = matches.first() {
      debug!(archetype = %first.id, score, "no readiness-eligible archetype, ignoring score");
      return (*first).clone();
    }

    debug!(goal = %profile.goal, "no archetype match, using hard-coded default");
    WorkoutArchetype::fallback_default()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::profile::{FitnessLevel, Goal};

  #[test]
  fn test_selects_first_score_eligible_in_catalog_order() {
    let tables = EngineTables::default();
    let selector = ArchetypeSelector::new(&tables);

    let mut profile = UserProfile::default();
    profile.goal = Goal::BuildMuscle;
    profile.fitness_level = FitnessLevel::Beginner;
    profile.readiness_score = Some(75.0);

    // Strength Foundation precedes Full Body Fitness in catalog order;
    // Hypertrophy Builder is excluded for beginners.
    let archetype = selector.select(&profile);
    assert_eq!(archetype.id, "strength_foundation");
  }

  #[test]
  fn test_low_readiness_prefers_recovery_archetype() {
    let tables = EngineTables::default();
    let selector = ArchetypeSelector::new(&tables);

    let mut profile = UserProfile::default();
    profile.goal = Goal::GeneralFitness;
    profile.readiness_score = Some(40.0);

    let archetype = selector.select(&profile);
    assert_eq!(archetype.id, "recovery_mobility");
  }

  #[test]
  fn test_score_filter_falls_back_to_goal_level_match() {
    // Fixture without the recovery archetype, so readiness 30 leaves no
    // score-eligible match for improve_endurance and the selector must
    // fall back to the goal/level match, ignoring the score.
    let mut tables = EngineTables::default();
    tables.archetypes.retain(|a| a.id != "recovery_mobility");
    let selector = ArchetypeSelector::new(&tables);

    let mut profile = UserProfile::default();
    profile.goal = Goal::ImproveEndurance;
    profile.readiness_score = Some(30.0);

    let archetype = selector.select(&profile);
    assert_eq!(archetype.id, "endurance_engine");
  }

  #[test]
  fn test_hard_coded_default_when_nothing_matches() {
    let tables = EngineTables::new(Vec::new(), Vec::new());
    let selector = ArchetypeSelector::new(&tables);

    let archetype = selector.select(&UserProfile::default());
    assert_eq!(archetype.name, "Full Body Fitness");
    assert_eq!(archetype.metabolic_emphasis, 0.5);
  }
}
