//! Adaptation engine: applies mid-session feedback to an in-flight workout.
//!
//! Each call consumes the workout and returns a new version; the caller owns
//! persistence of the latest copy. Exactly one transition fires per call, in
//! priority order: pain substitution, then high-exertion reduction, then the
//! difficulty tweaks.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::exercise::Exercise;
use crate::models::profile::UserProfile;
use crate::models::workout::GeneratedWorkout;
use crate::safety::SafetyFilter;

/// RPE at or above which the high-exertion transition fires.
const HIGH_EXERTION_RPE: f64 = 9.0;
/// Load multipliers for the exertion and too-easy transitions.
const REDUCTION_FACTOR: f64 = 0.9;
const INCREASE_FACTOR: f64 = 1.1;
/// Added rest when a session is reported too hard.
const EXTRA_REST_SECONDS: u32 = 30;

/// ---------------------------------------------------------------------------
/// Feedback
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyFeedback {
  TooEasy,
  TooHard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFeedback {
  #[serde(rename = "exerciseId")]
  pub exercise_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rpe: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pain_signal: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub difficulty_feedback: Option<DifficultyFeedback>,
}

/// ---------------------------------------------------------------------------
/// Engine
/// ---------------------------------------------------------------------------

pub struct AdaptationEngine<'a> {
  safety: &'a SafetyFilter<'a>,
}

impl<'a> AdaptationEngine<'a> {
  pub fn new(safety: &'a SafetyFilter<'a>) -> Self {
    Self { safety }
  }

  /// Apply one feedback event. An unknown exercise id is a caller error,
  /// not fatal: the workout comes back unchanged.
  pub fn apply(
    &self,
    mut workout: GeneratedWorkout,
    feedback: &SessionFeedback,
    profile: &UserProfile,
    catalog: &[Exercise],
  ) -> GeneratedWorkout {
    let Some((block_index, instance_index)) = locate(&workout, &feedback.exercise_id) else {
      debug!(exercise_id = %feedback.exercise_id, "adapt: no matching instance, returning unchanged");
      return workout;
    };

    if let Some(reason) = &feedback.pain_signal {
      self.substitute_for_pain(&mut workout, block_index, instance_index, reason, profile, catalog);
      return workout;
    }

    if feedback.rpe.is_some_and(|rpe| rpe >= HIGH_EXERTION_RPE) {
      reduce_for_exertion(&mut workout, block_index, instance_index);
      return workout;
    }

    match feedback.difficulty_feedback {
      Some(DifficultyFeedback::TooEasy) => {
        let instance = &mut workout.blocks[block_index].exercises[instance_index];
        if let Some(weight) = instance.weight_kg {
          instance.weight_kg = Some(round_load(weight * INCREASE_FACTOR));
          let name = instance.exercise.name.clone();
          append_note(
            &mut workout,
            &format!("Felt easy, so the load on {name} was nudged up 10%."),
          );
        }
      }
      Some(DifficultyFeedback::TooHard) => {
        let instance = &mut workout.blocks[block_index].exercises[instance_index];
        instance.rest_seconds += EXTRA_REST_SECONDS;
        let name = instance.exercise.name.clone();
        append_note(
          &mut workout,
          &format!("Added {EXTRA_REST_SECONDS}s of rest after {name} to keep the session manageable."),
        );
      }
      None => {}
    }

    workout
  }

  /// Pain transition: swap in a safe alternative sharing the primary muscle
  /// group, preferring easier variants, preserving the slot's parameters.
  fn substitute_for_pain(
    &self,
    workout: &mut GeneratedWorkout,
    block_index: usize,
    instance_index: usize,
    reason: &str,
    profile: &UserProfile,
    catalog: &[Exercise],
  ) {
    let current = workout.blocks[block_index].exercises[instance_index]
      .exercise
      .clone();
    let alternatives = self.safety.alternatives_by_muscle(&current, catalog, profile);

    match alternatives.into_iter().next() {
      Some(substitute) => {
        let note = format!(
          "Swapped {} for {} after you reported pain ({}). Stop any movement that hurts.",
          current.name, substitute.name, reason
        );
        workout.blocks[block_index].exercises[instance_index].exercise = substitute;
        append_note(workout, &note);
      }
      None => {
        let note = format!(
          "You reported pain on {} ({}) but no safe substitute was available. Skip it and rest.",
          current.name, reason
        );
        append_note(workout, &note);
      }
    }
  }
}

/// High-exertion transition: 10% off the load, 2 reps off when above 6.
fn reduce_for_exertion(workout: &mut GeneratedWorkout, block_index: usize, instance_index: usize) {
  let instance = &mut workout.blocks[block_index].exercises[instance_index];
  if let Some(weight) = instance.weight_kg {
    instance.weight_kg = Some(round_load(weight * REDUCTION_FACTOR));
  }
  if let Some(reps) = instance.reps {
    if reps > 6 {
      instance.reps = Some(reps - 2);
    }
  }
  let name = instance.exercise.name.clone();
  append_note(
    workout,
    &format!("That set of {name} was near max effort, so the next ones are lighter."),
  );
}

fn locate(workout: &GeneratedWorkout, exercise_id: &str) -> Option<(usize, usize)> {
  for (block_index, block) in workout.blocks.iter().enumerate() {
    for (instance_index, instance) in block.exercises.iter().enumerate() {
      if instance.exercise_id() == exercise_id {
        return Some((block_index, instance_index));
      }
    }
  }
  None
}

fn append_note(workout: &mut GeneratedWorkout, note: &str) {
  if workout.coaching_notes.is_empty() {
    workout.coaching_notes = note.to_string();
  } else {
    workout.coaching_notes.push_str("\n");
    workout.coaching_notes.push_str(note);
  }
}

fn round_load(weight: f64) -> f64 {
  (weight * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
