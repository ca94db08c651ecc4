//! Readiness score boundary.
//!
//! The engine treats readiness as an opaque 0-100 input supplied by an
//! external scoring service. This module carries the reference blend used by
//! that service (weighted 1-10 sub-scores) plus the human-readable intensity
//! label surfaced alongside the number.

use serde::{Deserialize, Serialize};

/// Blend weights, in order: recovery, sleep, training load, nutrition,
/// stress, HRV.
const WEIGHTS: [f64; 6] = [0.25, 0.20, 0.20, 0.15, 0.15, 0.05];

/// Sub-scores on a 1-10 scale before weighting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReadinessInputs {
  pub recovery: f64,
  pub sleep: f64,
  pub training_load: f64,
  pub nutrition: f64,
  pub stress: f64,
  pub hrv: f64,
}

impl ReadinessInputs {
  fn components(&self) -> [f64; 6] {
    [
      self.recovery,
      self.sleep,
      self.training_load,
      self.nutrition,
      self.stress,
      self.hrv,
    ]
  }
}

/// Weighted blend of 1-10 sub-scores projected onto the 0-100 scale the
/// engine consumes. All 10s map to 100, all 1s to 10.
pub fn blend(inputs: &ReadinessInputs) -> f64 {
  let weighted: f64 = inputs
    .components()
    .iter()
    .zip(WEIGHTS.iter())
    .map(|(score, weight)| score.clamp(1.0, 10.0) * weight)
    .sum();
  weighted * 10.0
}

/// Human-readable intensity suggestion for a 0-100 readiness score.
pub fn suggested_intensity(score: f64) -> &'static str {
  match score.clamp(0.0, 100.0) {
    s if s >= 80.0 => "high intensity",
    s if s >= 60.0 => "moderate intensity",
    s if s >= 40.0 => "light intensity",
    _ => "active recovery",
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
