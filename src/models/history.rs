//! Historical session outcomes consumed by the overload calculator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one logged session for one exercise. Produced by the
/// session-logging collaborator; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRecord {
  pub exercise_id: String,
  pub performed_at: DateTime<Utc>,
  pub sets_completed: u32,
  #[serde(default)]
  pub reps_per_set: Vec<u32>,
  pub load_kg: f64,
  #[serde(default)]
  pub rpe_per_set: Vec<f64>,
  /// Completed work / prescribed work; 1.0 means fully completed.
  pub completion_rate: f64,
  pub form_score: Option<f64>,
  pub progression_level: Option<u32>,
  #[serde(default)]
  pub mastered: bool,
}

impl PerformanceRecord {
  /// Mean of the per-set RPE reports, if any were logged.
  pub fn average_rpe(&self) -> Option<f64> {
    if self.rpe_per_set.is_empty() {
      return None;
    }
    Some(self.rpe_per_set.iter().sum::<f64>() / self.rpe_per_set.len() as f64)
  }

  /// Work proxy used for trend analysis.
  pub fn effective_work(&self) -> f64 {
    self.completion_rate * self.load_kg
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  #[test]
  fn test_average_rpe() {
    let record = PerformanceRecord {
      exercise_id: "deep_squat".to_string(),
      performed_at: Utc::now(),
      sets_completed: 3,
      reps_per_set: vec![10, 10, 8],
      load_kg: 60.0,
      rpe_per_set: vec![6.0, 7.0, 8.0],
      completion_rate: 0.93,
      form_score: Some(8.0),
      progression_level: Some(2),
      mastered: false,
    };

    assert_eq!(record.average_rpe(), Some(7.0));
  }

  #[test]
  fn test_average_rpe_empty() {
    let record = PerformanceRecord {
      exercise_id: "plank".to_string(),
      performed_at: Utc::now(),
      sets_completed: 3,
      reps_per_set: vec![],
      load_kg: 0.0,
      rpe_per_set: vec![],
      completion_rate: 1.0,
      form_score: None,
      progression_level: None,
      mastered: false,
    };

    assert_eq!(record.average_rpe(), None);
  }
}
