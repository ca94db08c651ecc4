//! JSON request/response boundary.
//!
//! The engine is exchanged with the calling system as JSON shapes, not a
//! wire protocol: a tagged `action` selects the operation, and failures come
//! back as `{ "error": string }` rather than a thrown failure.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::adaptation::SessionFeedback;
use crate::engine::PlanEngine;
use crate::errors::EngineError;
use crate::models::profile::UserProfile;
use crate::models::workout::GeneratedWorkout;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EngineRequest {
  Generate {
    #[serde(default, rename = "userProfile")]
    user_profile: Option<UserProfile>,
    #[serde(default, rename = "targetDuration")]
    target_duration: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
  },
  Adapt {
    #[serde(rename = "currentWorkout")]
    current_workout: GeneratedWorkout,
    feedback: SessionFeedback,
    #[serde(default, rename = "userProfile")]
    user_profile: Option<UserProfile>,
  },
}

/// Dispatch one parsed request.
pub async fn dispatch(engine: &PlanEngine, request: EngineRequest) -> Result<GeneratedWorkout, EngineError> {
  match request {
    EngineRequest::Generate {
      user_profile,
      target_duration,
      seed,
    } => {
      let profile = user_profile.unwrap_or_default();
      engine
        .generate(&profile, target_duration, seed.unwrap_or(0))
        .await
    }
    EngineRequest::Adapt {
      current_workout,
      feedback,
      user_profile,
    } => engine.adapt(current_workout, &feedback, user_profile).await,
  }
}

/// Handle a raw JSON request value, always producing a JSON response:
/// either a serialized workout or `{ "error": ... }`.
pub async fn handle_request(engine: &PlanEngine, request: Value) -> Value {
  let parsed: EngineRequest = match serde_json::from_value(request) {
    Ok(parsed) => parsed,
    Err(e) => {
      warn!(error = %e, "rejected malformed request");
      return json!({ "error": EngineError::InvalidRequest(e.to_string()).to_string() });
    }
  };

  match dispatch(engine, parsed).await {
    Ok(workout) => serde_json::to_value(&workout)
      .unwrap_or_else(|e| json!({ "error": format!("serialization failed: {e}") })),
    Err(e) => json!({ "error": e.to_string() }),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{instance_for, test_exercise, workout_with_instances};

  #[tokio::test]
  async fn test_generate_with_default_profile() {
    let engine = PlanEngine::builtin();
    let request = json!({ "action": "generate", "targetDuration": 30 });

    let response = handle_request(&engine, request).await;

    assert!(response.get("error").is_none());
    assert_eq!(response["blocks"].as_array().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn test_malformed_action_returns_structured_error() {
    let engine = PlanEngine::builtin();
    let request = json!({ "action": "destroy" });

    let response = handle_request(&engine, request).await;

    assert!(response["error"].as_str().unwrap().contains("Invalid request"));
  }

  #[tokio::test]
  async fn test_adapt_high_rpe_over_the_wire() {
    let engine = PlanEngine::builtin();

    let mut instance = instance_for(test_exercise("bench_press"));
    instance.weight_kg = Some(100.0);
    instance.reps = Some(10);
    let workout = workout_with_instances(vec![instance]);

    let request = json!({
      "action": "adapt",
      "currentWorkout": serde_json::to_value(&workout).unwrap(),
      "feedback": { "exerciseId": "bench_press", "rpe": 9.0 },
    });

    let response = handle_request(&engine, request).await;
    let adapted: GeneratedWorkout = serde_json::from_value(response).unwrap();
    let result = adapted.find_instance("bench_press").unwrap();

    assert_eq!(result.weight_kg, Some(90.0));
    assert_eq!(result.reps, Some(8));
  }

  #[tokio::test]
  async fn test_adapt_unknown_exercise_round_trips() {
    let engine = PlanEngine::builtin();
    let workout = workout_with_instances(vec![instance_for(test_exercise("plank"))]);

    let request = json!({
      "action": "adapt",
      "currentWorkout": serde_json::to_value(&workout).unwrap(),
      "feedback": { "exerciseId": "missing", "difficulty_feedback": "too_easy" },
    });

    let response = handle_request(&engine, request).await;
    let adapted: GeneratedWorkout = serde_json::from_value(response).unwrap();

    assert_eq!(adapted, workout);
  }
}
