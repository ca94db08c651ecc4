//! Coaching notes generation.
//!
//! Turns an assembled workout into a short natural-language note via the
//! Claude API. The generator is a pluggable collaborator: the engine treats
//! it as best-effort and falls back to a templated note when it fails or
//! times out, so notes can never block generation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::EngineError;
use crate::models::profile::UserProfile;
use crate::models::workout::GeneratedWorkout;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 512;

/// ---------------------------------------------------------------------------
/// Generator Trait
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait NotesGenerator: Send + Sync {
  async fn coaching_notes(
    &self,
    workout: &GeneratedWorkout,
    profile: &UserProfile,
  ) -> Result<String, EngineError>;
}

/// ---------------------------------------------------------------------------
/// Claude API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ClaudeRequest {
  model: String,
  max_tokens: u32,
  system: String,
  messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
  role: String,
  content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
  content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
  #[serde(rename = "type")]
  content_type: String,
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClaudeErrorResponse {
  error: ClaudeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ClaudeErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Claude-backed Generator
/// ---------------------------------------------------------------------------

pub struct ClaudeNotesGenerator {
  client: Client,
  api_key: String,
  base_url: String,
}

impl ClaudeNotesGenerator {
  /// Create a generator, loading the API key from the environment
  /// (including a `.env` file when present).
  pub fn from_env() -> Result<Self, EngineError> {
    dotenvy::dotenv().ok();
    let api_key = std::env::var("ANTHROPIC_API_KEY")
      .map_err(|_| EngineError::Notes("API key not configured".to_string()))?;

    Ok(Self {
      client: Client::new(),
      api_key,
      base_url: CLAUDE_API_URL.to_string(),
    })
  }

  /// Override the endpoint (tests point this at a local mock server).
  pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
    Self {
      client: Client::new(),
      api_key: api_key.into(),
      base_url: base_url.into(),
    }
  }

  async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, EngineError> {
    let request = ClaudeRequest {
      model: CLAUDE_MODEL.to_string(),
      max_tokens: MAX_TOKENS,
      system: system_prompt.to_string(),
      messages: vec![ClaudeMessage {
        role: "user".to_string(),
        content: user_message.to_string(),
      }],
    };

    let response = self
      .client
      .post(&self.base_url)
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", API_VERSION)
      .header("content-type", "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| EngineError::Notes(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| EngineError::Notes(e.to_string()))?;

    if !status.is_success() {
      if let Ok(error_resp) = serde_json::from_str::<ClaudeErrorResponse>(&body) {
        return Err(EngineError::Notes(error_resp.error.message));
      }
      return Err(EngineError::Notes(format!("HTTP {}: {}", status, body)));
    }

    let claude_response: ClaudeResponse =
      serde_json::from_str(&body).map_err(|e| EngineError::Notes(e.to_string()))?;

    claude_response
      .content
      .iter()
      .find(|c| c.content_type == "text")
      .and_then(|c| c.text.clone())
      .ok_or_else(|| EngineError::Notes("No text content in response".to_string()))
  }
}

#[async_trait]
impl NotesGenerator for ClaudeNotesGenerator {
  async fn coaching_notes(
    &self,
    workout: &GeneratedWorkout,
    profile: &UserProfile,
  ) -> Result<String, EngineError> {
    let system_prompt = include_str!("prompts/notes_system.txt");
    let user_message = session_summary(workout, profile).to_string();
    let text = self.complete(system_prompt, &user_message).await?;
    Ok(text.trim().to_string())
  }
}

/// Compact JSON view of the session, sent as the user message.
fn session_summary(workout: &GeneratedWorkout, profile: &UserProfile) -> serde_json::Value {
  json!({
    "workout": {
      "name": workout.name,
      "estimated_duration_min": workout.estimated_duration_min,
      "difficulty_rating": workout.difficulty_rating,
      "blocks": workout.blocks.iter().map(|b| json!({
        "name": b.name,
        "exercises": b.exercises.iter().map(|e| e.exercise.name.clone()).collect::<Vec<_>>(),
      })).collect::<Vec<_>>(),
    },
    "athlete": {
      "goal": profile.goal.to_string(),
      "fitness_level": profile.fitness_level.to_string(),
      "readiness": profile.readiness(),
    },
  })
}

/// ---------------------------------------------------------------------------
/// Templated Fallback
/// ---------------------------------------------------------------------------

/// Always-available generator used when no API key is configured.
pub struct TemplatedNotesGenerator;

#[async_trait]
impl NotesGenerator for TemplatedNotesGenerator {
  async fn coaching_notes(
    &self,
    workout: &GeneratedWorkout,
    profile: &UserProfile,
  ) -> Result<String, EngineError> {
    Ok(templated_note(workout, profile))
  }
}

/// Deterministic note used whenever live generation fails or times out.
pub fn templated_note(workout: &GeneratedWorkout, profile: &UserProfile) -> String {
  format!(
    "{} session, about {} minutes across {} blocks. Built for your {} goal at {} level. \
     Move with control, rest as prescribed, and stop anything that causes pain.",
    workout.name,
    workout.estimated_duration_min,
    workout.blocks.len(),
    profile.goal,
    profile.fitness_level
  )
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
