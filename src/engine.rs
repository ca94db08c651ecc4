//! Plan engine orchestration.
//!
//! Stateless request/response core: each `generate` or `adapt` call works
//! only on its arguments and returns a fully materialized workout. The only
//! suspension points are the catalog read and the best-effort coaching-notes
//! call, both of which degrade rather than fail the request.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::adaptation::{AdaptationEngine, SessionFeedback};
use crate::builder::BlockBuilder;
use crate::catalog::{ExerciseCatalog, StaticCatalog};
use crate::coaching::{templated_note, NotesGenerator, TemplatedNotesGenerator};
use crate::config::EngineTables;
use crate::errors::EngineError;
use crate::metrics;
use crate::models::exercise::Exercise;
use crate::models::profile::UserProfile;
use crate::models::workout::GeneratedWorkout;
use crate::safety::SafetyFilter;
use crate::selector::ArchetypeSelector;

/// Coaching notes get this long before the templated fallback takes over.
const NOTES_TIMEOUT: Duration = Duration::from_secs(4);

pub struct PlanEngine {
  catalog: Arc<dyn ExerciseCatalog>,
  tables: EngineTables,
  notes: Arc<dyn NotesGenerator>,
  notes_timeout: Duration,
}

impl PlanEngine {
  pub fn new(
    catalog: Arc<dyn ExerciseCatalog>,
    tables: EngineTables,
    notes: Arc<dyn NotesGenerator>,
  ) -> Self {
    Self {
      catalog,
      tables,
      notes,
      notes_timeout: NOTES_TIMEOUT,
    }
  }

  /// Fully self-contained engine: built-in catalog and tables, templated
  /// notes.
  pub fn builtin() -> Self {
    Self::new(
      Arc::new(StaticCatalog::builtin()),
      EngineTables::default(),
      Arc::new(TemplatedNotesGenerator),
    )
  }

  pub fn with_notes_timeout(mut self, timeout: Duration) -> Self {
    self.notes_timeout = timeout;
    self
  }

  /// Generate a workout. `seed` drives all in-block selection, so the same
  /// inputs always produce the same workout.
  pub async fn generate(
    &self,
    profile: &UserProfile,
    target_duration: Option<u32>,
    seed: u64,
  ) -> Result<GeneratedWorkout, EngineError> {
    let catalog = self.load_catalog().await;

    let archetype = ArchetypeSelector::new(&self.tables).select(profile);
    info!(archetype = %archetype.id, ?target_duration, "generating workout");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let workout_id = format!("wkt-{:08x}", rng.gen::<u32>());

    let safety = SafetyFilter::new(&self.tables);
    let builder = BlockBuilder::new(&safety, profile, &archetype);
    let blocks = builder.build(&catalog, target_duration, &mut rng);

    let estimated_duration_min = metrics::estimate_duration_min(&blocks);
    let difficulty_rating = metrics::difficulty_rating(&blocks);
    let (metabolic_score, strength_score) = metrics::emphasis_scores(&archetype);

    let mut workout = GeneratedWorkout {
      id: workout_id,
      name: archetype.name.clone(),
      description: archetype.description.clone(),
      archetype_id: archetype.id.clone(),
      blocks,
      coaching_notes: String::new(),
      estimated_duration_min,
      difficulty_rating,
      metabolic_score,
      strength_score,
    };

    workout.coaching_notes = self.notes_or_fallback(&workout, profile).await;
    Ok(workout)
  }

  /// Apply one feedback event to an in-flight workout. The profile is
  /// optional because the adapt contract does not carry one; substitution
  /// safety then runs against the default profile.
  pub async fn adapt(
    &self,
    workout: GeneratedWorkout,
    feedback: &SessionFeedback,
    profile: Option<UserProfile>,
  ) -> Result<GeneratedWorkout, EngineError> {
    let catalog = self.load_catalog().await;
    let profile = profile.unwrap_or_default();

    let safety = SafetyFilter::new(&self.tables);
    let engine = AdaptationEngine::new(&safety);
    Ok(engine.apply(workout, feedback, &profile, &catalog))
  }

  /// Catalog read with availability-over-personalization fallback.
  async fn load_catalog(&self) -> Vec<Exercise> {
    match self.catalog.approved_exercises().await {
      Ok(exercises) if !exercises.is_empty() => exercises,
      Ok(_) => {
        warn!("catalog returned no exercises, using built-in set");
        crate::catalog::builtin_exercises()
      }
      Err(e) => {
        warn!(error = %e, "catalog unavailable, using built-in set");
        crate::catalog::builtin_exercises()
      }
    }
  }

  /// Best-effort notes with a bounded timeout and a templated fallback.
  async fn notes_or_fallback(&self, workout: &GeneratedWorkout, profile: &UserProfile) -> String {
    let call = self.notes.coaching_notes(workout, profile);
    match tokio::time::timeout(self.notes_timeout, call).await {
      Ok(Ok(text)) if !text.is_empty() => text,
      Ok(Ok(_)) => templated_note(workout, profile),
      Ok(Err(e)) => {
        warn!(error = %e, "notes generation failed, using templated note");
        templated_note(workout, profile)
      }
      Err(_) => {
        warn!("notes generation timed out, using templated note");
        templated_note(workout, profile)
      }
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
