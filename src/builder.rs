//! Block builder / time-boxing scheduler.
//!
//! Instantiates an archetype's block template into concrete exercise
//! instances (template mode), or allocates supersets into a requested
//! session length (dynamic mode). Selection among equally-eligible
//! candidates uses a caller-seeded RNG so generation is reproducible.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tracing::debug;

use crate::models::archetype::WorkoutArchetype;
use crate::models::exercise::{Exercise, ExerciseType, Intensity, Mechanic};
use crate::models::profile::UserProfile;
use crate::models::workout::{BlockKind, ExerciseInstance, WorkoutBlock};
use crate::overload::{self, RecommendationKind};
use crate::safety::SafetyFilter;

/// Dynamic-mode time envelope (minutes).
const WARMUP_MINUTES: f64 = 7.0;
const COOLDOWN_MINUTES: f64 = 5.0;
/// One superset: N x 60s work + 30s intra-superset rest + 150s after the group.
const SUPERSET_COST_MINUTES: f64 = 6.5;

const SUPERSET_WORK_SECONDS: u32 = 60;
const SUPERSET_REST_SECONDS: u32 = 30;
const SUPERSET_GROUP_REST_SECONDS: u32 = 150;

/// ---------------------------------------------------------------------------
/// Builder
/// ---------------------------------------------------------------------------

pub struct BlockBuilder<'a> {
  safety: &'a SafetyFilter<'a>,
  profile: &'a UserProfile,
  archetype: &'a WorkoutArchetype,
}

impl<'a> BlockBuilder<'a> {
  pub fn new(
    safety: &'a SafetyFilter<'a>,
    profile: &'a UserProfile,
    archetype: &'a WorkoutArchetype,
  ) -> Self {
    Self {
      safety,
      profile,
      archetype,
    }
  }

  /// Build all blocks. `target_minutes` switches to dynamic time-boxing.
  pub fn build(
    &self,
    catalog: &[Exercise],
    target_minutes: Option<u32>,
    rng: &mut ChaCha8Rng,
  ) -> Vec<WorkoutBlock> {
    let pool = self.placeable_pool(catalog);
    let mut ctx = BuildContext {
      profile: self.profile,
      archetype: self.archetype,
      pool,
      used: BTreeSet::new(),
      rng,
    };

    match target_minutes {
      Some(minutes) => build_dynamic(&mut ctx, minutes),
      None => build_template(&mut ctx),
    }
  }

  /// Candidate pool: equipment- and difficulty-eligible catalog rows, with
  /// each contraindicated entry replaced in place by its first safe
  /// pattern-sharing alternative (or dropped when none exists). Keeping the
  /// slot preserves the time-box arithmetic under substitution.
  fn placeable_pool(&self, catalog: &[Exercise]) -> Vec<Exercise> {
    let eligible: Vec<Exercise> = catalog
      .iter()
      .filter(|e| e.equipment_available(&self.profile.equipment))
      .filter(|e| e.difficulty <= self.profile.fitness_level)
      .cloned()
      .collect();

    let mut pool = Vec::with_capacity(eligible.len());
    for exercise in &eligible {
      let assessment = self.safety.assess(exercise, self.profile);
      if !assessment.is_contraindicated() {
        pool.push(exercise.clone());
        continue;
      }
      let alternatives = self.safety.alternatives(exercise, &eligible, self.profile);
      match alternatives.into_iter().next() {
        Some(substitute) => {
          debug!(
            excluded = %exercise.id,
            substitute = %substitute.id,
            "substituted contraindicated candidate"
          );
          pool.push(substitute);
        }
        None => {
          debug!(excluded = %exercise.id, "dropped contraindicated candidate");
        }
      }
    }
    pool
  }
}

/// ---------------------------------------------------------------------------
/// Build Context and Selection
/// ---------------------------------------------------------------------------

struct BuildContext<'a> {
  profile: &'a UserProfile,
  archetype: &'a WorkoutArchetype,
  pool: Vec<Exercise>,
  used: BTreeSet<String>,
  rng: &'a mut ChaCha8Rng,
}

impl BuildContext<'_> {
  /// Shuffle the matching slice of the pool and take up to `n` distinct,
  /// not-yet-used exercises.
  fn take(&mut self, n: usize, predicate: impl Fn(&Exercise) -> bool) -> Vec<Exercise> {
    let mut candidates: Vec<Exercise> =
      self.pool.iter().filter(|e| predicate(e)).cloned().collect();
    candidates.shuffle(self.rng);
    candidates
      .into_iter()
      .filter(|e| self.used.insert(e.id.clone()))
      .take(n)
      .collect()
  }

  fn is_beginner(&self) -> bool {
    self.profile.fitness_level.is_beginner()
  }
}

fn is_light_cardio(e: &Exercise) -> bool {
  e.exercise_type == ExerciseType::Cardio && e.intensity == Intensity::Low
}

fn has_pattern(e: &Exercise, pattern: &str) -> bool {
  e.movement_patterns.iter().any(|p| p == pattern)
}

fn is_dynamic_stretch(e: &Exercise) -> bool {
  e.exercise_type == ExerciseType::Stretching && has_pattern(e, "dynamic")
}

fn is_static_stretch(e: &Exercise) -> bool {
  e.exercise_type == ExerciseType::Stretching && has_pattern(e, "static")
}

fn is_mobility(e: &Exercise) -> bool {
  e.exercise_type == ExerciseType::Stretching || has_pattern(e, "mobility")
}

fn is_compound_strength(e: &Exercise) -> bool {
  e.exercise_type == ExerciseType::Strength && e.mechanic == Mechanic::Compound
}

fn is_accessory(e: &Exercise) -> bool {
  e.exercise_type == ExerciseType::Strength && e.mechanic == Mechanic::Isolation
}

fn is_high_intensity(e: &Exercise) -> bool {
  e.intensity == Intensity::High && e.exercise_type != ExerciseType::Stretching
}

fn is_superset_candidate(e: &Exercise) -> bool {
  matches!(
    e.exercise_type,
    ExerciseType::Strength | ExerciseType::Plyometrics
  )
}

/// ---------------------------------------------------------------------------
/// Instance Construction
/// ---------------------------------------------------------------------------

fn timed_instance(exercise: Exercise, duration_seconds: u32, rest_seconds: u32) -> ExerciseInstance {
  ExerciseInstance {
    exercise,
    sets: 1,
    reps: None,
    reps_min: None,
    reps_max: None,
    weight_kg: None,
    duration_seconds: Some(duration_seconds),
    rest_seconds,
    superset_group: None,
    target_rpe: None,
  }
}

fn rep_instance(exercise: Exercise, reps: u32) -> ExerciseInstance {
  ExerciseInstance {
    exercise,
    sets: 1,
    reps: Some(reps),
    reps_min: None,
    reps_max: None,
    weight_kg: None,
    duration_seconds: None,
    rest_seconds: 0,
    superset_group: None,
    target_rpe: None,
  }
}

/// Prescribed instance for a strength-block slot, with the overload
/// calculator's history-driven load decision applied when history exists.
fn prescribed_instance(exercise: Exercise, profile: &UserProfile) -> ExerciseInstance {
  let prescription = overload::prescribe(&exercise, profile);
  let mut weight_kg = prescription.weight_kg;

  let history = profile.history_for(&exercise.id);
  if let Some(rec) = overload::recommend(&exercise, history, profile.readiness()) {
    match rec.kind {
      RecommendationKind::Deload | RecommendationKind::Maintain => {
        if rec.target_load_kg.is_some() {
          weight_kg = rec.target_load_kg;
        }
      }
      RecommendationKind::Progression => {
        if let Some(target) = rec.target_load_kg {
          weight_kg = Some(target);
        }
      }
    }
  }

  ExerciseInstance {
    exercise,
    sets: prescription.sets,
    reps: prescription.reps,
    reps_min: prescription.reps_min,
    reps_max: prescription.reps_max,
    weight_kg,
    duration_seconds: None,
    rest_seconds: prescription.rest_seconds,
    superset_group: None,
    target_rpe: Some(prescription.target_rpe),
  }
}

/// ---------------------------------------------------------------------------
/// Template Mode
/// ---------------------------------------------------------------------------

type BlockStrategy = for<'a, 'b> fn(&'b mut BuildContext<'a>, u32) -> Option<WorkoutBlock>;

/// Strategy table: adding a block kind is a row here, not a new branch in a
/// dispatcher.
const STRATEGIES: &[(BlockKind, BlockStrategy)] = &[
  (BlockKind::Warmup, build_warmup),
  (BlockKind::Strength, build_strength),
  (BlockKind::MetabolicCircuit, build_metabolic_circuit),
  (BlockKind::Cooldown, build_cooldown),
  (BlockKind::MobilityFlow, build_mobility_flow),
  (BlockKind::AccessoryWork, build_accessory_work),
  (BlockKind::Supersets, build_supersets_from_preference),
];

fn strategy_for(kind: BlockKind) -> Option<BlockStrategy> {
  STRATEGIES
    .iter()
    .find(|(k, _)| *k == kind)
    .map(|(_, strategy)| *strategy)
}

fn build_template(ctx: &mut BuildContext) -> Vec<WorkoutBlock> {
  let template = ctx.archetype.blocks.clone();
  let mut blocks = Vec::new();
  for kind in template {
    let order = blocks.len() as u32;
    if let Some(strategy) = strategy_for(kind) {
      if let Some(block) = strategy(ctx, order) {
        blocks.push(block);
      }
    }
  }
  blocks
}

fn block(kind: BlockKind, order: u32, exercises: Vec<ExerciseInstance>) -> Option<WorkoutBlock> {
  if exercises.is_empty() {
    return None;
  }
  Some(WorkoutBlock {
    name: kind.to_string(),
    order,
    kind,
    exercises,
    rounds: None,
    rest_between_rounds: None,
  })
}

/// Warm-up: one light-cardio item (300s) plus up to 3 dynamic stretches
/// at 10 reps each.
fn build_warmup(ctx: &mut BuildContext, order: u32) -> Option<WorkoutBlock> {
  let mut exercises = Vec::new();
  for cardio in ctx.take(1, is_light_cardio) {
    exercises.push(timed_instance(cardio, 300, 0));
  }
  for stretch in ctx.take(3, is_dynamic_stretch) {
    exercises.push(rep_instance(stretch, 10));
  }
  block(BlockKind::Warmup, order, exercises)
}

/// Strength: one compound lift parameterized by the overload calculator,
/// plus 2-3 accessories, superset-grouped when the archetype leans
/// metabolic.
fn build_strength(ctx: &mut BuildContext, order: u32) -> Option<WorkoutBlock> {
  let mut exercises = Vec::new();

  for compound in ctx.take(1, is_compound_strength) {
    exercises.push(prescribed_instance(compound, ctx.profile));
  }

  let accessory_count = if ctx.is_beginner() { 2 } else { 3 };
  let group_accessories = ctx.archetype.metabolic_emphasis > 0.5;
  for accessory in ctx.take(accessory_count, is_accessory) {
    let mut instance = prescribed_instance(accessory, ctx.profile);
    if group_accessories {
      instance.superset_group = Some(1);
    }
    exercises.push(instance);
  }

  block(BlockKind::Strength, order, exercises)
}

/// Metabolic circuit: 3-4 high-intensity items, short work/rest windows,
/// 2 rounds for beginners and 3 otherwise, 90s between rounds.
fn build_metabolic_circuit(ctx: &mut BuildContext, order: u32) -> Option<WorkoutBlock> {
  let (count, work_seconds, rest_seconds) = match ctx.profile.fitness_level {
    crate::models::FitnessLevel::Beginner => (3, 30, 60),
    crate::models::FitnessLevel::Intermediate => (4, 40, 45),
    crate::models::FitnessLevel::Advanced => (4, 45, 30),
  };

  let exercises: Vec<ExerciseInstance> = ctx
    .take(count, is_high_intensity)
    .into_iter()
    .map(|e| {
      let mut instance = timed_instance(e, work_seconds, rest_seconds);
      instance.target_rpe = Some(8.0);
      instance
    })
    .collect();

  let mut built = block(BlockKind::MetabolicCircuit, order, exercises)?;
  built.rounds = Some(if ctx.is_beginner() { 2 } else { 3 });
  built.rest_between_rounds = Some(90);
  Some(built)
}

/// Cool-down: up to 4 static stretches at 60s each.
fn build_cooldown(ctx: &mut BuildContext, order: u32) -> Option<WorkoutBlock> {
  let exercises: Vec<ExerciseInstance> = ctx
    .take(4, is_static_stretch)
    .into_iter()
    .map(|e| timed_instance(e, 60, 0))
    .collect();
  block(BlockKind::Cooldown, order, exercises)
}

/// Mobility flow: up to 4 mobility items at 45s each with short resets.
fn build_mobility_flow(ctx: &mut BuildContext, order: u32) -> Option<WorkoutBlock> {
  let exercises: Vec<ExerciseInstance> = ctx
    .take(4, is_mobility)
    .into_iter()
    .map(|e| timed_instance(e, 45, 15))
    .collect();
  block(BlockKind::MobilityFlow, order, exercises)
}

/// Accessory work: 3 isolation items parameterized by the overload
/// calculator.
fn build_accessory_work(ctx: &mut BuildContext, order: u32) -> Option<WorkoutBlock> {
  let exercises: Vec<ExerciseInstance> = ctx
    .take(3, is_accessory)
    .into_iter()
    .map(|e| prescribed_instance(e, ctx.profile))
    .collect();
  block(BlockKind::AccessoryWork, order, exercises)
}

/// A Supersets token inside a template allocates from the user's preferred
/// duration.
fn build_supersets_from_preference(ctx: &mut BuildContext, order: u32) -> Option<WorkoutBlock> {
  let minutes = ctx.profile.preferred_duration_min;
  build_superset_block(ctx, minutes, order)
}

/// ---------------------------------------------------------------------------
/// Dynamic Mode
/// ---------------------------------------------------------------------------

fn build_dynamic(ctx: &mut BuildContext, target_minutes: u32) -> Vec<WorkoutBlock> {
  let mut blocks = Vec::new();

  // Fixed ~7 minute warm-up: 300s light cardio + two 60s dynamic stretches.
  let mut warmup = Vec::new();
  for cardio in ctx.take(1, is_light_cardio) {
    warmup.push(timed_instance(cardio, 300, 0));
  }
  for stretch in ctx.take(2, is_dynamic_stretch) {
    warmup.push(timed_instance(stretch, 60, 0));
  }
  if let Some(b) = block(BlockKind::Warmup, blocks.len() as u32, warmup) {
    blocks.push(b);
  }

  if let Some(b) = build_superset_block(ctx, target_minutes, blocks.len() as u32) {
    blocks.push(b);
  }

  // Fixed ~5 minute cool-down: five 60s static stretches.
  let cooldown: Vec<ExerciseInstance> = ctx
    .take(5, is_static_stretch)
    .into_iter()
    .map(|e| timed_instance(e, 60, 0))
    .collect();
  if let Some(b) = block(BlockKind::Cooldown, blocks.len() as u32, cooldown) {
    blocks.push(b);
  }

  blocks
}

/// Allocate supersets into the time remaining after the fixed warm-up and
/// cool-down. Group ids are 1-based (A=1, B=2, ...).
fn build_superset_block(
  ctx: &mut BuildContext,
  target_minutes: u32,
  order: u32,
) -> Option<WorkoutBlock> {
  let remaining = (target_minutes as f64 - WARMUP_MINUTES - COOLDOWN_MINUTES).max(0.0);
  let per_superset = if target_minutes < 35 { 3 } else { 4 };

  let candidate_count = ctx.pool.iter().filter(|e| is_superset_candidate(e)).count();
  let time_boxed = (remaining / SUPERSET_COST_MINUTES).floor() as usize;
  let supersets = time_boxed.min((candidate_count / per_superset).max(1));
  if supersets == 0 || candidate_count == 0 {
    return None;
  }

  debug!(
    target_minutes,
    supersets, per_superset, "allocated supersets for remaining time"
  );

  let picks = ctx.take(supersets * per_superset, is_superset_candidate);
  let mut exercises = Vec::new();
  for (group_index, group) in picks.chunks(per_superset).enumerate() {
    for (position, exercise) in group.iter().enumerate() {
      let last_in_group = position + 1 == group.len();
      let rest = if last_in_group {
        SUPERSET_GROUP_REST_SECONDS
      } else {
        SUPERSET_REST_SECONDS
      };
      let mut instance = timed_instance(exercise.clone(), SUPERSET_WORK_SECONDS, rest);
      instance.superset_group = Some(group_index as u8 + 1);
      instance.target_rpe = Some(7.0);
      exercises.push(instance);
    }
  }

  block(BlockKind::Supersets, order, exercises)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::builtin_exercises;
  use crate::config::EngineTables;
  use crate::models::profile::{FitnessLevel, Goal};
  use rand::SeedableRng;

  fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
  }

  fn beginner_profile() -> UserProfile {
    let mut profile = UserProfile::default();
    profile.goal = Goal::BuildMuscle;
    profile.readiness_score = Some(75.0);
    profile
  }

  fn full_body() -> crate::models::WorkoutArchetype {
    crate::models::WorkoutArchetype::fallback_default()
  }

  #[test]
  fn test_template_mode_follows_archetype_blocks() {
    let tables = EngineTables::default();
    let safety = SafetyFilter::new(&tables);
    let profile = beginner_profile();
    let archetype = full_body();
    let builder = BlockBuilder::new(&safety, &profile, &archetype);

    let blocks = builder.build(&builtin_exercises(), None, &mut rng(1));

    let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
    assert_eq!(
      kinds,
      vec![
        BlockKind::Warmup,
        BlockKind::Strength,
        BlockKind::MetabolicCircuit,
        BlockKind::Cooldown
      ]
    );
  }

  #[test]
  fn test_warmup_shape() {
    let tables = EngineTables::default();
    let safety = SafetyFilter::new(&tables);
    let profile = beginner_profile();
    let archetype = full_body();
    let builder = BlockBuilder::new(&safety, &profile, &archetype);

    let blocks = builder.build(&builtin_exercises(), None, &mut rng(2));
    let warmup = &blocks[0];

    // One 300s cardio item followed by up to three 10-rep dynamic stretches.
    assert_eq!(warmup.exercises[0].duration_seconds, Some(300));
    assert!(warmup.exercises.len() >= 2 && warmup.exercises.len() <= 4);
    for stretch in &warmup.exercises[1..] {
      assert_eq!(stretch.reps, Some(10));
    }
  }

  #[test]
  fn test_strength_block_has_compound_and_accessories() {
    let tables = EngineTables::default();
    let safety = SafetyFilter::new(&tables);
    let profile = beginner_profile();
    let archetype = full_body();
    let builder = BlockBuilder::new(&safety, &profile, &archetype);

    let blocks = builder.build(&builtin_exercises(), None, &mut rng(3));
    let strength = blocks
      .iter()
      .find(|b| b.kind == BlockKind::Strength)
      .unwrap();

    assert!(strength.exercises[0].exercise.is_compound());
    // Beginner: 1 compound + 2 accessories.
    assert_eq!(strength.exercises.len(), 3);
    for accessory in &strength.exercises[1..] {
      assert_eq!(accessory.exercise.mechanic, Mechanic::Isolation);
    }
  }

  #[test]
  fn test_metabolic_circuit_beginner_rounds() {
    let tables = EngineTables::default();
    let safety = SafetyFilter::new(&tables);
    let profile = beginner_profile();
    let archetype = full_body();
    let builder = BlockBuilder::new(&safety, &profile, &archetype);

    let blocks = builder.build(&builtin_exercises(), None, &mut rng(4));
    let circuit = blocks
      .iter()
      .find(|b| b.kind == BlockKind::MetabolicCircuit)
      .unwrap();

    assert_eq!(circuit.rounds, Some(2));
    assert_eq!(circuit.rest_between_rounds, Some(90));
    assert_eq!(circuit.exercises.len(), 3);
    for instance in &circuit.exercises {
      assert_eq!(instance.duration_seconds, Some(30));
      assert_eq!(instance.rest_seconds, 60);
    }
  }

  #[test]
  fn test_dynamic_mode_thirty_minutes_allocates_two_supersets() {
    let tables = EngineTables::default();
    let safety = SafetyFilter::new(&tables);
    let profile = beginner_profile();
    let archetype = full_body();
    let builder = BlockBuilder::new(&safety, &profile, &archetype);

    let blocks = builder.build(&builtin_exercises(), Some(30), &mut rng(5));

    // warmup, one superset block, cooldown
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].kind, BlockKind::Warmup);
    assert_eq!(blocks[1].kind, BlockKind::Supersets);
    assert_eq!(blocks[2].kind, BlockKind::Cooldown);

    let supersets = &blocks[1];
    // floor((30 - 7 - 5) / 6.5) = 2 supersets of 3 exercises.
    let groups: BTreeSet<u8> = supersets
      .exercises
      .iter()
      .filter_map(|e| e.superset_group)
      .collect();
    assert_eq!(groups, BTreeSet::from([1, 2]));
    assert_eq!(supersets.exercises.len(), 6);

    // Last member of each group carries the long group rest.
    assert_eq!(supersets.exercises[2].rest_seconds, SUPERSET_GROUP_REST_SECONDS);
    assert_eq!(supersets.exercises[5].rest_seconds, SUPERSET_GROUP_REST_SECONDS);
    assert_eq!(supersets.exercises[0].rest_seconds, SUPERSET_REST_SECONDS);
  }

  #[test]
  fn test_dynamic_mode_longer_session_uses_four_per_superset() {
    let tables = EngineTables::default();
    let safety = SafetyFilter::new(&tables);
    let mut profile = beginner_profile();
    profile.fitness_level = FitnessLevel::Intermediate;
    let archetype = full_body();
    let builder = BlockBuilder::new(&safety, &profile, &archetype);

    let blocks = builder.build(&builtin_exercises(), Some(40), &mut rng(6));
    let supersets = blocks
      .iter()
      .find(|b| b.kind == BlockKind::Supersets)
      .unwrap();

    // Every full group holds 4 exercises at >= 35 minutes.
    let first_group: Vec<_> = supersets
      .exercises
      .iter()
      .filter(|e| e.superset_group == Some(1))
      .collect();
    assert_eq!(first_group.len(), 4);
  }

  #[test]
  fn test_same_seed_reproduces_selection() {
    let tables = EngineTables::default();
    let safety = SafetyFilter::new(&tables);
    let profile = beginner_profile();
    let archetype = full_body();
    let builder = BlockBuilder::new(&safety, &profile, &archetype);

    let a = builder.build(&builtin_exercises(), Some(30), &mut rng(42));
    let b = builder.build(&builtin_exercises(), Some(30), &mut rng(42));
    assert_eq!(a, b);
  }

  #[test]
  fn test_pool_excludes_unavailable_equipment() {
    let tables = EngineTables::default();
    let safety = SafetyFilter::new(&tables);
    let profile = beginner_profile(); // bodyweight only
    let archetype = full_body();
    let builder = BlockBuilder::new(&safety, &profile, &archetype);

    let blocks = builder.build(&builtin_exercises(), None, &mut rng(7));
    for instance in blocks.iter().flat_map(|b| b.exercises.iter()) {
      assert!(instance
        .exercise
        .equipment_available(&profile.equipment));
    }
  }
}
