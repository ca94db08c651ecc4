//! Progressive overload calculator.
//!
//! Two responsibilities:
//! - prescribe sets/reps/load for an exercise from the user's level and
//!   one-rep-max estimates;
//! - turn recent performance history into a progress / maintain / deload
//!   decision with an explicit reason trail.
//!
//! Key principles:
//! - Criteria-driven, not calendar-driven
//! - Deload beats progression: an incomplete week always steps load back
//! - Progression rate is capped so readiness spikes cannot run away

use serde::{Deserialize, Serialize};

use crate::models::exercise::{Exercise, ProgressionStep};
use crate::models::history::PerformanceRecord;
use crate::models::profile::UserProfile;

/// Sessions considered for trend analysis.
const TREND_WINDOW: usize = 3;

/// Base progression rate per decision (2.5%), capped at 5%.
const BASE_PROGRESSION_RATE: f64 = 0.025;
const MAX_PROGRESSION_RATE: f64 = 0.05;

/// Completion below this triggers a deload.
const DELOAD_COMPLETION_THRESHOLD: f64 = 0.80;
const DELOAD_FACTOR: f64 = 0.9;

// ---------------------------------------------------------------------------
/// Prescription: session parameters for one exercise
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub sets: u32,
    pub reps: Option<u32>,
    pub reps_min: Option<u32>,
    pub reps_max: Option<u32>,
    pub weight_kg: Option<f64>,
    pub rest_seconds: u32,
    pub target_rpe: f64,
}

/// Percentage-of-max prescription for a compound lift, rep-range defaults
/// otherwise.
pub fn prescribe(exercise: &Exercise, profile: &UserProfile) -> Prescription {
    let beginner = profile.fitness_level.is_beginner();

    if exercise.is_compound() {
        match profile.one_rep_max_for(&exercise.id) {
            Some(one_rep_max) => {
                let intensity = if beginner { 0.70 } else { 0.80 };
                Prescription {
                    sets: if beginner { 3 } else { 4 },
                    reps: Some(if beginner { 10 } else { 8 }),
                    reps_min: None,
                    reps_max: None,
                    weight_kg: Some(round_load(one_rep_max * intensity)),
                    rest_seconds: 90,
                    target_rpe: 7.0,
                }
            }
            None => Prescription {
                sets: 3,
                reps: Some(if beginner { 12 } else { 10 }),
                reps_min: None,
                reps_max: None,
                weight_kg: None,
                rest_seconds: 90,
                target_rpe: 6.0,
            },
        }
    } else {
        Prescription {
            sets: 3,
            reps: Some(10),
            reps_min: Some(8),
            reps_max: Some(12),
            weight_kg: None,
            rest_seconds: 60,
            target_rpe: if beginner { 6.0 } else { 7.0 },
        }
    }
}

// ---------------------------------------------------------------------------
/// Trend Analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Maintaining,
    Declining,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Improving => write!(f, "improving"),
            Self::Maintaining => write!(f, "maintaining"),
            Self::Declining => write!(f, "declining"),
        }
    }
}

/// Classify the last `TREND_WINDOW` sessions by majority of pairwise
/// `completion_rate x load` deltas. History is most-recent-first.
pub fn analyze_trend(history: &[PerformanceRecord]) -> TrendDirection {
    let window = &history[..history.len().min(TREND_WINDOW)];
    if window.len() < 2 {
        return TrendDirection::Maintaining;
    }

    let mut rising = 0;
    let mut falling = 0;
    for pair in window.windows(2) {
        let delta = pair[0].effective_work() - pair[1].effective_work();
        if delta > 0.0 {
            rising += 1;
        } else if delta < 0.0 {
            falling += 1;
        }
    }

    if rising > falling {
        TrendDirection::Improving
    } else if falling > rising {
        TrendDirection::Declining
    } else {
        TrendDirection::Maintaining
    }
}

/// Progression rate: 2.5% base, scaled by readiness and trend, capped at 5%.
pub fn progression_rate(readiness: f64, trend: TrendDirection) -> f64 {
    let mut rate = BASE_PROGRESSION_RATE;

    if readiness >= 80.0 {
        rate *= 1.2;
    } else if readiness < 60.0 {
        rate *= 0.8;
    }

    match trend {
        TrendDirection::Improving => rate *= 1.1,
        TrendDirection::Declining => rate *= 0.7,
        TrendDirection::Maintaining => {}
    }

    rate.min(MAX_PROGRESSION_RATE)
}

// ---------------------------------------------------------------------------
/// Recommendation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Progression,
    Maintain,
    Deload,
}

/// Transient output of the overload calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionRecommendation {
    pub kind: RecommendationKind,
    /// Target load for the next block of sessions, when load-bearing.
    pub target_load_kg: Option<f64>,
    /// Next pathway step when the decision is a pathway progression.
    pub next_step: Option<ProgressionStep>,
    pub reasoning: Vec<String>,
    pub duration_weeks: u32,
    pub reassessment: String,
}

/// Decision rule over the most recent session. Returns `None` when there is
/// no history to decide from.
pub fn recommend(
    exercise: &Exercise,
    history: &[PerformanceRecord],
    readiness: f64,
) -> Option<ProgressionRecommendation> {
    let latest = history.first()?;
    let trend = analyze_trend(history);
    let rate = progression_rate(readiness, trend);

    let mut reasoning = vec![format!(
        "Trend over last {} sessions: {}",
        history.len().min(TREND_WINDOW),
        trend
    )];

    if latest.completion_rate < DELOAD_COMPLETION_THRESHOLD {
        reasoning.push(format!(
            "Completion rate {:.0}% below {:.0}% threshold",
            latest.completion_rate * 100.0,
            DELOAD_COMPLETION_THRESHOLD * 100.0
        ));
        return Some(ProgressionRecommendation {
            kind: RecommendationKind::Deload,
            target_load_kg: Some(round_load(latest.load_kg * DELOAD_FACTOR)),
            next_step: None,
            reasoning,
            duration_weeks: 1,
            reassessment: "after a fully completed session".to_string(),
        });
    }

    let low_exertion = latest.average_rpe().is_some_and(|rpe| rpe <= 6.0);
    if low_exertion && latest.completion_rate >= 1.0 {
        let next_step = exercise.next_progression_step().cloned();
        let duration_weeks = next_step
            .as_ref()
            .and_then(|step| step.mastery_weeks)
            .unwrap_or(2);

        let target_load_kg = if next_step.is_some() {
            reasoning.push(format!(
                "Advancing along pathway to {}",
                next_step.as_ref().map(|s| s.exercise_id.as_str()).unwrap_or("")
            ));
            None
        } else {
            reasoning.push(format!("Load increase of {:.1}%", rate * 100.0));
            Some(round_load(latest.load_kg * (1.0 + rate)))
        };

        return Some(ProgressionRecommendation {
            kind: RecommendationKind::Progression,
            target_load_kg,
            next_step,
            reasoning,
            duration_weeks,
            reassessment: format!("in {} weeks", duration_weeks),
        });
    }

    reasoning.push("Holding at current load".to_string());
    Some(ProgressionRecommendation {
        kind: RecommendationKind::Maintain,
        target_load_kg: Some(latest.load_kg),
        next_step: None,
        reasoning,
        duration_weeks: 2,
        reassessment: "in 2 weeks".to_string(),
    })
}

fn round_load(kg: f64) -> f64 {
    (kg * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
