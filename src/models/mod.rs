pub mod archetype;
pub mod exercise;
pub mod history;
pub mod profile;
pub mod workout;

pub use archetype::{ReadinessRange, WorkoutArchetype};
pub use exercise::{Exercise, ExerciseType, Intensity, Mechanic, ProgressionStep};
pub use history::PerformanceRecord;
pub use profile::{
  FitnessLevel, Goal, InjuryRecord, InjuryStatus, MovementRestriction, RestrictionKind,
  UserProfile,
};
pub use workout::{BlockKind, ExerciseInstance, GeneratedWorkout, WorkoutBlock};
