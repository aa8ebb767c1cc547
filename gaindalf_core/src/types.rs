//! Core domain types for the Gaindalf workout tracker.
//!
//! This module defines:
//! - Catalog entities (muscle groups, lifts, links, conflicts)
//! - Journal entities (workouts, workout lifts, sets)
//! - Result types produced by the suggestion engine and progression calculator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Catalog Types
// ============================================================================

/// A body-region category assigned to lifts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MuscleGroup {
    pub id: i64,
    pub name: String,
}

/// A named exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lift {
    pub id: i64,
    pub name: String,
}

/// Link row between a lift and one of its muscle groups
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LiftMuscleGroup {
    pub lift_id: i64,
    pub muscle_group_id: i64,
}

/// Undirected incompatibility between two muscle groups
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MuscleGroupConflict {
    pub id: i64,
    pub muscle_group_a_id: i64,
    pub muscle_group_b_id: i64,
}

impl MuscleGroupConflict {
    /// Whether this conflict touches the given group on either side
    pub fn involves(&self, muscle_group_id: i64) -> bool {
        self.muscle_group_a_id == muscle_group_id || self.muscle_group_b_id == muscle_group_id
    }

    /// Whether this conflict is the unordered pair {a, b}
    pub fn is_pair(&self, a: i64, b: i64) -> bool {
        (self.muscle_group_a_id == a && self.muscle_group_b_id == b)
            || (self.muscle_group_a_id == b && self.muscle_group_b_id == a)
    }
}

// ============================================================================
// Journal Types
// ============================================================================

/// A dated training session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workout {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub subtitle: String,
}

/// One occurrence of a lift within a workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutLift {
    pub id: i64,
    pub workout_id: i64,
    pub lift_id: i64,
    #[serde(default)]
    pub display_order: i32,
}

/// One rep/weight entry within a workout lift. Weight is in kg.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSet {
    pub id: i64,
    pub workout_lift_id: i64,
    pub set_number: i32,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
}

impl WorkoutSet {
    /// `reps × weight` when both are recorded
    pub fn volume(&self) -> Option<f64> {
        match (self.reps, self.weight) {
            (Some(reps), Some(weight)) => Some(f64::from(reps) * weight),
            _ => None,
        }
    }
}

// ============================================================================
// Views
// ============================================================================

/// A lift together with the ids of its muscle groups
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct LiftDetail {
    pub lift: Lift,
    pub muscle_group_ids: Vec<i64>,
}

/// A conflict with both group names resolved
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ConflictDetail {
    pub conflict: MuscleGroupConflict,
    pub muscle_group_a_name: String,
    pub muscle_group_b_name: String,
}

/// One lift of a workout with its sets, ordered by set number
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WorkoutLiftDetail {
    pub workout_lift: WorkoutLift,
    pub lift_name: String,
    pub sets: Vec<WorkoutSet>,
}

/// A workout with all of its lifts and sets
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WorkoutDetail {
    pub workout: Workout,
    pub lifts: Vec<WorkoutLiftDetail>,
}

/// Listing entry for a workout
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct WorkoutSummary {
    pub workout: Workout,
    pub lift_names: Vec<String>,
}

/// Strength and endurance scores of one workout (or one lift occurrence)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutIndexes {
    pub workout_id: i64,
    pub date: NaiveDate,
    pub strength_index: Option<f64>,
    pub endurance_index: Option<f64>,
}
