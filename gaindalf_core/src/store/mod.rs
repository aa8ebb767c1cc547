//! Entity store: the read surface used by the engine and the progression
//! calculator, and the `Database` that implements it.
//!
//! `Database` keeps one ordered table per entity. Mutations live in
//! [`catalog`] (muscle groups, lifts, conflicts) and [`journal`]
//! (workouts, workout lifts, sets); persistence lives in [`file`].

pub mod catalog;
pub mod file;
pub mod journal;

pub use file::FileStore;

use crate::{
    Lift, LiftMuscleGroup, MuscleGroup, MuscleGroupConflict, Result, Workout, WorkoutLift,
    WorkoutSet,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Read accessors over the entity graph.
///
/// Listings come back in ascending id order unless stated otherwise.
pub trait EntityStore {
    fn muscle_groups(&self) -> Result<Vec<MuscleGroup>>;
    fn muscle_group(&self, id: i64) -> Result<Option<MuscleGroup>>;
    fn lift(&self, id: i64) -> Result<Option<Lift>>;
    fn workout(&self, id: i64) -> Result<Option<Workout>>;
    fn workouts(&self) -> Result<Vec<Workout>>;
    fn links_for_lift(&self, lift_id: i64) -> Result<Vec<LiftMuscleGroup>>;
    fn links_for_muscle_group(&self, muscle_group_id: i64) -> Result<Vec<LiftMuscleGroup>>;
    /// Conflicts naming the group on either side
    fn conflicts_for_muscle_group(&self, muscle_group_id: i64)
        -> Result<Vec<MuscleGroupConflict>>;
    fn workout_lifts_for_workout(&self, workout_id: i64) -> Result<Vec<WorkoutLift>>;
    fn workout_lifts_for_lift(&self, lift_id: i64) -> Result<Vec<WorkoutLift>>;
    /// Sets ordered by set number
    fn sets_for_workout_lift(&self, workout_lift_id: i64) -> Result<Vec<WorkoutSet>>;
}

/// Per-table id sequences. Ids start at 1 and are never reused.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct Sequences {
    muscle_group: i64,
    lift: i64,
    conflict: i64,
    workout: i64,
    workout_lift: i64,
    set: i64,
}

pub(crate) fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// In-memory entity graph
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub(crate) muscle_groups: BTreeMap<i64, MuscleGroup>,
    #[serde(default)]
    pub(crate) lifts: BTreeMap<i64, Lift>,
    #[serde(default)]
    pub(crate) lift_muscle_groups: BTreeSet<LiftMuscleGroup>,
    #[serde(default)]
    pub(crate) conflicts: BTreeMap<i64, MuscleGroupConflict>,
    #[serde(default)]
    pub(crate) workouts: BTreeMap<i64, Workout>,
    #[serde(default)]
    pub(crate) workout_lifts: BTreeMap<i64, WorkoutLift>,
    #[serde(default)]
    pub(crate) sets: BTreeMap<i64, WorkoutSet>,
    #[serde(default)]
    pub(crate) sequences: Sequences,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lifts, ascending id
    #[cfg(test)]
    pub(crate) fn lifts(&self) -> Vec<Lift> {
        self.lifts.values().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn workout_lift(&self, id: i64) -> Option<WorkoutLift> {
        self.workout_lifts.get(&id).copied()
    }

    #[cfg(test)]
    pub(crate) fn set(&self, id: i64) -> Option<WorkoutSet> {
        self.sets.get(&id).copied()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.muscle_groups.is_empty() && self.lifts.is_empty() && self.workouts.is_empty()
    }
}

impl EntityStore for Database {
    fn muscle_groups(&self) -> Result<Vec<MuscleGroup>> {
        Ok(self.muscle_groups.values().cloned().collect())
    }

    fn muscle_group(&self, id: i64) -> Result<Option<MuscleGroup>> {
        Ok(self.muscle_groups.get(&id).cloned())
    }

    fn lift(&self, id: i64) -> Result<Option<Lift>> {
        Ok(self.lifts.get(&id).cloned())
    }

    fn workout(&self, id: i64) -> Result<Option<Workout>> {
        Ok(self.workouts.get(&id).cloned())
    }

    fn workouts(&self) -> Result<Vec<Workout>> {
        Ok(self.workouts.values().cloned().collect())
    }

    fn links_for_lift(&self, lift_id: i64) -> Result<Vec<LiftMuscleGroup>> {
        Ok(self
            .lift_muscle_groups
            .iter()
            .filter(|link| link.lift_id == lift_id)
            .copied()
            .collect())
    }

    fn links_for_muscle_group(&self, muscle_group_id: i64) -> Result<Vec<LiftMuscleGroup>> {
        let mut links: Vec<_> = self
            .lift_muscle_groups
            .iter()
            .filter(|link| link.muscle_group_id == muscle_group_id)
            .copied()
            .collect();
        links.sort_by_key(|link| link.lift_id);
        Ok(links)
    }

    fn conflicts_for_muscle_group(
        &self,
        muscle_group_id: i64,
    ) -> Result<Vec<MuscleGroupConflict>> {
        Ok(self
            .conflicts
            .values()
            .filter(|c| c.involves(muscle_group_id))
            .copied()
            .collect())
    }

    fn workout_lifts_for_workout(&self, workout_id: i64) -> Result<Vec<WorkoutLift>> {
        Ok(self
            .workout_lifts
            .values()
            .filter(|wl| wl.workout_id == workout_id)
            .copied()
            .collect())
    }

    fn workout_lifts_for_lift(&self, lift_id: i64) -> Result<Vec<WorkoutLift>> {
        Ok(self
            .workout_lifts
            .values()
            .filter(|wl| wl.lift_id == lift_id)
            .copied()
            .collect())
    }

    fn sets_for_workout_lift(&self, workout_lift_id: i64) -> Result<Vec<WorkoutSet>> {
        let mut sets: Vec<_> = self
            .sets
            .values()
            .filter(|s| s.workout_lift_id == workout_lift_id)
            .copied()
            .collect();
        sets.sort_by_key(|s| (s.set_number, s.id));
        Ok(sets)
    }
}
