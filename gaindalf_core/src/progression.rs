//! Progression indexes relative to each lift's first-ever occurrence.
//!
//! For every workout lift:
//! - strength ratio: max set weight / baseline max set weight
//! - endurance ratio: total `reps × weight` volume / baseline volume
//!
//! A workout's index is the mean of the ratios its lifts produced, or
//! `None` when none produced one.

use crate::history::{self, DatedWorkoutLift};
use crate::store::EntityStore;
use crate::{Error, Result, WorkoutIndexes, WorkoutSet};
use std::collections::HashMap;

/// Load summary of one workout lift's sets
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LiftLoad {
    /// Heaviest recorded weight, `None` when no set has a weight
    pub max_weight: Option<f64>,
    /// Sum of `reps × weight` over sets with both recorded
    pub volume: f64,
}

impl LiftLoad {
    pub fn from_sets(sets: &[WorkoutSet]) -> Self {
        let max_weight = sets
            .iter()
            .filter_map(|s| s.weight)
            .fold(None, |max: Option<f64>, w| Some(max.map_or(w, |m| m.max(w))));
        let volume = sets.iter().filter_map(WorkoutSet::volume).sum();
        Self { max_weight, volume }
    }

    /// `self.max_weight / baseline.max_weight` when the baseline is positive
    pub fn strength_ratio(&self, baseline: &LiftLoad) -> Option<f64> {
        match (self.max_weight, baseline.max_weight) {
            (Some(current), Some(base)) if base > 0.0 => Some(current / base),
            _ => None,
        }
    }

    /// `self.volume / baseline.volume` when the baseline is positive
    pub fn endurance_ratio(&self, baseline: &LiftLoad) -> Option<f64> {
        if baseline.volume > 0.0 {
            Some(self.volume / baseline.volume)
        } else {
            None
        }
    }
}

fn load_of<S>(store: &S, workout_lift_id: i64) -> Result<LiftLoad>
where
    S: EntityStore + ?Sized,
{
    Ok(LiftLoad::from_sets(
        &store.sets_for_workout_lift(workout_lift_id)?,
    ))
}

/// Baselines resolved during one call, keyed by lift id
///
/// Lives only as long as the call that built it.
struct BaselineTable<'a, S: ?Sized> {
    store: &'a S,
    loads: HashMap<i64, Option<LiftLoad>>,
}

impl<'a, S> BaselineTable<'a, S>
where
    S: EntityStore + ?Sized,
{
    fn new(store: &'a S) -> Self {
        Self {
            store,
            loads: HashMap::new(),
        }
    }

    fn get(&mut self, lift_id: i64) -> Result<Option<LiftLoad>> {
        if let Some(load) = self.loads.get(&lift_id) {
            return Ok(*load);
        }
        let load = match history::baseline(self.store, lift_id)? {
            Some(base) => Some(load_of(self.store, base.workout_lift.id)?),
            None => None,
        };
        self.loads.insert(lift_id, load);
        Ok(load)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn workout_indexes<S>(
    store: &S,
    baselines: &mut BaselineTable<'_, S>,
    workout_id: i64,
) -> Result<WorkoutIndexes>
where
    S: EntityStore + ?Sized,
{
    let workout = store
        .workout(workout_id)?
        .ok_or_else(|| Error::not_found("Workout", workout_id))?;

    let mut strength = Vec::new();
    let mut endurance = Vec::new();
    for workout_lift in store.workout_lifts_for_workout(workout_id)? {
        let Some(baseline) = baselines.get(workout_lift.lift_id)? else {
            continue;
        };
        let current = load_of(store, workout_lift.id)?;
        strength.extend(current.strength_ratio(&baseline));
        endurance.extend(current.endurance_ratio(&baseline));
    }

    Ok(WorkoutIndexes {
        workout_id,
        date: workout.date,
        strength_index: mean(&strength),
        endurance_index: mean(&endurance),
    })
}

/// Strength and endurance indexes of a single workout
pub fn indexes_for_workout<S>(store: &S, workout_id: i64) -> Result<WorkoutIndexes>
where
    S: EntityStore + ?Sized,
{
    let mut baselines = BaselineTable::new(store);
    workout_indexes(store, &mut baselines, workout_id)
}

/// Indexes of every workout, oldest first (same date by workout id)
pub fn indexes_for_all_workouts<S>(store: &S) -> Result<Vec<WorkoutIndexes>>
where
    S: EntityStore + ?Sized,
{
    let mut workouts = store.workouts()?;
    workouts.sort_by_key(|w| (w.date, w.id));

    let mut baselines = BaselineTable::new(store);
    let indexes = workouts
        .iter()
        .map(|w| workout_indexes(store, &mut baselines, w.id))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Computed indexes for {} workouts ({} distinct lifts)",
        indexes.len(),
        baselines.loads.len()
    );
    Ok(indexes)
}

/// Ratios of one lift against its own baseline, one entry per occurrence,
/// oldest first
///
/// Unknown lift ids are `NotFound`; a lift that was never logged yields an
/// empty history.
pub fn indexes_for_lift<S>(store: &S, lift_id: i64) -> Result<Vec<WorkoutIndexes>>
where
    S: EntityStore + ?Sized,
{
    if store.lift(lift_id)?.is_none() {
        return Err(Error::not_found("Lift", lift_id));
    }

    let occurrences = history::lift_occurrences(store, lift_id)?;
    let Some(first) = occurrences.first() else {
        return Ok(Vec::new());
    };
    let baseline = load_of(store, first.workout_lift.id)?;

    occurrences
        .iter()
        .map(|&DatedWorkoutLift { workout_lift, date }| {
            let current = load_of(store, workout_lift.id)?;
            Ok(WorkoutIndexes {
                workout_id: workout_lift.workout_id,
                date,
                strength_index: current.strength_ratio(&baseline),
                endurance_index: current.endurance_ratio(&baseline),
            })
        })
        .collect()
}
