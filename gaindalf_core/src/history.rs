//! Training history lookups shared by the engine and the progression
//! calculator.

use crate::store::EntityStore;
use crate::{Result, WorkoutLift, WorkoutSet};
use chrono::NaiveDate;

/// A workout lift paired with the date of its workout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatedWorkoutLift {
    pub workout_lift: WorkoutLift,
    pub date: NaiveDate,
}

/// Every occurrence of a lift with its workout date, oldest first
/// (same-date occurrences by ascending workout lift id).
///
/// Occurrences whose workout no longer exists are skipped.
pub fn lift_occurrences<S>(store: &S, lift_id: i64) -> Result<Vec<DatedWorkoutLift>>
where
    S: EntityStore + ?Sized,
{
    let mut dated = Vec::new();
    for workout_lift in store.workout_lifts_for_lift(lift_id)? {
        match store.workout(workout_lift.workout_id)? {
            Some(workout) => dated.push(DatedWorkoutLift {
                workout_lift,
                date: workout.date,
            }),
            None => tracing::warn!(
                "Workout lift {} points at missing workout {}",
                workout_lift.id,
                workout_lift.workout_id
            ),
        }
    }
    dated.sort_by_key(|d| (d.date, d.workout_lift.id));
    Ok(dated)
}

/// Most recent date the lift was performed, `None` if never
pub fn last_done_date<S>(store: &S, lift_id: i64) -> Result<Option<NaiveDate>>
where
    S: EntityStore + ?Sized,
{
    Ok(lift_occurrences(store, lift_id)?.last().map(|d| d.date))
}

/// Most recent date any lift tagged with the group was performed
pub fn last_trained_date<S>(store: &S, muscle_group_id: i64) -> Result<Option<NaiveDate>>
where
    S: EntityStore + ?Sized,
{
    let mut latest = None;
    for link in store.links_for_muscle_group(muscle_group_id)? {
        latest = latest.max(last_done_date(store, link.lift_id)?);
    }
    Ok(latest)
}

/// The first-ever occurrence of a lift
pub fn baseline<S>(store: &S, lift_id: i64) -> Result<Option<DatedWorkoutLift>>
where
    S: EntityStore + ?Sized,
{
    Ok(lift_occurrences(store, lift_id)?.into_iter().next())
}

/// Sets from the most recent occurrence of a lift, ordered by set number
///
/// Most recent is the latest workout date, then the highest workout lift
/// id. Empty when the lift was never logged.
pub fn previous_sets<S>(store: &S, lift_id: i64) -> Result<Vec<WorkoutSet>>
where
    S: EntityStore + ?Sized,
{
    match lift_occurrences(store, lift_id)?.last() {
        Some(latest) => store.sets_for_workout_lift(latest.workout_lift.id),
        None => Ok(Vec::new()),
    }
}
