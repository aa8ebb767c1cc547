//! Suggestion engine for picking the next lift of a workout.
//!
//! Selection runs in two stages:
//! - Pick a muscle group: avoid groups already trained in this workout and
//!   groups that conflict with them, relaxing those filters in order when
//!   nothing is left, then take the least recently trained group
//! - Pick the least recently done lift within that group
//!
//! A group or lift that was never trained beats any dated one. Ties go to
//! the lowest id.

use crate::history;
use crate::store::EntityStore;
use crate::{Error, Lift, MuscleGroup, Result, WorkoutSet};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// Candidate filters, strongest first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateFilter {
    /// Skip groups already in the workout and groups conflicting with them
    AvoidUsedAndConflicting,
    /// Skip groups already in the workout
    AvoidUsed,
    /// Every group qualifies
    Any,
}

/// Filters tried in order until one leaves at least one group
pub const RELAXATION_ORDER: [CandidateFilter; 3] = [
    CandidateFilter::AvoidUsedAndConflicting,
    CandidateFilter::AvoidUsed,
    CandidateFilter::Any,
];

impl CandidateFilter {
    fn admits(self, group_id: i64, used: &BTreeSet<i64>, conflicting: &BTreeSet<i64>) -> bool {
        match self {
            CandidateFilter::AvoidUsedAndConflicting => {
                !used.contains(&group_id) && !conflicting.contains(&group_id)
            }
            CandidateFilter::AvoidUsed => !used.contains(&group_id),
            CandidateFilter::Any => true,
        }
    }
}

/// The engine's pick for the next lift
#[derive(Clone, Debug, Serialize)]
pub struct Suggestion {
    pub muscle_group: MuscleGroup,
    pub lift: Lift,
    /// Sets of the most recent occurrence of `lift`, by set number
    pub previous_sets: Vec<WorkoutSet>,
    /// Which filter produced the candidate groups
    pub relaxation: CandidateFilter,
}

/// Suggest the next muscle group and lift for a workout
///
/// Fails with `NotFound` when the workout is unknown or no muscle groups
/// exist, and with `InvalidState` when the chosen group has no lifts.
pub fn suggest<S>(store: &S, workout_id: i64) -> Result<Suggestion>
where
    S: EntityStore + ?Sized,
{
    if store.workout(workout_id)?.is_none() {
        return Err(Error::not_found("Workout", workout_id));
    }

    let all_groups = store.muscle_groups()?;
    if all_groups.is_empty() {
        return Err(Error::NotFound("No muscle groups found".into()));
    }

    let used = used_group_ids(store, workout_id)?;
    let conflicting = conflicting_group_ids(store, &used)?;
    tracing::debug!(
        "Workout {}: used groups {:?}, conflicting groups {:?}",
        workout_id,
        used,
        conflicting
    );

    let (relaxation, candidates) = RELAXATION_ORDER
        .iter()
        .map(|&filter| {
            let admitted: Vec<&MuscleGroup> = all_groups
                .iter()
                .filter(|g| filter.admits(g.id, &used, &conflicting))
                .collect();
            (filter, admitted)
        })
        .find(|(_, admitted)| !admitted.is_empty())
        .ok_or_else(|| Error::NotFound("No muscle groups found".into()))?;
    tracing::debug!(
        "Candidate groups under {:?}: {:?}",
        relaxation,
        candidates.iter().map(|g| g.id).collect::<Vec<_>>()
    );

    let muscle_group = least_recent(candidates, |g| {
        history::last_trained_date(store, g.id).map(|date| (date, g.id))
    })?
    .ok_or_else(|| Error::NotFound("No muscle groups found".into()))?
    .clone();

    let lift = select_lift_in_group(store, &muscle_group)?;
    let previous_sets = history::previous_sets(store, lift.id)?;

    tracing::info!(
        "Suggesting {} ({}) for workout {}",
        lift.name,
        muscle_group.name,
        workout_id
    );

    Ok(Suggestion {
        muscle_group,
        lift,
        previous_sets,
        relaxation,
    })
}

/// Groups tagged on any lift already in the workout
fn used_group_ids<S>(store: &S, workout_id: i64) -> Result<BTreeSet<i64>>
where
    S: EntityStore + ?Sized,
{
    let mut used = BTreeSet::new();
    for workout_lift in store.workout_lifts_for_workout(workout_id)? {
        for link in store.links_for_lift(workout_lift.lift_id)? {
            used.insert(link.muscle_group_id);
        }
    }
    Ok(used)
}

/// The other side of every conflict touching a used group, minus used groups
fn conflicting_group_ids<S>(store: &S, used: &BTreeSet<i64>) -> Result<BTreeSet<i64>>
where
    S: EntityStore + ?Sized,
{
    let mut conflicting = BTreeSet::new();
    for &group_id in used {
        for conflict in store.conflicts_for_muscle_group(group_id)? {
            for side in [conflict.muscle_group_a_id, conflict.muscle_group_b_id] {
                if !used.contains(&side) {
                    conflicting.insert(side);
                }
            }
        }
    }
    Ok(conflicting)
}

fn select_lift_in_group<S>(store: &S, muscle_group: &MuscleGroup) -> Result<Lift>
where
    S: EntityStore + ?Sized,
{
    let mut lifts = Vec::new();
    for link in store.links_for_muscle_group(muscle_group.id)? {
        match store.lift(link.lift_id)? {
            Some(lift) => lifts.push(lift),
            None => tracing::warn!(
                "Muscle group {} links missing lift {}",
                muscle_group.id,
                link.lift_id
            ),
        }
    }

    least_recent(lifts, |l| {
        history::last_done_date(store, l.id).map(|date| (date, l.id))
    })?
    .ok_or_else(|| {
        Error::InvalidState(format!(
            "Muscle group {} ({}) has no lifts",
            muscle_group.id, muscle_group.name
        ))
    })
}

/// Item with the smallest `(last date, id)` key
///
/// `None` orders before every date, so never-trained items win.
fn least_recent<T, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Result<Option<T>>
where
    F: FnMut(&T) -> Result<(Option<NaiveDate>, i64)>,
{
    let mut best: Option<((Option<NaiveDate>, i64), T)> = None;
    for item in items {
        let k = key(&item)?;
        if best.as_ref().map_or(true, |(best_key, _)| k < *best_key) {
            best = Some((k, item));
        }
    }
    Ok(best.map(|(_, item)| item))
}
