//! Journal writes and views: workouts, workout lifts and sets.
//!
//! There is no automatic cascade in the tables, so deletes here remove
//! children first: sets, then workout lifts, then the workout.

use super::{next_id, Database};
use crate::{
    Error, Result, Workout, WorkoutDetail, WorkoutLift, WorkoutLiftDetail, WorkoutSet,
    WorkoutSummary,
};
use chrono::NaiveDate;

/// Partial update for a set. `None` leaves the field unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct SetUpdate {
    pub reps: Option<i32>,
    pub weight: Option<f64>,
}

impl Database {
    // ------------------------------------------------------------------------
    // Workouts
    // ------------------------------------------------------------------------

    pub fn create_workout(&mut self, date: NaiveDate, subtitle: &str) -> Result<Workout> {
        let workout = Workout {
            id: next_id(&mut self.sequences.workout),
            date,
            subtitle: subtitle.to_string(),
        };
        self.workouts.insert(workout.id, workout.clone());
        tracing::debug!("Created workout {} on {}", workout.id, workout.date);
        Ok(workout)
    }

    pub fn set_workout_subtitle(&mut self, id: i64, subtitle: &str) -> Result<Workout> {
        let workout = self
            .workouts
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Workout", id))?;
        workout.subtitle = subtitle.to_string();
        Ok(workout.clone())
    }

    pub fn delete_workout(&mut self, id: i64) -> Result<()> {
        if !self.workouts.contains_key(&id) {
            return Err(Error::not_found("Workout", id));
        }

        let workout_lift_ids: Vec<i64> = self
            .workout_lifts
            .values()
            .filter(|wl| wl.workout_id == id)
            .map(|wl| wl.id)
            .collect();
        self.sets
            .retain(|_, s| !workout_lift_ids.contains(&s.workout_lift_id));
        for wl_id in &workout_lift_ids {
            self.workout_lifts.remove(wl_id);
        }
        self.workouts.remove(&id);

        tracing::debug!(
            "Deleted workout {} with {} workout lift(s)",
            id,
            workout_lift_ids.len()
        );
        Ok(())
    }

    /// All workouts, newest first, with their lift names in display order
    pub fn workout_summaries(&self) -> Vec<WorkoutSummary> {
        let mut workouts: Vec<&Workout> = self.workouts.values().collect();
        workouts.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        workouts
            .into_iter()
            .map(|workout| WorkoutSummary {
                workout: workout.clone(),
                lift_names: self
                    .ordered_workout_lifts(workout.id)
                    .iter()
                    .filter_map(|wl| self.lifts.get(&wl.lift_id))
                    .map(|lift| lift.name.clone())
                    .collect(),
            })
            .collect()
    }

    /// A workout with its lifts and their sets
    pub fn workout_detail(&self, id: i64) -> Result<WorkoutDetail> {
        let workout = self
            .workouts
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("Workout", id))?;

        let lifts = self
            .ordered_workout_lifts(id)
            .into_iter()
            .map(|workout_lift| {
                let mut sets: Vec<WorkoutSet> = self
                    .sets
                    .values()
                    .filter(|s| s.workout_lift_id == workout_lift.id)
                    .copied()
                    .collect();
                sets.sort_by_key(|s| (s.set_number, s.id));
                WorkoutLiftDetail {
                    workout_lift,
                    lift_name: self
                        .lifts
                        .get(&workout_lift.lift_id)
                        .map(|l| l.name.clone())
                        .unwrap_or_default(),
                    sets,
                }
            })
            .collect();

        Ok(WorkoutDetail { workout, lifts })
    }

    fn ordered_workout_lifts(&self, workout_id: i64) -> Vec<WorkoutLift> {
        let mut lifts: Vec<WorkoutLift> = self
            .workout_lifts
            .values()
            .filter(|wl| wl.workout_id == workout_id)
            .copied()
            .collect();
        lifts.sort_by_key(|wl| (wl.display_order, wl.id));
        lifts
    }

    // ------------------------------------------------------------------------
    // Workout lifts
    // ------------------------------------------------------------------------

    pub fn add_lift_to_workout(
        &mut self,
        workout_id: i64,
        lift_id: i64,
        display_order: i32,
    ) -> Result<WorkoutLift> {
        if !self.workouts.contains_key(&workout_id) {
            return Err(Error::not_found("Workout", workout_id));
        }
        if !self.lifts.contains_key(&lift_id) {
            return Err(Error::not_found("Lift", lift_id));
        }

        let workout_lift = WorkoutLift {
            id: next_id(&mut self.sequences.workout_lift),
            workout_id,
            lift_id,
            display_order,
        };
        self.workout_lifts.insert(workout_lift.id, workout_lift);
        tracing::debug!(
            "Added lift {} to workout {} as workout lift {}",
            lift_id,
            workout_id,
            workout_lift.id
        );
        Ok(workout_lift)
    }

    /// Removes a workout lift and its sets. The workout lift must belong to `workout_id`.
    pub fn remove_workout_lift(&mut self, workout_id: i64, workout_lift_id: i64) -> Result<()> {
        match self.workout_lifts.get(&workout_lift_id) {
            Some(wl) if wl.workout_id == workout_id => {}
            _ => return Err(Error::not_found("Workout lift", workout_lift_id)),
        }

        self.sets.retain(|_, s| s.workout_lift_id != workout_lift_id);
        self.workout_lifts.remove(&workout_lift_id);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Sets
    // ------------------------------------------------------------------------

    /// Appends a set, numbered after the highest existing set number
    ///
    /// Weights must be finite: the JSON snapshot cannot hold `inf` or `NaN`.
    pub fn add_set(
        &mut self,
        workout_lift_id: i64,
        reps: Option<i32>,
        weight: Option<f64>,
    ) -> Result<WorkoutSet> {
        if !self.workout_lifts.contains_key(&workout_lift_id) {
            return Err(Error::not_found("Workout lift", workout_lift_id));
        }
        check_weight(weight)?;

        let max_set_number = self
            .sets
            .values()
            .filter(|s| s.workout_lift_id == workout_lift_id)
            .map(|s| s.set_number)
            .max();
        let set_number = max_set_number.map(|n| n + 1).unwrap_or(1);

        let set = WorkoutSet {
            id: next_id(&mut self.sequences.set),
            workout_lift_id,
            set_number,
            reps,
            weight,
        };
        self.sets.insert(set.id, set);
        tracing::debug!(
            "Added set {} to workout lift {}: {:?} x {:?}kg",
            set.set_number,
            workout_lift_id,
            reps,
            weight
        );
        Ok(set)
    }

    pub fn update_set(&mut self, id: i64, update: SetUpdate) -> Result<WorkoutSet> {
        check_weight(update.weight)?;
        let set = self
            .sets
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Set", id))?;
        if let Some(reps) = update.reps {
            set.reps = Some(reps);
        }
        if let Some(weight) = update.weight {
            set.weight = Some(weight);
        }
        Ok(*set)
    }

    pub fn delete_set(&mut self, id: i64) -> Result<()> {
        self.sets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("Set", id))
    }
}

fn check_weight(weight: Option<f64>) -> Result<()> {
    match weight {
        Some(w) if !w.is_finite() => Err(Error::Validation(format!(
            "Weight must be a finite number, got {}",
            w
        ))),
        _ => Ok(()),
    }
}
