//! Catalog writes: muscle groups, lifts and muscle group conflicts.

use super::{next_id, Database};
use crate::{
    ConflictDetail, Error, Lift, LiftDetail, LiftMuscleGroup, MuscleGroup, MuscleGroupConflict,
    Result,
};

/// Partial update for a lift. `muscle_group_ids` replaces all links when set.
#[derive(Clone, Debug, Default)]
pub struct LiftUpdate {
    pub name: Option<String>,
    pub muscle_group_ids: Option<Vec<i64>>,
}

fn clean_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Name must not be empty".into()));
    }
    Ok(name.to_string())
}

impl Database {
    // ------------------------------------------------------------------------
    // Muscle groups
    // ------------------------------------------------------------------------

    pub fn create_muscle_group(&mut self, name: &str) -> Result<MuscleGroup> {
        let name = clean_name(name)?;
        self.ensure_muscle_group_name_free(&name, None)?;

        let group = MuscleGroup {
            id: next_id(&mut self.sequences.muscle_group),
            name,
        };
        self.muscle_groups.insert(group.id, group.clone());
        tracing::debug!("Created muscle group {} ({})", group.id, group.name);
        Ok(group)
    }

    pub fn rename_muscle_group(&mut self, id: i64, name: &str) -> Result<MuscleGroup> {
        let name = clean_name(name)?;
        self.ensure_muscle_group_name_free(&name, Some(id))?;

        let group = self
            .muscle_groups
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Muscle group", id))?;
        group.name = name;
        Ok(group.clone())
    }

    /// Deletes the group together with its lift links and conflicts
    pub fn delete_muscle_group(&mut self, id: i64) -> Result<()> {
        if self.muscle_groups.remove(&id).is_none() {
            return Err(Error::not_found("Muscle group", id));
        }
        self.lift_muscle_groups.retain(|link| link.muscle_group_id != id);
        self.conflicts.retain(|_, c| !c.involves(id));
        tracing::debug!("Deleted muscle group {}", id);
        Ok(())
    }

    fn ensure_muscle_group_name_free(&self, name: &str, except: Option<i64>) -> Result<()> {
        let taken = self
            .muscle_groups
            .values()
            .any(|g| g.name == name && Some(g.id) != except);
        if taken {
            return Err(Error::Validation(format!(
                "Muscle group name '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    fn ensure_muscle_groups_exist(&self, ids: &[i64]) -> Result<()> {
        match ids.iter().find(|id| !self.muscle_groups.contains_key(id)) {
            Some(missing) => Err(Error::Validation(format!(
                "Muscle group with id {} does not exist",
                missing
            ))),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Lifts
    // ------------------------------------------------------------------------

    pub fn create_lift(&mut self, name: &str, muscle_group_ids: &[i64]) -> Result<Lift> {
        let name = clean_name(name)?;
        self.ensure_muscle_groups_exist(muscle_group_ids)?;
        self.ensure_lift_name_free(&name, None)?;

        let lift = Lift {
            id: next_id(&mut self.sequences.lift),
            name,
        };
        self.lifts.insert(lift.id, lift.clone());
        self.replace_links(lift.id, muscle_group_ids);
        tracing::debug!(
            "Created lift {} ({}) in groups {:?}",
            lift.id,
            lift.name,
            muscle_group_ids
        );
        Ok(lift)
    }

    pub fn update_lift(&mut self, id: i64, update: LiftUpdate) -> Result<Lift> {
        if !self.lifts.contains_key(&id) {
            return Err(Error::not_found("Lift", id));
        }

        // Validate everything before touching anything
        let name = update.name.as_deref().map(clean_name).transpose()?;
        if let Some(ref name) = name {
            self.ensure_lift_name_free(name, Some(id))?;
        }
        if let Some(ref ids) = update.muscle_group_ids {
            self.ensure_muscle_groups_exist(ids)?;
        }

        if let Some(ids) = update.muscle_group_ids {
            self.replace_links(id, &ids);
        }
        let lift = self
            .lifts
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Lift", id))?;
        if let Some(name) = name {
            lift.name = name;
        }
        Ok(lift.clone())
    }

    /// Deletes a lift and its links. Lifts referenced by a workout are kept.
    pub fn delete_lift(&mut self, id: i64) -> Result<()> {
        if !self.lifts.contains_key(&id) {
            return Err(Error::not_found("Lift", id));
        }
        let uses = self
            .workout_lifts
            .values()
            .filter(|wl| wl.lift_id == id)
            .count();
        if uses > 0 {
            return Err(Error::Validation(format!(
                "Lift {} is used by {} workout lift(s)",
                id, uses
            )));
        }

        self.lift_muscle_groups.retain(|link| link.lift_id != id);
        self.lifts.remove(&id);
        tracing::debug!("Deleted lift {}", id);
        Ok(())
    }

    /// Every lift with its muscle group ids
    pub fn lift_details(&self) -> Vec<LiftDetail> {
        self.lifts
            .values()
            .map(|lift| LiftDetail {
                lift: lift.clone(),
                muscle_group_ids: self
                    .lift_muscle_groups
                    .iter()
                    .filter(|link| link.lift_id == lift.id)
                    .map(|link| link.muscle_group_id)
                    .collect(),
            })
            .collect()
    }

    fn ensure_lift_name_free(&self, name: &str, except: Option<i64>) -> Result<()> {
        let taken = self
            .lifts
            .values()
            .any(|l| l.name == name && Some(l.id) != except);
        if taken {
            return Err(Error::Validation(format!(
                "Lift name '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    fn replace_links(&mut self, lift_id: i64, muscle_group_ids: &[i64]) {
        self.lift_muscle_groups.retain(|link| link.lift_id != lift_id);
        self.lift_muscle_groups
            .extend(muscle_group_ids.iter().map(|&muscle_group_id| LiftMuscleGroup {
                lift_id,
                muscle_group_id,
            }));
    }

    // ------------------------------------------------------------------------
    // Conflicts
    // ------------------------------------------------------------------------

    pub fn create_conflict(&mut self, a: i64, b: i64) -> Result<MuscleGroupConflict> {
        if a == b {
            return Err(Error::Validation(
                "A muscle group cannot conflict with itself".into(),
            ));
        }
        for id in [a, b] {
            if !self.muscle_groups.contains_key(&id) {
                return Err(Error::not_found("Muscle group", id));
            }
        }
        if self.conflicts.values().any(|c| c.is_pair(a, b)) {
            return Err(Error::Validation("Conflict already exists".into()));
        }

        let conflict = MuscleGroupConflict {
            id: next_id(&mut self.sequences.conflict),
            muscle_group_a_id: a,
            muscle_group_b_id: b,
        };
        self.conflicts.insert(conflict.id, conflict);
        tracing::debug!("Created conflict {} between {} and {}", conflict.id, a, b);
        Ok(conflict)
    }

    pub fn delete_conflict(&mut self, id: i64) -> Result<()> {
        self.conflicts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("Conflict", id))
    }

    /// Every conflict with the names of both groups
    pub fn conflicts(&self) -> Result<Vec<ConflictDetail>> {
        self.conflicts
            .values()
            .map(|&conflict| {
                let name_of = |id: i64| {
                    self.muscle_groups
                        .get(&id)
                        .map(|g| g.name.clone())
                        .ok_or_else(|| {
                            Error::InvalidState(format!(
                                "Conflict {} references missing muscle group {}",
                                conflict.id, id
                            ))
                        })
                };
                Ok(ConflictDetail {
                    conflict,
                    muscle_group_a_name: name_of(conflict.muscle_group_a_id)?,
                    muscle_group_b_name: name_of(conflict.muscle_group_b_id)?,
                })
            })
            .collect()
    }
}
