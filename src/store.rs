//src/store.rs
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use thiserror::Error;

use crate::snapshot::{self, SnapshotError, WorkoutRecord};
use crate::workout::{Coords, IdGenerator, Workout, WorkoutPayload};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Workout not found: ID {0}")]
    NotFound(String),
}

/// Ordered, in-memory collection of typed workouts.
#[derive(Debug, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
    ids: IdGenerator,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workout with a fresh id and appends it.
    pub fn create(&mut self, coords: Coords, payload: WorkoutPayload) -> Workout {
        self.create_at(coords, payload, Utc::now())
    }

    /// Same as [`Self::create`] with an explicit creation time.
    pub fn create_at(
        &mut self,
        coords: Coords,
        payload: WorkoutPayload,
        created_at: DateTime<Utc>,
    ) -> Workout {
        let mut id = self.ids.next_id(created_at);
        while self.position(&id).is_some() {
            id = self.ids.next_id(created_at);
        }
        let workout = Workout::new(id, coords, payload, created_at);
        tracing::info!(id = %workout.id(), variant = %workout.variant(), "Workout created");
        self.workouts.push(workout.clone());
        workout
    }

    /// Replaces the workout with `id` in place, keeping its id, coords and
    /// creation time. Everything else is rebuilt from `payload`.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no workout has this id; the
    /// collection is left untouched.
    pub fn replace(&mut self, id: &str, payload: WorkoutPayload) -> Result<Workout, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let current = &self.workouts[index];
        let updated = Workout::new(
            current.id().to_string(),
            current.coords(),
            payload,
            current.created_at(),
        );
        tracing::info!(id, variant = %updated.variant(), "Workout replaced");
        self.workouts[index] = updated.clone();
        Ok(updated)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// Removes the workout with `id`, preserving the order of the rest.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no workout has this id.
    pub fn remove(&mut self, id: &str) -> Result<Workout, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = self.workouts.remove(index);
        tracing::info!(id, "Workout removed");
        Ok(removed)
    }

    /// Bumps the view counter of a workout and returns the new count.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no workout has this id.
    pub fn record_view(&mut self, id: &str) -> Result<u32, StoreError> {
        self.workouts
            .iter_mut()
            .find(|w| w.id() == id)
            .map(Workout::record_view)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn clear(&mut self) {
        self.workouts.clear();
    }

    /// Flat, serializable view of the whole collection.
    pub fn snapshot(&self) -> Vec<WorkoutRecord> {
        self.workouts.iter().map(WorkoutRecord::from).collect()
    }

    /// The whole collection encoded as the persisted JSON blob.
    ///
    /// # Errors
    /// Returns `SnapshotError::Json` if encoding fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        snapshot::encode(&self.snapshot())
    }

    /// Reconstructs typed workouts from a persisted blob.
    ///
    /// An absent blob yields an empty collection. Duplicate ids keep their
    /// first occurrence.
    ///
    /// # Errors
    /// Returns `SnapshotError` for malformed JSON or records that cannot be
    /// rebuilt as a known variant.
    pub fn restore(serialized: Option<&str>) -> Result<Vec<Workout>, SnapshotError> {
        let Some(serialized) = serialized else {
            return Ok(Vec::new());
        };
        let mut seen = HashSet::new();
        let mut restored = snapshot::decode(serialized)?;
        restored.retain(|w| {
            let first = seen.insert(w.id().to_string());
            if !first {
                tracing::warn!(id = %w.id(), "Dropping duplicate workout id from snapshot");
            }
            first
        });
        Ok(restored)
    }

    /// Replaces the collection with the contents of a persisted blob.
    ///
    /// A blob that cannot be read is treated as no prior data.
    pub fn reload(&mut self, serialized: Option<&str>) -> &[Workout] {
        let restored = Self::restore(serialized).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring unreadable workout snapshot");
            Vec::new()
        });
        self.ids.observe(restored.iter().map(Workout::id));
        self.workouts = restored;
        &self.workouts
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.workouts.iter().position(|w| w.id() == id)
    }
}
