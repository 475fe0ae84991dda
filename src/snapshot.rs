//src/snapshot.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::workout::{Coords, Cycling, Running, Variant, Workout, WorkoutKind};

/// Key under which the full workout collection is persisted.
pub const SNAPSHOT_KEY: &str = "workouts";

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Workout {id} has unknown variant '{variant}'")]
    UnknownVariant { id: String, variant: String },
    #[error("Workout {id} is missing its '{field}' field")]
    MissingField { id: String, field: &'static str },
}

/// Flat, behaviour-free form of a workout as it appears in the snapshot.
///
/// Both variants share this shape; which optional fields are present depends
/// on `variant`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: String,
    pub variant: String,
    pub coords: [f64; 2],
    pub distance: f64,
    pub duration: f64,
    pub created_at: DateTime<Utc>,
    pub description: String,
    #[serde(default)]
    pub view_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl From<&Workout> for WorkoutRecord {
    fn from(workout: &Workout) -> Self {
        let mut record = Self {
            id: workout.id().to_string(),
            variant: workout.variant().to_string(),
            coords: workout.coords().into(),
            distance: workout.distance(),
            duration: workout.duration(),
            created_at: workout.created_at(),
            description: workout.description().to_string(),
            view_count: workout.view_count(),
            cadence: None,
            pace: None,
            elevation_gain: None,
            speed: None,
        };
        match *workout.kind() {
            WorkoutKind::Running(run) => {
                record.cadence = Some(run.cadence);
                record.pace = Some(run.pace);
            }
            WorkoutKind::Cycling(ride) => {
                record.elevation_gain = Some(ride.elevation_gain);
                record.speed = Some(ride.speed);
            }
        }
        record
    }
}

impl TryFrom<WorkoutRecord> for Workout {
    type Error = SnapshotError;

    /// Rebuilds the concrete variant named by the record's discriminator.
    /// Stored derived values are taken as-is, never recomputed.
    fn try_from(record: WorkoutRecord) -> Result<Self, Self::Error> {
        let variant =
            Variant::from_str(&record.variant).map_err(|_| SnapshotError::UnknownVariant {
                id: record.id.clone(),
                variant: record.variant.clone(),
            })?;
        let missing = |field: &'static str| SnapshotError::MissingField {
            id: record.id.clone(),
            field,
        };

        let kind = match variant {
            Variant::Running => WorkoutKind::Running(Running {
                cadence: record.cadence.ok_or_else(|| missing("cadence"))?,
                pace: record.pace.ok_or_else(|| missing("pace"))?,
            }),
            Variant::Cycling => WorkoutKind::Cycling(Cycling {
                elevation_gain: record.elevation_gain.ok_or_else(|| missing("elevationGain"))?,
                speed: record.speed.ok_or_else(|| missing("speed"))?,
            }),
        };

        Ok(Self::from_parts(
            record.id,
            record.created_at,
            Coords::from(record.coords),
            record.distance,
            record.duration,
            record.description,
            record.view_count,
            kind,
        ))
    }
}

/// Serializes the records as one JSON array.
pub fn encode(records: &[WorkoutRecord]) -> Result<String, SnapshotError> {
    serde_json::to_string(records).map_err(SnapshotError::Json)
}

/// Parses a JSON array of records and reconstructs each typed workout, in order.
pub fn decode(serialized: &str) -> Result<Vec<Workout>, SnapshotError> {
    let records: Vec<WorkoutRecord> = serde_json::from_str(serialized)?;
    records.into_iter().map(Workout::try_from).collect()
}
