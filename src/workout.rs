//src/workout.rs
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Number of trailing timestamp digits kept for a workout id.
const ID_DIGITS: u32 = 10;
const ID_WINDOW: u64 = 10u64.pow(ID_DIGITS);

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Variant {
    #[default]
    Running,
    Cycling,
}

impl Variant {
    /// Capitalized name used in descriptions ("Running", "Cycling").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Running => "🏃‍♂️",
            Self::Cycling => "🚴‍♀️",
        }
    }
}

/// A map position in degrees.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

/// The variant-specific input of a validated form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariantInput {
    Running { cadence: u32 },
    Cycling { elevation_gain: f64 },
}

impl VariantInput {
    #[must_use]
    pub const fn variant(&self) -> Variant {
        match self {
            Self::Running { .. } => Variant::Running,
            Self::Cycling { .. } => Variant::Cycling,
        }
    }
}

/// Validated user input for a new or replacement workout.
///
/// Construction assumes `distance` and `duration` are finite and strictly
/// positive; `form::validate` is the only place that checks this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutPayload {
    pub distance: f64, // km
    pub duration: f64, // min
    pub input: VariantInput,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Running {
    pub cadence: u32, // steps/min
    pub pace: f64,    // min/km
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycling {
    pub elevation_gain: f64, // m
    pub speed: f64,          // km/h
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutKind {
    Running(Running),
    Cycling(Cycling),
}

impl WorkoutKind {
    /// Builds the variant part, computing pace or speed from distance and duration.
    fn derive(distance: f64, duration: f64, input: VariantInput) -> Self {
        match input {
            VariantInput::Running { cadence } => Self::Running(Running {
                cadence,
                pace: duration / distance,
            }),
            VariantInput::Cycling { elevation_gain } => Self::Cycling(Cycling {
                elevation_gain,
                speed: distance / (duration / 60.0),
            }),
        }
    }

    #[must_use]
    pub const fn variant(&self) -> Variant {
        match self {
            Self::Running(_) => Variant::Running,
            Self::Cycling(_) => Variant::Cycling,
        }
    }
}

/// A fully derived workout record.
///
/// Fields are only readable from outside the crate: pace, speed and the
/// description always reflect the values the record was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    created_at: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    description: String,
    view_count: u32,
    kind: WorkoutKind,
}

impl Workout {
    /// Builds a new record, deriving pace/speed and the description.
    #[must_use]
    pub fn new(id: String, coords: Coords, payload: WorkoutPayload, created_at: DateTime<Utc>) -> Self {
        let kind = WorkoutKind::derive(payload.distance, payload.duration, payload.input);
        Self {
            description: describe(kind.variant(), created_at),
            id,
            created_at,
            coords,
            distance: payload.distance,
            duration: payload.duration,
            view_count: 0,
            kind,
        }
    }

    /// Reassembles a record from stored values without re-deriving anything.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: String,
        created_at: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        description: String,
        view_count: u32,
        kind: WorkoutKind,
    ) -> Self {
        Self {
            id,
            created_at,
            coords,
            distance,
            duration,
            description,
            view_count,
            kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn view_count(&self) -> u32 {
        self.view_count
    }

    pub const fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub const fn variant(&self) -> Variant {
        self.kind.variant()
    }

    /// Pace in min/km, only for running workouts.
    pub const fn pace(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Running(run) => Some(run.pace),
            WorkoutKind::Cycling(_) => None,
        }
    }

    /// Speed in km/h, only for cycling workouts.
    pub const fn speed(&self) -> Option<f64> {
        match self.kind {
            WorkoutKind::Cycling(ride) => Some(ride.speed),
            WorkoutKind::Running(_) => None,
        }
    }

    pub(crate) fn record_view(&mut self) -> u32 {
        self.view_count = self.view_count.saturating_add(1);
        self.view_count
    }
}

/// "<Variant> on <Month> <day>", using the local calendar date of `created_at`.
#[must_use]
pub fn describe(variant: Variant, created_at: DateTime<Utc>) -> String {
    let local = created_at.with_timezone(&Local);
    format!("{} on {}", variant.label(), local.format("%B %-d"))
}

/// Issues ids from the low-order digits of the creation time in milliseconds.
///
/// Ids are always ten digits. They increase strictly until the ten-digit
/// window is exhausted, after which numbering restarts from the clock
/// reading; `WorkoutStore` skips any id it already holds.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: Option<u64>,
}

impl IdGenerator {
    pub fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let from_clock = millis % ID_WINDOW;
        let candidate = match self.last {
            Some(last) if from_clock <= last => last
                .checked_add(1)
                .filter(|next| *next < ID_WINDOW)
                .unwrap_or(from_clock),
            _ => from_clock,
        };
        self.last = Some(candidate);
        format!("{candidate:0width$}", width = ID_DIGITS as usize)
    }

    /// Makes sure future ids sort after every numeric id in `ids`.
    /// Numbers outside the ten-digit window can never collide and are ignored.
    pub fn observe<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let max_seen = ids
            .into_iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .filter(|id| *id < ID_WINDOW)
            .max();
        self.last = self.last.max(max_seen);
    }
}
