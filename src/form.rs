//src/form.rs
use strum_macros::Display;
use thiserror::Error;

use crate::workout::{Variant, VariantInput, Workout, WorkoutKind, WorkoutPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FormField {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Inputs have to be positive numbers! ({0} is not a number)")]
    NotFinite(FormField),
    #[error("Inputs have to be positive numbers! ({0} must be greater than zero)")]
    NotPositive(FormField),
    #[error("Cadence has to be a whole number of steps per minute")]
    CadenceNotWhole,
}

/// Raw text of the entry form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub variant: Variant,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

/// Which variant-specific inputs are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldVisibility {
    pub cadence: bool,
    pub elevation: bool,
}

/// Returns the relevant variant-specific inputs for `variant`.
pub const fn toggle_fields_for(variant: Variant) -> FieldVisibility {
    match variant {
        Variant::Running => FieldVisibility {
            cadence: true,
            elevation: false,
        },
        Variant::Cycling => FieldVisibility {
            cadence: false,
            elevation: true,
        },
    }
}

// Empty input reads as 0, unparseable input as NaN.
fn read_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn finite(field: FormField, raw: &str) -> Result<f64, ValidationError> {
    let value = read_number(raw);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite(field))
    }
}

fn positive(field: FormField, raw: &str) -> Result<f64, ValidationError> {
    let value = finite(field, raw)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive(field))
    }
}

/// Turns the raw inputs into a payload for the selected variant.
///
/// Distance, duration and cadence must be finite and strictly positive;
/// elevation only has to be finite.
///
/// # Errors
/// Returns the first `ValidationError` found; no partial payload is produced.
pub fn validate(fields: &FormFields) -> Result<WorkoutPayload, ValidationError> {
    let distance = positive(FormField::Distance, &fields.distance)?;
    let duration = positive(FormField::Duration, &fields.duration)?;

    let input = match fields.variant {
        Variant::Running => {
            let cadence = positive(FormField::Cadence, &fields.cadence)?;
            if cadence.fract() != 0.0 || cadence > f64::from(u32::MAX) {
                return Err(ValidationError::CadenceNotWhole);
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let cadence = cadence as u32;
            VariantInput::Running { cadence }
        }
        Variant::Cycling => VariantInput::Cycling {
            elevation_gain: finite(FormField::Elevation, &fields.elevation)?,
        },
    };

    Ok(WorkoutPayload {
        distance,
        duration,
        input,
    })
}

/// Inputs for `workout`, as the edit form shows them.
pub fn prefill(workout: &Workout) -> FormFields {
    let (cadence, elevation) = match *workout.kind() {
        WorkoutKind::Running(run) => (run.cadence.to_string(), String::new()),
        WorkoutKind::Cycling(ride) => (String::new(), ride.elevation_gain.to_string()),
    };
    FormFields {
        variant: workout.variant(),
        distance: workout.distance().to_string(),
        duration: workout.duration().to_string(),
        cadence,
        elevation,
    }
}

/// The entry form handle: current inputs plus what is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutForm {
    pub fields: FormFields,
    visible: bool,
    visibility: FieldVisibility,
}

impl WorkoutForm {
    pub fn new(default_variant: Variant) -> Self {
        Self {
            fields: FormFields {
                variant: default_variant,
                ..FormFields::default()
            },
            visible: false,
            visibility: toggle_fields_for(default_variant),
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hides the form and empties every numeric input.
    pub fn hide(&mut self) {
        self.fields.distance.clear();
        self.fields.duration.clear();
        self.fields.cadence.clear();
        self.fields.elevation.clear();
        self.visible = false;
    }

    pub fn select_variant(&mut self, variant: Variant) {
        self.fields.variant = variant;
        self.visibility = toggle_fields_for(variant);
    }

    /// Opens the form with the values of `workout` and its variant selected.
    pub fn prefill(&mut self, workout: &Workout) {
        self.fields = prefill(workout);
        self.visibility = toggle_fields_for(workout.variant());
        self.visible = true;
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub const fn visibility(&self) -> FieldVisibility {
        self.visibility
    }
}
