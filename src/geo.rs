//src/geo.rs
use thiserror::Error;

use crate::workout::Coords;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Could not get your location")]
    Unavailable,
}

/// Source of the user's current position.
pub trait Geolocator {
    /// # Errors
    /// Returns `LocationError` if no position can be determined.
    fn current_position(&mut self) -> Result<Coords, LocationError>;
}

/// Reports a configured position, or fails when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    position: Option<Coords>,
}

impl FixedLocation {
    pub const fn new(position: Option<Coords>) -> Self {
        Self { position }
    }
}

impl Geolocator for FixedLocation {
    fn current_position(&mut self) -> Result<Coords, LocationError> {
        self.position.ok_or(LocationError::Unavailable)
    }
}
