//src/map.rs
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::workout::{Coords, Workout};

pub const POPUP_MAX_WIDTH: u32 = 250;
pub const POPUP_MIN_WIDTH: u32 = 100;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("Map view is not available yet")]
    ViewNotReady,
    #[error("Unknown marker handle: {0}")]
    UnknownMarker(MarkerHandle),
}

pub type MarkerHandle = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub content: String,
    pub class_name: String,
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

impl Popup {
    /// Popup showing the variant icon and the workout description.
    pub fn for_workout(workout: &Workout) -> Self {
        let variant = workout.variant();
        Self {
            content: format!("{} {}", variant.icon(), workout.description()),
            class_name: format!("{variant}-popup"),
            max_width: POPUP_MAX_WIDTH,
            min_width: POPUP_MIN_WIDTH,
            auto_close: false,
            close_on_click: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOptions {
    pub animate: bool,
    pub duration_secs: f64,
}

/// Map widget the application draws on.
///
/// Clicks on the map are delivered by the host calling `App::map_click`.
pub trait MapService {
    /// # Errors
    /// Implementation-specific failure to create the view.
    fn create_view(&mut self, center: Coords, zoom: u8) -> Result<(), MapError>;

    /// # Errors
    /// `MapError::ViewNotReady` if no view exists.
    fn add_marker(&mut self, coords: Coords, popup: Popup) -> Result<MarkerHandle, MapError>;

    /// # Errors
    /// `MapError::UnknownMarker` if the handle was never issued or already removed.
    fn remove_marker(&mut self, marker: MarkerHandle) -> Result<(), MapError>;

    /// # Errors
    /// `MapError::ViewNotReady` if no view exists.
    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) -> Result<(), MapError>;
}

/// Keeps one marker per workout id on top of a [`MapService`].
///
/// Never changes workout data.
pub struct MapSync<M> {
    service: M,
    markers: HashMap<String, MarkerHandle>,
    zoom: u8,
    pan: PanOptions,
    ready: bool,
}

impl<M: MapService> MapSync<M> {
    pub fn new(service: M, zoom: u8, pan_duration_secs: f64) -> Self {
        Self {
            service,
            markers: HashMap::new(),
            zoom,
            pan: PanOptions {
                animate: true,
                duration_secs: pan_duration_secs,
            },
            ready: false,
        }
    }

    /// Creates the live view and places markers for `workouts` already loaded.
    ///
    /// # Errors
    /// Propagates failures from the map service.
    pub fn open_view(&mut self, center: Coords, workouts: &[Workout]) -> Result<(), MapError> {
        self.service.create_view(center, self.zoom)?;
        self.ready = true;
        for workout in workouts {
            self.place_marker(workout)?;
        }
        Ok(())
    }

    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Adds a marker with popup for `workout`. A workout that already has a
    /// marker is left alone.
    ///
    /// # Errors
    /// `MapError::ViewNotReady` before [`Self::open_view`] succeeded.
    pub fn place_marker(&mut self, workout: &Workout) -> Result<(), MapError> {
        if !self.ready {
            return Err(MapError::ViewNotReady);
        }
        if self.markers.contains_key(workout.id()) {
            tracing::debug!(id = %workout.id(), "Marker already placed");
            return Ok(());
        }
        let handle = self
            .service
            .add_marker(workout.coords(), Popup::for_workout(workout))?;
        tracing::debug!(id = %workout.id(), handle, "Marker placed");
        self.markers.insert(workout.id().to_string(), handle);
        Ok(())
    }

    /// Centers the view on `workout` with the configured zoom, animated.
    ///
    /// # Errors
    /// `MapError::ViewNotReady` before [`Self::open_view`] succeeded.
    pub fn focus(&mut self, workout: &Workout) -> Result<(), MapError> {
        if !self.ready {
            return Err(MapError::ViewNotReady);
        }
        self.service.set_view(workout.coords(), self.zoom, self.pan)
    }

    /// Drops the marker of workout `id`, if it has one.
    ///
    /// # Errors
    /// Propagates failures from the map service.
    pub fn remove_marker(&mut self, id: &str) -> Result<(), MapError> {
        if let Some(&handle) = self.markers.get(id) {
            self.service.remove_marker(handle)?;
            self.markers.remove(id);
        }
        Ok(())
    }

    /// Replaces the marker of `workout` so the popup matches its current state.
    ///
    /// # Errors
    /// Propagates failures from the map service.
    pub fn refresh_marker(&mut self, workout: &Workout) -> Result<(), MapError> {
        self.remove_marker(workout.id())?;
        self.place_marker(workout)
    }

    /// Removes every marker this sync placed. A marker the service fails to
    /// remove stays tracked.
    ///
    /// # Errors
    /// Propagates the first failure from the map service.
    pub fn clear(&mut self) -> Result<(), MapError> {
        let ids: Vec<String> = self.markers.keys().cloned().collect();
        for id in ids {
            self.remove_marker(&id)?;
        }
        Ok(())
    }

    /// Redraws the markers so there is exactly one per workout in `workouts`.
    /// Does nothing before the view is open.
    ///
    /// # Errors
    /// Propagates failures from the map service.
    pub fn sync(&mut self, workouts: &[Workout]) -> Result<(), MapError> {
        if !self.ready {
            return Ok(());
        }
        self.clear()?;
        for workout in workouts {
            self.place_marker(workout)?;
        }
        Ok(())
    }

    pub fn marker_for(&self, id: &str) -> Option<MarkerHandle> {
        self.markers.get(id).copied()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub const fn service(&self) -> &M {
        &self.service
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub center: Coords,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub coords: Coords,
    pub popup: Popup,
}

/// Map that keeps its state in memory; the CLI prints it, tests inspect it.
#[derive(Debug, Default)]
pub struct MemoryMap {
    view: Option<View>,
    markers: BTreeMap<MarkerHandle, Marker>,
    next_handle: MarkerHandle,
    last_pan: Option<PanOptions>,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn view(&self) -> Option<View> {
        self.view
    }

    pub const fn last_pan(&self) -> Option<PanOptions> {
        self.last_pan
    }

    pub fn markers(&self) -> impl Iterator<Item = (MarkerHandle, &Marker)> {
        self.markers.iter().map(|(handle, marker)| (*handle, marker))
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&Marker> {
        self.markers.get(&handle)
    }
}

impl MapService for MemoryMap {
    fn create_view(&mut self, center: Coords, zoom: u8) -> Result<(), MapError> {
        self.view = Some(View { center, zoom });
        Ok(())
    }

    fn add_marker(&mut self, coords: Coords, popup: Popup) -> Result<MarkerHandle, MapError> {
        if self.view.is_none() {
            return Err(MapError::ViewNotReady);
        }
        self.next_handle += 1;
        self.markers
            .insert(self.next_handle, Marker { coords, popup });
        Ok(self.next_handle)
    }

    fn remove_marker(&mut self, marker: MarkerHandle) -> Result<(), MapError> {
        self.markers
            .remove(&marker)
            .map(|_| ())
            .ok_or(MapError::UnknownMarker(marker))
    }

    fn set_view(&mut self, center: Coords, zoom: u8, pan: PanOptions) -> Result<(), MapError> {
        if self.view.is_none() {
            return Err(MapError::ViewNotReady);
        }
        self.view = Some(View { center, zoom });
        self.last_pan = Some(pan);
        Ok(())
    }
}
