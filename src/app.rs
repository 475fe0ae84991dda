//src/app.rs
use thiserror::Error;

use crate::form::{self, ValidationError, WorkoutForm};
use crate::geo::{Geolocator, LocationError};
use crate::list::{CardAction, WorkoutList};
use crate::map::{MapError, MapService, MapSync};
use crate::snapshot::{SnapshotError, SNAPSHOT_KEY};
use crate::storage::{KeyValueStore, StorageError};
use crate::store::{StoreError, WorkoutStore};
use crate::workout::{Coords, Variant, Workout};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("Failed to encode workouts: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("Failed to persist workouts: {0}")]
    Storage(#[from] StorageError),
    #[error("Click on the map to choose where the workout happened first")]
    NoPendingLocation,
}

/// Whether a pin has been dropped and the entry form is waiting for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Idle,
    Placing { pending: Coords },
}

/// What a form submit does. Exactly one binding is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBinding {
    Create,
    Edit { id: String },
}

/// Options the orchestrator takes from configuration.
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub zoom: u8,
    pub pan_duration_secs: f64,
    pub refresh_marker_on_edit: bool,
    pub default_variant: Variant,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            zoom: 13,
            pan_duration_secs: 1.0,
            refresh_marker_on_edit: false,
            default_variant: Variant::Running,
        }
    }
}

/// Wires user events to the store, the map, the card list and persistence.
///
/// Every handler runs to completion before the next event is handled. The
/// snapshot is always rewritten whole, never patched.
pub struct App<K, M, G> {
    pub store: WorkoutStore,
    pub map: MapSync<M>,
    pub list: WorkoutList,
    pub form: WorkoutForm,
    storage: K,
    geolocator: G,
    mode: Mode,
    binding: SubmitBinding,
    refresh_marker_on_edit: bool,
}

impl<K: KeyValueStore, M: MapService, G: Geolocator> App<K, M, G> {
    pub fn new(storage: K, map: M, geolocator: G, options: AppOptions) -> Self {
        Self {
            store: WorkoutStore::new(),
            map: MapSync::new(map, options.zoom, options.pan_duration_secs),
            list: WorkoutList::new(),
            form: WorkoutForm::new(options.default_variant),
            storage,
            geolocator,
            mode: Mode::Idle,
            binding: SubmitBinding::Create,
            refresh_marker_on_edit: options.refresh_marker_on_edit,
        }
    }

    /// Restores persisted workouts, renders their cards, then locates the
    /// user and opens the map view with one marker per workout.
    ///
    /// Returns how many workouts were restored.
    ///
    /// # Errors
    /// `AppError::Location` if no position is available. The workouts are
    /// loaded regardless; only the map stays closed.
    pub fn start(&mut self) -> Result<usize, AppError> {
        let restored = self.load()?;
        self.locate()?;
        Ok(restored)
    }

    /// Reloads the collection from storage and renders a card for each
    /// workout. Unreadable or missing data counts as no workouts. Once the
    /// view is open, markers are redrawn to match the restored workouts.
    ///
    /// # Errors
    /// `AppError::Map` if the markers cannot be redrawn.
    pub fn load(&mut self) -> Result<usize, AppError> {
        let serialized = self.storage.get(SNAPSHOT_KEY).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read stored workouts");
            None
        });
        let restored = self.store.reload(serialized.as_deref());
        self.list.clear();
        for workout in restored {
            self.list.render(workout);
        }
        self.map.sync(restored)?;
        tracing::info!(count = restored.len(), "Workouts restored");
        Ok(restored.len())
    }

    /// Asks for the current position and opens the map view there.
    ///
    /// # Errors
    /// `AppError::Location` if no position is available, `AppError::Map` if
    /// the view cannot be created.
    pub fn locate(&mut self) -> Result<Coords, AppError> {
        let center = self.geolocator.current_position()?;
        self.map.open_view(center, self.store.workouts())?;
        Ok(center)
    }

    /// Map click: remember where the pin went and open an empty entry form.
    pub fn map_click(&mut self, coords: Coords) {
        self.mode = Mode::Placing { pending: coords };
        self.binding = SubmitBinding::Create;
        self.form.show();
    }

    /// Type selector change.
    pub fn change_variant(&mut self, variant: Variant) {
        self.form.select_variant(variant);
    }

    /// Form submit, dispatched to the active binding.
    ///
    /// # Errors
    /// - `AppError::Validation` if the inputs are invalid; the form stays open.
    /// - `AppError::NoPendingLocation` when creating without a map click.
    /// - `AppError::Store` if the workout under edit no longer exists.
    /// - `AppError::Map` if the new marker cannot be placed; the workout is
    ///   not kept. A failed marker redraw on edit is only logged.
    /// - `AppError::Snapshot` / `AppError::Storage` if persisting fails.
    pub fn submit(&mut self) -> Result<Workout, AppError> {
        let payload = form::validate(&self.form.fields)?;

        let workout = match self.binding.clone() {
            SubmitBinding::Create => {
                let Mode::Placing { pending } = self.mode else {
                    return Err(AppError::NoPendingLocation);
                };
                let workout = self.store.create(pending, payload);
                if self.map.is_ready() {
                    if let Err(e) = self.map.place_marker(&workout) {
                        self.store.remove(workout.id())?;
                        return Err(e.into());
                    }
                }
                workout
            }
            SubmitBinding::Edit { id } => {
                let workout = self.store.replace(&id, payload)?;
                if self.refresh_marker_on_edit && self.map.is_ready() {
                    if let Err(e) = self.map.refresh_marker(&workout) {
                        tracing::warn!(id = %workout.id(), error = %e, "Could not redraw marker");
                    }
                }
                workout
            }
        };

        self.list.render(&workout);
        self.persist()?;
        self.close_form();
        Ok(workout)
    }

    /// Closes the form without submitting.
    pub fn cancel(&mut self) {
        self.close_form();
    }

    /// Dispatches a card affordance.
    ///
    /// # Errors
    /// See [`Self::card_click`], [`Self::edit_click`] and [`Self::delete_click`].
    pub fn card_action(&mut self, id: &str, action: CardAction) -> Result<(), AppError> {
        match action {
            CardAction::Focus => self.card_click(id),
            CardAction::Edit => self.edit_click(id),
            CardAction::Delete => self.delete_click(id).map(|_| ()),
        }
    }

    /// Card click: center the map on the workout and count the view.
    ///
    /// # Errors
    /// `AppError::Store` for an unknown id, `AppError::Map` if the view is not
    /// open, or a persistence failure.
    pub fn card_click(&mut self, id: &str) -> Result<(), AppError> {
        let workout = self
            .store
            .find_by_id(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.map.focus(workout)?;
        self.store.record_view(id)?;
        self.persist()
    }

    /// Edit click: prefill the form and bind submit to replacing `id`.
    /// Any earlier edit binding is dropped.
    ///
    /// # Errors
    /// `AppError::Store` for an unknown id.
    pub fn edit_click(&mut self, id: &str) -> Result<(), AppError> {
        let workout = self
            .store
            .find_by_id(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.form.prefill(workout);
        self.binding = SubmitBinding::Edit { id: id.to_string() };
        Ok(())
    }

    /// Delete click: remove the workout from the collection, the map, the
    /// list and the persisted snapshot.
    ///
    /// # Errors
    /// `AppError::Store` for an unknown id, or a persistence failure.
    pub fn delete_click(&mut self, id: &str) -> Result<Workout, AppError> {
        if self.store.find_by_id(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()).into());
        }
        self.map.remove_marker(id)?;
        let removed = self.store.remove(id)?;
        self.list.remove(id);
        if matches!(&self.binding, SubmitBinding::Edit { id: editing } if editing == id) {
            self.close_form();
        }
        self.persist()?;
        Ok(removed)
    }

    /// Forgets every workout, including the persisted snapshot.
    ///
    /// # Errors
    /// Returns an error if markers cannot be cleared or the snapshot cannot be
    /// removed; the workouts are kept in both cases.
    pub fn reset(&mut self) -> Result<(), AppError> {
        self.map.clear()?;
        self.storage.remove(SNAPSHOT_KEY)?;
        self.store.clear();
        self.list.clear();
        self.close_form();
        tracing::info!("All workouts removed");
        Ok(())
    }

    /// Writes the whole collection under the snapshot key.
    ///
    /// # Errors
    /// Returns an error if encoding or the storage write fails.
    pub fn persist(&mut self) -> Result<(), AppError> {
        let serialized = self.store.to_json()?;
        self.storage.set(SNAPSHOT_KEY, &serialized)?;
        tracing::debug!(count = self.store.len(), bytes = serialized.len(), "Snapshot written");
        Ok(())
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn binding(&self) -> &SubmitBinding {
        &self.binding
    }

    pub const fn storage(&self) -> &K {
        &self.storage
    }

    fn close_form(&mut self) {
        self.form.hide();
        self.mode = Mode::Idle;
        self.binding = SubmitBinding::Create;
    }
}
