// src/lib.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

// --- Declare modules ---
pub mod app;
mod config;
pub mod form;
pub mod geo;
pub mod list;
pub mod map;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod workout;

// --- Expose public types ---
pub use app::{App, AppError, AppOptions, Mode, SubmitBinding};
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, ConfigError, StandardColor, Theme,
};
pub use form::{FieldVisibility, FormField, FormFields, ValidationError, WorkoutForm};
pub use geo::{FixedLocation, Geolocator, LocationError};
pub use list::{CardAction, CardStat, WorkoutCard, WorkoutList};
pub use map::{MapError, MapService, MapSync, MarkerHandle, MemoryMap, PanOptions, Popup};
pub use snapshot::{SnapshotError, WorkoutRecord, SNAPSHOT_KEY};
pub use storage::{
    get_db_path as get_db_path_util, KeyValueStore, MemoryStore, SqliteStore, StorageError,
};
pub use store::{StoreError, WorkoutStore};
pub use workout::{
    Coords, Cycling, IdGenerator, Running, Variant, VariantInput, Workout, WorkoutKind,
    WorkoutPayload,
};

/// The application as the CLI runs it: SQLite persistence, an in-memory map
/// and the configured home position as the user's location.
pub type DesktopApp = App<SqliteStore, MemoryMap, FixedLocation>;

pub struct AppService {
    pub config: Config,
    pub app: DesktopApp,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .context(format!("Failed to load config from {config_path:?}"))?;

        let db_path = storage::get_db_path().context("Failed to determine database path")?;
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;

        Ok(Self::with_parts(config, store, db_path, config_path))
    }

    /// Builds the service around an already opened store.
    pub fn with_parts(
        config: Config,
        store: SqliteStore,
        db_path: PathBuf,
        config_path: PathBuf,
    ) -> Self {
        let app = App::new(
            store,
            MemoryMap::new(),
            FixedLocation::new(config.home),
            config.app_options(),
        );
        Self {
            config,
            app,
            db_path,
            config_path,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Sets the position used as the user's location from the next start on.
    /// # Errors
    /// - `ConfigError::InvalidCoordinates` if the position is out of range.
    /// - `ConfigError` variants if saving fails.
    pub fn set_home(&mut self, lat: f64, lng: f64) -> Result<(), ConfigError> {
        self.config.set_home(lat, lng)?;
        self.save_config()
    }

    /// Sets the zoom level used when opening and focusing the map.
    /// # Errors
    /// - `ConfigError::InvalidZoomLevel` if the level is too high.
    /// - `ConfigError` variants if saving fails.
    pub fn set_zoom_level(&mut self, level: u8) -> Result<(), ConfigError> {
        self.config.set_zoom_level(level)?;
        self.save_config()
    }

    /// Sets the table header color.
    /// # Errors
    /// - `ConfigError::InvalidColor` for unknown names.
    /// - `ConfigError` variants if saving fails.
    pub fn set_header_color(&mut self, name: &str) -> Result<(), ConfigError> {
        self.config.set_header_color(name)?;
        self.save_config()
    }
}
