//src/config.rs
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::app::AppOptions;
use crate::workout::{Coords, Variant};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "mapty";
const CONFIG_ENV_VAR: &str = "MAPTY_CONFIG_DIR"; // Environment variable name
const MAX_ZOOM_LEVEL: u8 = 19;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Invalid coordinates: latitude must be within [-90, 90] and longitude within [-180, 180], got ({0}, {1})")]
    InvalidCoordinates(f64, f64),
    #[error("Invalid zoom level {0}: must be between 0 and 19")]
    InvalidZoomLevel(u8),
}

// Define standard colors using strum for easy iteration/parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    Grey,
}

impl From<StandardColor> for Color {
    fn from(value: StandardColor) -> Self {
        match value {
            StandardColor::Black => Self::Black,
            StandardColor::Red => Self::Red,
            StandardColor::Green => Self::Green,
            StandardColor::Yellow => Self::Yellow,
            StandardColor::Blue => Self::Blue,
            StandardColor::Magenta => Self::Magenta,
            StandardColor::Cyan => Self::Cyan,
            StandardColor::White => Self::White,
            StandardColor::DarkGrey => Self::DarkGrey,
            StandardColor::DarkRed => Self::DarkRed,
            StandardColor::DarkGreen => Self::DarkGreen,
            StandardColor::DarkYellow => Self::DarkYellow,
            StandardColor::DarkBlue => Self::DarkBlue,
            StandardColor::DarkMagenta => Self::DarkMagenta,
            StandardColor::DarkCyan => Self::DarkCyan,
            StandardColor::Grey => Self::Grey,
        }
    }
}

/// Parses a color name case-insensitively (e.g. "darkgreen").
pub fn parse_color(color_str: &str) -> Result<StandardColor, ConfigError> {
    StandardColor::iter()
        .find(|color| format!("{color:?}").eq_ignore_ascii_case(color_str.trim()))
        .ok_or_else(|| ConfigError::InvalidColor(color_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Theme {
    pub header_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Green".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Config {
    /// Position reported as the user's location; `None` means unavailable.
    pub home: Option<Coords>,
    pub map_zoom_level: u8,
    pub pan_duration_secs: f64,
    /// Redraw a workout's marker when it is edited (otherwise only its card changes).
    pub refresh_marker_on_edit: bool,
    pub default_variant: Variant,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home: None,
            map_zoom_level: 13,
            pan_duration_secs: 1.0,
            refresh_marker_on_edit: false,
            default_variant: Variant::Running,
            theme: Theme::default(),
        }
    }
}

impl Config {
    pub const fn app_options(&self) -> AppOptions {
        AppOptions {
            zoom: self.map_zoom_level,
            pan_duration_secs: self.pan_duration_secs,
            refresh_marker_on_edit: self.refresh_marker_on_edit,
            default_variant: self.default_variant,
        }
    }

    /// Sets the home position after range-checking it.
    /// # Errors
    /// Returns `ConfigError::InvalidCoordinates` for out-of-range values.
    pub fn set_home(&mut self, lat: f64, lng: f64) -> Result<(), ConfigError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ConfigError::InvalidCoordinates(lat, lng));
        }
        self.home = Some(Coords::new(lat, lng));
        Ok(())
    }

    /// # Errors
    /// Returns `ConfigError::InvalidZoomLevel` above the maximum zoom.
    pub fn set_zoom_level(&mut self, level: u8) -> Result<(), ConfigError> {
        if level > MAX_ZOOM_LEVEL {
            return Err(ConfigError::InvalidZoomLevel(level));
        }
        self.map_zoom_level = level;
        Ok(())
    }

    /// # Errors
    /// Returns `ConfigError::InvalidColor` for unknown color names.
    pub fn set_header_color(&mut self, name: &str) -> Result<(), ConfigError> {
        let color = parse_color(name)?;
        self.theme.header_color = format!("{color:?}");
        Ok(())
    }

    /// Header color for tables, falling back to green for unknown names.
    pub fn header_color(&self) -> Color {
        parse_color(&self.theme.header_color).map_or(Color::Green, Color::from)
    }
}

/// Determines the path to the configuration file.
/// Exposed at crate root as get_config_path_util
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir_override = std::env::var(CONFIG_ENV_VAR).ok();

    let config_dir_path = if let Some(path_str) = config_dir_override {
        let path = PathBuf::from(path_str);
        if !path.is_dir() {
            tracing::warn!(
                var = CONFIG_ENV_VAR,
                path = %path.display(),
                "Config directory override is not a directory, trying to create it"
            );
            fs::create_dir_all(&path)?;
        }
        path
    } else {
        let base_config_dir = dirs::config_dir().ok_or(ConfigError::CannotDetermineConfigDir)?;
        base_config_dir.join(APP_CONFIG_DIR)
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from the TOML file at the given path, writing
/// the defaults there if it does not exist yet.
/// Exposed at crate root as load_config_util
pub fn load(config_path: &Path) -> Result<Config, ConfigError> {
    if config_path.exists() {
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content).map_err(ConfigError::TomlParse)?;
        Ok(config)
    } else {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        Ok(default_config)
    }
}

/// Saves the configuration to the TOML file.
/// Exposed at crate root as save_config_util
pub fn save(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config).map_err(ConfigError::TomlSerialize)?;
    fs::write(config_path, config_content)?;
    Ok(())
}
