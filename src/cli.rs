// src/cli.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use mapty_lib::Variant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pin running and cycling workouts on a map", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Print lists as CSV instead of a table
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantCli {
    Running,
    Cycling,
}

impl From<VariantCli> for Variant {
    fn from(value: VariantCli) -> Self {
        match value {
            VariantCli::Running => Self::Running,
            VariantCli::Cycling => Self::Cycling,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drop a pin and log a workout there
    Add {
        /// Latitude of the pin
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the pin
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Workout type
        #[arg(short, long = "type", value_enum)]
        type_: Option<VariantCli>,
        /// Distance in km
        #[arg(short, long, allow_hyphen_values = true)]
        distance: String,
        /// Duration in minutes
        #[arg(short = 'm', long, allow_hyphen_values = true)]
        duration: String,
        /// Cadence in steps per minute (running)
        #[arg(short, long, allow_hyphen_values = true)]
        cadence: Option<String>,
        /// Elevation gain in meters (cycling)
        #[arg(short, long, allow_hyphen_values = true)]
        elevation: Option<String>,
    },
    /// Edit a workout; fields not given keep their current value
    Edit {
        /// ID of the workout to edit
        id: String,
        #[arg(short, long = "type", value_enum)]
        type_: Option<VariantCli>,
        #[arg(short, long, allow_hyphen_values = true)]
        distance: Option<String>,
        #[arg(short = 'm', long, allow_hyphen_values = true)]
        duration: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        cadence: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        elevation: Option<String>,
    },
    /// Delete a workout
    Delete {
        /// ID of the workout to delete
        id: String,
    },
    /// Center the map on a workout
    Show {
        /// ID of the workout to show
        id: String,
    },
    /// List workout cards, newest first
    List,
    /// List map markers and their popups
    Markers,
    /// Remove every stored workout
    Reset {
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },
    /// Set the position used as your location
    SetHome {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },
    /// Set the map zoom level
    SetZoom { level: u8 },
    /// Set the table header color (e.g. green, darkcyan)
    SetColor { color: String },
    /// Show the path to the database file
    DbPath,
    /// Show the path to the config file
    ConfigPath,
    /// Generate shell completion scripts
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
