// src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdout};
use tracing_subscriber::EnvFilter;

use mapty_lib::{
    AppError, AppService, Coords, FormFields, MemoryMap, Workout, WorkoutCard, WorkoutKind,
    WorkoutStore,
};

fn main() -> Result<()> {
    init_logging();

    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}..."); // Print to stderr
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;

    // A missing location only keeps the map closed; the workouts are still loaded.
    match service.app.start() {
        Ok(count) => tracing::debug!(count, "Session started"),
        Err(AppError::Location(e)) => eprintln!("{e}. Set one with 'mapty set-home <lat> <lng>'."),
        Err(e) => bail!("Error starting session: {e}"),
    }

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::Add {
            lat,
            lng,
            type_,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            let app = &mut service.app;
            app.map_click(Coords::new(lat, lng));
            if let Some(variant) = type_ {
                app.change_variant(variant.into());
            }
            fill_fields(&mut app.form.fields, Some(distance), Some(duration), cadence, elevation);
            match app.submit() {
                Ok(workout) => println!(
                    "Successfully added workout '{}' ID: {}",
                    workout.description(),
                    workout.id()
                ),
                Err(e) => bail!("Error adding workout: {e}"),
            }
        }
        cli::Commands::Edit {
            id,
            type_,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            let app = &mut service.app;
            app.edit_click(&id)
                .with_context(|| format!("Error editing workout ID {id}"))?;
            if let Some(variant) = type_ {
                app.change_variant(variant.into());
            }
            fill_fields(&mut app.form.fields, distance, duration, cadence, elevation);
            match app.submit() {
                Ok(workout) => println!(
                    "Successfully updated workout ID {} ({})",
                    workout.id(),
                    workout.description()
                ),
                Err(e) => bail!("Error editing workout ID {id}: {e}"),
            }
        }
        cli::Commands::Delete { id } => match service.app.delete_click(&id) {
            Ok(workout) => println!(
                "Successfully deleted workout ID {} ({})",
                workout.id(),
                workout.description()
            ),
            Err(e) => bail!("Error deleting workout ID {id}: {e}"),
        },
        cli::Commands::Show { id } => {
            service
                .app
                .card_click(&id)
                .with_context(|| format!("Error showing workout ID {id}"))?;
            if let Some(workout) = service.app.store.find_by_id(&id) {
                print_focus(workout, service.app.map.service());
            }
        }
        cli::Commands::List => {
            let cards = service.app.list.cards();
            if cards.is_empty() {
                println!("No workouts yet. Add one with 'mapty add'.");
            } else if export_csv {
                print_workout_csv(&service.app.store)?;
            } else {
                print_card_table(cards, service.config.header_color());
            }
        }
        cli::Commands::Markers => {
            let map = service.app.map.service();
            if map.view().is_none() {
                println!("The map is not open: no location available.");
            } else {
                print_marker_table(map, service.config.header_color());
            }
        }
        cli::Commands::Reset { yes } => {
            if !yes {
                bail!("Refusing to remove all workouts without --yes");
            }
            let count = service.app.store.len();
            service.app.reset().context("Failed to reset workouts")?;
            println!("Removed {count} workout(s).");
        }
        cli::Commands::SetHome { lat, lng } => {
            service
                .set_home(lat, lng)
                .context("Failed to set home position")?;
            println!("Home position set to ({lat}, {lng}).");
        }
        cli::Commands::SetZoom { level } => {
            service
                .set_zoom_level(level)
                .context("Failed to set zoom level")?;
            println!("Map zoom level set to {level}.");
        }
        cli::Commands::SetColor { color } => {
            service
                .set_header_color(&color)
                .context("Failed to set header color")?;
            println!("Header color set to {}.", service.config.theme.header_color);
        }
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Writes the given inputs into the form, keeping the others as they are.
fn fill_fields(
    fields: &mut FormFields,
    distance: Option<String>,
    duration: Option<String>,
    cadence: Option<String>,
    elevation: Option<String>,
) {
    let targets = [
        (&mut fields.distance, distance),
        (&mut fields.duration, duration),
        (&mut fields.cadence, cadence),
        (&mut fields.elevation, elevation),
    ];
    for (field, value) in targets {
        if let Some(value) = value {
            *field = value;
        }
    }
}

/// Prints workout cards in a formatted table.
fn print_card_table(cards: &[WorkoutCard], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(header_color),
            Cell::new("Workout").fg(header_color),
            Cell::new("Distance").fg(header_color),
            Cell::new("Duration").fg(header_color),
            Cell::new("Pace / Speed").fg(header_color),
            Cell::new("Cadence / Elevation").fg(header_color),
        ]);

    for card in cards {
        let mut row = vec![Cell::new(&card.id), Cell::new(&card.title)];
        row.extend(
            card.stats
                .iter()
                .map(|stat| Cell::new(format!("{} {} {}", stat.icon, stat.value, stat.unit))),
        );
        table.add_row(row);
    }
    println!("{table}");
}

/// Prints the map markers and their popups.
fn print_marker_table(map: &MemoryMap, header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Marker").fg(header_color),
            Cell::new("Lat").fg(header_color),
            Cell::new("Lng").fg(header_color),
            Cell::new("Popup").fg(header_color),
        ]);

    for (handle, marker) in map.markers() {
        table.add_row(vec![
            Cell::new(handle.to_string()),
            Cell::new(format!("{:.5}", marker.coords.lat)),
            Cell::new(format!("{:.5}", marker.coords.lng)),
            Cell::new(&marker.popup.content),
        ]);
    }
    println!("{table}");
    if let Some(view) = map.view() {
        println!(
            "View centered on ({:.5}, {:.5}) at zoom {}",
            view.center.lat, view.center.lng, view.zoom
        );
    }
}

fn print_focus(workout: &Workout, map: &MemoryMap) {
    println!("{} {}", workout.variant().icon(), workout.description());
    if let Some(view) = map.view() {
        println!(
            "Map centered on ({:.5}, {:.5}) at zoom {}",
            view.center.lat, view.center.lng, view.zoom
        );
    }
    println!("Viewed {} time(s)", workout.view_count());
}

/// Writes every workout as CSV, in the order they were created.
fn print_workout_csv(store: &WorkoutStore) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());

    writer.write_record([
        "ID",
        "Type",
        "Created_Local",
        "Lat",
        "Lng",
        "Distance_km",
        "Duration_min",
        "Pace_min_per_km",
        "Speed_km_per_h",
        "Cadence_spm",
        "Elevation_m",
        "Description",
    ])?;

    for workout in store.workouts() {
        let (cadence, elevation) = match *workout.kind() {
            WorkoutKind::Running(run) => (run.cadence.to_string(), String::new()),
            WorkoutKind::Cycling(ride) => (String::new(), ride.elevation_gain.to_string()),
        };
        let coords = workout.coords();
        writer.write_record([
            workout.id().to_string(),
            workout.variant().to_string(),
            workout.created_at().with_timezone(&Local).to_rfc3339(),
            coords.lat.to_string(),
            coords.lng.to_string(),
            workout.distance().to_string(),
            workout.duration().to_string(),
            workout.pace().map_or(String::new(), |v| format!("{v:.2}")),
            workout.speed().map_or(String::new(), |v| format!("{v:.2}")),
            cadence,
            elevation,
            workout.description().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
