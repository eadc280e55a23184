//! Command line front-end for the world editor.
//!
//! Each subcommand opens a map file, drives the editor the same way the
//! interactive front-end does, and saves the map back when it changed.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use worldedit::dialog::PresetDialog;
use worldedit::export::ExportSummary;
use worldedit::world_map::{Coordinate, WorldMap};
use worldedit::{
    ALERT_TITLE, AlertSink, ClickOutcome, Editor, EditorConfig, ExportOutcome, ExportProgress,
    ExporterRegistry, MarkerScene, PlaceDialog,
};

type CliResult = Result<ExitCode, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "worldedit")]
#[command(about = "Edit the start cell and places of a world map, and export it")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a summary of a map
    Info {
        /// Map file
        map: PathBuf,
    },
    /// Create a new map from a terrain file ('#' is land, '~' is water)
    New {
        /// Map file to create
        map: PathBuf,

        /// Map name
        #[arg(short, long)]
        name: String,

        /// Terrain rows, one line per row
        #[arg(short, long)]
        terrain: PathBuf,
    },
    /// Set the start cell of a map
    SetStart {
        /// Map file
        map: PathBuf,

        /// Cell as "x,y"
        at: Coordinate,
    },
    /// Add a place on a land cell
    AddPlace {
        /// Map file
        map: PathBuf,

        /// Cell as "x,y"
        at: Coordinate,

        /// Place name
        #[arg(short, long)]
        name: String,

        /// Place description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Export a map
    Export {
        /// Map file
        map: PathBuf,

        /// Exporter id (defaults to the configured one)
        #[arg(short, long)]
        format: Option<String>,

        /// Output file (defaults to the configured export folder)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Alerts printed to stderr.
struct ConsoleAlerts;

impl AlertSink for ConsoleAlerts {
    fn alert(&mut self, message: &str) {
        eprintln!("{}: {}", ALERT_TITLE, message);
    }
}

/// Export progress reported on the console.
struct ConsoleProgress;

impl ExportProgress for ConsoleProgress {
    fn progress(&mut self, done: usize, total: usize) {
        log::debug!("Export progress: {}/{}", done, total);
    }

    fn completed(&mut self, summary: &ExportSummary) {
        println!(
            "Exported {} places to {} ({} bytes)",
            summary.places_exported,
            summary.path.display(),
            summary.bytes_written
        );
    }

    fn failed(&mut self, message: &str) {
        log::error!("Export failed: {}", message);
    }
}

/// Load the configuration before the logger exists, so problems are
/// printed directly.
fn load_config(path: Option<&Path>) -> EditorConfig {
    let Some(path) = path
        .map(Path::to_path_buf)
        .or_else(EditorConfig::default_path)
    else {
        return EditorConfig::default();
    };

    match EditorConfig::load_or_default(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Ignoring config file {}: {}", path.display(), e);
            EditorConfig::default()
        }
    }
}

fn open_editor(
    map: &Path,
    dialog: Box<dyn PlaceDialog>,
) -> Result<Editor<WorldMap, MarkerScene>, Box<dyn std::error::Error>> {
    let world = WorldMap::load(map)?;
    Ok(Editor::new(
        world,
        MarkerScene::new(),
        dialog,
        Box::new(ConsoleAlerts),
    ))
}

fn info(map: &Path) -> CliResult {
    let world = WorldMap::load(map)?;
    println!("{} ({}x{})", world.name(), world.width(), world.height());
    println!("Land cells: {}", world.land_count());
    match world.start_cell() {
        Some(at) => println!("Start cell: {}", at),
        None => println!("Start cell: none"),
    }
    println!("Places: {}", world.places().len());
    for place in world.places() {
        if place.description.is_empty() {
            println!("  {} {}", place.coordinates, place.name);
        } else {
            println!("  {} {}: {}", place.coordinates, place.name, place.description);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn new_map(map: &Path, name: String, terrain: &Path) -> CliResult {
    let rows: Vec<String> = std::fs::read_to_string(terrain)?
        .lines()
        .map(str::trim_end)
        .filter(|row| !row.is_empty())
        .map(str::to_string)
        .collect();
    let world = WorldMap::from_rows(name, &rows)?;
    world.save(map)?;
    println!(
        "Created {} ({}x{})",
        map.display(),
        world.width(),
        world.height()
    );
    Ok(ExitCode::SUCCESS)
}

fn set_start(map: &Path, at: Coordinate) -> CliResult {
    let mut editor = open_editor(map, Box::new(PresetDialog::new("", "")))?;
    editor.arm_for_start_cell();

    match editor.on_map_clicked(at.x, at.y) {
        ClickOutcome::StartCellSet(at) => {
            editor.model().save(map)?;
            println!("Start cell set to {}", at);
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::FAILURE),
    }
}

fn add_place(map: &Path, at: Coordinate, name: String, description: String) -> CliResult {
    let mut editor = open_editor(map, Box::new(PresetDialog::new(name, description)))?;
    editor.arm_for_add_place();
    editor.on_map_clicked(at.x, at.y);

    if editor.process_dialog_results() == 0 {
        return Ok(ExitCode::FAILURE);
    }
    editor.model().save(map)?;
    println!("Added place at {}", at);
    Ok(ExitCode::SUCCESS)
}

fn export(
    config: &EditorConfig,
    map: &Path,
    format: Option<String>,
    out: Option<PathBuf>,
) -> CliResult {
    let registry = ExporterRegistry::new();
    let format = format.unwrap_or_else(|| config.preferences.export_format.clone());
    let Some(exporter) = registry.get(&format) else {
        eprintln!(
            "Unknown export format '{}' (available: {})",
            format,
            registry.ids().join(", ")
        );
        return Ok(ExitCode::FAILURE);
    };

    let mut editor = open_editor(map, Box::new(PresetDialog::new("", "")))?;
    let path =
        out.unwrap_or_else(|| config.export_path(editor.model().name(), exporter.extension()));

    if editor
        .export_map(exporter, path, Box::new(ConsoleProgress))
        .is_none()
    {
        return Ok(ExitCode::FAILURE);
    }

    match editor.wait_for_export() {
        Some(ExportOutcome::Completed(_)) => Ok(ExitCode::SUCCESS),
        _ => Ok(ExitCode::FAILURE),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let result = match cli.command {
        Commands::Info { map } => info(&map),
        Commands::New { map, name, terrain } => new_map(&map, name, &terrain),
        Commands::SetStart { map, at } => set_start(&map, at),
        Commands::AddPlace {
            map,
            at,
            name,
            description,
        } => add_place(&map, at, name, description),
        Commands::Export { map, format, out } => export(&config, &map, format, out),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
