use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use serde::Serialize;

use vision_coords::core::CoordinateError;
use vision_coords::io::{
    preset_pivot, ConfigError, ConfigIoError, LocateReport, PivotConfig, ProjectionReport,
    PRESET_NAMES,
};
use vision_coords::{
    Angle, CameraCoordinate, CameraPivot, Length, ProjectionError, RelativeCoordinate, Resolution,
};

#[derive(Parser, Debug)]
#[command(
    name = "vision-coords",
    version,
    about = "Project ground targets into camera images and locate image pixels on the ground"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Where does a ground target appear in the image?
    Project(ProjectArgs),
    /// Where on the ground is an image pixel?
    Locate(LocateArgs),
    /// Write a built-in pivot configuration.
    Preset(PresetArgs),
}

#[derive(Args, Debug)]
struct PivotArgs {
    /// Pivot configuration JSON.
    #[arg(long, conflicts_with = "preset")]
    config: Option<PathBuf>,
    /// Built-in pivot name.
    #[arg(long)]
    preset: Option<String>,
    /// Camera index on the pivot.
    #[arg(long, default_value_t = 0)]
    camera: usize,
    /// Override the pivot pitch, degrees.
    #[arg(long, allow_negative_numbers = true)]
    pitch: Option<f64>,
    /// Override the pivot yaw, degrees.
    #[arg(long, allow_negative_numbers = true)]
    yaw: Option<f64>,
    /// Override the image width, pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Override the image height, pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ProjectArgs {
    #[command(flatten)]
    pivot: PivotArgs,
    /// Target direction, degrees, positive to the left.
    #[arg(long, allow_negative_numbers = true)]
    direction: f64,
    /// Target distance, centimetres.
    #[arg(long)]
    distance: f64,
    /// Clamp the result into the image.
    #[arg(long)]
    clamp: bool,
}

#[derive(Args, Debug)]
struct LocateArgs {
    #[command(flatten)]
    pivot: PivotArgs,
    /// Column from the left edge, pixels.
    #[arg(long, allow_negative_numbers = true)]
    x: i32,
    /// Row from the top edge, pixels.
    #[arg(long, allow_negative_numbers = true)]
    y: i32,
}

#[derive(Args, Debug)]
struct PresetArgs {
    /// One of the built-in pivot names.
    name: String,
    /// Write the config here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    ConfigIo(#[from] ConfigIoError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pivot(#[from] vision_coords::core::CameraPivotError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("target distance must be finite, got {0}")]
    InvalidDistance(f64),
    #[error("pass --config <file> or --preset <name> (presets: {})", PRESET_NAMES.join(", "))]
    NoPivot,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(err) = vision_coords::core::init_from_env(level) {
        eprintln!("logger already installed: {err}");
    }
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: u8) {
    let _ = tracing_log::LogTracer::init_with_filter(match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });
    vision_coords::core::init_tracing(false);
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Project(args) => {
            if !args.distance.is_finite() {
                return Err(CliError::InvalidDistance(args.distance));
            }
            let (pivot, resolution) = resolve_pivot(&args.pivot)?;
            let target = RelativeCoordinate::new(
                Angle::from_degrees(args.direction),
                Length::from_centimetres(args.distance),
            );
            let report = ProjectionReport::compute(
                &pivot,
                args.pivot.camera,
                target,
                resolution,
                args.clamp,
            )?;
            emit(&report, args.pivot.output.as_deref())
        }
        Command::Locate(args) => {
            let (pivot, resolution) = resolve_pivot(&args.pivot)?;
            let pixel = CameraCoordinate::new(args.x, args.y, resolution);
            let report = LocateReport::compute(&pivot, args.pivot.camera, pixel)?;
            emit(&report, args.pivot.output.as_deref())
        }
        Command::Preset(args) => {
            let pivot = preset_pivot(&args.name)
                .ok_or_else(|| ConfigError::UnknownPreset(args.name.clone()))?;
            let config = PivotConfig::from_pivot(pivot);
            match args.output {
                Some(path) => Ok(config.write_json(path)?),
                None => emit(&config, None),
            }
        }
    }
}

fn resolve_pivot(args: &PivotArgs) -> Result<(CameraPivot, Resolution), CliError> {
    let config = match (&args.config, &args.preset) {
        (Some(path), _) => {
            log::debug!("loading pivot config {}", path.display());
            PivotConfig::load_json(path)?
        }
        (None, Some(name)) => PivotConfig::from_preset(name.clone()),
        (None, None) => return Err(CliError::NoPivot),
    };

    let mut pivot = config.build_pivot()?;
    if args.pitch.is_some() || args.yaw.is_some() {
        let pitch = args.pitch.map(Angle::from_degrees).unwrap_or(pivot.pitch());
        let yaw = args.yaw.map(Angle::from_degrees).unwrap_or(pivot.yaw());
        pivot = pivot.with_angles(pitch, yaw)?;
    }

    let resolution = Resolution::new(
        args.width.unwrap_or(config.resolution.width.get()),
        args.height.unwrap_or(config.resolution.height.get()),
    )?;
    Ok((pivot, resolution))
}

fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).map_err(ConfigIoError::from)?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
