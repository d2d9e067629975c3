mod config;
mod declination;
mod display;
mod notice;
mod render;
mod scenario;
mod sensors;
mod sky;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::display::SkyDisplay;
use crate::scenario::{play, Scenario, Step};

#[derive(Parser)]
#[command(name = "skywatch")]
#[command(about = "GPS satellite sky view and compass")]
struct Cli {
    /// YAML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate { scenario: String },
    /// Replay a scenario file and print every frame
    Render {
        scenario: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Draw commands as issued
    Text,
    /// Primitives with their final position on screen
    Screen,
    /// Frames as a JSON array
    Json,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Validate { scenario } => validate(&scenario),
        Commands::Render { scenario, format } => render(&scenario, &config, format),
    }
}

fn validate(path: &str) -> ExitCode {
    let scenario = match Scenario::from_file(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Scenario is valid ({} steps, {} frames)",
        scenario.steps.len(),
        scenario.frame_count()
    );
    for (i, step) in scenario.steps.iter().enumerate() {
        println!("  {}: {}", i + 1, describe(step));
    }
    ExitCode::SUCCESS
}

fn render(path: &str, config: &Config, format: OutputFormat) -> ExitCode {
    let scenario = match Scenario::from_file(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let viewport = scenario
        .viewport
        .unwrap_or_else(|| config.display.viewport());
    let mode = scenario.mode.unwrap_or(config.gps.mode);
    log::info!(
        "Rendering {}x{} in {} mode (location every {:?})",
        viewport.width,
        viewport.height,
        mode,
        config.gps.update_interval(mode)
    );

    let mut display = SkyDisplay::new(config.declination.build());
    let frames = play(&scenario, &mut display, viewport, config.display.text_size);

    match format {
        OutputFormat::Text | OutputFormat::Screen => {
            for frame in &frames {
                println!(
                    "frame {} (step {}, redraw {})",
                    frame.index,
                    frame.step + 1,
                    frame.redraw_requested
                );
                if let Some(notice) = &frame.notice {
                    println!("  notice: {}", notice);
                }
                if format == OutputFormat::Screen {
                    for placed in frame.placed() {
                        println!("  {}", placed);
                    }
                } else {
                    for command in &frame.commands {
                        println!("  {}", command);
                    }
                }
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&frames) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding frames: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    let notices = display.notices();
    if let Some(notice) = notices.showing() {
        log::info!(
            "Notice still showing at the end: {} ({} queued)",
            notice.message,
            notices.pending()
        );
    }
    ExitCode::SUCCESS
}

fn describe(step: &Step) -> String {
    match step {
        Step::Satellites(Some(readings)) => format!(
            "{} ({} tracked, {} used)",
            step.name(),
            readings.len(),
            readings.iter().filter(|r| r.used_in_fix).count()
        ),
        Step::Fix(Some(fix)) => format!(
            "{} ({:.5}, {:.5}) bearing {:.1} at {}",
            step.name(),
            fix.latitude,
            fix.longitude,
            fix.bearing_deg,
            fix.time()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "invalid time".to_string())
        ),
        Step::Wait(duration) => format!(
            "{} {}",
            step.name(),
            humantime::format_duration(*duration)
        ),
        _ => step.name().to_string(),
    }
}
