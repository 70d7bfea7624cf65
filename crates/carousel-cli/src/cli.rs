//! Command-line interface for the carousel utility
//!
//! Provides a headless simulator and configuration tooling for the carousel
//! engine.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::colorizer::{dim, paint_channel, paint_status};
use crate::script::ScriptStep;
use crate::simulator::{EventRecord, Report, Simulation};
use carousel::core::logging::init_logging;
use carousel::{
    Direction, Easing, Engine, EngineConfig, ManualClock, TransitionOverrides, TransitionRegistry,
};

/// Carousel - simulate and validate carousel engine configurations
#[derive(Parser)]
#[command(name = "carousel")]
#[command(about = "Simulate a carousel engine on virtual time and validate its configuration")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an engine on virtual time and print every event it publishes
    Simulate(SimulateArgs),

    /// List registered transition types
    Transitions {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate an engine configuration file
    Validate {
        /// JSON configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Number of slides in the ring
    #[arg(short, long, default_value_t = 3)]
    pub slides: usize,

    /// JSON configuration file; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Transition type (none|fade|slide|reveal)
    #[arg(long, value_name = "TYPE")]
    pub transition: Option<String>,

    /// Transition direction (left|right|up|down)
    #[arg(long)]
    pub direction: Option<Direction>,

    /// Transition duration in milliseconds
    #[arg(long, value_name = "MS")]
    pub speed_ms: Option<u64>,

    /// Transition easing (swing|linear)
    #[arg(long)]
    pub easing: Option<Easing>,

    /// How long each slide stays before autoplay moves on
    #[arg(long, value_name = "MS")]
    pub rotation_speed_ms: Option<u64>,

    /// Do not start playing at build time
    #[arg(long)]
    pub no_autoplay: bool,

    /// Simulated time to run for
    #[arg(short, long, value_name = "MS", default_value_t = 10_000)]
    pub duration_ms: u64,

    /// Issue a command at a point in time (play|pause|stop|restart|first|previous|next|last|goto=N)
    #[arg(long = "at", value_name = "MS:COMMAND")]
    pub script: Vec<ScriptStep>,

    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// When to use colors in output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

impl SimulateArgs {
    /// Configuration file (or defaults) with the command-line flags applied
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => EngineConfig::default(),
        };

        let overrides = TransitionOverrides {
            kind: self.transition.clone(),
            direction: self.direction,
            speed_ms: self.speed_ms,
            easing: self.easing,
            ..TransitionOverrides::default()
        };
        config.transition = config.transition.merged(&overrides);

        if let Some(rotation_speed_ms) = self.rotation_speed_ms {
            config.rotation_speed_ms = rotation_speed_ms;
        }
        if self.no_autoplay {
            config.auto_play = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct CarouselApp {
    registry: TransitionRegistry,
}

impl CarouselApp {
    /// Create a new application with the built-in transitions
    pub fn new() -> Self {
        Self {
            registry: TransitionRegistry::with_builtin_transitions(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("CAROUSEL_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("CAROUSEL_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Carousel v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Simulate(args) => self.simulate_command(&args, cli.verbose),
            Commands::Transitions { json } => self.transitions_command(json, cli.verbose),
            Commands::Validate { config } => self.validate_command(&config, cli.verbose),
        }
    }

    /// Handle the simulate command
    fn simulate_command(&self, args: &SimulateArgs, verbose: bool) -> Result<()> {
        let config = args.engine_config()?;
        if verbose {
            eprintln!(
                "Simulating {} slides for {}ms ({} {}, {}ms)",
                args.slides,
                args.duration_ms,
                config.transition.kind,
                config.transition.direction,
                config.transition.speed_ms
            );
        }

        let report = Simulation::new(config, args.slides, Duration::from_millis(args.duration_ms))
            .with_script(args.script.clone())
            .run()?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        if args.json {
            for event in &report.events {
                writeln!(out, "{}", serde_json::to_string(event)?)?;
            }
        } else {
            let colored = should_colorize(args.color);
            for event in &report.events {
                writeln!(out, "{}", format_event(event, colored))?;
            }
            writeln!(out, "{}", format_summary(&report))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Handle the transitions command
    fn transitions_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing registered transitions");
        }

        let kinds = self.registry.kinds();
        if json {
            let transitions: Vec<serde_json::Value> = kinds
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "type": kind,
                        "directions": self.registry.directions(kind),
                    })
                })
                .collect();
            let listing = serde_json::json!({
                "transitions": transitions,
                "total": kinds.len(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Registered transitions:");
            for kind in &kinds {
                let directions = self.registry.directions(kind);
                if directions.is_empty() {
                    println!("  {}", kind);
                } else {
                    let names: Vec<&str> = directions.iter().map(|d| d.as_str()).collect();
                    println!("  {:<8} ({})", kind, names.join(", "));
                }
            }
            println!();
            println!("Total: {} transition types", kinds.len());
        }

        Ok(())
    }

    /// Handle the validate command
    fn validate_command(&self, path: &Path, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Validating {}", path.display());
        }

        let checked = load_config(path).and_then(|config| {
            // A throwaway engine catches unregistered transition types too
            Engine::builder(config.clone())
                .slides(0..2)
                .clock(ManualClock::new())
                .build()
                .map(|_| config)
                .map_err(anyhow::Error::from)
        });

        match checked {
            Ok(config) => {
                println!(
                    "✓ Valid configuration: {} {} over {}ms, rotation every {}ms, autoplay {}",
                    config.transition.kind,
                    config.transition.direction,
                    config.transition.speed_ms,
                    config.rotation_speed_ms,
                    if config.auto_play { "on" } else { "off" }
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid configuration: {:#}", e);
                Err(anyhow!("Invalid configuration '{}'", path.display()))
            }
        }
    }

    /// Get a reference to the registry (for testing)
    #[cfg(test)]
    pub fn registry(&self) -> &TransitionRegistry {
        &self.registry
    }
}

impl Default for CarouselApp {
    fn default() -> Self {
        Self::new()
    }
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    EngineConfig::from_path(path)
        .with_context(|| format!("Failed to load config '{}'", path.display()))
}

/// Determine if we should colorize stdout
fn should_colorize(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            if std::env::var("NO_COLOR").is_ok() {
                return false;
            }
            crossterm::tty::IsTty::is_tty(&std::io::stdout())
        }
    }
}

/// One event as a human-readable line
pub fn format_event(event: &EventRecord, colored: bool) -> String {
    let snapshot = &event.snapshot;
    let time = format!("{:>8}ms", event.at_ms);
    let channel = format!("{:<18}", event.channel.as_str());
    let status = format!("{:<7}", snapshot.status.as_str());
    let slide = format!("slide {}/{}", snapshot.current + 1, snapshot.len);
    let motion = if snapshot.animating { "animating" } else { "idle" };

    if colored {
        format!(
            "{}  {}  {}  {}  next {}  {}  #{}",
            dim(&time),
            paint_channel(event.channel, &channel),
            slide,
            paint_status(snapshot.status, &status),
            snapshot.next + 1,
            motion,
            snapshot.iteration
        )
    } else {
        format!(
            "{}  {}  {}  {}  next {}  {}  #{}",
            time,
            channel,
            slide,
            status,
            snapshot.next + 1,
            motion,
            snapshot.iteration
        )
    }
}

/// Closing line after the event listing
pub fn format_summary(report: &Report) -> String {
    format!(
        "Simulated {}ms: {} events, {} transitions, ended on slide {}/{} ({})",
        report.duration_ms,
        report.events.len(),
        report.last.iteration,
        report.last.current + 1,
        report.last.len,
        report.last.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel::{Channel, Snapshot, Status};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing_simulate_command() {
        let args = vec![
            "carousel",
            "simulate",
            "--slides",
            "4",
            "--transition",
            "slide",
            "--direction",
            "up",
            "--at",
            "1500:pause",
            "--at",
            "3000:goto=2",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.slides, 4);
                assert_eq!(args.transition.as_deref(), Some("slide"));
                assert_eq!(args.direction, Some(Direction::Up));
                assert_eq!(args.script.len(), 2);
                assert_eq!(args.duration_ms, 10_000); // default
                assert_eq!(args.color, ColorChoice::Auto); // default
                assert!(!args.json);
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_script_step() {
        let args = vec!["carousel", "simulate", "--at", "later:pause"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_transitions_command() {
        let args = vec!["carousel", "transitions", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Transitions { json } => assert!(json),
            _ => panic!("Expected Transitions command"),
        }
    }

    #[test]
    fn test_cli_parsing_validate_requires_config() {
        assert!(Cli::try_parse_from(vec!["carousel", "validate"]).is_err());
        let cli = Cli::try_parse_from(vec!["carousel", "validate", "-c", "c.json"]).unwrap();
        match cli.command {
            Commands::Validate { config } => assert_eq!(config.to_string_lossy(), "c.json"),
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_verbose_and_log_flags() {
        let args = vec![
            "carousel",
            "--verbose",
            "--log-level",
            "off",
            "transitions",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_level, LogLevel::Off);
        assert_eq!(cli.log_format, LogFormat::Compact);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(
            &path,
            r#"{ "rotation_speed_ms": 2000, "transition": { "type": "reveal", "speed_ms": 250 } }"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from(vec![
            "carousel",
            "simulate",
            "--config",
            path.to_str().unwrap(),
            "--speed-ms",
            "100",
            "--no-autoplay",
        ])
        .unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("Expected Simulate command");
        };

        let config = args.engine_config().unwrap();
        assert_eq!(config.transition.kind, "reveal");
        assert_eq!(config.transition.speed_ms, 100);
        assert_eq!(config.rotation_speed_ms, 2000);
        assert!(!config.auto_play);
    }

    #[test]
    fn test_zero_rotation_flag_is_rejected() {
        let cli =
            Cli::try_parse_from(vec!["carousel", "simulate", "--rotation-speed-ms", "0"]).unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("Expected Simulate command");
        };
        assert!(args.engine_config().is_err());
    }

    #[test]
    fn test_app_lists_builtin_transitions() {
        let app = CarouselApp::new();
        assert_eq!(app.registry().kinds(), vec!["fade", "none", "reveal", "slide"]);
        assert!(app.transitions_command(true, false).is_ok());
        assert!(app.transitions_command(false, false).is_ok());
    }

    #[test]
    fn test_validate_command() {
        let app = CarouselApp::default();
        let dir = tempdir().unwrap();

        let good = dir.path().join("good.json");
        fs::write(&good, r#"{ "transition": { "type": "slide", "direction": "down" } }"#)
            .unwrap();
        assert!(app.validate_command(&good, false).is_ok());

        let unknown = dir.path().join("unknown.json");
        fs::write(&unknown, r#"{ "transition": { "type": "warp" } }"#).unwrap();
        assert!(app.validate_command(&unknown, false).is_err());

        let missing = dir.path().join("missing.json");
        assert!(app.validate_command(&missing, false).is_err());
    }

    #[test]
    fn test_format_event_plain() {
        let event = EventRecord {
            at_ms: 4000,
            channel: Channel::TransitionStart,
            snapshot: Snapshot {
                current: 1,
                next: 2,
                previous: 0,
                last: 2,
                len: 3,
                status: Status::Playing,
                animating: true,
                iteration: 1,
                disabled: false,
            },
        };
        let line = format_event(&event, false);
        assert!(line.starts_with("    4000ms  transitionStart"));
        assert!(line.contains("slide 2/3"));
        assert!(line.contains("playing"));
        assert!(line.contains("animating"));
        assert!(!line.contains("\x1b["));
    }
}
