// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod assembler;
mod deck;
mod errors;
mod file_utils;
mod narration;
mod providers;
mod rescale;
mod transcript;
mod voice_utils;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a narrated video: per-segment speech synthesis sets the timing
    Build(BuildArgs),

    /// Overlay transcript images onto a master recording's audio track
    Overlay(OverlayArgs),

    /// Emit a slide deck with narration as per-slide speaker notes
    Deck(DeckArgs),

    /// Rescale every timing window in a transcript by a factor
    Rescale(RescaleArgs),

    /// Probe the configured speech endpoint without rendering anything
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,

        /// Set logging level
        #[arg(short, long, value_enum)]
        log_level: Option<CliLogLevel>,
    },

    /// Generate shell completions for slidecast
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct BuildArgs {
    /// Markdown voiceover transcript to build from
    #[arg(value_name = "TRANSCRIPT")]
    transcript: PathBuf,

    /// Output video path (defaults to the transcript name with .mp4)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Primary voice to use, ahead of the configured fallbacks
    #[arg(short, long)]
    voice: Option<String>,

    /// Parse and report segments without synthesizing or rendering
    #[arg(long)]
    parse_only: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct OverlayArgs {
    /// Markdown voiceover transcript with explicit timing windows
    #[arg(value_name = "TRANSCRIPT")]
    transcript: PathBuf,

    /// Pre-rendered asset supplying the master narration track
    #[arg(value_name = "MASTER")]
    master: PathBuf,

    /// Output video path (defaults to the transcript name with .mp4)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Parse and report segments without rendering
    #[arg(long)]
    parse_only: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct DeckArgs {
    /// Markdown voiceover transcript to build from
    #[arg(value_name = "TRANSCRIPT")]
    transcript: PathBuf,

    /// Output deck path (defaults to the transcript name with .deck.md)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct RescaleArgs {
    /// Markdown voiceover transcript to rewrite
    #[arg(value_name = "TRANSCRIPT")]
    transcript: PathBuf,

    /// Scale factor applied to every timing window
    #[arg(short = 'F', long)]
    factor: f64,

    /// Write to this path instead of rewriting the transcript in place
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// slidecast - narrated videos and slide decks from markdown transcripts
///
/// Parses heading-delimited voiceover transcripts, synthesizes narration
/// through a neural text-to-speech endpoint, and assembles images and audio
/// into a single video timeline with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "slidecast")]
#[command(version = "0.3.0")]
#[command(about = "Narrated videos and slide decks from markdown transcripts")]
#[command(long_about = "slidecast turns markdown voiceover transcripts into narrated media.

EXAMPLES:
    slidecast build voiceover-script.md              # synthesize narration, render video
    slidecast build -v en-US-AriaNeural script.md    # prefer a specific voice
    slidecast overlay script.md recording.mp4        # image timeline over a master track
    slidecast deck script.md                         # slide deck with speaker notes
    slidecast rescale script.md -F 0.5               # halve every timing window
    slidecast check                                  # probe the speech endpoint
    slidecast completions bash > slidecast.bash      # generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default.
    // We'll update the level after loading the config if needed.
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "slidecast", &mut std::io::stdout());
            Ok(())
        }
        Commands::Build(args) => {
            let mut config = load_config(&args.config_path, args.log_level.as_ref())?;
            if let Some(voice) = &args.voice {
                config.narration.voices.retain(|v| !voice_utils::voice_ids_match(v, voice));
                config.narration.voices.insert(0, voice.clone());
                config.validate().context("Configuration validation failed")?;
            }
            let controller = Controller::with_config(config)?;
            controller
                .run_build(args.transcript, args.output, args.force_overwrite, args.parse_only)
                .await
        }
        Commands::Overlay(args) => {
            let config = load_config(&args.config_path, args.log_level.as_ref())?;
            let controller = Controller::with_config(config)?;
            controller
                .run_overlay(
                    args.transcript,
                    args.master,
                    args.output,
                    args.force_overwrite,
                    args.parse_only,
                )
                .await
        }
        Commands::Deck(args) => {
            let config = load_config(&args.config_path, args.log_level.as_ref())?;
            let controller = Controller::with_config(config)?;
            controller.run_deck(args.transcript, args.output, args.force_overwrite)
        }
        Commands::Rescale(args) => {
            let config = load_config(&args.config_path, args.log_level.as_ref())?;
            let controller = Controller::with_config(config)?;
            controller.run_rescale(args.transcript, args.factor, args.output)
        }
        Commands::Check { config_path, log_level } => {
            let config = load_config(&config_path, log_level.as_ref())?;
            let controller = Controller::with_config(config)?;
            controller.check_narration().await
        }
    }
}

/// Load the configuration file, creating a default one when absent, and
/// apply command line overrides
fn load_config(config_path: &str, cli_log_level: Option<&CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = cli_log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    let config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Update log level in config if specified via command line
        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli_log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    Ok(config)
}
