// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subclean::app_config::{self, Config};
use subclean::app_controller::{CleaningReport, Controller};

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clean SRT subtitle files (default command)
    Clean(CleanArgs),

    /// Generate shell completions for subclean
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct CleanArgs {
    /// Input SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Output directory for a single input file (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    stats_json: bool,

    /// Also write a .diff report for every cleaned file
    #[arg(long)]
    diff_report: bool,
}

/// subclean - SRT subtitle cleaner
///
/// Removes hearing-impaired annotations, speaker labels, formatting tags and
/// other noise from SRT subtitle files while keeping their timing.
#[derive(Parser, Debug)]
#[command(name = "subclean")]
#[command(version)]
#[command(about = "Configurable SRT subtitle cleaner")]
#[command(long_about = "subclean removes SDH annotations, speaker labels, formatting tags and other noise from SRT subtitle files.

EXAMPLES:
    subclean movie.srt                          # Clean using default config
    subclean -f movie.srt                       # Force overwrite existing output
    subclean -o cleaned/ movie.srt              # Write movie.clean.srt into cleaned/
    subclean --diff-report movie.srt            # Also write movie.clean.diff
    subclean --stats-json movie.srt             # Print counters as JSON
    subclean --log-level debug /movies/         # Process entire directory with debug logging
    subclean completions bash > subclean.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. Every cleaning operation is off by default.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input SRT file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Output directory for a single input file (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    stats_json: bool,

    /// Also write a .diff report for every cleaned file
    #[arg(long)]
    diff_report: bool,
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

    // @returns: ANSI color for log level
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
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through
    // log::set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subclean", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Clean(args)) => run_clean(args),
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let clean_args = CleanArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
                output_dir: cli.output_dir,
                stats_json: cli.stats_json,
                diff_report: cli.diff_report,
            };
            run_clean(clean_args)
        }
    }
}

fn run_clean(options: CleanArgs) -> Result<()> {
    // A command line log level applies before the config is read
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.diff_report {
        config.output.write_diff_report = true;
    }

    log::set_max_level(config.log_level.to_level_filter());

    // Validated inside with_config
    let controller = Controller::with_config(config)?;

    let report = if options.input_path.is_file() {
        let output_dir = options.output_dir.clone().unwrap_or_else(|| {
            options.input_path.parent().unwrap_or(Path::new(".")).to_path_buf()
        });
        controller.run(options.input_path.clone(), output_dir, options.force_overwrite)?
    } else if options.input_path.is_dir() {
        if options.output_dir.is_some() {
            info!("--output-dir is ignored in folder mode, files are written next to their inputs");
        }
        controller.run_folder(options.input_path.clone(), options.force_overwrite)?
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    };

    if options.stats_json {
        print_report(&report)?;
    }

    if report.files_failed > 0 {
        return Err(anyhow!("{} file(s) could not be cleaned", report.files_failed));
    }

    Ok(())
}

fn print_report(report: &CleaningReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", json)?;
    Ok(())
}
