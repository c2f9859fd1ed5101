// rollcall CLI - mark training attendance from meeting exports

mod attendance;
mod exit_codes;
mod inspect;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rollcall_config::Settings;
use rollcall_io::IoError;
use rollcall_recon::ReconError;

use exit_codes::{io_exit_code, recon_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Mark training attendance from registration rosters and meeting exports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile one training day and write the annotated roster
    #[command(after_help = "\
Examples:
  rollcall run --registration reg.csv --zoom zoom.csv --date 15-01-2025 --day 1
  rollcall run -r reg.csv -z zoom.csv --date 2025-01-15 --day 2 --program Advanced
  rollcall run -r reg.csv -z zoom.csv --date 15-01-2025 --day 1 --threshold 45 --output-dir out/
  rollcall run -r reg.csv -z zoom.csv --date 15-01-2025 --day 1 --json --no-write")]
    Run(attendance::RunArgs),

    /// Run a reconciliation described in a TOML job file
    #[command(after_help = "\
Examples:
  rollcall job day1.toml
  rollcall job day1.toml --json --no-write

Job file:
  date = \"15-01-2025\"
  day = 1
  program = \"Advanced\"        # optional
  threshold_minutes = 60      # optional, defaults to settings

  [registration]
  file = \"registration.csv\"   # relative to the job file

  [zoom]
  file = \"zoom.csv\"

  [output]
  dir = \"out\"                 # optional
  filtered_only = false")]
    Job {
        /// Path to the job .toml file
        job: PathBuf,

        #[command(flatten)]
        output: attendance::OutputOpts,
    },

    /// Show detected columns, training dates and programs of a CSV file
    #[command(after_help = "\
Examples:
  rollcall inspect registration.csv
  rollcall inspect zoom.csv --zoom
  rollcall inspect registration.csv --json")]
    Inspect {
        /// CSV file to inspect
        file: PathBuf,

        /// Treat the file as a meeting export instead of a registration roster
        #[arg(long)]
        zoom: bool,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Show settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file path
    Path,
    /// Print the effective settings as JSON
    Show,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  rollcall-recon ", env!("CARGO_PKG_VERSION"),
    )
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => attendance::cmd_run(args),
        Commands::Job { job, output } => attendance::cmd_job(job, output),
        Commands::Inspect { file, zoom, json } => inspect::cmd_inspect(file, zoom, json),
        Commands::Config(cmd) => cmd_config(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn cmd_config(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Path => {
            println!("{}", Settings::config_path_display());
            Ok(())
        }
        ConfigCommands::Show => {
            let settings = Settings::load();
            let json = serde_json::to_string_pretty(&settings)
                .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
            println!("{json}");
            Ok(())
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let code = io_exit_code(&err);
        let hint = match &err {
            IoError::MissingColumns { .. } => Some(
                "run `rollcall inspect` on the file, then map columns in a job file".to_string(),
            ),
            IoError::UnknownColumn { .. } => {
                Some("column names are matched exactly, including case".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::NoRegistrations { .. } => Some(
                "run `rollcall inspect <registration.csv>` to list training dates and programs"
                    .to_string(),
            ),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}
