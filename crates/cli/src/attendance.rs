//! `rollcall run` / `rollcall job`: load both tables, reconcile, write output.

use std::path::{Path, PathBuf};

use clap::Args;
use log::{info, warn};
use rollcall_config::Settings;
use rollcall_io::columns::{resolve_registration_columns, resolve_zoom_columns};
use rollcall_io::output::{output_filename, write_annotated};
use rollcall_io::rows::{attendance_rows, roster_rows, LoadIssue};
use rollcall_io::csv;
use rollcall_recon::config::{RegistrationColumns, ZoomColumns};
use rollcall_recon::fields::parse_date;
use rollcall_recon::{DaySlot, JobConfig, ProgramFilter, ReconInput, ReconParams, ReconResult};
use serde::Serialize;

use crate::CliError;

#[derive(Args)]
pub struct RunArgs {
    /// Registration roster CSV
    #[arg(long, short = 'r')]
    registration: PathBuf,

    /// Meeting attendance export CSV
    #[arg(long, short = 'z')]
    zoom: PathBuf,

    /// Training date to reconcile (15-01-2025, 2025-01-15, 15 Jan 2025, ...)
    #[arg(long)]
    date: String,

    /// Attendance day column to fill: 1 or 2
    #[arg(long)]
    day: DaySlot,

    /// Only reconcile registrations for this program/version
    #[arg(long)]
    program: Option<String>,

    /// Minimum summed minutes to mark present (default from settings)
    #[arg(long)]
    threshold: Option<f64>,

    /// Directory for the output CSV (default: settings, else the roster's directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write only the reconciled rows instead of the full roster
    #[arg(long)]
    filtered_only: bool,

    #[command(flatten)]
    output: OutputOpts,
}

#[derive(Args, Clone, Copy)]
pub struct OutputOpts {
    /// Print the result as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Reconcile without writing the output CSV
    #[arg(long)]
    no_write: bool,

    /// Suppress the human summary on stderr
    #[arg(long, short = 'q')]
    quiet: bool,
}

/// Everything one reconciliation needs, however it was described.
struct Job {
    registration: PathBuf,
    zoom: PathBuf,
    registration_columns: Option<RegistrationColumns>,
    zoom_columns: Option<ZoomColumns>,
    params: ReconParams,
    output_dir: Option<PathBuf>,
    filtered_only: bool,
}

#[derive(Serialize)]
struct RunReport<'a> {
    #[serde(flatten)]
    result: &'a ReconResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_file: Option<String>,
    load_issues: Vec<LoadIssue>,
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let settings = Settings::load();

    let date = parse_date(&args.date)
        .ok_or_else(|| {
            CliError::usage(format!("cannot parse date '{}'", args.date))
                .with_hint("use dd-mm-yyyy (15-01-2025) or yyyy-mm-dd (2025-01-15)")
        })?;
    let program = args.program.filter(|p| !settings.is_all_programs(p));
    let params = ReconParams::new(date, args.day)
        .with_program(ProgramFilter::from_option(program.as_deref()))
        .with_threshold(args.threshold.unwrap_or(settings.threshold_minutes));

    let job = Job {
        registration: args.registration,
        zoom: args.zoom,
        registration_columns: None,
        zoom_columns: None,
        params,
        output_dir: args.output_dir.or_else(|| settings.output_dir.map(PathBuf::from)),
        filtered_only: args.filtered_only,
    };
    execute(job, args.output)
}

pub fn cmd_job(path: PathBuf, opts: OutputOpts) -> Result<(), CliError> {
    let settings = Settings::load();

    let text = std::fs::read_to_string(&path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
    let config = JobConfig::from_toml(&text)?;

    // Relative paths in the job resolve against its directory.
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut params = config.params(settings.threshold_minutes)?;
    if params.program.as_option().is_some_and(|p| settings.is_all_programs(p)) {
        params.program = ProgramFilter::All;
    }

    let output_dir = config
        .output
        .dir
        .as_ref()
        .map(|d| base.join(d))
        .or_else(|| settings.output_dir.map(PathBuf::from));

    let job = Job {
        registration: base.join(&config.registration.file),
        zoom: base.join(&config.zoom.file),
        registration_columns: config.registration.columns,
        zoom_columns: config.zoom.columns,
        params,
        output_dir,
        filtered_only: config.output.filtered_only,
    };
    execute(job, opts)
}

fn execute(mut job: Job, opts: OutputOpts) -> Result<(), CliError> {
    let reg_table = csv::load(&job.registration)?;
    let reg_cols =
        resolve_registration_columns(&reg_table.headers, job.registration_columns.as_ref())?;
    info!("{}: {} rows", job.registration.display(), reg_table.len());

    let zoom_table = csv::load(&job.zoom)?;
    let zoom_cols = resolve_zoom_columns(&zoom_table.headers, job.zoom_columns.as_ref())?;
    info!("{}: {} rows", job.zoom.display(), zoom_table.len());

    if reg_cols.program.is_none() && job.params.program != ProgramFilter::All {
        warn!("registration has no program column; ignoring program filter");
        if !opts.quiet {
            eprintln!("warning: registration has no program/version column; program filter ignored");
        }
        job.params.program = ProgramFilter::All;
    }

    let roster = roster_rows(&reg_table, &reg_cols);
    let attendance = attendance_rows(&zoom_table, &zoom_cols);
    let mut load_issues = roster.issues;
    load_issues.extend(attendance.issues);

    let input = ReconInput { roster: roster.rows, attendance: attendance.rows };
    let result = rollcall_recon::run(&job.params, &input)?;

    let output_file = if opts.no_write {
        None
    } else {
        let dir = job.output_dir.clone().unwrap_or_else(|| roster_dir(&job.registration));
        std::fs::create_dir_all(&dir)
            .map_err(|e| CliError::io(format!("cannot create {}: {e}", dir.display())))?;
        let path = dir.join(output_filename(result.meta.date, result.meta.slot, &job.params.program));
        write_annotated(&path, &reg_table, &reg_cols, &result, job.filtered_only)?;
        Some(path)
    };

    if opts.json {
        let report = RunReport {
            result: &result,
            output_file: output_file.as_ref().map(|p| p.display().to_string()),
            load_issues,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    } else if !opts.quiet {
        for issue in &load_issues {
            eprintln!("warning: {issue}");
        }
    }

    if !opts.quiet {
        print_summary(&result, output_file.as_deref());
    }
    Ok(())
}

fn roster_dir(registration: &Path) -> PathBuf {
    match registration.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Human summary on stderr.
fn print_summary(result: &ReconResult, output_file: Option<&Path>) {
    let s = &result.summary;
    let program = result.meta.program.as_deref().unwrap_or("All");
    eprintln!(
        "{} {} (program: {}, threshold: {} min)",
        result.meta.date.format("%d-%m-%Y"),
        result.meta.slot,
        program,
        result.meta.threshold_minutes,
    );
    eprintln!("Total registrations for selected date: {}", s.total_registrations);
    eprintln!("Total Zoom participants: {}", s.zoom_participants);
    eprintln!("Marked Present (Y): {}", s.present);
    eprintln!("Below duration threshold (N): {}", s.below_threshold);
    eprintln!("Not found in Zoom (N): {}", s.not_in_zoom);
    eprintln!("In Zoom but not registered: {}", s.not_registered);

    if !result.unmatched_emails.is_empty() {
        eprintln!("Zoom participants not in registration ({}):", result.unmatched_emails.len());
        for email in &result.unmatched_emails {
            eprintln!("  - {email}");
        }
    }

    for skipped in &result.skipped {
        eprintln!("warning: {skipped}");
    }
    for w in &result.warnings {
        eprintln!("warning: {w}");
    }

    if let Some(path) = output_file {
        eprintln!("Output saved to: {}", path.display());
    }
}
