// Binary tests for `rollcall run`, `job`, `inspect` and `config`.
// Run with: cargo test -p rollcall-cli --test cli_tests

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const REGISTRATION: &str = "\
Name,Email,Training date,Version,Attendance - Day 1,Attendance - Day 2
Alice Smith,alice@example.com,15-01-2025,Standard,,
Bob Jones,bob@example.com,15-01-2025,Standard,,
Charlie Brown,charlie@example.com,15-01-2025,Standard,,
Diana Prince,diana@example.com,15-01-2025,Advanced,,
Eve Adams,eve@example.com,15-01-2025,Advanced,,
Frank Miller,frank@example.com,16-01-2025,Standard,,
Grace Lee,grace@example.com,16-01-2025,Advanced,,
Henry Ford,henry@example.com,15-01-2025,Standard,,
Jack White,jack@example.com,15-01-2025,Standard,,
";

const ZOOM: &str = "\
Name (Original Name),User Email,Total Duration (Minutes)
Alice Smith,alice@example.com,75
Bob Jones,BOB@EXAMPLE.COM,45
Bob Jones,bob@example.com,30
Charlie Brown,charlie@example.com,1:30:00
Diana Prince,diana@example.com,55
Eve Adams,eve@example.com,62
Unknown Guest,unknown@random.com,80
Henry Ford,henry@example.com,59
Henry Ford,henry@example.com,5
Jack White,jack@example.com,2 hours
";

/// Temp workspace holding both inputs plus an isolated settings directory.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("registration.csv"), REGISTRATION).unwrap();
        fs::write(dir.path().join("zoom.csv"), ZOOM).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn file(&self, name: &str) -> String {
        self.path().join(name).to_str().unwrap().to_string()
    }

    fn rollcall(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rollcall"));
        cmd.current_dir(self.path());
        cmd.env("ROLLCALL_CONFIG_DIR", self.path().join("config"));
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, extra: &[&str]) -> Output {
        let reg = self.file("registration.csv");
        let zoom = self.file("zoom.csv");
        let mut args = vec!["run", "--registration", reg.as_str(), "--zoom", zoom.as_str()];
        args.extend_from_slice(extra);
        self.rollcall().args(&args).output().expect("rollcall run")
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_writes_annotated_roster_next_to_registration() {
    let ws = Workspace::new();
    let output = ws.run(&["--date", "15-01-2025", "--day", "1"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("Total registrations for selected date: 7"), "{err}");
    assert!(err.contains("Marked Present (Y): 6"), "{err}");
    assert!(err.contains("Below duration threshold (N): 1"), "{err}");
    assert!(err.contains("Not found in Zoom (N): 0"), "{err}");
    assert!(err.contains("unknown@random.com"), "{err}");

    let written = ws.path().join("attendance_output_2025-01-15_Day1.csv");
    let text = fs::read_to_string(&written).unwrap();
    let text = text.trim_start_matches('\u{feff}');
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[1], "Alice Smith,alice@example.com,15-01-2025,Standard,Y,");
    assert_eq!(lines[4], "Diana Prince,diana@example.com,15-01-2025,Advanced,N,");
    assert_eq!(lines[6], "Frank Miller,frank@example.com,16-01-2025,Standard,,");
}

#[test]
fn run_without_output_dir_writes_beside_registration_not_cwd() {
    let ws = Workspace::new();
    let roster_dir = ws.path().join("rosters");
    fs::create_dir(&roster_dir).unwrap();
    fs::write(roster_dir.join("registration.csv"), REGISTRATION).unwrap();
    let reg = ws.file("rosters/registration.csv");
    let zoom = ws.file("zoom.csv");

    let output = ws
        .rollcall()
        .args(["run", "--registration", reg.as_str(), "--zoom", zoom.as_str()])
        .args(["--date", "15-01-2025", "--day", "1", "-q"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(roster_dir.join("attendance_output_2025-01-15_Day1.csv").exists());
    assert!(!ws.path().join("attendance_output_2025-01-15_Day1.csv").exists());
}

#[test]
fn run_json_no_write() {
    let ws = Workspace::new();
    let output = ws.run(&["--date", "2025-01-15", "--day", "2", "--json", "--no-write", "-q"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).is_empty());

    let v = stdout_json(&output);
    assert_eq!(v["meta"]["slot"], "Day2");
    assert_eq!(v["meta"]["date"], "2025-01-15");
    assert_eq!(v["summary"]["present"], 6);
    assert_eq!(v["summary"]["below_threshold"], 1);
    assert_eq!(v["summary"]["zoom_participants"], 8);
    assert_eq!(v["unmatched_emails"], serde_json::json!(["unknown@random.com"]));
    assert!(v.get("output_file").is_none());

    assert!(!ws.path().join("attendance_output_2025-01-15_Day2.csv").exists());
}

#[test]
fn run_program_filter_and_threshold() {
    let ws = Workspace::new();
    let out_dir = ws.file("out");
    let output = ws.run(&[
        "--date", "15-01-2025", "--day", "1", "--program", "Advanced",
        "--threshold", "50", "--output-dir", out_dir.as_str(), "--filtered-only", "--json",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v = stdout_json(&output);
    assert_eq!(v["meta"]["program"], "Advanced");
    assert_eq!(v["summary"]["total_registrations"], 2);
    assert_eq!(v["summary"]["present"], 2);

    let written = Path::new(&out_dir).join("attendance_output_2025-01-15_Day1_Advanced.csv");
    let text = fs::read_to_string(&written).unwrap();
    assert_eq!(text.trim_start_matches('\u{feff}').lines().count(), 3);
}

#[test]
fn run_program_all_label_means_no_filter() {
    let ws = Workspace::new();
    let output = ws.run(&["--date", "15-01-2025", "--day", "1", "--program", "All", "--json", "--no-write"]);
    assert!(output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["summary"]["total_registrations"], 7);
    assert!(v["meta"].get("program").is_none());
}

#[test]
fn run_no_registrations_exits_validation() {
    let ws = Workspace::new();
    let output = ws.run(&["--date", "20-01-2025", "--day", "1"]);
    assert_eq!(output.status.code(), Some(5));
    let err = stderr(&output);
    assert!(err.contains("no registrations found for date 20-01-2025"), "{err}");
    assert!(err.contains("hint:"), "{err}");
}

#[test]
fn run_unknown_program_exits_validation() {
    let ws = Workspace::new();
    let output = ws.run(&["--date", "15-01-2025", "--day", "1", "--program", "advanced"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("and program 'advanced'"));
}

#[test]
fn run_bad_day_is_usage_error() {
    let ws = Workspace::new();
    let output = ws.run(&["--date", "15-01-2025", "--day", "3"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn run_bad_date_is_usage_error() {
    let ws = Workspace::new();
    let output = ws.run(&["--date", "next tuesday", "--day", "1"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("cannot parse date"));
}

#[test]
fn run_negative_threshold_is_usage_error() {
    let ws = Workspace::new();
    let output = ws.run(&["--date", "15-01-2025", "--day", "1", "--threshold=-5", "--no-write"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn run_missing_file_exits_io() {
    let ws = Workspace::new();
    let output = ws
        .rollcall()
        .args(["run", "-r", "nope.csv", "-z", "zoom.csv", "--date", "15-01-2025", "--day", "1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("nope.csv"));
}

#[test]
fn run_zoom_without_duration_column_exits_config() {
    let ws = Workspace::new();
    fs::write(ws.path().join("zoom.csv"), "Name,Email\nAlice,alice@example.com\n").unwrap();
    let output = ws.run(&["--date", "15-01-2025", "--day", "1"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("Duration"));
}

#[test]
fn run_program_without_program_column_warns_and_continues() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("registration.csv"),
        "Email,Training date\nalice@example.com,15-01-2025\n",
    )
    .unwrap();
    let output = ws.run(&["--date", "15-01-2025", "--day", "1", "--program", "Advanced", "--no-write"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("program filter ignored"), "{err}");
    assert!(err.contains("Marked Present (Y): 1"), "{err}");
}

#[test]
fn run_empty_attendance_marks_everyone_absent() {
    let ws = Workspace::new();
    fs::write(ws.path().join("zoom.csv"), "Name,Email,Duration\n").unwrap();
    let output = ws.run(&["--date", "15-01-2025", "--day", "1", "--json", "--no-write"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v = stdout_json(&output);
    assert_eq!(v["summary"]["not_in_zoom"], 7);
    assert_eq!(v["warnings"], serde_json::json!(["empty_attendance"]));
}

// ---------------------------------------------------------------------------
// job
// ---------------------------------------------------------------------------

#[test]
fn job_resolves_paths_relative_to_job_file() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("day2.toml"),
        r#"
date = "15 Jan 2025"
day = 2
program = "Standard"

[registration]
file = "registration.csv"

[zoom]
file = "zoom.csv"

[zoom.columns]
email = "User Email"
duration = "Total Duration (Minutes)"

[output]
dir = "results"
"#,
    )
    .unwrap();

    // Run from elsewhere so relative paths must come from the job file.
    let output = ws
        .rollcall()
        .current_dir(std::env::temp_dir())
        .args(["job", ws.file("day2.toml").as_str(), "--json"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v = stdout_json(&output);
    assert_eq!(v["summary"]["total_registrations"], 5);
    assert_eq!(v["summary"]["present"], 5);

    let written = ws.path().join("results/attendance_output_2025-01-15_Day2_Standard.csv");
    assert!(written.exists(), "missing {}", written.display());
}

#[test]
fn job_with_invalid_day_exits_config() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("bad.toml"),
        "date = \"15-01-2025\"\nday = 3\n[registration]\nfile = \"registration.csv\"\n[zoom]\nfile = \"zoom.csv\"\n",
    )
    .unwrap();
    let output = ws.rollcall().args(["job", "bad.toml"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("day must be 1 or 2"));
}

#[test]
fn job_with_unknown_column_exits_config() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("cols.toml"),
        r#"
date = "15-01-2025"
day = 1

[registration]
file = "registration.csv"

[registration.columns]
email = "E-mail"
training_date = "Training date"

[zoom]
file = "zoom.csv"
"#,
    )
    .unwrap();
    let output = ws.rollcall().args(["job", "cols.toml", "--no-write"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("'E-mail'"));
}

// ---------------------------------------------------------------------------
// inspect + config
// ---------------------------------------------------------------------------

#[test]
fn inspect_registration_lists_dates_and_programs() {
    let ws = Workspace::new();
    let output = ws.rollcall().args(["inspect", "registration.csv", "--json"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let v = stdout_json(&output);
    assert_eq!(v["kind"], "registration");
    assert_eq!(v["rows"], 9);
    assert_eq!(v["columns"]["email"], "Email");
    assert_eq!(v["columns"]["program"], "Version");
    assert_eq!(v["training_dates"], serde_json::json!(["15-01-2025", "16-01-2025"]));
    assert_eq!(v["programs"], serde_json::json!(["Advanced", "Standard"]));
}

#[test]
fn inspect_zoom_counts_participants() {
    let ws = Workspace::new();
    let output = ws.rollcall().args(["inspect", "zoom.csv", "--zoom", "--json"]).output().unwrap();
    assert!(output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["columns"]["duration"], "Total Duration (Minutes)");
    assert_eq!(v["participants"], 8);
}

#[test]
fn config_path_honors_override() {
    let ws = Workspace::new();
    let output = ws.rollcall().args(["config", "path"]).output().unwrap();
    assert!(output.status.success());
    let printed = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert_eq!(Path::new(&printed), ws.path().join("config").join("settings.json"));
}

#[test]
fn config_threshold_applies_to_runs() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.path().join("config")).unwrap();
    fs::write(
        ws.path().join("config/settings.json"),
        "{\n  // lenient\n  \"recon.thresholdMinutes\": 50\n}\n",
    )
    .unwrap();

    let shown = ws.rollcall().args(["config", "show"]).output().unwrap();
    assert_eq!(stdout_json(&shown)["recon.thresholdMinutes"], 50.0);

    let output = ws.run(&["--date", "15-01-2025", "--day", "1", "--json", "--no-write"]);
    let v = stdout_json(&output);
    assert_eq!(v["meta"]["threshold_minutes"], 50.0);
    assert_eq!(v["summary"]["present"], 7);
}
