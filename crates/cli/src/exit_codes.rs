//! CLI Exit Code Registry
//!
//! Single source of truth for every exit code `rollcall` returns. Scripts
//! rely on these.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad arguments)                          |
//! | 3    | File could not be read, parsed as CSV, or written    |
//! | 4    | Invalid job config, or required columns not found    |
//! | 5    | Nothing to reconcile (empty roster, no registrations)|

use rollcall_io::IoError;
use rollcall_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input could not be read or parsed, or output could not be written.
pub const EXIT_IO: u8 = 3;

/// Job config rejected, or a table lacks the columns a run needs.
pub const EXIT_CONFIG: u8 = 4;

/// The run had nothing to reconcile.
pub const EXIT_VALIDATION: u8 = 5;

pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Read { .. } | IoError::Csv(_) | IoError::Write { .. } => EXIT_IO,
        IoError::MissingColumns { .. } | IoError::UnknownColumn { .. } => EXIT_CONFIG,
    }
}

pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::EmptyRoster | ReconError::NoRegistrations { .. } => EXIT_VALIDATION,
        ReconError::InvalidThreshold(_) => EXIT_USAGE,
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    #[test]
    fn io_errors_map_by_kind() {
        let read = IoError::Read { path: "a.csv".into(), message: "gone".into() };
        assert_eq!(io_exit_code(&read), EXIT_IO);
        let missing = IoError::MissingColumns { table: "zoom".into(), fields: vec!["Email".into()] };
        assert_eq!(io_exit_code(&missing), EXIT_CONFIG);
    }

    #[test]
    fn recon_errors_map_by_kind() {
        let none = ReconError::NoRegistrations {
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            program: None,
        };
        assert_eq!(recon_exit_code(&none), EXIT_VALIDATION);
        assert_eq!(recon_exit_code(&ReconError::InvalidThreshold(-1.0)), EXIT_USAGE);
        assert_eq!(recon_exit_code(&ReconError::ConfigParse("x".into())), EXIT_CONFIG);
    }

    #[test]
    fn codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_IO, EXIT_CONFIG, EXIT_VALIDATION];
        let distinct: HashSet<u8> = codes.iter().copied().collect();
        assert_eq!(distinct.len(), codes.len());
    }
}
