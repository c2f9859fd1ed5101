//! `rollcall-recon`: attendance reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded roster and attendance rows, returns
//! an annotated roster with per-category counts. No CLI or file IO.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod fields;
pub mod model;

pub use config::JobConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{
    AttendanceRow, DaySlot, Mark, ProgramFilter, ReconInput, ReconParams, ReconResult, RosterRow,
};
