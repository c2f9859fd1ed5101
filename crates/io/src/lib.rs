// File I/O: roster and meeting-export tables in, annotated roster out

pub mod columns;
pub mod csv;
pub mod discover;
pub mod error;
pub mod output;
pub mod rows;

pub use error::IoError;

/// Label for each input table, used in error messages.
pub const REGISTRATION: &str = "registration";
pub const ZOOM: &str = "zoom";
