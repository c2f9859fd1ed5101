use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// File could not be opened or read.
    Read { path: String, message: String },
    /// Malformed CSV content.
    Csv(String),
    /// Required fields could not be mapped to any header.
    MissingColumns { table: String, fields: Vec<String> },
    /// An explicit column mapping names a header that does not exist.
    UnknownColumn { table: String, column: String },
    /// Output file could not be written.
    Write { path: String, message: String },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::MissingColumns { table, fields } => {
                write!(f, "{table}: missing required columns: {}", fields.join(", "))
            }
            Self::UnknownColumn { table, column } => {
                write!(f, "{table}: column '{column}' not found in headers")
            }
            Self::Write { path, message } => write!(f, "cannot write {path}: {message}"),
        }
    }
}

impl std::error::Error for IoError {}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}
