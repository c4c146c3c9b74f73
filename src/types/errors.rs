use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Missing mandatory file: {0}")]
    MissingMandatoryFile(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Inspection cancelled")]
    Cancelled,
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InspectResult<T> = Result<T, InspectError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
