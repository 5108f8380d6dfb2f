use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("column {column} has length {got}, expected {expected}")]
    ColumnLengthMismatch {
        column:   &'static str,
        expected: usize,
        got:      usize,
    },

    #[error("trajectory parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CleanResult<T> = Result<T, CleanError>;
