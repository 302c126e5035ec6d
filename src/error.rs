use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReckonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("Missing column in header: {0}")]
    MissingColumn(String),

    #[error("Unknown format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ReckonError>;

/// A problem with a single input row. The row is left out of the working set
/// and the run carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    #[error("structural mismatch at line {line}: expected {expected} fields, found {found}: {raw:?}")]
    Structural {
        line: u64,
        expected: usize,
        found: usize,
        raw: Vec<String>,
    },

    #[error("{field} missing at line {line}: {raw:?}")]
    MissingField {
        line: u64,
        field: &'static str,
        raw: Vec<String>,
    },

    #[error("invalid amount at line {line}: {amount:?}")]
    InvalidAmount { line: u64, amount: String },

    #[error("amount at line {line} overflows the running total: {amount:?}")]
    AmountOverflow { line: u64, amount: String },
}

impl RowIssue {
    pub fn line(&self) -> u64 {
        match self {
            Self::Structural { line, .. }
            | Self::MissingField { line, .. }
            | Self::InvalidAmount { line, .. }
            | Self::AmountOverflow { line, .. } => *line,
        }
    }
}
