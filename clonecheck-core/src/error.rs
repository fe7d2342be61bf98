use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("invalid character '{ch}' at position {pos}")]
    InvalidChar { ch: char, pos: usize },

    #[error("ambiguous nucleotide 'N' at position {pos} is not supported here")]
    AmbiguousBase { pos: usize },

    #[error("empty {what} sequence")]
    EmptySequence { what: &'static str },

    #[error("invalid frame: {frame} (must be 0, 1, or 2)")]
    InvalidFrame { frame: usize },

    #[error("invalid feature location {start}..{end} for a sequence of length {len}")]
    InvalidLocation { start: usize, end: usize, len: usize },

    #[error("invalid parameter: {msg}")]
    InvalidParameter { msg: String },

    #[error("invalid trace file: {msg}")]
    InvalidFormat { msg: String },

    #[error("trace file has no primary base calls (PBAS1)")]
    MissingBaseCalls,
}

impl CheckError {
    /// Malformed input detected before any search or alignment ran.
    pub fn is_validation(&self) -> bool {
        !self.is_format()
    }

    /// Structurally unreadable trace data.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            CheckError::InvalidFormat { .. } | CheckError::MissingBaseCalls
        )
    }
}

pub type CheckResult<T> = Result<T, CheckError>;
