use std::fmt;

/// Result type for toaster-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// A stored code does not map to a known enum variant
    UnknownCode { kind: &'static str, code: i64 },

    /// A timestamp string could not be parsed
    Timestamp(chrono::ParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownCode { kind, code } => write!(f, "Unknown {} code: {}", kind, code),
            Error::Timestamp(err) => write!(f, "Invalid timestamp: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnknownCode { .. } => None,
            Error::Timestamp(err) => Some(err),
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Self {
        Error::Timestamp(err)
    }
}
