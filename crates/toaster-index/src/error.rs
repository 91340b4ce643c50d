use std::fmt;

/// Result type for toaster-index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the dashboard store
#[derive(Debug)]
pub enum Error {
    /// Database operation failed
    Database(rusqlite::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Dataset could not be parsed
    Json(serde_json::Error),

    /// Input the store cannot accept (e.g. a dataset with two default projects)
    Query(String),

    /// Store written with another schema version, opened without migrating
    SchemaVersion { found: i32, expected: i32 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Database(err) => {
                let msg = err.to_string();
                // Stale store: tell the user how to rebuild it
                if msg.contains("no such column") || msg.contains("no such table") {
                    write!(
                        f,
                        "Database schema mismatch: {}. Re-import the dataset to rebuild the database.",
                        msg
                    )
                } else {
                    write!(f, "Database error: {}", err)
                }
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Json(err) => write!(f, "Dataset error: {}", err),
            Error::Query(msg) => write!(f, "Query error: {}", msg),
            Error::SchemaVersion { found, expected } => write!(
                f,
                "Database schema mismatch: found version {}, expected {}. \
                 Re-import the dataset to rebuild the database.",
                found, expected
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Query(_) | Error::SchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
