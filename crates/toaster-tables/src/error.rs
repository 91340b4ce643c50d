use std::fmt;

/// Result type for table operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while resolving or rendering a table
#[derive(Debug)]
pub enum Error {
    /// Store access failed
    Index(toaster_index::Error),

    /// A referenced entity does not exist
    NotFound { entity: &'static str, id: i64 },

    /// The table needs an identifier the request did not carry
    MissingParameter(&'static str),

    /// No table is registered under this name
    UnknownTable(String),

    UnknownFilter(String),

    UnknownFilterAction { filter: String, action: String },

    /// A filter value could not be parsed (e.g. a malformed date range)
    InvalidFilterValue { action: String, value: String },

    /// The requested sort key is not an orderable column
    InvalidOrder(String),
}

impl Error {
    /// Lookup failures: a missing table or entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::UnknownTable(_))
    }

    /// Errors caused by the request rather than the store.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Error::MissingParameter(_)
                | Error::UnknownFilter(_)
                | Error::UnknownFilterAction { .. }
                | Error::InvalidFilterValue { .. }
                | Error::InvalidOrder(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Index(err) => write!(f, "{}", err),
            Error::NotFound { entity, id } => write!(f, "No {} with id {}", entity, id),
            Error::MissingParameter(name) => write!(f, "Missing required parameter: {}", name),
            Error::UnknownTable(name) => write!(f, "Unknown table: {}", name),
            Error::UnknownFilter(name) => write!(f, "Unknown filter: {}", name),
            Error::UnknownFilterAction { filter, action } => {
                write!(f, "Unknown action '{}' for filter '{}'", action, filter)
            }
            Error::InvalidFilterValue { action, value } => {
                write!(f, "Invalid value '{}' for filter action '{}'", value, action)
            }
            Error::InvalidOrder(key) => write!(f, "Cannot order by '{}'", key),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Index(err) => Some(err),
            _ => None,
        }
    }
}

impl From<toaster_index::Error> for Error {
    fn from(err: toaster_index::Error) -> Self {
        Error::Index(err)
    }
}
