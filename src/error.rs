//! Error types for loading and parsing sales data.

/// Failures retrieving the raw CSV document.
///
/// `Clone` because fetch results are memoized and handed out repeatedly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("invalid source url '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{status} from {url}")]
    Status { url: String, status: u16 },

    #[error("could not read {path}: {message}")]
    Io { path: String, message: String },
}

/// Problems with the contents of an otherwise retrieved CSV document.
///
/// Line numbers are 1-based CSV record lines (the header is line 1).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    #[error("line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("line {line}: quantity {value} for crew {crew_id} is not a non-negative number")]
    InvalidQuantity {
        line: u64,
        crew_id: String,
        value: f64,
    },

    #[error("csv error: {0}")]
    Csv(String),
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => {
                let line = pos.line();
                let message = match err.kind() {
                    csv::ErrorKind::Deserialize { err: inner, .. } => inner.to_string(),
                    _ => err.to_string(),
                };
                DataError::Malformed { line, message }
            }
            None => DataError::Csv(err.to_string()),
        }
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
