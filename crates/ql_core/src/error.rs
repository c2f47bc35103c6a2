use std::path::PathBuf;

/// An I/O error together with the path it happened on.
#[derive(Debug, thiserror::Error)]
#[error("at path {path:?}: {error}")]
pub struct IoError {
    pub error: std::io::Error,
    pub path: PathBuf,
}

pub trait IntoIoError<T> {
    /// Attaches `path` to the I/O error, if any.
    ///
    /// # Errors
    /// Returns the original error wrapped in [`IoError`].
    fn path(self, path: impl Into<PathBuf>) -> Result<T, IoError>;
}

impl<T> IntoIoError<T> for std::io::Result<T> {
    fn path(self, path: impl Into<PathBuf>) -> Result<T, IoError> {
        self.map_err(|error| IoError {
            error,
            path: path.into(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    // The raw text is kept out of `Display`: it may hold credentials.
    #[error("could not parse JSON ({} bytes): {error}", .json.len())]
    From {
        error: serde_json::Error,
        json: String,
    },
    #[error("could not serialize JSON: {0}")]
    To(serde_json::Error),
}

pub trait IntoJsonError<T> {
    /// Marks a deserialization failure of `text`.
    ///
    /// # Errors
    /// Returns [`JsonError::From`] on failure.
    fn json(self, text: String) -> Result<T, JsonError>;

    /// Marks a serialization failure.
    ///
    /// # Errors
    /// Returns [`JsonError::To`] on failure.
    fn json_to(self) -> Result<T, JsonError>;
}

impl<T> IntoJsonError<T> for Result<T, serde_json::Error> {
    fn json(self, text: String) -> Result<T, JsonError> {
        self.map_err(|error| JsonError::From { error, json: text })
    }

    fn json_to(self) -> Result<T, JsonError> {
        self.map_err(JsonError::To)
    }
}

/// Failure while reading or writing a JSON file.
#[derive(Debug, thiserror::Error)]
pub enum JsonFileError {
    #[error("file error {0}")]
    Io(#[from] IoError),
    #[error("{0}")]
    Json(#[from] JsonError),
}
