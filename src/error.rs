//! Error types of the transcript database library.

use std::path::PathBuf;

/// Boxed error used for carrying nested causes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, writing, or loading transcript databases.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The file does not start with the expected magic bytes (includes short reads).
    #[error("invalid file format for {path:?}: magic bytes do not match")]
    InvalidFormat { path: PathBuf },

    /// The magic bytes matched but the payload could not be decompressed or decoded.
    #[error("could not deserialize transcript database from {path:?}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// The database could not be written.
    #[error("could not serialize transcript database to {path:?}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// A provider could not be resolved or failed, or no loader could read a file.
    #[error("data source error for {what}")]
    DataSource {
        what: String,
        #[source]
        source: BoxError,
    },

    /// The given transcript source name is not known.
    #[error("invalid transcript source {value:?}, valid values are: {valid}")]
    InvalidTranscriptSource { value: String, valid: String },

    /// A required input was missing.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// An in-memory record failed validation.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// The same transcript accession was seen with different contents.
    #[error("data integrity error: {0}")]
    DataIntegrity(String),
}

impl Error {
    /// Construct a `DataSource` error from anything that can be boxed.
    pub fn data_source(what: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::DataSource {
            what: what.into(),
            source: source.into(),
        }
    }
}
