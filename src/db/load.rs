//! Loading of transcript databases with fallback to older formats.

use std::path::Path;

use crate::db::{legacy::LegacyStore, store::ProtobufStore, DatabaseFormat};
use crate::error::{BoxError, Error, Result};
use crate::model::TranscriptAnnotationDatabase;

/// Tries a list of formats in order and returns the result of the first that succeeds.
pub struct DatabaseLoader {
    formats: Vec<Box<dyn DatabaseFormat>>,
}

impl Default for DatabaseLoader {
    /// The current protobuf format, then the legacy format.
    fn default() -> Self {
        Self::new(vec![
            Box::new(ProtobufStore::default()),
            Box::new(LegacyStore),
        ])
    }
}

impl DatabaseLoader {
    pub fn new(formats: Vec<Box<dyn DatabaseFormat>>) -> Self {
        Self { formats }
    }

    /// Names of the formats in the order they are tried.
    pub fn format_names(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    /// Load the database at `path`.
    ///
    /// If all formats fail, the error of the last one is wrapped into `Error::DataSource`.
    pub fn load(&self, path: &Path) -> Result<TranscriptAnnotationDatabase> {
        let mut last_error: Option<Error> = None;
        for format in &self.formats {
            match format.load(path) {
                Ok(db) => {
                    tracing::debug!("loaded {:?} as {} format", path, format.name());
                    return Ok(db);
                }
                Err(e) => {
                    tracing::warn!(
                        "could not load {:?} as {} format: {}",
                        path,
                        format.name(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }
        let source: BoxError = match last_error {
            Some(e) => e.into(),
            None => "no database formats configured".into(),
        };
        Err(Error::DataSource {
            what: format!("transcript database {}", path.display()),
            source,
        })
    }
}

/// Load the transcript database at `path` with the default fallback chain.
pub fn load_tx_db(path: impl AsRef<Path>) -> Result<TranscriptAnnotationDatabase> {
    DatabaseLoader::default().load(path.as_ref())
}
