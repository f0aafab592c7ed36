//! The legacy on-disk format: gzip-compressed JSON of the whole in-memory database.
//!
//! Kept so that databases built by older releases can still be loaded.  The format has no
//! magic bytes and carries the transcripts as they came from the provider, i.e., without
//! de-duplication or repairs.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use flate2::{bufread::MultiGzDecoder, write::GzEncoder, Compression};
use thousands::Separable;

use crate::db::DatabaseFormat;
use crate::error::{Error, Result};
use crate::model::TranscriptAnnotationDatabase;

/// Reads and writes the legacy format.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyStore;

impl LegacyStore {
    /// Write `db` to `path`.
    pub fn save(&self, path: &Path, db: &TranscriptAnnotationDatabase) -> Result<()> {
        tracing::info!("Writing legacy transcript database to {:?} ...", path);
        let start = Instant::now();
        write_json_gz(path, db).map_err(|e| Error::Serialization {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        tracing::info!(
            "... wrote {} transcripts in {:?}",
            db.len().separate_with_commas(),
            start.elapsed()
        );
        Ok(())
    }

    /// Read a database from `path`.
    pub fn load(&self, path: &Path) -> Result<TranscriptAnnotationDatabase> {
        tracing::info!("Reading legacy transcript database from {:?} ...", path);
        let start = Instant::now();
        let reader = File::open(path)
            .map(BufReader::new)
            .map_err(|e| Error::Deserialization {
                path: path.to_path_buf(),
                source: e.into(),
            })?;
        let db: TranscriptAnnotationDatabase =
            serde_json::from_reader(BufReader::new(MultiGzDecoder::new(reader))).map_err(
                |e| Error::Deserialization {
                    path: path.to_path_buf(),
                    source: e.into(),
                },
            )?;
        tracing::info!(
            "... read {} transcripts in {:?}",
            db.len().separate_with_commas(),
            start.elapsed()
        );
        Ok(db)
    }
}

fn write_json_gz(path: &Path, db: &TranscriptAnnotationDatabase) -> std::io::Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = GzEncoder::new(writer, Compression::default());
    serde_json::to_writer(&mut encoder, db)?;
    let mut writer = encoder.finish()?;
    writer.flush()
}

impl DatabaseFormat for LegacyStore {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn load(&self, path: &Path) -> Result<TranscriptAnnotationDatabase> {
        LegacyStore::load(self, path)
    }

    fn save(&self, path: &Path, db: &TranscriptAnnotationDatabase) -> Result<()> {
        LegacyStore::save(self, path, db)
    }
}
