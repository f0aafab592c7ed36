//! The current on-disk format: magic bytes followed by gzip-compressed protobuf.
//!
//! ```text
//! +------+---------------------------------------------+
//! | JTPB | gzip(pbs::txs::TranscriptDatabase encoded)  |
//! +------+---------------------------------------------+
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;

use flate2::{bufread::GzDecoder, write::GzEncoder, Compression};
use prost::Message as _;
use thousands::Separable;

use crate::db::convert::ModelConverter;
use crate::db::DatabaseFormat;
use crate::error::{Error, Result};
use crate::model::TranscriptAnnotationDatabase;
use crate::pbs;

/// Magic bytes at the start of each file.
pub const MAGIC: &[u8; 4] = b"JTPB";

/// Reads and writes the current protobuf-based format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufStore {
    converter: ModelConverter,
}

impl ProtobufStore {
    pub fn new(converter: ModelConverter) -> Self {
        Self { converter }
    }

    /// Write `db` to `path`.
    pub fn save(&self, path: &Path, db: &TranscriptAnnotationDatabase) -> Result<()> {
        tracing::info!("Writing transcript database to {:?} ...", path);
        let start = Instant::now();
        let wire = self.converter.to_wire(db)?;
        let buf = wire.encode_to_vec();
        write_framed(path, &buf).map_err(|e| Error::Serialization {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        tracing::info!(
            "... wrote {} transcripts ({} bytes uncompressed) in {:?}",
            wire.transcript_models.len().separate_with_commas(),
            buf.len().separate_with_commas(),
            start.elapsed()
        );
        Ok(())
    }

    /// Read a database from `path`.
    ///
    /// Fails with `Error::InvalidFormat` without decompressing anything if the file does not
    /// start with `MAGIC`.
    pub fn load(&self, path: &Path) -> Result<TranscriptAnnotationDatabase> {
        tracing::info!("Reading transcript database from {:?} ...", path);
        let start = Instant::now();
        let deserialization = |source: crate::error::BoxError| Error::Deserialization {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = File::open(path)
            .map(BufReader::new)
            .map_err(|e| deserialization(e.into()))?;
        let mut magic = [0u8; 4];
        match reader.read_exact(&mut magic) {
            Ok(()) if &magic == MAGIC => (),
            Ok(()) => {
                return Err(Error::InvalidFormat {
                    path: path.to_path_buf(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(Error::InvalidFormat {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(deserialization(e.into())),
        }

        let mut buf = Vec::new();
        GzDecoder::new(reader)
            .read_to_end(&mut buf)
            .map_err(|e| deserialization(e.into()))?;
        let wire = pbs::txs::TranscriptDatabase::decode(buf.as_slice())
            .map_err(|e| deserialization(e.into()))?;
        let db = self
            .converter
            .from_wire(wire)
            .map_err(|e| deserialization(e.into()))?;

        tracing::info!(
            "... read {} transcripts in {:?}",
            db.len().separate_with_commas(),
            start.elapsed()
        );
        Ok(db)
    }
}

/// Write magic bytes, then the gzip-compressed payload.
///
/// The data goes to a temporary file next to `path` that is only moved into place once
/// complete, so a failed write leaves no partial file behind.
fn write_framed(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut writer = BufWriter::new(tempfile::NamedTempFile::new_in(dir)?);
    writer.write_all(MAGIC)?;
    writer.flush()?;
    let mut encoder = GzEncoder::new(writer, Compression::default());
    encoder.write_all(payload)?;
    // The gzip trailer must be written before the file is closed.
    let mut writer = encoder.finish()?;
    writer.flush()?;
    let tmp_file = writer.into_inner().map_err(|e| e.into_error())?;
    tmp_file.as_file().sync_all()?;
    tmp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl DatabaseFormat for ProtobufStore {
    fn name(&self) -> &'static str {
        "protobuf"
    }

    fn load(&self, path: &Path) -> Result<TranscriptAnnotationDatabase> {
        ProtobufStore::load(self, path)
    }

    fn save(&self, path: &Path, db: &TranscriptAnnotationDatabase) -> Result<()> {
        ProtobufStore::save(self, path, db)
    }
}
