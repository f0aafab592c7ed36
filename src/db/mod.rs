//! Database construction, persistence, and loading.

use std::path::Path;

use crate::error::Result;
use crate::model::TranscriptAnnotationDatabase;

pub mod convert;
pub mod create;
pub mod dump;
pub mod legacy;
pub mod load;
pub mod repair;
pub mod source;
pub mod store;

/// One on-disk representation of a `TranscriptAnnotationDatabase`.
pub trait DatabaseFormat: Send + Sync {
    /// Short name of the format for log messages.
    fn name(&self) -> &'static str;

    /// Read a database from `path`.
    fn load(&self, path: &Path) -> Result<TranscriptAnnotationDatabase>;

    /// Write `db` to `path`.
    fn save(&self, path: &Path, db: &TranscriptAnnotationDatabase) -> Result<()>;
}
