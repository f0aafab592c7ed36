//! In-memory data structures of the transcript annotation database.

pub mod alignment;
pub mod database;
pub mod interval;
pub mod reference;
pub mod transcript;

pub use alignment::{Alignment, Anchor};
pub use database::TranscriptAnnotationDatabase;
pub use interval::{GenomeInterval, Strand};
pub use reference::{ReferenceDictionary, ReferenceDictionaryBuilder};
pub use transcript::{TranscriptModel, TranscriptModelBuilder, ENTREZ_ID};
