//! Genomic intervals.

use crate::error::{Error, Result};

use super::reference::ReferenceDictionary;

/// Enumeration for the two strands of the genome.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

/// Half-open interval `[begin, end)` on one contig of a `ReferenceDictionary`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct GenomeInterval {
    contig: i32,
    strand: Strand,
    begin: i32,
    end: i32,
}

impl GenomeInterval {
    /// Construct a new interval, checking it against `reference`.
    pub fn new(
        reference: &ReferenceDictionary,
        contig: i32,
        strand: Strand,
        begin: i32,
        end: i32,
    ) -> Result<Self> {
        let interval = Self {
            contig,
            strand,
            begin,
            end,
        };
        interval.check(reference)?;
        Ok(interval)
    }

    /// Check that the contig is known and the coordinates are sane.
    pub fn check(&self, reference: &ReferenceDictionary) -> Result<()> {
        if !reference.contains_id(self.contig) {
            return Err(Error::InvalidModel(format!(
                "interval {}:{}-{} refers to unknown contig id",
                self.contig, self.begin, self.end
            )));
        }
        if self.begin < 0 || self.begin > self.end {
            return Err(Error::InvalidModel(format!(
                "interval {}:{}-{} has invalid coordinates",
                self.contig, self.begin, self.end
            )));
        }
        Ok(())
    }

    pub fn contig(&self) -> i32 {
        self.contig
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn begin(&self) -> i32 {
        self.begin
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of bases covered by the interval.
    pub fn len(&self) -> i32 {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Whether the two intervals share at least one base.
    pub fn overlaps(&self, other: &GenomeInterval) -> bool {
        self.contig == other.contig && self.begin < other.end && other.begin < self.end
    }
}
