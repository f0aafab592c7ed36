//! Alignment between genomic and transcript coordinates.

use crate::error::{Error, Result};

/// One anchor of an alignment: position in the gapped alignment and in the sequence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Anchor {
    pub gap_pos: i32,
    pub seq_pos: i32,
}

impl Anchor {
    pub fn new(gap_pos: i32, seq_pos: i32) -> Self {
        Self { gap_pos, seq_pos }
    }
}

/// Anchors for the reference (genomic) and query (transcript) side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Alignment {
    ref_anchors: Vec<Anchor>,
    qry_anchors: Vec<Anchor>,
}

impl Alignment {
    /// Construct a new alignment from both anchor lists.
    ///
    /// Each side needs at least two anchors and both positions must not decrease.
    pub fn new(ref_anchors: Vec<Anchor>, qry_anchors: Vec<Anchor>) -> Result<Self> {
        for (side, anchors) in [("reference", &ref_anchors), ("query", &qry_anchors)] {
            if anchors.len() < 2 {
                return Err(Error::InvalidModel(format!(
                    "{} side of alignment needs at least two anchors, got {}",
                    side,
                    anchors.len()
                )));
            }
            if anchors
                .windows(2)
                .any(|w| w[1].gap_pos < w[0].gap_pos || w[1].seq_pos < w[0].seq_pos)
            {
                return Err(Error::InvalidModel(format!(
                    "{} side of alignment has decreasing anchors",
                    side
                )));
            }
        }
        Ok(Self {
            ref_anchors,
            qry_anchors,
        })
    }

    /// Ungapped alignment of length `len`, i.e., `(0,0)-(len,len)` on both sides.
    pub fn ungapped(len: i32) -> Self {
        let anchors = vec![Anchor::new(0, 0), Anchor::new(len, len)];
        Self {
            ref_anchors: anchors.clone(),
            qry_anchors: anchors,
        }
    }

    pub fn ref_anchors(&self) -> &[Anchor] {
        &self.ref_anchors
    }

    pub fn qry_anchors(&self) -> &[Anchor] {
        &self.qry_anchors
    }

    /// Length of the aligned reference sequence.
    pub fn ref_length(&self) -> i32 {
        Self::seq_length(&self.ref_anchors)
    }

    /// Length of the aligned query sequence.
    pub fn qry_length(&self) -> i32 {
        Self::seq_length(&self.qry_anchors)
    }

    fn seq_length(anchors: &[Anchor]) -> i32 {
        match (anchors.first(), anchors.last()) {
            (Some(first), Some(last)) => last.seq_pos - first.seq_pos,
            _ => 0,
        }
    }
}
