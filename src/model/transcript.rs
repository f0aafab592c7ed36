//! Transcript models.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

use super::{alignment::Alignment, interval::GenomeInterval, reference::ReferenceDictionary};

/// Key of the Entrez gene identifier in `TranscriptModel::alt_gene_ids`.
pub const ENTREZ_ID: &str = "ENTREZ_ID";

/// Structural description of one transcript.
///
/// Construct with `TranscriptModelBuilder`; consistency with a `ReferenceDictionary` is checked
/// by `TranscriptModel::check` when the model becomes part of a database.
#[derive(
    Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, derive_builder::Builder,
)]
#[builder(pattern = "owned", setter(into))]
pub struct TranscriptModel {
    /// Transcript accession with version, e.g., `"ENST00000358487.5"`.
    accession: String,
    /// Gene symbol, e.g., `"FGFR2"`.
    gene_symbol: String,
    /// Gene identifier, e.g., `"2263"`.
    #[builder(default)]
    #[serde(default)]
    gene_id: Option<String>,
    /// Region covered by the transcript.
    tx_region: GenomeInterval,
    /// Coding region, empty for non-coding transcripts.
    cds_region: GenomeInterval,
    /// Exons, sorted by position and non-overlapping.
    exon_regions: Vec<GenomeInterval>,
    /// Transcript sequence.
    #[builder(default)]
    #[serde(default)]
    sequence: String,
    /// Transcript support level tier.
    #[builder(default)]
    #[serde(default)]
    transcript_support_level: i32,
    #[builder(default)]
    #[serde(default)]
    has_substitutions: bool,
    #[builder(default)]
    #[serde(default)]
    has_indels: bool,
    /// Gene identifiers in other namespaces, e.g., `"ENTREZ_ID"` or `"HGNC_ID"`.
    #[builder(default)]
    #[serde(default)]
    alt_gene_ids: BTreeMap<String, String>,
    /// Alignment of transcript to genome.
    alignment: Alignment,
}

impl TranscriptModelBuilder {
    /// Build, mapping the builder error into the crate error.
    pub fn try_build(self) -> Result<TranscriptModel> {
        self.build().map_err(|e| Error::InvalidModel(e.to_string()))
    }
}

impl TranscriptModel {
    pub fn accession(&self) -> &str {
        &self.accession
    }

    pub fn gene_symbol(&self) -> &str {
        &self.gene_symbol
    }

    pub fn gene_id(&self) -> Option<&str> {
        self.gene_id.as_deref()
    }

    pub fn tx_region(&self) -> &GenomeInterval {
        &self.tx_region
    }

    pub fn cds_region(&self) -> &GenomeInterval {
        &self.cds_region
    }

    pub fn exon_regions(&self) -> &[GenomeInterval] {
        &self.exon_regions
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn transcript_support_level(&self) -> i32 {
        self.transcript_support_level
    }

    pub fn has_substitutions(&self) -> bool {
        self.has_substitutions
    }

    pub fn has_indels(&self) -> bool {
        self.has_indels
    }

    pub fn alt_gene_ids(&self) -> &BTreeMap<String, String> {
        &self.alt_gene_ids
    }

    pub fn alignment(&self) -> &Alignment {
        &self.alignment
    }

    pub fn is_coding(&self) -> bool {
        !self.cds_region.is_empty()
    }

    /// Transcript length as the sum of the exon lengths.
    pub fn transcript_length(&self) -> i32 {
        exon_length_sum(&self.exon_regions)
    }

    /// Check the model against `reference` and its internal invariants.
    pub fn check(&self, reference: &ReferenceDictionary) -> Result<()> {
        let fail = |msg: String| Err(Error::InvalidModel(format!("{}: {}", self.accession, msg)));

        if self.accession.is_empty() {
            return Err(Error::InvalidModel(String::from("empty transcript accession")));
        }
        self.tx_region.check(reference)?;
        self.cds_region.check(reference)?;
        if self.exon_regions.is_empty() {
            return fail(String::from("transcript has no exons"));
        }
        for exon in &self.exon_regions {
            exon.check(reference)?;
            if exon.contig() != self.tx_region.contig()
                || exon.begin() < self.tx_region.begin()
                || exon.end() > self.tx_region.end()
            {
                return fail(format!("exon {:?} outside of transcript region", exon));
            }
        }
        if let Some(w) = self
            .exon_regions
            .windows(2)
            .find(|w| w[1].begin() < w[0].end())
        {
            return fail(format!("exons {:?} and {:?} overlap or are unsorted", w[0], w[1]));
        }
        if self.transcript_length() != self.alignment.ref_length() {
            return fail(format!(
                "exon length sum {} does not match alignment length {}",
                self.transcript_length(),
                self.alignment.ref_length()
            ));
        }
        Ok(())
    }
}

/// Sum of the lengths of the given exons.
pub fn exon_length_sum(exons: &[GenomeInterval]) -> i32 {
    exons.iter().map(GenomeInterval::len).sum()
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use crate::model::{
        Alignment, GenomeInterval, ReferenceDictionary, ReferenceDictionaryBuilder, Strand,
        TranscriptModelBuilder,
    };

    fn reference() -> ReferenceDictionary {
        let mut builder = ReferenceDictionaryBuilder::default();
        builder.put_contig(10, "10", 135_534_747);
        builder.build().expect("valid dictionary")
    }

    fn builder(
        reference: &ReferenceDictionary,
        exons: &[(i32, i32)],
        aln_len: i32,
    ) -> Result<TranscriptModelBuilder, anyhow::Error> {
        let iv = |b, e| GenomeInterval::new(reference, 10, Strand::Reverse, b, e);
        Ok(TranscriptModelBuilder::default()
            .accession("NM_000141.4")
            .gene_symbol("FGFR2")
            .gene_id(String::from("2263"))
            .tx_region(iv(100, 200)?)
            .cds_region(iv(110, 190)?)
            .exon_regions(
                exons
                    .iter()
                    .map(|(b, e)| iv(*b, *e))
                    .collect::<Result<Vec<_>, _>>()?,
            )
            .alt_gene_ids(BTreeMap::from([(
                String::from("HGNC_ID"),
                String::from("HGNC:3689"),
            )]))
            .alignment(Alignment::ungapped(aln_len)))
    }

    #[test]
    fn build_and_check() -> Result<(), anyhow::Error> {
        let reference = reference();
        let tx = builder(&reference, &[(100, 120), (150, 200)], 70)?.try_build()?;

        tx.check(&reference)?;
        assert_eq!(tx.transcript_length(), 70);
        assert_eq!(tx.gene_id(), Some("2263"));
        assert!(tx.is_coding());
        assert_eq!(tx.transcript_support_level(), 0);

        Ok(())
    }

    #[rstest::rstest]
    #[case(&[(100, 120), (150, 200)], 71)]
    #[case(&[(100, 160), (150, 200)], 110)]
    #[case(&[(150, 200), (100, 120)], 70)]
    #[case(&[(90, 120)], 30)]
    #[case(&[], 0)]
    fn check_fails(
        #[case] exons: &[(i32, i32)],
        #[case] aln_len: i32,
    ) -> Result<(), anyhow::Error> {
        let reference = reference();
        let tx = builder(&reference, exons, aln_len)?.try_build()?;

        assert!(tx.check(&reference).is_err());

        Ok(())
    }

    #[test]
    fn build_missing_field_fails() {
        let res = TranscriptModelBuilder::default()
            .accession("NM_000141.4")
            .try_build();

        assert!(res.is_err());
    }
}
