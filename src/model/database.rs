//! The transcript annotation database.

use rayon::prelude::*;

use crate::error::Result;

use super::{reference::ReferenceDictionary, transcript::TranscriptModel};

/// Reference dictionary together with the transcript models of one build.
///
/// Immutable once constructed.  The transcript models are kept in the order given by the
/// provider and may contain duplicates; `crate::db::convert` removes them on export.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "UncheckedDatabase")]
pub struct TranscriptAnnotationDatabase {
    reference_dictionary: ReferenceDictionary,
    transcript_models: Vec<TranscriptModel>,
}

/// Helper for deserialization with validation.
#[derive(serde::Deserialize)]
struct UncheckedDatabase {
    reference_dictionary: ReferenceDictionary,
    transcript_models: Vec<TranscriptModel>,
}

impl TryFrom<UncheckedDatabase> for TranscriptAnnotationDatabase {
    type Error = crate::error::Error;

    fn try_from(value: UncheckedDatabase) -> Result<Self> {
        Self::new(value.reference_dictionary, value.transcript_models)
    }
}

impl TranscriptAnnotationDatabase {
    /// Construct a new database, checking every model against `reference_dictionary`.
    pub fn new(
        reference_dictionary: ReferenceDictionary,
        transcript_models: Vec<TranscriptModel>,
    ) -> Result<Self> {
        transcript_models
            .par_iter()
            .try_for_each(|tx| tx.check(&reference_dictionary))?;
        Ok(Self {
            reference_dictionary,
            transcript_models,
        })
    }

    pub fn reference_dictionary(&self) -> &ReferenceDictionary {
        &self.reference_dictionary
    }

    pub fn transcript_models(&self) -> &[TranscriptModel] {
        &self.transcript_models
    }

    /// Number of transcript models, including duplicates.
    pub fn len(&self) -> usize {
        self.transcript_models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript_models.is_empty()
    }

    /// The first transcript model with the given accession.
    pub fn transcript(&self, accession: &str) -> Option<&TranscriptModel> {
        self.transcript_models
            .iter()
            .find(|tx| tx.accession() == accession)
    }

    /// All transcript models of the gene with the given symbol.
    pub fn transcripts_for_gene<'a>(
        &'a self,
        gene_symbol: &'a str,
    ) -> impl Iterator<Item = &'a TranscriptModel> + 'a {
        self.transcript_models
            .iter()
            .filter(move |tx| tx.gene_symbol() == gene_symbol)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::collections::BTreeMap;

    use crate::model::{
        Alignment, GenomeInterval, ReferenceDictionary, ReferenceDictionaryBuilder, Strand,
        TranscriptAnnotationDatabase, TranscriptModel, TranscriptModelBuilder,
    };

    /// Small reference dictionary with chromosomes 1 and 10.
    pub fn reference() -> ReferenceDictionary {
        let mut builder = ReferenceDictionaryBuilder::default();
        builder
            .put_contig(1, "1", 249_250_621)
            .put_contig_id("chr1", 1)
            .put_contig(10, "10", 135_534_747)
            .put_contig_id("chr10", 10);
        builder.build().expect("valid dictionary")
    }

    /// Two-exon transcript on chromosome 10.
    pub fn transcript(
        reference: &ReferenceDictionary,
        accession: &str,
        gene_symbol: &str,
        gene_id: Option<&str>,
        alt_gene_ids: &[(&str, &str)],
    ) -> TranscriptModel {
        let iv = |b, e| {
            GenomeInterval::new(reference, 10, Strand::Forward, b, e).expect("valid interval")
        };
        TranscriptModelBuilder::default()
            .accession(accession)
            .gene_symbol(gene_symbol)
            .gene_id(gene_id.map(String::from))
            .tx_region(iv(1_000, 1_100))
            .cds_region(iv(1_005, 1_095))
            .exon_regions(vec![iv(1_000, 1_020), iv(1_080, 1_100)])
            .sequence("ACGT".repeat(10))
            .transcript_support_level(1)
            .alt_gene_ids(
                alt_gene_ids
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<BTreeMap<_, _>>(),
            )
            .alignment(Alignment::ungapped(40))
            .try_build()
            .expect("valid transcript")
    }

    #[test]
    fn new_and_lookup() -> Result<(), anyhow::Error> {
        let reference = reference();
        let db = TranscriptAnnotationDatabase::new(
            reference.clone(),
            vec![
                transcript(&reference, "NM_000141.4", "FGFR2", Some("2263"), &[]),
                transcript(&reference, "NM_022970.3", "FGFR2", Some("2263"), &[]),
                transcript(&reference, "NM_000193.4", "SHH", Some("6469"), &[]),
            ],
        )?;

        assert_eq!(db.len(), 3);
        assert_eq!(
            db.transcript("NM_000193.4").map(|tx| tx.gene_symbol()),
            Some("SHH")
        );
        assert_eq!(db.transcripts_for_gene("FGFR2").count(), 2);
        assert!(db.transcript("NM_000000.1").is_none());

        Ok(())
    }

    #[test]
    fn new_rejects_unknown_contig() {
        let reference = reference();
        let tx = transcript(&reference, "NM_000141.4", "FGFR2", Some("2263"), &[]);
        let mut builder = ReferenceDictionaryBuilder::default();
        builder.put_contig(1, "1", 249_250_621);
        let other = builder.build().expect("valid dictionary");

        assert!(TranscriptAnnotationDatabase::new(other, vec![tx]).is_err());
    }

    #[test]
    fn serde_json_roundtrip() -> Result<(), anyhow::Error> {
        let reference = reference();
        let db = TranscriptAnnotationDatabase::new(
            reference.clone(),
            vec![transcript(
                &reference,
                "NM_000141.4",
                "FGFR2",
                Some("2263"),
                &[("ENTREZ_ID", "2263")],
            )],
        )?;

        let json = serde_json::to_string(&db)?;
        let db2: TranscriptAnnotationDatabase = serde_json::from_str(&json)?;

        pretty_assertions::assert_eq!(db, db2);

        Ok(())
    }
}
