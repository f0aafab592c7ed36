//! Conversion between the in-memory database and its protobuf representation.

use std::collections::BTreeMap;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use thousands::Separable;

use crate::common::trace_rss_now;
use crate::db::repair::{clean_alt_gene_ids, clean_gene_id, repair_duplicated_version};
use crate::error::{Error, Result};
use crate::model::{
    transcript::exon_length_sum, Alignment, Anchor, GenomeInterval, ReferenceDictionary,
    ReferenceDictionaryBuilder, Strand, TranscriptAnnotationDatabase, TranscriptModel,
    TranscriptModelBuilder,
};
use crate::pbs;

/// Progress bar style to use.
pub static PROGRESS_STYLE: Lazy<ProgressStyle> = Lazy::new(|| {
    ProgressStyle::with_template(
        "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {human_pos}/{human_len} ({eta})",
    )
    .expect("invalid progress style template")
});

/// Converts between `TranscriptAnnotationDatabase` and `pbs::txs::TranscriptDatabase`.
///
/// Export removes duplicate transcripts, repairs known upstream defects, and emits the
/// transcripts sorted by accession so that the output does not depend on the input order or
/// on thread scheduling.
#[derive(Debug, Clone, Copy)]
pub struct ModelConverter {
    /// Convert the transcript models on the rayon thread pool.
    pub parallel: bool,
    /// Display a progress bar.
    pub progress: bool,
}

impl Default for ModelConverter {
    fn default() -> Self {
        Self {
            parallel: true,
            progress: false,
        }
    }
}

impl ModelConverter {
    fn progress_bar(&self, len: usize) -> ProgressBar {
        let pb = if self.progress {
            ProgressBar::new(len as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(PROGRESS_STYLE.clone());
        pb
    }

    /// Convert the in-memory database into its wire representation.
    pub fn to_wire(
        &self,
        db: &TranscriptAnnotationDatabase,
    ) -> Result<pbs::txs::TranscriptDatabase> {
        let start = Instant::now();
        let reference_dictionary = reference_to_wire(db.reference_dictionary());

        let unique = dedup_by_accession(db.transcript_models())?;
        tracing::debug!(
            "{} unique transcripts out of {}",
            unique.len().separate_with_commas(),
            db.len().separate_with_commas()
        );

        let pb = self.progress_bar(unique.len());
        let convert = |tx: &&TranscriptModel| {
            pb.inc(1);
            transcript_to_wire(tx)
        };
        let mut transcript_models: Vec<_> = if self.parallel {
            unique.par_iter().map(convert).collect()
        } else {
            unique.iter().map(convert).collect()
        };
        pb.finish_and_clear();
        // Repairs may change accessions, so order and check for duplicates again after mapping.
        transcript_models.sort_by(|a, b| a.accession.cmp(&b.accession));
        let transcript_models = dedup_repaired(transcript_models)?;

        trace_rss_now();
        tracing::debug!(
            "converted {} transcripts to wire format in {:?}",
            transcript_models.len().separate_with_commas(),
            start.elapsed()
        );

        Ok(pbs::txs::TranscriptDatabase {
            reference_dictionary: Some(reference_dictionary),
            transcript_models,
        })
    }

    /// Reconstruct the in-memory database from its wire representation.
    pub fn from_wire(
        &self,
        wire: pbs::txs::TranscriptDatabase,
    ) -> Result<TranscriptAnnotationDatabase> {
        let start = Instant::now();
        let pbs::txs::TranscriptDatabase {
            reference_dictionary,
            transcript_models,
        } = wire;
        // The dictionary must be complete before any model refers to it.
        let reference = reference_from_wire(reference_dictionary.unwrap_or_default())?;

        let pb = self.progress_bar(transcript_models.len());
        let convert = |tx: pbs::txs::TranscriptModel| {
            pb.inc(1);
            transcript_from_wire(&reference, tx)
        };
        let models = if self.parallel {
            transcript_models
                .into_par_iter()
                .map(convert)
                .collect::<Result<Vec<_>>>()?
        } else {
            transcript_models
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>>>()?
        };
        pb.finish_and_clear();

        trace_rss_now();
        tracing::debug!(
            "converted {} transcripts from wire format in {:?}",
            models.len().separate_with_commas(),
            start.elapsed()
        );

        TranscriptAnnotationDatabase::new(reference, models)
    }
}

/// Collect transcripts by accession, dropping identical duplicates.
///
/// Returns the transcripts sorted by accession.  Two transcripts with the same accession but
/// different contents are an error.
fn dedup_by_accession(models: &[TranscriptModel]) -> Result<Vec<&TranscriptModel>> {
    let mut unique: BTreeMap<&str, &TranscriptModel> = BTreeMap::new();
    for tx in models {
        if let Some(prev) = unique.insert(tx.accession(), tx) {
            if prev != tx {
                return Err(Error::DataIntegrity(format!(
                    "transcript {} occurs twice with different contents",
                    tx.accession()
                )));
            }
        }
    }
    Ok(unique.into_values().collect())
}

/// Drop repeated wire records with the same (repaired) accession.
///
/// Expects the records sorted by accession.  Records that only became equal through the
/// accession repair are dropped like identical duplicates, differing ones are an error.
fn dedup_repaired(
    models: Vec<pbs::txs::TranscriptModel>,
) -> Result<Vec<pbs::txs::TranscriptModel>> {
    let mut result: Vec<pbs::txs::TranscriptModel> = Vec::with_capacity(models.len());
    for tx in models {
        match result.last() {
            Some(prev) if prev.accession == tx.accession => {
                if *prev != tx {
                    return Err(Error::DataIntegrity(format!(
                        "transcript {} occurs twice with different contents after repair",
                        tx.accession
                    )));
                }
                tracing::debug!("dropping repeated transcript {}", tx.accession);
            }
            _ => result.push(tx),
        }
    }
    Ok(result)
}

fn reference_to_wire(reference: &ReferenceDictionary) -> pbs::txs::ReferenceDictionary {
    pbs::txs::ReferenceDictionary {
        contig_name_to_id: reference.contig_name_to_id().clone(),
        contig_id_to_name: reference.contig_id_to_name().clone(),
        contig_id_to_length: reference.contig_id_to_length().clone(),
    }
}

fn reference_from_wire(wire: pbs::txs::ReferenceDictionary) -> Result<ReferenceDictionary> {
    let mut builder = ReferenceDictionaryBuilder::default();
    for (name, id) in wire.contig_name_to_id {
        builder.put_contig_id(name, id);
    }
    for (id, name) in wire.contig_id_to_name {
        builder.put_contig_name(id, name);
    }
    for (id, length) in wire.contig_id_to_length {
        builder.put_contig_length(id, length);
    }
    builder.build()
}

fn interval_to_wire(interval: &GenomeInterval) -> pbs::txs::GenomeInterval {
    let strand = match interval.strand() {
        Strand::Forward => pbs::txs::Strand::Forward,
        Strand::Reverse => pbs::txs::Strand::Reverse,
    };
    pbs::txs::GenomeInterval {
        contig_id: interval.contig(),
        strand: strand.into(),
        begin_pos: interval.begin(),
        end_pos: interval.end(),
    }
}

fn interval_from_wire(
    reference: &ReferenceDictionary,
    interval: &pbs::txs::GenomeInterval,
) -> Result<GenomeInterval> {
    let strand = match pbs::txs::Strand::try_from(interval.strand) {
        Ok(pbs::txs::Strand::Forward) => Strand::Forward,
        Ok(pbs::txs::Strand::Reverse) => Strand::Reverse,
        Err(e) => return Err(Error::InvalidModel(e.to_string())),
    };
    GenomeInterval::new(
        reference,
        interval.contig_id,
        strand,
        interval.begin_pos,
        interval.end_pos,
    )
}

fn anchors_to_wire(anchors: &[Anchor]) -> Vec<pbs::txs::AlignmentAnchor> {
    anchors
        .iter()
        .map(|a| pbs::txs::AlignmentAnchor {
            gap_pos: a.gap_pos,
            seq_pos: a.seq_pos,
        })
        .collect()
}

fn anchors_from_wire(anchors: &[pbs::txs::AlignmentAnchor]) -> Vec<Anchor> {
    anchors
        .iter()
        .map(|a| Anchor::new(a.gap_pos, a.seq_pos))
        .collect()
}

fn transcript_to_wire(tx: &TranscriptModel) -> pbs::txs::TranscriptModel {
    pbs::txs::TranscriptModel {
        accession: repair_duplicated_version(tx.accession()).to_string(),
        gene_symbol: tx.gene_symbol().to_string(),
        tx_region: Some(interval_to_wire(tx.tx_region())),
        cds_region: Some(interval_to_wire(tx.cds_region())),
        exon_regions: tx.exon_regions().iter().map(interval_to_wire).collect(),
        sequence: tx.sequence().to_string(),
        gene_id: clean_gene_id(tx.gene_id()).to_string(),
        transcript_support_level: tx.transcript_support_level(),
        alt_gene_ids: clean_alt_gene_ids(tx.alt_gene_ids()).into_owned(),
        has_substitutions: tx.has_substitutions(),
        has_indels: tx.has_indels(),
        alignment: Some(pbs::txs::Alignment {
            ref_anchors: anchors_to_wire(tx.alignment().ref_anchors()),
            qry_anchors: anchors_to_wire(tx.alignment().qry_anchors()),
        }),
    }
}

fn transcript_from_wire(
    reference: &ReferenceDictionary,
    tx: pbs::txs::TranscriptModel,
) -> Result<TranscriptModel> {
    let missing =
        |what: &str| Error::InvalidModel(format!("transcript {} has no {}", tx.accession, what));
    let tx_region = interval_from_wire(
        reference,
        tx.tx_region.as_ref().ok_or_else(|| missing("tx_region"))?,
    )?;
    let cds_region = interval_from_wire(
        reference,
        tx.cds_region.as_ref().ok_or_else(|| missing("cds_region"))?,
    )?;
    let exon_regions = tx
        .exon_regions
        .iter()
        .map(|exon| interval_from_wire(reference, exon))
        .collect::<Result<Vec<_>>>()?;
    let alignment = match tx.alignment.as_ref() {
        Some(aln) => Alignment::new(
            anchors_from_wire(&aln.ref_anchors),
            anchors_from_wire(&aln.qry_anchors),
        )?,
        // Written before alignments were part of the schema.
        None => Alignment::ungapped(exon_length_sum(&exon_regions)),
    };
    let gene_id = if tx.gene_id.is_empty() {
        None
    } else {
        Some(tx.gene_id)
    };

    TranscriptModelBuilder::default()
        .accession(tx.accession)
        .gene_symbol(tx.gene_symbol)
        .gene_id(gene_id)
        .tx_region(tx_region)
        .cds_region(cds_region)
        .exon_regions(exon_regions)
        .sequence(tx.sequence)
        .transcript_support_level(tx.transcript_support_level)
        .has_substitutions(tx.has_substitutions)
        .has_indels(tx.has_indels)
        .alt_gene_ids(tx.alt_gene_ids)
        .alignment(alignment)
        .try_build()
}

#[cfg(test)]
mod test {
    use prost::Message as _;
    use pretty_assertions::assert_eq;

    use super::ModelConverter;
    use crate::error::Error;
    use crate::model::database::test::{reference, transcript};
    use crate::model::{Alignment, Anchor, TranscriptAnnotationDatabase};

    fn database() -> TranscriptAnnotationDatabase {
        let reference = reference();
        let models = vec![
            transcript(&reference, "NM_000193.4", "SHH", Some("6469"), &[]),
            transcript(
                &reference,
                "ENST00000358487.5.1",
                "FGFR2",
                Some("."),
                &[("ENTREZ_ID", "."), ("HGNC_ID", "HGNC:3689")],
            ),
            transcript(&reference, "NM_000141.4", "FGFR2", Some("2263"), &[]),
            transcript(&reference, "NM_005105.5", "RBM8A", None, &[("ENTREZ_ID", "9939")]),
            // identical duplicate
            transcript(&reference, "NM_000193.4", "SHH", Some("6469"), &[]),
        ];
        TranscriptAnnotationDatabase::new(reference, models).expect("valid database")
    }

    #[test]
    fn to_wire_dedups_sorts_and_repairs() -> Result<(), anyhow::Error> {
        let wire = ModelConverter::default().to_wire(&database())?;

        let accessions = wire
            .transcript_models
            .iter()
            .map(|tx| tx.accession.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            accessions,
            vec!["ENST00000358487.5", "NM_000141.4", "NM_000193.4", "NM_005105.5"]
        );

        let fgfr2 = &wire.transcript_models[0];
        assert_eq!(fgfr2.gene_id, "");
        assert_eq!(fgfr2.alt_gene_ids.get("ENTREZ_ID").map(String::as_str), Some(""));
        assert_eq!(
            fgfr2.alt_gene_ids.get("HGNC_ID").map(String::as_str),
            Some("HGNC:3689")
        );
        assert_eq!(wire.transcript_models[3].gene_id, "");
        assert_eq!(
            wire.transcript_models[3]
                .alt_gene_ids
                .get("ENTREZ_ID")
                .map(String::as_str),
            Some("9939")
        );

        let dict = wire.reference_dictionary.expect("dictionary must be set");
        assert_eq!(dict.contig_name_to_id.get("chr10"), Some(&10));
        assert_eq!(dict.contig_id_to_length.get(&1), Some(&249_250_621));

        Ok(())
    }

    #[test]
    fn to_wire_divergent_duplicate_fails() -> Result<(), anyhow::Error> {
        let reference = reference();
        let db = TranscriptAnnotationDatabase::new(
            reference.clone(),
            vec![
                transcript(&reference, "NM_000193.4", "SHH", Some("6469"), &[]),
                transcript(&reference, "NM_000193.4", "SHH", Some("6470"), &[]),
            ],
        )?;

        let res = ModelConverter::default().to_wire(&db);

        assert!(matches!(res, Err(Error::DataIntegrity(_))));

        Ok(())
    }

    #[test]
    fn to_wire_drops_duplicate_after_repair() -> Result<(), anyhow::Error> {
        let reference = reference();
        let db = TranscriptAnnotationDatabase::new(
            reference.clone(),
            vec![
                transcript(&reference, "ENST00000358487.5.1", "FGFR2", Some("2263"), &[]),
                transcript(&reference, "ENST00000358487.5", "FGFR2", Some("2263"), &[]),
            ],
        )?;
        let converter = ModelConverter::default();

        let wire = converter.to_wire(&db)?;

        assert_eq!(
            wire.transcript_models
                .iter()
                .map(|tx| tx.accession.as_str())
                .collect::<Vec<_>>(),
            vec!["ENST00000358487.5"]
        );
        let back = converter.from_wire(wire)?;
        assert_eq!(back.len(), 1);
        assert_eq!(
            back.transcript("ENST00000358487.5").map(|tx| tx.gene_id()),
            Some(Some("2263"))
        );

        Ok(())
    }

    #[test]
    fn to_wire_divergent_duplicate_after_repair_fails() -> Result<(), anyhow::Error> {
        let reference = reference();
        let db = TranscriptAnnotationDatabase::new(
            reference.clone(),
            vec![
                transcript(&reference, "ENST00000358487.5", "FGFR2", Some("2263"), &[]),
                transcript(&reference, "ENST00000358487.5.1", "FGFR2", Some("2264"), &[]),
            ],
        )?;

        let res = ModelConverter::default().to_wire(&db);

        assert!(matches!(res, Err(Error::DataIntegrity(_))));

        Ok(())
    }

    #[test]
    fn to_wire_is_deterministic() -> Result<(), anyhow::Error> {
        let db = database();
        let reversed = TranscriptAnnotationDatabase::new(
            db.reference_dictionary().clone(),
            db.transcript_models().iter().rev().cloned().collect(),
        )?;

        let parallel = ModelConverter::default();
        let sequential = ModelConverter {
            parallel: false,
            ..Default::default()
        };
        let a = parallel.to_wire(&db)?.encode_to_vec();
        let b = parallel.to_wire(&reversed)?.encode_to_vec();
        let c = sequential.to_wire(&db)?.encode_to_vec();

        assert_eq!(a, b);
        assert_eq!(a, c);

        Ok(())
    }

    #[rstest::rstest]
    #[case(true)]
    #[case(false)]
    fn from_wire_roundtrip(#[case] parallel: bool) -> Result<(), anyhow::Error> {
        let converter = ModelConverter {
            parallel,
            ..Default::default()
        };
        let db = database();

        let back = converter.from_wire(converter.to_wire(&db)?)?;

        assert_eq!(back.reference_dictionary(), db.reference_dictionary());
        assert_eq!(back.len(), 4);
        let shh = back.transcript("NM_000193.4").expect("SHH must be there");
        assert_eq!(Some(shh), db.transcript("NM_000193.4"));
        let fgfr2 = back
            .transcript("ENST00000358487.5")
            .expect("repaired FGFR2 must be there");
        assert_eq!(fgfr2.gene_id(), None);
        assert_eq!(
            fgfr2.exon_regions(),
            db.transcript("ENST00000358487.5.1")
                .expect("original FGFR2")
                .exon_regions()
        );

        Ok(())
    }

    #[test]
    fn from_wire_backfills_alignment() -> Result<(), anyhow::Error> {
        let converter = ModelConverter::default();
        let mut wire = converter.to_wire(&database())?;
        wire.transcript_models
            .iter_mut()
            .for_each(|tx| tx.alignment = None);

        let back = converter.from_wire(wire)?;

        for tx in back.transcript_models() {
            assert_eq!(tx.alignment(), &Alignment::ungapped(40));
            assert_eq!(
                tx.alignment().ref_anchors(),
                &[Anchor::new(0, 0), Anchor::new(40, 40)]
            );
        }

        Ok(())
    }

    #[test]
    fn from_wire_unknown_contig_fails() -> Result<(), anyhow::Error> {
        let converter = ModelConverter::default();
        let mut wire = converter.to_wire(&database())?;
        if let Some(exon) = wire.transcript_models[1].exon_regions.first_mut() {
            exon.contig_id = 42;
        }

        assert!(converter.from_wire(wire).is_err());

        Ok(())
    }
}
