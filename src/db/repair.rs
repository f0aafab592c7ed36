//! Repairs for known defects in upstream transcript data.
//!
//! These are applied by `crate::db::convert` when writing the wire format.

use std::borrow::Cow;
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ENTREZ_ID;

/// Placeholder that some sources use for "no value".
const PLACEHOLDER: &str = ".";

/// Ensembl accession with the version suffix appearing twice, e.g., `ENST00000123456.2.1`.
static DUPLICATED_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(ENST[0-9]{11}\.[0-9]+)\.[0-9]+$").expect("invalid regex"));

/// Drop the second version number from Ensembl accessions that carry two.
///
/// `ENST00000123456.2.1` becomes `ENST00000123456.2`; all other accessions are returned
/// unchanged.
pub fn repair_duplicated_version(accession: &str) -> &str {
    match DUPLICATED_VERSION
        .captures(accession)
        .and_then(|captures| captures.get(1))
    {
        Some(m) => {
            tracing::trace!("repairing accession {} -> {}", accession, m.as_str());
            m.as_str()
        }
        None => accession,
    }
}

/// Gene identifier to write: missing and placeholder values become the empty string.
pub fn clean_gene_id(gene_id: Option<&str>) -> &str {
    match gene_id {
        None | Some(PLACEHOLDER) => "",
        Some(gene_id) => gene_id,
    }
}

/// Replace a placeholder `ENTREZ_ID` alternative id by the empty string.
///
/// Only copies the map if the value needs to be rewritten.
pub fn clean_alt_gene_ids(
    alt_gene_ids: &BTreeMap<String, String>,
) -> Cow<'_, BTreeMap<String, String>> {
    if alt_gene_ids.get(ENTREZ_ID).map(String::as_str) == Some(PLACEHOLDER) {
        let mut cleaned = alt_gene_ids.clone();
        cleaned.insert(ENTREZ_ID.to_string(), String::new());
        Cow::Owned(cleaned)
    } else {
        Cow::Borrowed(alt_gene_ids)
    }
}
