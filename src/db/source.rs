//! Known upstream transcript sources.

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::error::{Error, Result};

/// Upstream provider of transcript annotations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    parse_display::Display,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[display(style = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TranscriptSource {
    Ensembl,
    Refseq,
    Ucsc,
}

impl TranscriptSource {
    /// Canonical lower-case name, e.g., `"ensembl"`.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Parse a source name, ignoring case.
    ///
    /// A missing value is a precondition failure, an unknown one yields
    /// `Error::InvalidTranscriptSource` listing the valid names.
    pub fn parse_value(value: Option<&str>) -> Result<Self> {
        let value = value.ok_or_else(|| {
            Error::Precondition(String::from("transcript source must not be missing"))
        })?;
        let needle = value.trim();
        Self::iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::InvalidTranscriptSource {
                value: value.to_string(),
                valid: Self::iter().map(|source| source.as_str()).join(", "),
            })
    }
}

impl std::str::FromStr for TranscriptSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_value(Some(s))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::TranscriptSource;
    use crate::error::Error;

    #[rstest::rstest]
    #[case("ensembl", TranscriptSource::Ensembl)]
    #[case("ENSEMBL", TranscriptSource::Ensembl)]
    #[case("RefSeq", TranscriptSource::Refseq)]
    #[case(" ucsc ", TranscriptSource::Ucsc)]
    fn parse_value(
        #[case] value: &str,
        #[case] expected: TranscriptSource,
    ) -> Result<(), anyhow::Error> {
        assert_eq!(TranscriptSource::parse_value(Some(value))?, expected);
        assert_eq!(value.parse::<TranscriptSource>()?, expected);
        Ok(())
    }

    #[test]
    fn parse_value_missing() {
        assert!(matches!(
            TranscriptSource::parse_value(None),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn parse_value_invalid() {
        match TranscriptSource::parse_value(Some("gencode")) {
            Err(Error::InvalidTranscriptSource { value, valid }) => {
                assert_eq!(value, "gencode");
                assert_eq!(valid, "ensembl, refseq, ucsc");
            }
            other => panic!("expected invalid source error, got {:?}", other),
        }
    }

    #[rstest::rstest]
    #[case(TranscriptSource::Ensembl, "ensembl")]
    #[case(TranscriptSource::Refseq, "refseq")]
    #[case(TranscriptSource::Ucsc, "ucsc")]
    fn display(#[case] source: TranscriptSource, #[case] expected: &str) {
        assert_eq!(source.to_string(), expected);
        assert_eq!(source.as_str(), expected);
        assert_eq!(serde_json::to_string(&source).ok(), Some(format!("\"{}\"", expected)));
    }

    #[test]
    fn names_agree() {
        use strum::IntoEnumIterator;

        for source in TranscriptSource::iter() {
            assert_eq!(source.as_str(), source.to_string());
            assert_eq!(source.as_str().parse::<TranscriptSource>().ok(), Some(source));
        }
    }
}
