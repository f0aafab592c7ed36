//! Commonly used code.

use byte_unit::{Byte, UnitType};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod io;

/// Commonly used command line arguments.
#[derive(Parser, Debug, Default)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

/// Helper to print the current memory resident set size via `tracing`.
pub fn trace_rss_now() {
    let rss = procfs::process::Process::myself()
        .and_then(|me| me.stat())
        .map(|stat| stat.rss * procfs::page_size());
    match rss {
        Ok(rss) => tracing::debug!(
            "RSS now: {}",
            Byte::from_u128(rss as u128)
                .map(|b| format!("{}", b.get_appropriate_unit(UnitType::Binary)))
                .unwrap_or_else(|| format!("{} B", rss))
        ),
        Err(e) => tracing::trace!("could not determine RSS: {}", e),
    }
}

/// Select the genome assembly to build for.
#[derive(
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
    parse_display::Display,
    parse_display::FromStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
)]
#[display(style = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum GenomeAssembly {
    #[default]
    Hg19,
    Hg38,
}

impl GenomeAssembly {
    /// Name of the corresponding GRC release.
    pub fn grc_name(&self) -> &'static str {
        match self {
            GenomeAssembly::Hg19 => "GRCh37",
            GenomeAssembly::Hg38 => "GRCh38",
        }
    }
}

/// The version of `txdb` package.
#[cfg(not(test))]
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// This allows us to override the version to `0.0.0` in tests.
pub fn version() -> &'static str {
    #[cfg(test)]
    return "0.0.0";
    #[cfg(not(test))]
    return VERSION;
}
