//! Construction of transcript databases from registered providers.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use indexmap::IndexMap;
use thousands::Separable;

use crate::common::{trace_rss_now, GenomeAssembly};
use crate::db::convert::ModelConverter;
use crate::db::legacy::LegacyStore;
use crate::db::source::TranscriptSource;
use crate::db::store::ProtobufStore;
use crate::error::{Error, Result};
use crate::model::TranscriptAnnotationDatabase;

pub mod provider;

use provider::{FetchContext, ProviderRegistry};

/// Key that providers are registered under, e.g., `"HG19/ensembl"`.
pub fn provider_key(assembly: GenomeAssembly, source: TranscriptSource) -> String {
    format!("{}/{}", assembly, source)
}

/// Configuration for building databases.
#[derive(Debug, Clone, Default, derive_builder::Builder)]
#[builder(pattern = "immutable")]
pub struct BuildConfig {
    /// Proxy URL for HTTP downloads.
    #[builder(default, setter(into))]
    pub http_proxy: Option<String>,
    /// Proxy URL for HTTPS downloads.
    #[builder(default, setter(into))]
    pub https_proxy: Option<String>,
    /// Proxy URL for FTP downloads.
    #[builder(default, setter(into))]
    pub ftp_proxy: Option<String>,
    /// Directory for downloads; a fresh temporary directory is used if unset.
    #[builder(default, setter(into))]
    pub download_dir: Option<PathBuf>,
    /// Whether to display progress bars.
    #[builder(default)]
    pub progress: bool,
}

impl BuildConfig {
    /// Configured proxies keyed by URL scheme.
    pub fn proxies(&self) -> IndexMap<String, String> {
        [
            ("http", &self.http_proxy),
            ("https", &self.https_proxy),
            ("ftp", &self.ftp_proxy),
        ]
        .into_iter()
        .filter_map(|(scheme, proxy)| proxy.as_ref().map(|p| (scheme.to_string(), p.clone())))
        .collect()
    }
}

/// Resolves providers and writes the databases that they produce.
pub struct DatabaseBuilder {
    registry: ProviderRegistry,
    config: BuildConfig,
}

impl DatabaseBuilder {
    pub fn new(registry: ProviderRegistry, config: BuildConfig) -> Self {
        Self { registry, config }
    }

    /// Construct with the providers from the given definition file.
    pub fn from_definitions(path: &Path, config: BuildConfig) -> Result<Self> {
        let registry = ProviderRegistry::from_path(path).map_err(|e| {
            Error::data_source(format!("provider definitions {}", path.display()), e)
        })?;
        Ok(Self::new(registry, config))
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the database for `assembly` and `source` in memory.
    pub fn build(
        &self,
        assembly: GenomeAssembly,
        source: TranscriptSource,
    ) -> Result<TranscriptAnnotationDatabase> {
        let key = provider_key(assembly, source);
        let what = format!("provider {}", key);
        let provider = self.registry.resolve(&key).ok_or_else(|| {
            Error::data_source(
                what.clone(),
                format!(
                    "no provider registered for {:?}, known keys: {:?}",
                    key,
                    self.registry.keys().collect::<Vec<_>>()
                ),
            )
        })?;

        // keep the temporary directory alive until the provider is done
        let (ctx, _tmp_dir) = self.fetch_context()?;
        tracing::info!("Fetching transcripts from {} ...", what);
        let start = Instant::now();
        let db = provider
            .fetch(&ctx)
            .map_err(|e| Error::data_source(what.clone(), e))?;
        tracing::info!(
            "... fetched {} transcripts in {:?}",
            db.len().separate_with_commas(),
            start.elapsed()
        );
        trace_rss_now();
        Ok(db)
    }

    /// Build the database and write it in the current format.
    pub fn build_and_write(
        &self,
        assembly: GenomeAssembly,
        source: TranscriptSource,
        path: &Path,
    ) -> Result<()> {
        let db = self.build(assembly, source)?;
        let store = ProtobufStore::new(ModelConverter {
            progress: self.config.progress,
            ..Default::default()
        });
        store.save(path, &db)
    }

    /// Build the database and write it in the legacy format.
    ///
    /// Build failures are returned, write failures are only logged.
    pub fn build_and_write_legacy(
        &self,
        assembly: GenomeAssembly,
        source: TranscriptSource,
        path: &Path,
    ) -> Result<()> {
        let db = self.build(assembly, source)?;
        if let Err(e) = LegacyStore.save(path, &db) {
            tracing::error!(
                "could not write legacy transcript database to {:?}: {}",
                path,
                e
            );
        }
        Ok(())
    }

    fn fetch_context(&self) -> Result<(FetchContext, Option<tempfile::TempDir>)> {
        let (download_dir, tmp_dir) = match &self.config.download_dir {
            Some(download_dir) => {
                std::fs::create_dir_all(download_dir).map_err(|e| {
                    Error::data_source(
                        format!("download directory {}", download_dir.display()),
                        e,
                    )
                })?;
                (download_dir.clone(), None)
            }
            None => {
                let tmp_dir = tempfile::Builder::new()
                    .prefix("txdb-")
                    .tempdir()
                    .map_err(|e| Error::data_source("temporary download directory", e))?;
                (tmp_dir.path().to_path_buf(), Some(tmp_dir))
            }
        };
        tracing::debug!("Using download directory {:?}", &download_dir);

        let proxies = self.config.proxies();
        for (scheme, proxy) in &proxies {
            tracing::info!("Using {} proxy {}", scheme, proxy);
        }

        Ok((
            FetchContext {
                download_dir,
                proxies,
                progress: self.config.progress,
            },
            tmp_dir,
        ))
    }
}

/// Command line arguments for `db create` sub command.
#[derive(Parser, Debug)]
#[command(about = "Construct transcript database from a registered provider", long_about = None)]
pub struct Args {
    /// Genome assembly to build the database for.
    #[arg(long, value_enum)]
    pub assembly: GenomeAssembly,
    /// Transcript source to build the database for (ensembl, refseq, or ucsc).
    #[arg(long)]
    pub source: TranscriptSource,
    /// Path to the YAML file with the provider definitions.
    #[arg(long)]
    pub path_providers: PathBuf,
    /// Path to output file to write to.
    #[arg(long)]
    pub path_out: PathBuf,
    /// Write the legacy format instead of the current one.
    #[arg(long, default_value_t = false)]
    pub legacy: bool,
    /// Directory for downloads, a temporary directory is used if not given.
    #[arg(long)]
    pub download_dir: Option<PathBuf>,
    /// Proxy to use for HTTP downloads.
    #[arg(long)]
    pub http_proxy: Option<String>,
    /// Proxy to use for HTTPS downloads.
    #[arg(long)]
    pub https_proxy: Option<String>,
    /// Proxy to use for FTP downloads.
    #[arg(long)]
    pub ftp_proxy: Option<String>,
    /// Display progress bars.
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

/// Main entry point for `db create` sub command.
pub fn run(
    common: &crate::common::Args,
    args: &Args,
) -> std::result::Result<(), anyhow::Error> {
    tracing::info!(
        "Building transcript database file\ncommon args: {:#?}\nargs: {:#?}",
        common,
        args
    );

    let config = BuildConfigBuilder::default()
        .http_proxy(args.http_proxy.clone())
        .https_proxy(args.https_proxy.clone())
        .ftp_proxy(args.ftp_proxy.clone())
        .download_dir(args.download_dir.clone())
        .progress(args.progress && !common.verbose.is_silent())
        .build()?;
    let builder = DatabaseBuilder::from_definitions(&args.path_providers, config)?;

    if args.legacy {
        builder.build_and_write_legacy(args.assembly, args.source, &args.path_out)?;
    } else {
        builder.build_and_write(args.assembly, args.source, &args.path_out)?;
    }

    tracing::info!("Done building transcript database file");
    Ok(())
}
