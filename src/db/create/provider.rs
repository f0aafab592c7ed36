//! Providers that fetch and parse upstream transcript data into a database.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use indexmap::IndexMap;

use crate::common::io::std::open_read_maybe_gz;
use crate::model::TranscriptAnnotationDatabase;

/// Environment handed to a provider when fetching.
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    /// Directory that downloaded or staged files go to.
    pub download_dir: PathBuf,
    /// Proxy URLs by URL scheme (`http`, `https`, `ftp`).
    pub proxies: IndexMap<String, String>,
    /// Whether to display progress.
    pub progress: bool,
}

impl FetchContext {
    /// The proxy to use for the given URL scheme, if any.
    pub fn proxy_for(&self, scheme: &str) -> Option<&str> {
        self.proxies
            .get(&scheme.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Fetches and parses upstream data for one assembly and transcript source.
pub trait TranscriptProvider: Send + Sync {
    /// Obtain the fully built in-memory database.
    fn fetch(&self, ctx: &FetchContext) -> Result<TranscriptAnnotationDatabase, anyhow::Error>;
}

/// Provider reading a pre-parsed transcript catalogue.
///
/// The catalogue is the JSON serialization of a `TranscriptAnnotationDatabase`, optionally
/// gzip-compressed.  It is first staged into the download directory and then parsed from there.
#[derive(Debug, Clone)]
pub struct CatalogueProvider {
    path: PathBuf,
}

impl CatalogueProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptProvider for CatalogueProvider {
    fn fetch(&self, ctx: &FetchContext) -> Result<TranscriptAnnotationDatabase, anyhow::Error> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| anyhow!("catalogue path {:?} has no file name", &self.path))?;
        let staged = ctx.download_dir.join(file_name);
        tracing::debug!("Staging {:?} to {:?}", &self.path, &staged);
        std::fs::copy(&self.path, &staged)
            .map_err(|e| anyhow!("could not stage catalogue {:?}: {}", &self.path, e))?;

        tracing::info!("Parsing transcript catalogue {:?} ...", &staged);
        let reader = open_read_maybe_gz(&staged)?;
        let db: TranscriptAnnotationDatabase = serde_json::from_reader(reader)
            .map_err(|e| anyhow!("could not parse catalogue {:?}: {}", &staged, e))?;
        tracing::info!("... parsed {} transcripts", db.len());
        Ok(db)
    }
}

/// Known kinds of providers in the definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum ProviderKind {
    Catalogue,
}

/// One entry of the provider-definition file.
#[derive(Debug, Clone, serde::Deserialize)]
struct ProviderDefinition {
    key: String,
    kind: ProviderKind,
    path: PathBuf,
}

/// The provider-definition file.
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ProviderDefinitions {
    #[serde(default)]
    providers: Vec<ProviderDefinition>,
}

/// Providers by key `"<assembly>/<source>"`, in registration order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: IndexMap<String, Box<dyn TranscriptProvider>>,
}

impl ProviderRegistry {
    /// Register `provider` under `key`; fails if the key is taken.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        provider: Box<dyn TranscriptProvider>,
    ) -> Result<(), anyhow::Error> {
        let key = key.into();
        if self.providers.contains_key(&key) {
            anyhow::bail!("provider {:?} is already registered", key);
        }
        self.providers.insert(key, provider);
        Ok(())
    }

    pub fn resolve(&self, key: &str) -> Option<&dyn TranscriptProvider> {
        self.providers.get(key).map(|provider| provider.as_ref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Load the registry from a YAML provider-definition file.
    ///
    /// Relative catalogue paths are interpreted relative to the definition file.
    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        tracing::debug!("Reading provider definitions from {:?}", path);
        let reader = open_read_maybe_gz(path)?;
        let definitions: ProviderDefinitions = serde_yaml::from_reader(reader)
            .map_err(|e| anyhow!("could not parse provider definitions {:?}: {}", path, e))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));

        let mut result = Self::default();
        for definition in definitions.providers {
            let provider: Box<dyn TranscriptProvider> = match definition.kind {
                ProviderKind::Catalogue => {
                    Box::new(CatalogueProvider::new(base.join(&definition.path)))
                }
            };
            result.register(definition.key, provider)?;
        }
        tracing::debug!("Registered providers: {:?}", result.keys().collect::<Vec<_>>());
        Ok(result)
    }
}
