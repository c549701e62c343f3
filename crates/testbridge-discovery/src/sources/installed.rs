//! Installed-product records left behind by engine installers
//!
//! Each installed engine version is one record carrying the product version
//! and install directory. An install directory may hold several runtime
//! variants under `bin/`, each of which becomes its own candidate.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use testbridge_core::EngineVersion;
use tracing::{debug, warn};

use crate::candidate::{EngineCandidate, Tier};
use crate::catalog::{CatalogSource, DiscoveryContext};
use crate::layout::EngineLayout;

/// One installed-product record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductRecord {
    /// Record key, typically the version it was installed as
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub product_version: Option<String>,
    #[serde(default)]
    pub install_dir: Option<PathBuf>,
}

impl ProductRecord {
    /// Create a record for an installed product
    pub fn new(
        key: impl Into<String>,
        product_version: Option<&str>,
        install_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            key: key.into(),
            product_version: product_version.map(str::to_string),
            install_dir,
        }
    }
}

/// Read-only store of installed-product records
pub trait ProductStore: Send + Sync {
    /// All records; unreadable entries are left out
    fn records(&self) -> Vec<ProductRecord>;
}

/// One TOML file per installed product under a root directory
#[derive(Debug, Clone)]
pub struct DirectoryProductStore {
    root: PathBuf,
}

impl DirectoryProductStore {
    /// Store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_record(path: &Path) -> Option<ProductRecord> {
        let content = std::fs::read_to_string(path).ok()?;
        let mut record: ProductRecord = match toml::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed product record");
                return None;
            }
        };

        if record.key.is_empty() {
            record.key = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Some(record)
    }
}

impl ProductStore for DirectoryProductStore {
    fn records(&self) -> Vec<ProductRecord> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(root = %self.root.display(), error = %e, "no product record store");
                return Vec::new();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        paths.iter().filter_map(|p| Self::read_record(p)).collect()
    }
}

/// In-memory records
#[derive(Debug, Clone, Default)]
pub struct MemoryProductStore {
    records: Vec<ProductRecord>,
}

impl MemoryProductStore {
    /// Store holding `records`
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    /// Add a record
    pub fn push(&mut self, record: ProductRecord) {
        self.records.push(record);
    }
}

impl ProductStore for MemoryProductStore {
    fn records(&self) -> Vec<ProductRecord> {
        self.records.clone()
    }
}

/// Expands product records into per-runtime candidates
pub struct InstalledSource {
    store: Box<dyn ProductStore>,
    layout: EngineLayout,
}

impl InstalledSource {
    /// Source reading `store` and checking candidates against `layout`
    pub fn new(store: Box<dyn ProductStore>, layout: EngineLayout) -> Self {
        Self { store, layout }
    }

    fn expand(&self, record: &ProductRecord) -> Vec<EngineCandidate> {
        let (Some(raw_version), Some(install_dir)) = (&record.product_version, &record.install_dir)
        else {
            debug!(key = %record.key, "product record without version or install dir");
            return Vec::new();
        };

        let version = match EngineVersion::parse(raw_version) {
            Ok(version) => version,
            Err(e) => {
                warn!(key = %record.key, error = %e, "unparseable product version");
                return Vec::new();
            }
        };

        let bin_dir = install_dir.join("bin");
        if !bin_dir.is_dir() {
            debug!(key = %record.key, bin_dir = %bin_dir.display(), "install has no bin dir");
            return Vec::new();
        }

        self.layout
            .runtime_variants()
            .iter()
            .map(|(runtime, dir)| (runtime, bin_dir.join(dir)))
            .filter(|(_, base_dir)| self.layout.is_installed(base_dir))
            .map(|(runtime, base_dir)| EngineCandidate::new(version, runtime.clone(), base_dir))
            .collect()
    }
}

impl CatalogSource for InstalledSource {
    fn name(&self) -> &'static str {
        "installed"
    }

    fn tier(&self) -> Tier {
        Tier::Installed
    }

    fn discover(&self, _ctx: &DiscoveryContext) -> Vec<EngineCandidate> {
        self.store
            .records()
            .iter()
            .flat_map(|record| self.expand(record))
            .collect()
    }
}
