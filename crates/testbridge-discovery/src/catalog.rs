//! Version catalog and its sources

use std::path::PathBuf;

use testbridge_core::config::Config;
use testbridge_core::{Result, RuntimeVersion};
use tracing::{debug, info};

use crate::candidate::{EngineCandidate, Tier};
use crate::layout::EngineLayout;
use crate::sources::{BundledSource, DeveloperSource, DirectoryProductStore, InstalledSource};

/// What discovery knows about the caller
#[derive(Debug, Clone)]
pub struct DiscoveryContext {
    /// Runtime the caller runs on
    pub host_runtime: RuntimeVersion,
    /// Target assembly (or its directory)
    pub target: Option<PathBuf>,
}

impl DiscoveryContext {
    pub fn new(host_runtime: RuntimeVersion) -> Self {
        Self {
            host_runtime,
            target: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Directory developer overrides are searched from
    pub fn target_dir(&self) -> Option<PathBuf> {
        let target = self.target.as_ref()?;
        if target.is_dir() {
            Some(target.clone())
        } else {
            target.parent().map(|p| p.to_path_buf())
        }
    }
}

/// A source of engine candidates for one tier
///
/// Sources never fail: missing or malformed data is omitted.
pub trait CatalogSource: Send + Sync {
    /// Source name (e.g. "developer", "installed")
    fn name(&self) -> &'static str;

    /// Tier this source populates
    fn tier(&self) -> Tier;

    /// Enumerate candidates
    fn discover(&self, ctx: &DiscoveryContext) -> Vec<EngineCandidate>;
}

/// Ordered set of catalog sources
#[derive(Default)]
pub struct CatalogSources {
    sources: Vec<Box<dyn CatalogSource>>,
}

impl CatalogSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources described by the configuration
    pub fn from_config(config: &Config) -> Self {
        let layout = EngineLayout::from_config(&config.engine);
        let discovery = &config.discovery;
        let mut sources = Self::new();

        if discovery.developer_overrides {
            sources.register(Box::new(DeveloperSource::new(
                discovery.engine_config_name.clone(),
                layout.clone(),
            )));
        }

        if let Some(root) = discovery.installs_dir_or_default() {
            sources.register(Box::new(InstalledSource::new(
                Box::new(DirectoryProductStore::new(root)),
                layout.clone(),
            )));
        }

        sources.register(Box::new(BundledSource::new(
            discovery.bundled_dir_or_default(),
            discovery.engine_config_name.clone(),
            layout,
        )));

        sources
    }

    /// Register an additional source
    pub fn register(&mut self, source: Box<dyn CatalogSource>) {
        self.sources.push(source);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Candidates found per tier
///
/// Immutable once loaded; rebuild to pick up new installs.
#[derive(Debug, Clone)]
pub struct VersionCatalog {
    host_runtime: RuntimeVersion,
    developer: Vec<EngineCandidate>,
    installed: Vec<EngineCandidate>,
    default: Vec<EngineCandidate>,
}

impl VersionCatalog {
    pub fn new(
        host_runtime: RuntimeVersion,
        developer: Vec<EngineCandidate>,
        installed: Vec<EngineCandidate>,
        default: Vec<EngineCandidate>,
    ) -> Self {
        Self {
            host_runtime,
            developer,
            installed,
            default,
        }
    }

    /// Run every source and group what it finds by tier
    pub fn load(sources: &CatalogSources, ctx: &DiscoveryContext) -> Self {
        let mut catalog = Self::new(ctx.host_runtime.clone(), Vec::new(), Vec::new(), Vec::new());

        for source in &sources.sources {
            let found = source.discover(ctx);
            debug!(source = source.name(), tier = %source.tier(), count = found.len(), "catalog source scanned");
            catalog.tier_mut(source.tier()).extend(found);
        }

        info!(
            host_runtime = %catalog.host_runtime,
            developer = catalog.developer.len(),
            installed = catalog.installed.len(),
            default = catalog.default.len(),
            "version catalog loaded"
        );
        catalog
    }

    /// Build the sources from configuration and load
    pub fn from_config(config: &Config, target: Option<PathBuf>) -> Result<Self> {
        let host_runtime = RuntimeVersion::parse(&config.discovery.runtime_version)?;
        let mut ctx = DiscoveryContext::new(host_runtime);
        ctx.target = target;
        Ok(Self::load(&CatalogSources::from_config(config), &ctx))
    }

    pub fn host_runtime(&self) -> &RuntimeVersion {
        &self.host_runtime
    }

    pub fn tier(&self, tier: Tier) -> &[EngineCandidate] {
        match tier {
            Tier::Developer => &self.developer,
            Tier::Installed => &self.installed,
            Tier::Default => &self.default,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut Vec<EngineCandidate> {
        match tier {
            Tier::Developer => &mut self.developer,
            Tier::Installed => &mut self.installed,
            Tier::Default => &mut self.default,
        }
    }

    pub fn is_empty(&self) -> bool {
        Tier::all().iter().all(|t| self.tier(*t).is_empty())
    }
}
