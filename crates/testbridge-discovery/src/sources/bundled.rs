//! Engine shipped alongside this executable

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::candidate::{EngineCandidate, Tier};
use crate::catalog::{CatalogSource, DiscoveryContext};
use crate::engine_file::EngineConfigFile;
use crate::layout::EngineLayout;

/// Reads the engine config file in the bundled directory
pub struct BundledSource {
    dir: Option<PathBuf>,
    config_name: String,
    layout: EngineLayout,
}

impl BundledSource {
    pub fn new(dir: Option<PathBuf>, config_name: impl Into<String>, layout: EngineLayout) -> Self {
        Self {
            dir,
            config_name: config_name.into(),
            layout,
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

impl CatalogSource for BundledSource {
    fn name(&self) -> &'static str {
        "bundled"
    }

    fn tier(&self) -> Tier {
        Tier::Default
    }

    fn discover(&self, ctx: &DiscoveryContext) -> Vec<EngineCandidate> {
        let Some(dir) = &self.dir else {
            debug!("no bundled engine directory");
            return Vec::new();
        };

        let path = dir.join(&self.config_name);
        EngineConfigFile::load(&path).candidates(dir, &ctx.host_runtime, &self.layout)
    }
}
