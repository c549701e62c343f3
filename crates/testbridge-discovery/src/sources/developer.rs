//! Developer overrides found next to the target

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::candidate::{EngineCandidate, Tier};
use crate::catalog::{CatalogSource, DiscoveryContext};
use crate::engine_file::EngineConfigFile;
use crate::layout::EngineLayout;

/// Walks up from the target's directory to the nearest engine config file
pub struct DeveloperSource {
    config_name: String,
    layout: EngineLayout,
}

impl DeveloperSource {
    pub fn new(config_name: impl Into<String>, layout: EngineLayout) -> Self {
        Self {
            config_name: config_name.into(),
            layout,
        }
    }

    /// Nearest config file at or above `start`
    pub fn find_config(&self, start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(&self.config_name))
            .find(|path| path.is_file())
    }
}

impl CatalogSource for DeveloperSource {
    fn name(&self) -> &'static str {
        "developer"
    }

    fn tier(&self) -> Tier {
        Tier::Developer
    }

    fn discover(&self, ctx: &DiscoveryContext) -> Vec<EngineCandidate> {
        let Some(start) = ctx.target_dir() else {
            return Vec::new();
        };

        let Some(path) = self.find_config(&start) else {
            debug!(start = %start.display(), name = %self.config_name, "no developer engine config");
            return Vec::new();
        };

        debug!(path = %path.display(), "found developer engine config");
        let dir = path.parent().unwrap_or(Path::new("."));
        EngineConfigFile::load(&path).candidates(dir, &ctx.host_runtime, &self.layout)
    }
}
