//! Engine candidates

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use testbridge_core::{EngineVersion, RuntimeVersion};

/// Catalog tier a candidate was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Developer override config walked up from the target
    Developer,
    /// Installed-product records
    Installed,
    /// Bundled fallback
    Default,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Installed => "installed",
            Self::Default => "default",
        }
    }

    /// Tiers in selection precedence order
    pub fn all() -> [Tier; 3] {
        [Self::Developer, Self::Installed, Self::Default]
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discoverable installation of the test engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineCandidate {
    product_version: EngineVersion,
    runtime_version: RuntimeVersion,
    location: PathBuf,
}

impl EngineCandidate {
    pub fn new(
        product_version: EngineVersion,
        runtime_version: RuntimeVersion,
        location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            product_version,
            runtime_version,
            location: location.into(),
        }
    }

    pub fn product_version(&self) -> EngineVersion {
        self.product_version
    }

    pub fn runtime_version(&self) -> &RuntimeVersion {
        &self.runtime_version
    }

    /// Base directory of this runtime variant
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Directory holding the engine's support files
    pub fn lib_dir(&self) -> PathBuf {
        self.location.join("lib")
    }
}

impl fmt::Display for EngineCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) at {}",
            self.product_version,
            self.runtime_version,
            self.location.display()
        )
    }
}
