//! Engine capability interfaces
//!
//! The coordinator only talks to engines through these traits. Each engine
//! generation supplies its own implementation.

pub mod manifest;

use std::path::{Path, PathBuf};

use serde::Serialize;
use testbridge_core::EngineVersion;
use testbridge_discovery::EngineCandidate;

use crate::error::Result;
use crate::events::EngineEvent;
use crate::filter::Filter;
use crate::metadata::{EngineGeneration, EngineMetadataProvider};

pub use manifest::{ManifestEngineProvider, ManifestInspector};

/// The test framework a target assembly was built against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkReference {
    pub name: String,
    pub version: EngineVersion,
}

/// What inspecting a target without loading it yields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblyInfo {
    pub name: String,
    pub path: PathBuf,
    /// `None` when the target references no test framework
    pub framework: Option<FrameworkReference>,
}

/// Reads a target's references in isolation
pub trait AssemblyInspector: Send + Sync {
    fn inspect(&self, path: &Path) -> Result<AssemblyInfo>;
}

/// Creates sessions for a resolved engine candidate
pub trait EngineProvider: Send + Sync {
    /// Provider name (e.g. "manifest")
    fn name(&self) -> &'static str;

    fn open(
        &self,
        candidate: &EngineCandidate,
        generation: EngineGeneration,
    ) -> Result<Box<dyn EngineSession>>;
}

/// One loaded target inside an engine
pub trait EngineSession {
    /// Load the target and scan it for tests
    fn load(&mut self, assembly: &Path) -> Result<()>;

    /// Metadata of the loaded target
    fn metadata(&self) -> Result<&dyn EngineMetadataProvider>;

    /// Number of test cases `filter` selects
    fn count(&self, filter: &Filter) -> Result<usize>;

    /// Run the selected tests, pushing events in emission order
    fn run(&mut self, filter: &Filter, events: &mut dyn FnMut(EngineEvent)) -> Result<()>;
}

/// Lowers a [`Filter`] into an engine's own filter type
pub trait FilterTranslator {
    type Native;

    fn translate(&self, filter: &Filter) -> Self::Native;
}
