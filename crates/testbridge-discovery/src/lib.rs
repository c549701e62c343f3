//! Testbridge Discovery - find installed test engines and pick one
//!
//! Engine candidates come from three tiers, consulted in priority order:
//!
//! - **Developer**: an engine config file found by walking up from the
//!   target assembly's directory. Always wins when compatible.
//! - **Installed**: product records left behind by engine installers.
//! - **Default**: the engine bundled next to this executable.
//!
//! [`VersionCatalog`] holds what the sources found; [`VersionSelector`]
//! applies the selection policy and reports downgrade situations through a
//! [`WarningSink`].

pub mod candidate;
pub mod catalog;
pub mod engine_file;
pub mod layout;
pub mod policy;
pub mod selector;
pub mod sources;
pub mod warning;

pub use candidate::{EngineCandidate, Tier};
pub use catalog::{CatalogSource, CatalogSources, DiscoveryContext, VersionCatalog};
pub use engine_file::{EngineConfigFile, EngineEntry};
pub use layout::EngineLayout;
pub use policy::{SelectionPolicy, WarningMessages};
pub use selector::VersionSelector;
pub use sources::{
    BundledSource, DeveloperSource, DirectoryProductStore, InstalledSource, MemoryProductStore,
    ProductRecord, ProductStore,
};
pub use warning::{RecordingSink, WarningSink};
