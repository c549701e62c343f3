//! Catalog sources, one per tier

mod bundled;
mod developer;
mod installed;

pub use bundled::BundledSource;
pub use developer::DeveloperSource;
pub use installed::{
    DirectoryProductStore, InstalledSource, MemoryProductStore, ProductRecord, ProductStore,
};
