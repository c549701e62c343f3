//! Run requests
//!
//! Category filters are part of the request. Hosts that still set them
//! process-wide can go through [`set_ambient`] and
//! [`RunRequest::with_ambient_categories`].

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, PoisonError, RwLock};

use serde::Serialize;
use testbridge_core::config::CategoryConfig;

/// A member of the target assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRef {
    /// A type, by full name
    Type(String),
    /// A method, as seen through `reflected_type`
    ///
    /// The reflected type may be a subclass of the declaring type.
    Method { reflected_type: String, name: String },
    /// Anything else (properties, fields, ...); never runnable
    Other(String),
}

impl MemberRef {
    pub fn method(reflected_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Method {
            reflected_type: reflected_type.into(),
            name: name.into(),
        }
    }

    /// Parse `Ns.Type.Method` into a method reference
    pub fn parse_method(qualified: &str) -> Option<Self> {
        let (ty, name) = qualified.rsplit_once('.')?;
        if ty.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::method(ty, name))
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) | Self::Other(name) => f.write_str(name),
            Self::Method {
                reflected_type,
                name,
            } => write!(f, "{}.{}", reflected_type, name),
        }
    }
}

/// What to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunTarget {
    WholeAssembly,
    ByMember { member: MemberRef },
    ByNamespace { namespace: String },
    /// Tests named directly by full name
    ByFullName { names: BTreeSet<String> },
}

impl RunTarget {
    /// Targets that name a single test directly skip category filtering
    pub fn applies_categories(&self) -> bool {
        !matches!(
            self,
            Self::ByMember {
                member: MemberRef::Method { .. }
            } | Self::ByFullName { .. }
        )
    }
}

/// Include/exclude category lists; an empty list means unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryFilters {
    pub include: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
}

impl CategoryFilters {
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &CategoryConfig) -> Self {
        Self::new(config.include.iter().cloned(), config.exclude.iter().cloned())
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

static AMBIENT_CATEGORIES: OnceLock<RwLock<CategoryFilters>> = OnceLock::new();

fn ambient_slot() -> &'static RwLock<CategoryFilters> {
    AMBIENT_CATEGORIES.get_or_init(|| RwLock::new(CategoryFilters::default()))
}

/// Set the process-wide category filters
pub fn set_ambient(filters: CategoryFilters) {
    let mut slot = ambient_slot()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *slot = filters;
}

/// Current process-wide category filters
pub fn ambient() -> CategoryFilters {
    ambient_slot()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// A request to run tests in one assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRequest {
    pub assembly: PathBuf,
    pub target: RunTarget,
    pub categories: CategoryFilters,
}

impl RunRequest {
    pub fn new(assembly: impl Into<PathBuf>, target: RunTarget) -> Self {
        Self {
            assembly: assembly.into(),
            target,
            categories: CategoryFilters::default(),
        }
    }

    pub fn whole_assembly(assembly: impl Into<PathBuf>) -> Self {
        Self::new(assembly, RunTarget::WholeAssembly)
    }

    pub fn member(assembly: impl Into<PathBuf>, member: MemberRef) -> Self {
        Self::new(assembly, RunTarget::ByMember { member })
    }

    pub fn namespace(assembly: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self::new(
            assembly,
            RunTarget::ByNamespace {
                namespace: namespace.into(),
            },
        )
    }

    pub fn full_names<I, S>(assembly: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            assembly,
            RunTarget::ByFullName {
                names: names.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn with_categories(mut self, categories: CategoryFilters) -> Self {
        self.categories = categories;
        self
    }

    /// Fill unset category filters from the process-wide state
    pub fn with_ambient_categories(mut self) -> Self {
        if self.categories.is_empty() {
            self.categories = ambient();
        }
        self
    }

    pub fn assembly(&self) -> &Path {
        &self.assembly
    }
}
