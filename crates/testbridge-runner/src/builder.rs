//! Request to filter translation

use std::collections::BTreeSet;

use tracing::debug;

use crate::filter::{ExplicitScope, Filter};
use crate::metadata::EngineMetadataProvider;
use crate::request::{CategoryFilters, MemberRef, RunRequest, RunTarget};

/// Builds the filter for a request from the loaded target's metadata
///
/// Metadata must come from an engine that has already scanned the target so
/// generic fixture instantiations are known.
pub struct TestFilterBuilder<'a> {
    metadata: &'a dyn EngineMetadataProvider,
}

impl<'a> TestFilterBuilder<'a> {
    pub fn new(metadata: &'a dyn EngineMetadataProvider) -> Self {
        Self { metadata }
    }

    pub fn build(&self, request: &RunRequest) -> Filter {
        let base = match &request.target {
            RunTarget::WholeAssembly => {
                Filter::MatchAll.and(Filter::Explicit(ExplicitScope::Any).not())
            }
            RunTarget::ByNamespace { namespace } => Filter::MatchNamespace(namespace.clone())
                .and(Filter::Explicit(ExplicitScope::Any).not()),
            RunTarget::ByMember { member } => self.member_filter(member),
            RunTarget::ByFullName { names } => Filter::MatchFullName(names.clone()),
        };

        let filter = if request.target.applies_categories() {
            with_categories(base, &request.categories)
        } else {
            base
        };

        debug!(target = ?request.target, %filter, "built test filter");
        filter
    }

    fn member_filter(&self, member: &MemberRef) -> Filter {
        match member {
            // Fixtures targeted directly run even when marked explicit.
            MemberRef::Type(name) => Filter::MatchClass(self.candidate_types(name))
                .and(Filter::Explicit(ExplicitScope::Test).not()),
            MemberRef::Method {
                reflected_type,
                name,
            } => {
                let Some(method) = self.metadata.find_method(reflected_type, name) else {
                    return Filter::Or(Vec::new());
                };
                let identity = self.metadata.base_definition(method);
                Filter::MatchClassAndMethod(
                    self.candidate_types(reflected_type),
                    BTreeSet::from([identity]),
                )
            }
            MemberRef::Other(_) => Filter::Or(Vec::new()),
        }
    }

    /// Fixture types a type target expands to
    ///
    /// Abstract (non-static) types expand to every concrete exported type
    /// assignable to them. Generic definitions add the instantiations the
    /// engine knows about.
    pub fn candidate_types(&self, type_name: &str) -> BTreeSet<String> {
        let mut types = BTreeSet::new();

        match self.metadata.type_info(type_name) {
            Some(info) if info.is_abstract && !info.is_sealed => {
                for candidate in self.metadata.exported_types() {
                    if !candidate.is_abstract
                        && self.metadata.is_assignable(type_name, &candidate.full_name)
                    {
                        types.insert(candidate.full_name.clone());
                    }
                }
            }
            _ => {
                types.insert(type_name.to_string());
            }
        }

        let definitions: Vec<String> = types
            .iter()
            .filter(|t| {
                self.metadata
                    .type_info(t)
                    .is_some_and(|info| info.generic_definition)
            })
            .cloned()
            .collect();
        for definition in definitions {
            types.extend(self.metadata.known_instantiations(&definition));
        }

        types
    }
}

/// AND the include and exclude lists onto `base`
pub fn with_categories(base: Filter, categories: &CategoryFilters) -> Filter {
    let mut filter = base;
    if !categories.include.is_empty() {
        filter = filter.and(Filter::HasCategory(categories.include.clone()));
    }
    if !categories.exclude.is_empty() {
        filter = filter.and(Filter::HasCategory(categories.exclude.clone()).not());
    }
    filter
}
