//! Engine-neutral test filters
//!
//! A [`Filter`] is built once per request and handed to the engine, which
//! lowers it into its own filter representation through a
//! [`FilterTranslator`](crate::engine::FilterTranslator). [`Filter::matches`]
//! is the reference evaluation every translation must agree with.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Which explicit markers an [`Filter::Explicit`] test looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplicitScope {
    /// The test itself is explicit
    Test,
    /// The test's fixture is explicit
    Fixture,
    /// Either
    Any,
}

/// A predicate over test cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum Filter {
    MatchAll,
    /// Test full name is in the set
    MatchFullName(BTreeSet<String>),
    /// Fixture (or its generic definition) is in the set
    MatchClass(BTreeSet<String>),
    /// Fixture is in the first set and the test method's base definition is in the second
    MatchClassAndMethod(BTreeSet<String>, BTreeSet<String>),
    /// Fixture namespace equals or is nested under this one
    MatchNamespace(String),
    /// Test or fixture carries any of these categories
    HasCategory(BTreeSet<String>),
    Explicit(ExplicitScope),
    And(Box<Filter>, Box<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

/// The view of an engine test case a filter needs
pub trait TestNode {
    fn full_name(&self) -> &str;
    /// Full name of the fixture instance (closed type for generic fixtures)
    fn fixture_name(&self) -> &str;
    /// Open generic definition the fixture was built from
    fn generic_definition(&self) -> Option<&str>;
    fn namespace(&self) -> &str;
    /// Base definition of the test method
    fn method_identity(&self) -> &str;
    /// Own categories plus the fixture's
    fn categories(&self) -> &[String];
    fn is_explicit(&self) -> bool;
    fn fixture_is_explicit(&self) -> bool;
}

impl Filter {
    pub fn and(self, other: Filter) -> Filter {
        Filter::And(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Filter {
        Filter::Not(Box::new(self))
    }

    pub fn names<I, S>(names: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(Into::into).collect()
    }

    /// Reference evaluation
    pub fn matches(&self, node: &dyn TestNode) -> bool {
        match self {
            Self::MatchAll => true,
            Self::MatchFullName(names) => names.contains(node.full_name()),
            Self::MatchClass(classes) => class_matches(classes, node),
            Self::MatchClassAndMethod(classes, methods) => {
                class_matches(classes, node) && methods.contains(node.method_identity())
            }
            Self::MatchNamespace(ns) => namespace_matches(ns, node.namespace()),
            Self::HasCategory(categories) => {
                node.categories().iter().any(|c| categories.contains(c))
            }
            Self::Explicit(scope) => match scope {
                ExplicitScope::Test => node.is_explicit(),
                ExplicitScope::Fixture => node.fixture_is_explicit(),
                ExplicitScope::Any => node.is_explicit() || node.fixture_is_explicit(),
            },
            Self::And(a, b) => a.matches(node) && b.matches(node),
            Self::Or(filters) => filters.iter().any(|f| f.matches(node)),
            Self::Not(inner) => !inner.matches(node),
        }
    }
}

fn class_matches(classes: &BTreeSet<String>, node: &dyn TestNode) -> bool {
    classes.contains(node.fixture_name())
        || node
            .generic_definition()
            .is_some_and(|def| classes.contains(def))
}

/// `ns` is empty, equal to `candidate`, or a dotted prefix of it
pub fn namespace_matches(ns: &str, candidate: &str) -> bool {
    ns.is_empty()
        || candidate == ns
        || candidate
            .strip_prefix(ns)
            .is_some_and(|rest| rest.starts_with('.'))
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(set: &BTreeSet<String>) -> String {
            set.iter().cloned().collect::<Vec<_>>().join(", ")
        }

        match self {
            Self::MatchAll => f.write_str("*"),
            Self::MatchFullName(names) => write!(f, "name in [{}]", list(names)),
            Self::MatchClass(classes) => write!(f, "class in [{}]", list(classes)),
            Self::MatchClassAndMethod(classes, methods) => write!(
                f,
                "class in [{}] and method in [{}]",
                list(classes),
                list(methods)
            ),
            Self::MatchNamespace(ns) => write!(f, "namespace {}", ns),
            Self::HasCategory(categories) => write!(f, "category in [{}]", list(categories)),
            Self::Explicit(scope) => write!(f, "explicit({:?})", scope),
            Self::And(a, b) => write!(f, "({} and {})", a, b),
            Self::Or(filters) => {
                let parts: Vec<String> = filters.iter().map(|p| p.to_string()).collect();
                write!(f, "({})", parts.join(" or "))
            }
            Self::Not(inner) => write!(f, "not {}", inner),
        }
    }
}
