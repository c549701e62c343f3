//! Engine metadata: what the engine knows about the target's types
//!
//! Test and fixture markers differ between engine generations, so marker
//! checks go through the [`EngineGeneration`] chosen once at resolution time.

use std::fmt;

use serde::{Deserialize, Serialize};
use testbridge_core::EngineVersion;

/// Inheritance chains longer than this are treated as malformed
const MAX_INHERITANCE_DEPTH: usize = 64;

/// API generation of a resolved engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EngineGeneration {
    V24,
    V25,
    V26,
    V3,
}

impl EngineGeneration {
    pub fn from_version(version: EngineVersion) -> Self {
        match (version.major(), version.minor()) {
            (0..=1, _) | (2, 0..=4) => Self::V24,
            (2, 5) => Self::V25,
            (2, _) => Self::V26,
            _ => Self::V3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V24 => "2.4",
            Self::V25 => "2.5",
            Self::V26 => "2.6",
            Self::V3 => "3.x",
        }
    }

    pub fn markers(&self) -> FrameworkMarkers {
        match self {
            Self::V24 => FrameworkMarkers {
                test: &[TEST_ATTRIBUTE],
                fixture: &[FIXTURE_ATTRIBUTE],
            },
            Self::V25 | Self::V26 => FrameworkMarkers {
                test: &[
                    TEST_ATTRIBUTE,
                    "NUnit.Framework.TestCaseAttribute",
                    "NUnit.Framework.TestCaseSourceAttribute",
                    "NUnit.Framework.TheoryAttribute",
                ],
                fixture: &[FIXTURE_ATTRIBUTE],
            },
            Self::V3 => FrameworkMarkers {
                test: &[
                    TEST_ATTRIBUTE,
                    "NUnit.Framework.TestCaseAttribute",
                    "NUnit.Framework.TestCaseSourceAttribute",
                    "NUnit.Framework.TheoryAttribute",
                ],
                fixture: &[FIXTURE_ATTRIBUTE, "NUnit.Framework.TestFixtureSourceAttribute"],
            },
        }
    }

    /// Classes holding tests are fixtures even without a fixture marker
    pub fn implicit_fixtures(&self) -> bool {
        *self >= Self::V25
    }

    /// Bad-signature tests come back as `Failed` labelled `Invalid`
    pub fn labels_invalid_as_failed(&self) -> bool {
        *self == Self::V3
    }
}

impl fmt::Display for EngineGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TEST_ATTRIBUTE: &str = "NUnit.Framework.TestAttribute";
const FIXTURE_ATTRIBUTE: &str = "NUnit.Framework.TestFixtureAttribute";

/// Attribute names that mark tests and fixtures
#[derive(Debug, Clone, Copy)]
pub struct FrameworkMarkers {
    test: &'static [&'static str],
    fixture: &'static [&'static str],
}

impl FrameworkMarkers {
    pub fn is_test(&self, attributes: &[String]) -> bool {
        attributes.iter().any(|a| self.test.contains(&a.as_str()))
    }

    pub fn is_fixture(&self, attributes: &[String]) -> bool {
        attributes.iter().any(|a| self.fixture.contains(&a.as_str()))
    }
}

/// A type in the target assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Namespace-qualified name, e.g. `Example.Tests.MathTests`
    #[serde(rename = "name")]
    pub full_name: String,
    #[serde(default = "default_true", rename = "public")]
    pub is_public: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, rename = "sealed")]
    pub is_sealed: bool,
    #[serde(default, rename = "base")]
    pub base_type: Option<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Open generic definition (e.g. ``Example.Tests.ListTests`1``)
    #[serde(default)]
    pub generic_definition: bool,
}

impl TypeInfo {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            is_public: true,
            is_abstract: false,
            is_sealed: false,
            base_type: None,
            attributes: Vec::new(),
            generic_definition: false,
        }
    }

    /// Static types are abstract and sealed
    pub fn is_static(&self) -> bool {
        self.is_abstract && self.is_sealed
    }

    pub fn namespace(&self) -> &str {
        namespace_of(&self.full_name)
    }
}

/// A method declared on a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub declaring_type: String,
    pub name: String,
    #[serde(default = "default_true", rename = "public")]
    pub is_public: bool,
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Full name of the base method this overrides, e.g. `Example.BaseTests.Adds`
    #[serde(default)]
    pub overrides: Option<String>,
}

impl MethodInfo {
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.declaring_type, self.name)
    }
}

fn default_true() -> bool {
    true
}

/// Namespace part of a type name (everything before the last `.`)
pub fn namespace_of(full_name: &str) -> &str {
    full_name.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("")
}

/// Type and method metadata for a loaded target
pub trait EngineMetadataProvider {
    /// Generation of the engine that loaded the target
    fn generation(&self) -> EngineGeneration;

    /// Public types of the assembly
    fn exported_types(&self) -> Vec<&TypeInfo>;

    /// Any type of the assembly, public or not
    fn type_info(&self, full_name: &str) -> Option<&TypeInfo>;

    /// A method declared directly on `type_name`
    fn declared_method(&self, type_name: &str, name: &str) -> Option<&MethodInfo>;

    /// Closed instantiations of a generic definition the engine discovered
    fn known_instantiations(&self, generic_definition: &str) -> Vec<String>;

    /// Find `name` on `type_name` or the nearest base type declaring it
    fn find_method(&self, type_name: &str, name: &str) -> Option<&MethodInfo> {
        let mut current = Some(type_name.to_string());
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let ty = current?;
            if let Some(method) = self.declared_method(&ty, name) {
                return Some(method);
            }
            current = self.type_info(&ty).and_then(|t| t.base_type.clone());
        }
        None
    }

    /// Whether `candidate` is `base` or derives from it
    fn is_assignable(&self, base: &str, candidate: &str) -> bool {
        let mut current = Some(candidate.to_string());
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(ty) = current else {
                return false;
            };
            if ty == base {
                return true;
            }
            current = self.type_info(&ty).and_then(|t| t.base_type.clone());
        }
        false
    }

    /// Full name of the root method an override chain starts from
    fn base_definition(&self, method: &MethodInfo) -> String {
        let mut root = method.full_name();
        let mut next = method.overrides.clone();
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(full_name) = next else {
                break;
            };
            next = full_name
                .rsplit_once('.')
                .and_then(|(ty, name)| self.declared_method(ty, name))
                .and_then(|m| m.overrides.clone());
            root = full_name;
        }
        root
    }

    fn has_test_marker(&self, method: &MethodInfo) -> bool {
        self.generation().markers().is_test(&method.attributes)
    }

    fn has_fixture_marker(&self, ty: &TypeInfo) -> bool {
        self.generation().markers().is_fixture(&ty.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fixed {
        types: Vec<TypeInfo>,
        methods: HashMap<(String, String), MethodInfo>,
    }

    impl EngineMetadataProvider for Fixed {
        fn generation(&self) -> EngineGeneration {
            EngineGeneration::V25
        }

        fn exported_types(&self) -> Vec<&TypeInfo> {
            self.types.iter().filter(|t| t.is_public).collect()
        }

        fn type_info(&self, full_name: &str) -> Option<&TypeInfo> {
            self.types.iter().find(|t| t.full_name == full_name)
        }

        fn declared_method(&self, type_name: &str, name: &str) -> Option<&MethodInfo> {
            self.methods.get(&(type_name.to_string(), name.to_string()))
        }

        fn known_instantiations(&self, _generic_definition: &str) -> Vec<String> {
            Vec::new()
        }
    }

    fn method(ty: &str, name: &str, overrides: Option<&str>) -> MethodInfo {
        MethodInfo {
            declaring_type: ty.to_string(),
            name: name.to_string(),
            is_public: true,
            attributes: vec![TEST_ATTRIBUTE.to_string()],
            overrides: overrides.map(str::to_string),
        }
    }

    fn hierarchy() -> Fixed {
        let mut base = TypeInfo::new("Ex.Base");
        base.is_abstract = true;
        let mut middle = TypeInfo::new("Ex.Middle");
        middle.base_type = Some("Ex.Base".to_string());
        let mut leaf = TypeInfo::new("Ex.Leaf");
        leaf.base_type = Some("Ex.Middle".to_string());

        let mut methods = HashMap::new();
        for m in [
            method("Ex.Base", "Runs", None),
            method("Ex.Middle", "Runs", Some("Ex.Base.Runs")),
            method("Ex.Leaf", "Runs", Some("Ex.Middle.Runs")),
            method("Ex.Base", "Inherited", None),
        ] {
            methods.insert((m.declaring_type.clone(), m.name.clone()), m);
        }

        Fixed {
            types: vec![base, middle, leaf],
            methods,
        }
    }

    #[test]
    fn test_generation_from_version() {
        let v = |s: &str| EngineVersion::parse(s).unwrap();
        assert_eq!(EngineGeneration::from_version(v("2.4.8.0")), EngineGeneration::V24);
        assert_eq!(EngineGeneration::from_version(v("2.5.0.9122")), EngineGeneration::V25);
        assert_eq!(EngineGeneration::from_version(v("2.6.4.14350")), EngineGeneration::V26);
        assert_eq!(EngineGeneration::from_version(v("3.0.5813.0")), EngineGeneration::V3);
    }

    #[test]
    fn test_markers_per_generation() {
        let test_case = vec!["NUnit.Framework.TestCaseAttribute".to_string()];
        assert!(!EngineGeneration::V24.markers().is_test(&test_case));
        assert!(EngineGeneration::V25.markers().is_test(&test_case));

        let source = vec!["NUnit.Framework.TestFixtureSourceAttribute".to_string()];
        assert!(!EngineGeneration::V26.markers().is_fixture(&source));
        assert!(EngineGeneration::V3.markers().is_fixture(&source));
    }

    #[test]
    fn test_assignable_walks_bases() {
        let meta = hierarchy();
        assert!(meta.is_assignable("Ex.Base", "Ex.Leaf"));
        assert!(meta.is_assignable("Ex.Leaf", "Ex.Leaf"));
        assert!(!meta.is_assignable("Ex.Leaf", "Ex.Base"));
        assert!(!meta.is_assignable("Ex.Base", "Ex.Unknown"));
    }

    #[test]
    fn test_find_and_base_definition() {
        let meta = hierarchy();

        let inherited = meta.find_method("Ex.Leaf", "Inherited").unwrap();
        assert_eq!(inherited.declaring_type, "Ex.Base");

        let leaf = meta.find_method("Ex.Leaf", "Runs").unwrap();
        assert_eq!(leaf.declaring_type, "Ex.Leaf");
        assert_eq!(meta.base_definition(leaf), "Ex.Base.Runs");
        assert_eq!(meta.base_definition(inherited), "Ex.Base.Inherited");
    }

    #[test]
    fn test_cyclic_bases_terminate() {
        let mut a = TypeInfo::new("Ex.A");
        a.base_type = Some("Ex.B".to_string());
        let mut b = TypeInfo::new("Ex.B");
        b.base_type = Some("Ex.A".to_string());
        let meta = Fixed {
            types: vec![a, b],
            methods: HashMap::new(),
        };

        assert!(!meta.is_assignable("Ex.C", "Ex.A"));
        assert!(meta.find_method("Ex.A", "Nope").is_none());
    }

    #[test]
    fn test_namespace_of() {
        assert_eq!(namespace_of("Ex.Sub.Fixture"), "Ex.Sub");
        assert_eq!(namespace_of("Fixture"), "");
    }
}
