//! In-process engine driven by assembly manifests
//!
//! A manifest is a JSON description of a test assembly: its framework
//! reference, exported types with their test methods, and scripted outcomes.
//!
//! ```json
//! {
//!   "name": "Example.Tests",
//!   "framework": { "name": "nunit.framework", "version": "2.5.5.0" },
//!   "types": [{
//!     "name": "Example.Tests.MathTests",
//!     "attributes": ["NUnit.Framework.TestFixtureAttribute"],
//!     "methods": [{
//!       "name": "Adds",
//!       "attributes": ["NUnit.Framework.TestAttribute"],
//!       "outcome": { "status": "failed", "message": "Expected 4" }
//!     }]
//!   }]
//! }
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use testbridge_core::EngineVersion;
use testbridge_discovery::EngineCandidate;
use tracing::{debug, info, warn};

use super::{
    AssemblyInfo, AssemblyInspector, EngineProvider, EngineSession, FilterTranslator,
    FrameworkReference,
};
use crate::error::{Result, RunnerError};
use crate::events::{EngineEvent, FailureSite, NativeResult, NativeStatus, NativeSuiteResult};
use crate::filter::{namespace_matches, ExplicitScope, Filter, TestNode};
use crate::metadata::{namespace_of, EngineGeneration, EngineMetadataProvider, MethodInfo, TypeInfo};

const ENGINE_NAME: &str = "manifest";

/// Parsed assembly manifest
#[derive(Debug, Clone, Deserialize)]
pub struct AssemblyManifest {
    pub name: String,
    #[serde(default)]
    pub framework: Option<FrameworkManifest>,
    #[serde(default)]
    pub types: Vec<TypeManifest>,
    /// Reported after the run, outside of any test
    #[serde(default)]
    pub unhandled_exceptions: Vec<String>,
}

/// Test framework the assembly references
#[derive(Debug, Clone, Deserialize)]
pub struct FrameworkManifest {
    pub name: String,
    pub version: EngineVersion,
}

/// A type declared in the assembly
#[derive(Debug, Clone, Deserialize)]
pub struct TypeManifest {
    pub name: String,
    #[serde(default = "default_true")]
    pub public: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub sealed: bool,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub generic_definition: bool,
    /// Closed instantiations, e.g. `Example.ListTests<Int32>`
    #[serde(default)]
    pub instantiations: Vec<String>,
    #[serde(default)]
    pub setup_failure: Option<ScriptedFailure>,
    #[serde(default)]
    pub teardown_failure: Option<ScriptedFailure>,
    #[serde(default)]
    pub methods: Vec<MethodManifest>,
}

/// A method declared on a type
#[derive(Debug, Clone, Deserialize)]
pub struct MethodManifest {
    pub name: String,
    #[serde(default = "default_true")]
    pub public: bool,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub overrides: Option<String>,
    #[serde(default)]
    pub outcome: ScriptedOutcome,
    #[serde(default)]
    pub output: Option<String>,
    /// Makes the engine itself fault when this test runs
    #[serde(default)]
    pub engine_fault: Option<String>,
}

/// What running a test method produces
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptedOutcome {
    #[serde(default)]
    pub status: NativeStatus,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stack_trace: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

/// A fixture setup or teardown failure
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedFailure {
    pub message: String,
    #[serde(default)]
    pub stack_trace: Option<String>,
}

fn default_true() -> bool {
    true
}

impl AssemblyManifest {
    /// Parse a manifest from JSON text
    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RunnerError::load(path, e.to_string()))?;
        Self::parse(&content).map_err(|source| RunnerError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Reads the framework reference from a manifest
#[derive(Debug, Clone, Default)]
pub struct ManifestInspector;

impl AssemblyInspector for ManifestInspector {
    fn inspect(&self, path: &Path) -> Result<AssemblyInfo> {
        let manifest = AssemblyManifest::load(path)?;
        Ok(AssemblyInfo {
            name: manifest.name,
            path: path.to_path_buf(),
            framework: manifest.framework.map(|f| FrameworkReference {
                name: f.name,
                version: f.version,
            }),
        })
    }
}

/// Opens [`ManifestSession`]s
#[derive(Debug, Clone, Default)]
pub struct ManifestEngineProvider;

impl ManifestEngineProvider {
    /// Create a provider
    pub fn new() -> Self {
        Self
    }
}

impl EngineProvider for ManifestEngineProvider {
    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    fn open(
        &self,
        candidate: &EngineCandidate,
        generation: EngineGeneration,
    ) -> Result<Box<dyn EngineSession>> {
        debug!(engine = %candidate, %generation, "opening manifest session");
        Ok(Box::new(ManifestSession::new(generation)))
    }
}

/// Type and method tables of a loaded manifest
#[derive(Debug, Clone)]
struct ManifestMetadata {
    generation: EngineGeneration,
    types: Vec<TypeInfo>,
    methods: HashMap<(String, String), MethodInfo>,
    instantiations: HashMap<String, Vec<String>>,
}

impl ManifestMetadata {
    fn build(manifest: &AssemblyManifest, generation: EngineGeneration) -> Self {
        let mut types = Vec::new();
        let mut methods = HashMap::new();
        let mut instantiations = HashMap::new();

        for ty in &manifest.types {
            types.push(TypeInfo {
                full_name: ty.name.clone(),
                is_public: ty.public,
                is_abstract: ty.is_abstract,
                is_sealed: ty.sealed,
                base_type: ty.base.clone(),
                attributes: ty.attributes.clone(),
                generic_definition: ty.generic_definition,
            });

            if ty.generic_definition {
                instantiations.insert(ty.name.clone(), ty.instantiations.clone());
            }

            for method in &ty.methods {
                methods.insert(
                    (ty.name.clone(), method.name.clone()),
                    MethodInfo {
                        declaring_type: ty.name.clone(),
                        name: method.name.clone(),
                        is_public: method.public,
                        attributes: method.attributes.clone(),
                        overrides: method.overrides.clone(),
                    },
                );
            }
        }

        Self {
            generation,
            types,
            methods,
            instantiations,
        }
    }

    /// Test markers are inherited along the override chain
    fn is_test_method(&self, method: &MethodInfo) -> bool {
        let mut current = Some(method);
        let mut seen = HashSet::new();
        while let Some(m) = current {
            if !seen.insert(m.full_name()) {
                break;
            }
            if self.has_test_marker(m) {
                return true;
            }
            current = m
                .overrides
                .as_deref()
                .and_then(|o| o.rsplit_once('.'))
                .and_then(|(ty, name)| self.declared_method(ty, name));
        }
        false
    }

    /// Types from `type_name` up through its bases, most derived first
    fn chain(&self, type_name: &str) -> Vec<&TypeInfo> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.type_info(type_name);
        while let Some(ty) = current {
            if !seen.insert(ty.full_name.as_str()) {
                break;
            }
            chain.push(ty);
            current = ty.base_type.as_deref().and_then(|b| self.type_info(b));
        }
        chain
    }
}

impl EngineMetadataProvider for ManifestMetadata {
    fn generation(&self) -> EngineGeneration {
        self.generation
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

    fn known_instantiations(&self, generic_definition: &str) -> Vec<String> {
        self.instantiations
            .get(generic_definition)
            .cloned()
            .unwrap_or_default()
    }
}

/// A discovered test case
#[derive(Debug, Clone)]
struct TestCaseNode {
    full_name: String,
    fixture: String,
    generic_definition: Option<String>,
    namespace: String,
    method_identity: String,
    categories: Vec<String>,
    explicit: bool,
    fixture_explicit: bool,
    outcome: ScriptedOutcome,
    output: Option<String>,
    engine_fault: Option<String>,
}

impl TestNode for TestCaseNode {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn fixture_name(&self) -> &str {
        &self.fixture
    }

    fn generic_definition(&self) -> Option<&str> {
        self.generic_definition.as_deref()
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn method_identity(&self) -> &str {
        &self.method_identity
    }

    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn is_explicit(&self) -> bool {
        self.explicit
    }

    fn fixture_is_explicit(&self) -> bool {
        self.fixture_explicit
    }
}

/// One fixture instance
#[derive(Debug, Clone)]
struct SuiteNode {
    name: String,
    setup_failure: Option<ScriptedFailure>,
    teardown_failure: Option<ScriptedFailure>,
    tests: Vec<TestCaseNode>,
}

#[derive(Debug)]
struct LoadedAssembly {
    path: PathBuf,
    metadata: ManifestMetadata,
    suites: Vec<SuiteNode>,
    unhandled_exceptions: Vec<String>,
}

impl LoadedAssembly {
    fn build(path: &Path, manifest: AssemblyManifest, generation: EngineGeneration) -> Self {
        let metadata = ManifestMetadata::build(&manifest, generation);
        let scripts: HashMap<(&str, &str), &MethodManifest> = manifest
            .types
            .iter()
            .flat_map(|t| t.methods.iter().map(move |m| ((t.name.as_str(), m.name.as_str()), m)))
            .collect();

        let mut suites = Vec::new();
        for ty in &manifest.types {
            if !ty.public || ty.is_abstract {
                continue;
            }

            let tests = Self::test_methods(&metadata, &ty.name);
            let is_fixture = generation.markers().is_fixture(&ty.attributes)
                || (generation.implicit_fixtures() && !tests.is_empty());
            if !is_fixture {
                continue;
            }

            let instances: Vec<(String, Option<String>)> = if ty.generic_definition {
                ty.instantiations
                    .iter()
                    .map(|closed| (closed.clone(), Some(ty.name.clone())))
                    .collect()
            } else {
                vec![(ty.name.clone(), None)]
            };

            for (fixture, definition) in instances {
                let mut cases: Vec<TestCaseNode> = tests
                    .iter()
                    .filter_map(|method| {
                        let script = scripts.get(&(method.declaring_type.as_str(), method.name.as_str()))?;
                        let mut categories = ty.categories.clone();
                        categories.extend(script.categories.iter().cloned());
                        Some(TestCaseNode {
                            full_name: format!("{}.{}", fixture, method.name),
                            fixture: fixture.clone(),
                            generic_definition: definition.clone(),
                            namespace: namespace_of(&ty.name).to_string(),
                            method_identity: metadata.base_definition(method),
                            categories,
                            explicit: script.explicit,
                            fixture_explicit: ty.explicit,
                            outcome: script.outcome.clone(),
                            output: script.output.clone(),
                            engine_fault: script.engine_fault.clone(),
                        })
                    })
                    .collect();
                cases.sort_by(|a, b| a.full_name.cmp(&b.full_name));

                suites.push(SuiteNode {
                    name: fixture,
                    setup_failure: ty.setup_failure.clone(),
                    teardown_failure: ty.teardown_failure.clone(),
                    tests: cases,
                });
            }
        }

        info!(
            path = %path.display(),
            fixtures = suites.len(),
            tests = suites.iter().map(|s| s.tests.len()).sum::<usize>(),
            "manifest loaded"
        );

        Self {
            path: path.to_path_buf(),
            metadata,
            suites,
            unhandled_exceptions: manifest.unhandled_exceptions,
        }
    }

    /// Public test methods visible on a type, overrides replacing base methods
    fn test_methods(metadata: &ManifestMetadata, type_name: &str) -> Vec<MethodInfo> {
        let mut seen = HashSet::new();
        let mut tests = Vec::new();

        for ty in metadata.chain(type_name) {
            let mut declared: Vec<&MethodInfo> = metadata
                .methods
                .values()
                .filter(|m| m.declaring_type == ty.full_name)
                .collect();
            declared.sort_by(|a, b| a.name.cmp(&b.name));

            for method in declared {
                if !seen.insert(method.name.clone()) {
                    continue;
                }
                if method.is_public && metadata.is_test_method(method) {
                    tests.push(method.clone());
                }
            }
        }
        tests
    }
}

/// Lowered filter for manifest test cases
struct ManifestFilter(Box<dyn Fn(&TestCaseNode) -> bool>);

impl ManifestFilter {
    fn accepts(&self, test: &TestCaseNode) -> bool {
        (self.0)(test)
    }
}

struct ManifestTranslator;

impl FilterTranslator for ManifestTranslator {
    type Native = ManifestFilter;

    fn translate(&self, filter: &Filter) -> ManifestFilter {
        let native: Box<dyn Fn(&TestCaseNode) -> bool> = match filter.clone() {
            Filter::MatchAll => Box::new(|_| true),
            Filter::MatchFullName(names) => Box::new(move |t| names.contains(&t.full_name)),
            Filter::MatchClass(classes) => Box::new(move |t| in_classes(&classes, t)),
            Filter::MatchClassAndMethod(classes, methods) => Box::new(move |t| {
                in_classes(&classes, t) && methods.contains(&t.method_identity)
            }),
            Filter::MatchNamespace(ns) => Box::new(move |t| namespace_matches(&ns, &t.namespace)),
            Filter::HasCategory(categories) => {
                Box::new(move |t| t.categories.iter().any(|c| categories.contains(c)))
            }
            Filter::Explicit(ExplicitScope::Test) => Box::new(|t| t.explicit),
            Filter::Explicit(ExplicitScope::Fixture) => Box::new(|t| t.fixture_explicit),
            Filter::Explicit(ExplicitScope::Any) => Box::new(|t| t.explicit || t.fixture_explicit),
            Filter::And(a, b) => {
                let (a, b) = (self.translate(&a), self.translate(&b));
                Box::new(move |t| a.accepts(t) && b.accepts(t))
            }
            Filter::Or(filters) => {
                let lowered: Vec<ManifestFilter> = filters.iter().map(|f| self.translate(f)).collect();
                Box::new(move |t| lowered.iter().any(|f| f.accepts(t)))
            }
            Filter::Not(inner) => {
                let inner = self.translate(&inner);
                Box::new(move |t| !inner.accepts(t))
            }
        };
        ManifestFilter(native)
    }
}

fn in_classes(classes: &BTreeSet<String>, test: &TestCaseNode) -> bool {
    classes.contains(&test.fixture)
        || test
            .generic_definition
            .as_ref()
            .is_some_and(|d| classes.contains(d))
}

/// A manifest loaded into the reference engine
pub struct ManifestSession {
    generation: EngineGeneration,
    loaded: Option<LoadedAssembly>,
}

impl ManifestSession {
    /// Create a session with nothing loaded
    pub fn new(generation: EngineGeneration) -> Self {
        Self {
            generation,
            loaded: None,
        }
    }

    fn loaded(&self) -> Result<&LoadedAssembly> {
        self.loaded
            .as_ref()
            .ok_or_else(|| RunnerError::engine(ENGINE_NAME, "no assembly loaded"))
    }

    fn run_test(test: &TestCaseNode) -> Result<NativeResult> {
        if let Some(fault) = &test.engine_fault {
            return Err(RunnerError::engine(ENGINE_NAME, fault.clone()));
        }

        let outcome = &test.outcome;
        Ok(NativeResult {
            full_name: test.full_name.clone(),
            status: outcome.status,
            label: outcome.label.clone(),
            message: outcome.message.clone(),
            stack_trace: outcome.stack_trace.clone(),
            duration: Duration::from_millis(outcome.duration_ms),
            output: test.output.clone(),
            site: FailureSite::Test,
        })
    }

    fn run_suite(
        suite: &SuiteNode,
        filter: &ManifestFilter,
        events: &mut dyn FnMut(EngineEvent),
    ) -> Result<()> {
        let selected: Vec<&TestCaseNode> = suite.tests.iter().filter(|t| filter.accepts(t)).collect();
        if selected.is_empty() {
            return Ok(());
        }
        debug!(suite = %suite.name, tests = selected.len(), "running suite");

        if let Some(failure) = &suite.setup_failure {
            let children: Vec<NativeResult> = selected
                .iter()
                .map(|t| {
                    NativeResult::new(t.full_name.clone(), NativeStatus::Failed)
                        .with_message(format!("OneTimeSetUp: {}", failure.message))
                        .with_site(FailureSite::Parent)
                })
                .collect();
            for child in &children {
                events(EngineEvent::TestFinished {
                    result: child.clone(),
                });
            }
            events(EngineEvent::SuiteFinished {
                result: NativeSuiteResult {
                    full_name: suite.name.clone(),
                    status: NativeStatus::Failed,
                    message: Some(failure.message.clone()),
                    stack_trace: Some(
                        failure
                            .stack_trace
                            .clone()
                            .unwrap_or_else(|| format!("at {}", suite.name)),
                    ),
                    site: FailureSite::SetUp,
                    children,
                },
            });
            return Ok(());
        }

        let mut children = Vec::with_capacity(selected.len());
        for test in selected {
            events(EngineEvent::TestStarted {
                full_name: test.full_name.clone(),
            });
            let result = Self::run_test(test)?;
            events(EngineEvent::TestFinished {
                result: result.clone(),
            });
            children.push(result);
        }

        let child_failed = children.iter().any(|c| c.status == NativeStatus::Failed);
        let result = match &suite.teardown_failure {
            Some(failure) => NativeSuiteResult {
                full_name: suite.name.clone(),
                status: NativeStatus::Failed,
                message: Some(format!("TearDown : {}", failure.message)),
                stack_trace: Some(format!(
                    "--TearDown\n{}",
                    failure.stack_trace.as_deref().unwrap_or_default()
                )),
                site: FailureSite::TearDown,
                children,
            },
            None => NativeSuiteResult {
                full_name: suite.name.clone(),
                status: if child_failed {
                    NativeStatus::Failed
                } else {
                    NativeStatus::Passed
                },
                message: None,
                stack_trace: None,
                site: if child_failed {
                    FailureSite::Child
                } else {
                    FailureSite::Test
                },
                children,
            },
        };
        events(EngineEvent::SuiteFinished { result });
        Ok(())
    }
}

impl EngineSession for ManifestSession {
    fn load(&mut self, assembly: &Path) -> Result<()> {
        let manifest = AssemblyManifest::load(assembly)?;
        self.loaded = Some(LoadedAssembly::build(assembly, manifest, self.generation));
        Ok(())
    }

    fn metadata(&self) -> Result<&dyn EngineMetadataProvider> {
        Ok(&self.loaded()?.metadata)
    }

    fn count(&self, filter: &Filter) -> Result<usize> {
        let native = ManifestTranslator.translate(filter);
        Ok(self
            .loaded()?
            .suites
            .iter()
            .flat_map(|s| s.tests.iter())
            .filter(|t| native.accepts(t))
            .count())
    }

    fn run(&mut self, filter: &Filter, events: &mut dyn FnMut(EngineEvent)) -> Result<()> {
        let loaded = self.loaded()?;
        let native = ManifestTranslator.translate(filter);
        info!(path = %loaded.path.display(), %filter, "running manifest");

        for suite in &loaded.suites {
            Self::run_suite(suite, &native, events)?;
        }

        for text in &loaded.unhandled_exceptions {
            warn!(error = %text, "manifest reports unhandled exception");
            events(EngineEvent::UnhandledException { text: text.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
      "name": "Example.Tests",
      "framework": { "name": "nunit.framework", "version": "2.5.5.0" },
      "types": [
        {
          "name": "Example.Tests.BaseTests",
          "abstract": true,
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "methods": [
            { "name": "Shared", "attributes": ["NUnit.Framework.TestAttribute"] },
            { "name": "Virtual", "attributes": ["NUnit.Framework.TestAttribute"] }
          ]
        },
        {
          "name": "Example.Tests.FirstTests",
          "base": "Example.Tests.BaseTests",
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "methods": [
            { "name": "Virtual", "overrides": "Example.Tests.BaseTests.Virtual",
              "outcome": { "status": "failed", "message": "overridden" } },
            { "name": "Hidden", "public": false, "attributes": ["NUnit.Framework.TestAttribute"] },
            { "name": "Helper" }
          ]
        },
        {
          "name": "Example.Tests.ImplicitTests",
          "methods": [
            { "name": "Runs", "attributes": ["NUnit.Framework.TestAttribute"] }
          ]
        },
        {
          "name": "Example.Tests.ListTests`1",
          "generic_definition": true,
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "instantiations": ["Example.Tests.ListTests<Int32>", "Example.Tests.ListTests<String>"],
          "methods": [
            { "name": "Adds", "attributes": ["NUnit.Framework.TestAttribute"] }
          ]
        }
      ]
    }"#;

    fn session(generation: EngineGeneration) -> (TempDir, ManifestSession) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Example.Tests.json");
        std::fs::write(&path, MANIFEST).unwrap();

        let mut session = ManifestSession::new(generation);
        session.load(&path).unwrap();
        (temp, session)
    }

    fn test_names(session: &ManifestSession) -> Vec<String> {
        session
            .loaded()
            .unwrap()
            .suites
            .iter()
            .flat_map(|s| s.tests.iter().map(|t| t.full_name.clone()))
            .collect()
    }

    #[test]
    fn test_tree_building() {
        let (_temp, session) = session(EngineGeneration::V25);
        assert_eq!(
            test_names(&session),
            vec![
                "Example.Tests.FirstTests.Shared",
                "Example.Tests.FirstTests.Virtual",
                "Example.Tests.ImplicitTests.Runs",
                "Example.Tests.ListTests<Int32>.Adds",
                "Example.Tests.ListTests<String>.Adds",
            ]
        );
    }

    #[test]
    fn test_implicit_fixtures_need_v25() {
        let (_temp, session) = session(EngineGeneration::V24);
        assert!(!test_names(&session)
            .iter()
            .any(|n| n.starts_with("Example.Tests.ImplicitTests")));
    }

    #[test]
    fn test_override_keeps_base_identity() {
        let (_temp, session) = session(EngineGeneration::V25);
        let suites = &session.loaded().unwrap().suites;
        let virtual_test = suites[0]
            .tests
            .iter()
            .find(|t| t.full_name.ends_with(".Virtual"))
            .unwrap();

        assert_eq!(virtual_test.method_identity, "Example.Tests.BaseTests.Virtual");
        assert_eq!(virtual_test.outcome.status, NativeStatus::Failed);
    }

    #[test]
    fn test_count_and_run_agree() {
        let (_temp, mut session) = session(EngineGeneration::V25);
        let filter = Filter::MatchClass(Filter::names(["Example.Tests.ListTests`1"]));
        assert_eq!(session.count(&filter).unwrap(), 2);

        let mut finished = Vec::new();
        session
            .run(&filter, &mut |event| {
                if let EngineEvent::TestFinished { result } = event {
                    finished.push(result.full_name);
                }
            })
            .unwrap();
        assert_eq!(
            finished,
            vec!["Example.Tests.ListTests<Int32>.Adds", "Example.Tests.ListTests<String>.Adds"]
        );
    }

    #[test]
    fn test_translation_agrees_with_reference() {
        let (_temp, session) = session(EngineGeneration::V25);
        let filters = [
            Filter::MatchAll,
            Filter::MatchNamespace("Example".into()),
            Filter::MatchClass(Filter::names(["Example.Tests.FirstTests"])).not(),
            Filter::Or(vec![
                Filter::MatchFullName(Filter::names(["Example.Tests.ImplicitTests.Runs"])),
                Filter::MatchClassAndMethod(
                    Filter::names(["Example.Tests.FirstTests"]),
                    Filter::names(["Example.Tests.BaseTests.Virtual"]),
                ),
            ]),
        ];

        for filter in &filters {
            let native = ManifestTranslator.translate(filter);
            for suite in &session.loaded().unwrap().suites {
                for test in &suite.tests {
                    assert_eq!(native.accepts(test), filter.matches(test), "{filter} on {}", test.full_name);
                }
            }
        }
    }

    #[test]
    fn test_inspector_reads_framework() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Example.Tests.json");
        std::fs::write(&path, MANIFEST).unwrap();

        let info = ManifestInspector.inspect(&path).unwrap();
        assert_eq!(info.name, "Example.Tests");
        let framework = info.framework.unwrap();
        assert_eq!(framework.name, "nunit.framework");
        assert_eq!(framework.version, EngineVersion::new(2, 5, 5, 0));
    }

    #[test]
    fn test_load_errors() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();

        let mut session = ManifestSession::new(EngineGeneration::V25);
        assert!(matches!(
            session.load(&temp.path().join("missing.json")),
            Err(RunnerError::Load { .. })
        ));
        assert!(matches!(
            session.load(&broken),
            Err(RunnerError::Manifest { .. })
        ));
        assert!(matches!(
            session.count(&Filter::MatchAll),
            Err(RunnerError::Engine { .. })
        ));
    }
}
