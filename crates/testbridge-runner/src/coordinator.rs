//! Run coordination
//!
//! One run goes through these steps, in order:
//!
//! 1. Inspect the target for its framework reference.
//! 2. Resolve an engine candidate through the version selector.
//! 3. Load the target into the engine and build the filter from its metadata.
//! 4. Count matching tests. Zero stops here, before anything executes.
//! 5. Execute, adapting engine events into listener outcomes.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use testbridge_core::config::Config;
use testbridge_core::{BridgeError, RuntimeVersion};
use testbridge_discovery::{CatalogSources, DiscoveryContext, VersionCatalog, VersionSelector};
use tracing::{debug, info, instrument, warn};

use crate::adapter::{ResultAdapter, StackTraceFilter};
use crate::builder::TestFilterBuilder;
use crate::engine::{AssemblyInspector, EngineProvider, ManifestEngineProvider, ManifestInspector};
use crate::error::Result;
use crate::listener::{Severity, TestListener, TestOutcome, TestState};
use crate::metadata::{EngineGeneration, EngineMetadataProvider, MethodInfo};
use crate::request::{MemberRef, RunRequest, RunTarget};

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Success,
    Failure,
    NoTests,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::NoTests => "no tests",
        }
    }

    /// Process exit code for this state
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::NoTests => 2,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives a run request from engine resolution to adapted results
pub struct RunCoordinator {
    sources: CatalogSources,
    host_runtime: RuntimeVersion,
    selector: VersionSelector,
    provider: Box<dyn EngineProvider>,
    inspector: Box<dyn AssemblyInspector>,
    stack_filter: StackTraceFilter,
    engine_name: String,
}

impl RunCoordinator {
    pub fn new(
        sources: CatalogSources,
        host_runtime: RuntimeVersion,
        selector: VersionSelector,
        provider: Box<dyn EngineProvider>,
        inspector: Box<dyn AssemblyInspector>,
    ) -> Self {
        Self {
            sources,
            host_runtime,
            selector,
            provider,
            inspector,
            stack_filter: StackTraceFilter::default(),
            engine_name: "NUnit".to_string(),
        }
    }

    /// Coordinator over the manifest engine, configured from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let host_runtime =
            RuntimeVersion::parse(&config.discovery.runtime_version).map_err(BridgeError::from)?;
        let stack_filter = StackTraceFilter::new(&config.engine.stack_trace_filters)?;

        Ok(Self::new(
            CatalogSources::from_config(config),
            host_runtime,
            VersionSelector::from_config(&config.engine),
            Box::new(ManifestEngineProvider::new()),
            Box::new(ManifestInspector),
        )
        .with_stack_filter(stack_filter)
        .with_engine_name(config.engine.name.clone()))
    }

    pub fn with_stack_filter(mut self, filter: StackTraceFilter) -> Self {
        self.stack_filter = filter;
        self
    }

    /// Product name used in runner labels
    pub fn with_engine_name(mut self, name: impl Into<String>) -> Self {
        self.engine_name = name.into();
        self
    }

    pub fn host_runtime(&self) -> &RuntimeVersion {
        &self.host_runtime
    }

    /// Catalog as seen from `request`'s target
    pub fn catalog_for(&self, request: &RunRequest) -> VersionCatalog {
        let ctx = DiscoveryContext::new(self.host_runtime.clone()).with_target(request.assembly());
        VersionCatalog::load(&self.sources, &ctx)
    }

    /// Run `request`, reporting results to `listener`
    ///
    /// Test failures are outcomes, not errors. Only engine faults and
    /// unloadable targets return `Err`.
    #[instrument(skip_all, fields(assembly = %request.assembly().display(), engine = self.provider.name()))]
    pub fn run(&self, request: &RunRequest, listener: &mut dyn TestListener) -> Result<RunState> {
        let assembly = self.inspector.inspect(request.assembly())?;
        let Some(framework) = assembly.framework else {
            info!(assembly = %assembly.name, "target has no test framework reference");
            return Ok(RunState::NoTests);
        };

        let catalog = self.catalog_for(request);
        let mut forward = |message: &str| {
            warn!(%message, "engine selection warning");
            listener.write_line(message, Severity::Warning);
        };
        let resolved = self.selector.resolve_with_tier(
            &catalog,
            framework.version,
            &self.host_runtime,
            &mut forward,
        );
        let Some((tier, candidate)) = resolved else {
            info!(framework = %framework.version, "no engine candidate fits the target");
            return Ok(RunState::NoTests);
        };

        let generation = EngineGeneration::from_version(candidate.product_version());
        let runner = format!("{} {}", self.engine_name, candidate.product_version().short());
        info!(%tier, engine = %candidate, %generation, "engine resolved");

        let mut session = self.provider.open(&candidate, generation)?;
        session.load(request.assembly())?;

        let filter = TestFilterBuilder::new(session.metadata()?).build(request);
        let total = session.count(&filter)?;
        if total == 0 {
            debug!(%filter, "no tests match");
            let metadata = session.metadata()?;
            return Ok(match unrunnable_target(metadata, &request.target) {
                Some((name, message)) => {
                    listener.test_finished(TestOutcome {
                        name,
                        state: TestState::Ignored,
                        message: Some(message.to_string()),
                        stack_trace: None,
                        duration: Duration::ZERO,
                        total_tests: 1,
                        runner,
                    });
                    RunState::Success
                }
                None => RunState::NoTests,
            });
        }

        let mut adapter = ResultAdapter::new(listener, total, runner, generation)
            .with_stack_filter(self.stack_filter.clone());
        session.run(&filter, &mut |event| adapter.handle(event))?;

        let state = adapter.run_state();
        info!(total, reported = adapter.reported(), %state, "run finished");
        Ok(state)
    }
}

/// A recognised target that cannot run, with the reason to report
fn unrunnable_target(
    metadata: &dyn EngineMetadataProvider,
    target: &RunTarget,
) -> Option<(String, &'static str)> {
    let RunTarget::ByMember { member } = target else {
        return None;
    };

    match member {
        MemberRef::Method {
            reflected_type,
            name,
        } => {
            let method = metadata.find_method(reflected_type, name)?;
            if !is_test_method(metadata, method) {
                return None;
            }
            let full_name = format!("{}.{}", reflected_type, name);
            if !method.is_public {
                return Some((full_name, "Test methods must be public."));
            }

            let fixture = metadata.type_info(reflected_type)?;
            let holds_tests = metadata.generation().implicit_fixtures();
            if !metadata.has_fixture_marker(fixture) && !holds_tests {
                return Some((full_name, "No fixture attribute on parent class."));
            }
            if !fixture.is_public {
                return Some((full_name, "Parent fixture must be public."));
            }
            None
        }
        MemberRef::Type(name) => {
            let ty = metadata.type_info(name)?;
            (!ty.is_public && metadata.has_fixture_marker(ty))
                .then(|| (ty.full_name.clone(), "Test fixtures must be public."))
        }
        MemberRef::Other(_) => None,
    }
}

/// Marked directly or through the method it overrides
fn is_test_method(metadata: &dyn EngineMetadataProvider, method: &MethodInfo) -> bool {
    if metadata.has_test_marker(method) {
        return true;
    }
    let root = metadata.base_definition(method);
    root.rsplit_once('.')
        .and_then(|(ty, name)| metadata.declared_method(ty, name))
        .is_some_and(|m| metadata.has_test_marker(m))
}

impl fmt::Debug for RunCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunCoordinator")
            .field("sources", &self.sources.names())
            .field("host_runtime", &self.host_runtime)
            .field("provider", &self.provider.name())
            .field("engine_name", &self.engine_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tempfile::TempDir;
    use testbridge_core::EngineVersion;
    use testbridge_discovery::{CatalogSource, EngineCandidate, Tier};

    use crate::engine::EngineSession;
    use crate::error::RunnerError;
    use crate::events::EngineEvent;
    use crate::filter::Filter;
    use crate::listener::CollectingListener;
    use crate::request::CategoryFilters;

    const MANIFEST: &str = r#"{
      "name": "Example.Tests",
      "framework": { "name": "nunit.framework", "version": "2.5.5.0" },
      "types": [
        {
          "name": "Example.Categories.CategoryTests",
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "methods": [
            { "name": "A1", "attributes": ["NUnit.Framework.TestAttribute"], "categories": ["A"] },
            { "name": "A2", "attributes": ["NUnit.Framework.TestAttribute"], "categories": ["A"] },
            { "name": "B1", "attributes": ["NUnit.Framework.TestAttribute"], "categories": ["B"] },
            { "name": "B2", "attributes": ["NUnit.Framework.TestAttribute"], "categories": ["B"],
              "outcome": { "status": "skipped", "message": "not today" } }
          ]
        },
        {
          "name": "Example.Shapes.ShapeTests",
          "abstract": true,
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "methods": [
            { "name": "Area", "attributes": ["NUnit.Framework.TestAttribute"] },
            { "name": "Perimeter", "attributes": ["NUnit.Framework.TestAttribute"] }
          ]
        },
        {
          "name": "Example.Shapes.CircleTests",
          "base": "Example.Shapes.ShapeTests",
          "attributes": ["NUnit.Framework.TestFixtureAttribute"]
        },
        {
          "name": "Example.Shapes.SquareTests",
          "base": "Example.Shapes.ShapeTests",
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "methods": [
            { "name": "Perimeter", "overrides": "Example.Shapes.ShapeTests.Perimeter",
              "outcome": { "status": "failed", "message": "Expected 16\n",
                           "stack_trace": "at NUnit.Framework.Assert.AreEqual()\nat Example.Shapes.SquareTests.Perimeter()" } }
          ]
        },
        {
          "name": "Example.Visibility.VisibilityTests",
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "methods": [
            { "name": "Hidden", "public": false, "attributes": ["NUnit.Framework.TestAttribute"] },
            { "name": "Helper", "public": false }
          ]
        },
        {
          "name": "Example.Visibility.InternalTests",
          "public": false,
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "methods": [
            { "name": "Runs", "attributes": ["NUnit.Framework.TestAttribute"] }
          ]
        },
        {
          "name": "Example.Fixtures.BrokenSetUp",
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "setup_failure": { "message": "database offline", "stack_trace": "at Example.Fixtures.BrokenSetUp.Init()" },
          "methods": [
            { "name": "First", "attributes": ["NUnit.Framework.TestAttribute"] },
            { "name": "Second", "attributes": ["NUnit.Framework.TestAttribute"] }
          ]
        },
        {
          "name": "Example.Fixtures.BrokenTearDown",
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "teardown_failure": { "message": "cleanup failed", "stack_trace": "at Example.Fixtures.BrokenTearDown.Cleanup()" },
          "methods": [
            { "name": "Only", "attributes": ["NUnit.Framework.TestAttribute"], "output": "hello\n" }
          ]
        },
        {
          "name": "Example.Faults.FaultTests",
          "attributes": ["NUnit.Framework.TestFixtureAttribute"],
          "methods": [
            { "name": "Crashes", "attributes": ["NUnit.Framework.TestAttribute"], "engine_fault": "engine crashed" }
          ]
        }
      ]
    }"#;

    struct FixedSource(Vec<EngineCandidate>);

    impl CatalogSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn tier(&self) -> Tier {
            Tier::Default
        }

        fn discover(&self, _ctx: &DiscoveryContext) -> Vec<EngineCandidate> {
            self.0.clone()
        }
    }

    /// Manifest engine that counts execution passes
    struct CountingProvider {
        runs: Arc<AtomicUsize>,
    }

    struct CountingSession {
        inner: Box<dyn EngineSession>,
        runs: Arc<AtomicUsize>,
    }

    impl EngineProvider for CountingProvider {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn open(
            &self,
            candidate: &EngineCandidate,
            generation: EngineGeneration,
        ) -> Result<Box<dyn EngineSession>> {
            Ok(Box::new(CountingSession {
                inner: ManifestEngineProvider::new().open(candidate, generation)?,
                runs: Arc::clone(&self.runs),
            }))
        }
    }

    impl EngineSession for CountingSession {
        fn load(&mut self, assembly: &Path) -> Result<()> {
            self.inner.load(assembly)
        }

        fn metadata(&self) -> Result<&dyn EngineMetadataProvider> {
            self.inner.metadata()
        }

        fn count(&self, filter: &Filter) -> Result<usize> {
            self.inner.count(filter)
        }

        fn run(&mut self, filter: &Filter, events: &mut dyn FnMut(EngineEvent)) -> Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            self.inner.run(filter, events)
        }
    }

    struct Fixture {
        _temp: TempDir,
        manifest: PathBuf,
        coordinator: RunCoordinator,
        runs: Arc<AtomicUsize>,
    }

    fn fixture_with(default_version: &str, manifest: &str) -> Fixture {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Example.Tests.json");
        std::fs::write(&path, manifest).unwrap();

        let mut sources = CatalogSources::new();
        sources.register(Box::new(FixedSource(vec![EngineCandidate::new(
            EngineVersion::parse(default_version).unwrap(),
            RuntimeVersion::parse("v2.0.50727").unwrap(),
            temp.path().join("engine"),
        )])));

        let runs = Arc::new(AtomicUsize::new(0));
        let coordinator = RunCoordinator::new(
            sources,
            RuntimeVersion::parse("v4.0.30319").unwrap(),
            VersionSelector::default(),
            Box::new(CountingProvider {
                runs: Arc::clone(&runs),
            }),
            Box::new(ManifestInspector),
        )
        .with_stack_filter(StackTraceFilter::new(&[r"^\s*at NUnit\.Framework\."]).unwrap());

        Fixture {
            _temp: temp,
            manifest: path,
            coordinator,
            runs,
        }
    }

    fn fixture() -> Fixture {
        fixture_with("2.5.5.0", MANIFEST)
    }

    fn run(fixture: &Fixture, request: RunRequest) -> (RunState, CollectingListener) {
        let mut listener = CollectingListener::new();
        let state = fixture.coordinator.run(&request, &mut listener).unwrap();
        (state, listener)
    }

    #[test]
    fn test_namespace_with_excluded_category() {
        let f = fixture();
        let request = RunRequest::namespace(&f.manifest, "Example.Categories")
            .with_categories(CategoryFilters::new(Vec::<String>::new(), ["A"]));
        let (state, listener) = run(&f, request);

        let names: Vec<&str> = listener.outcomes.iter().map(|o| o.short_name()).collect();
        assert_eq!(names, vec!["B1", "B2"]);
        assert_eq!(listener.outcome("Example.Categories.CategoryTests.B2").unwrap().state, TestState::Ignored);
        assert_eq!(state, RunState::Success);
    }

    #[test]
    fn test_method_target_ignores_categories() {
        let f = fixture();
        let request = RunRequest::member(
            &f.manifest,
            MemberRef::method("Example.Categories.CategoryTests", "A1"),
        )
        .with_categories(CategoryFilters::new(Vec::<String>::new(), ["A"]));
        let (state, listener) = run(&f, request);

        assert_eq!(listener.outcomes.len(), 1);
        assert_eq!(listener.outcomes[0].name, "Example.Categories.CategoryTests.A1");
        assert_eq!(state, RunState::Success);
    }

    #[test]
    fn test_abstract_fixture_runs_every_subclass() {
        let f = fixture();
        let request = RunRequest::member(
            &f.manifest,
            MemberRef::Type("Example.Shapes.ShapeTests".to_string()),
        );
        let (state, listener) = run(&f, request);

        assert_eq!(listener.outcomes.len(), 4);
        assert_eq!(listener.count(TestState::Passed), 3);
        let failed = listener.outcome("Example.Shapes.SquareTests.Perimeter").unwrap();
        assert_eq!(failed.state, TestState::Failed);
        assert_eq!(failed.message.as_deref(), Some("Expected 16"));
        assert_eq!(
            failed.stack_trace.as_deref(),
            Some("at Example.Shapes.SquareTests.Perimeter()")
        );
        assert!(listener.outcomes.iter().all(|o| o.total_tests == 4));
        assert!(listener.outcomes.iter().all(|o| o.runner == "NUnit 2.5.5"));
        assert_eq!(state, RunState::Failure);
    }

    #[test]
    fn test_overridden_method_target_matches_override() {
        let f = fixture();
        let request = RunRequest::member(
            &f.manifest,
            MemberRef::method("Example.Shapes.ShapeTests", "Perimeter"),
        );
        let (_, listener) = run(&f, request);

        let mut names: Vec<&str> = listener.outcomes.iter().map(|o| o.name.as_str()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "Example.Shapes.CircleTests.Perimeter",
                "Example.Shapes.SquareTests.Perimeter"
            ]
        );
    }

    #[test]
    fn test_non_public_method_is_ignored() {
        let f = fixture();
        let request = RunRequest::member(
            &f.manifest,
            MemberRef::method("Example.Visibility.VisibilityTests", "Hidden"),
        );
        let (state, listener) = run(&f, request);

        assert_eq!(listener.outcomes.len(), 1);
        let outcome = &listener.outcomes[0];
        assert_eq!(outcome.state, TestState::Ignored);
        assert!(outcome.message.as_deref().unwrap().contains("public"));
        assert_eq!(outcome.total_tests, 1);
        assert_eq!(state, RunState::Success);
        assert_eq!(f.runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_non_public_fixture_is_ignored() {
        let f = fixture();
        let (state, listener) = run(
            &f,
            RunRequest::member(
                &f.manifest,
                MemberRef::method("Example.Visibility.InternalTests", "Runs"),
            ),
        );
        assert_eq!(
            listener.outcomes[0].message.as_deref(),
            Some("Parent fixture must be public.")
        );
        assert_eq!(state, RunState::Success);

        let (state, listener) = run(
            &f,
            RunRequest::member(
                &f.manifest,
                MemberRef::Type("Example.Visibility.InternalTests".to_string()),
            ),
        );
        assert_eq!(
            listener.outcomes[0].message.as_deref(),
            Some("Test fixtures must be public.")
        );
        assert_eq!(state, RunState::Success);
    }

    #[test]
    fn test_non_test_method_is_no_tests() {
        let f = fixture();
        let (state, listener) = run(
            &f,
            RunRequest::member(
                &f.manifest,
                MemberRef::method("Example.Visibility.VisibilityTests", "Helper"),
            ),
        );
        assert!(listener.outcomes.is_empty());
        assert_eq!(state, RunState::NoTests);
    }

    #[test]
    fn test_zero_matches_never_executes() {
        let f = fixture();
        let (state, listener) = run(&f, RunRequest::namespace(&f.manifest, "Example.Nowhere"));

        assert_eq!(state, RunState::NoTests);
        assert!(listener.outcomes.is_empty());
        assert_eq!(f.runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_setup_failure_reported_per_child() {
        let f = fixture();
        let request = RunRequest::member(
            &f.manifest,
            MemberRef::Type("Example.Fixtures.BrokenSetUp".to_string()),
        );
        let (state, listener) = run(&f, request);

        assert_eq!(listener.outcomes.len(), 2);
        for outcome in &listener.outcomes {
            assert_eq!(outcome.state, TestState::Failed);
            assert_eq!(outcome.message.as_deref(), Some("OneTimeSetUp: database offline"));
            assert_eq!(
                outcome.stack_trace.as_deref(),
                Some("at Example.Fixtures.BrokenSetUp.Init()")
            );
        }
        assert_eq!(state, RunState::Failure);
    }

    #[test]
    fn test_teardown_failure_writes_warnings() {
        let f = fixture();
        let request = RunRequest::member(
            &f.manifest,
            MemberRef::Type("Example.Fixtures.BrokenTearDown".to_string()),
        );
        let (state, listener) = run(&f, request);

        assert_eq!(listener.count(TestState::Passed), 1);
        assert_eq!(listener.lines_with(Severity::Output), vec!["hello"]);
        let warnings = listener.lines_with(Severity::Warning);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("cleanup failed"));
        assert_eq!(state, RunState::Failure);
    }

    #[test]
    fn test_engine_fault_propagates() {
        let f = fixture();
        let request = RunRequest::namespace(&f.manifest, "Example.Faults");
        let mut listener = CollectingListener::new();

        let err = f.coordinator.run(&request, &mut listener).unwrap_err();
        assert!(matches!(err, RunnerError::Engine { .. }));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_outdated_default_engine_warns_and_runs() {
        let f = fixture_with("2.5.0.9122", MANIFEST);
        let request = RunRequest::member(
            &f.manifest,
            MemberRef::method("Example.Categories.CategoryTests", "B1"),
        );
        let (state, listener) = run(&f, request);

        let warnings = listener.lines_with(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("2.5.5.0"));
        assert_eq!(listener.outcomes[0].runner, "NUnit 2.5.0");
        assert_eq!(state, RunState::Success);
    }

    #[test]
    fn test_no_framework_reference() {
        let f = fixture_with("2.5.5.0", r#"{ "name": "Example.Plain" }"#);
        let (state, listener) = run(&f, RunRequest::whole_assembly(&f.manifest));

        assert_eq!(state, RunState::NoTests);
        assert!(listener.lines.is_empty());
    }

    #[test]
    fn test_no_compatible_engine() {
        let f = fixture_with("2.4.8.0", MANIFEST);
        let (state, listener) = run(&f, RunRequest::whole_assembly(&f.manifest));

        assert_eq!(state, RunState::NoTests);
        assert_eq!(listener.lines_with(Severity::Warning).len(), 1);
        assert!(listener.outcomes.is_empty());
    }

    #[test]
    fn test_from_config_uses_bundled_engine() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("engine").join("lib");
        std::fs::create_dir_all(&lib).unwrap();

        let mut config = Config::default();
        for file in &config.engine.required_files {
            std::fs::write(lib.join(file), b"").unwrap();
        }
        std::fs::write(
            temp.path().join(&config.discovery.engine_config_name),
            "[[engine]]\nruntime_version = \"v2.0.50727\"\nbase_dir = \"engine\"\nproduct_version = \"2.5.5.0\"\n",
        )
        .unwrap();
        let manifest = temp.path().join("Example.Tests.json");
        std::fs::write(&manifest, MANIFEST).unwrap();

        config.discovery.bundled_dir = Some(temp.path().to_path_buf());
        config.discovery.installs_dir = Some(temp.path().join("installs"));
        config.discovery.developer_overrides = false;

        let coordinator = RunCoordinator::from_config(&config).unwrap();
        let mut listener = CollectingListener::new();
        let state = coordinator
            .run(
                &RunRequest::namespace(&manifest, "Example.Categories"),
                &mut listener,
            )
            .unwrap();

        assert_eq!(listener.outcomes.len(), 4);
        assert_eq!(state, RunState::Success);
    }

    #[test]
    fn test_run_state_exit_codes() {
        assert_eq!(RunState::Success.exit_code(), 0);
        assert_eq!(RunState::Failure.exit_code(), 1);
        assert_eq!(RunState::NoTests.exit_code(), 2);
        assert_eq!(serde_json::to_string(&RunState::NoTests).unwrap(), "\"no_tests\"");
    }
}
