//! Testbridge Runner - drive a selected test engine and adapt its results
//!
//! A [`RunRequest`] flows through the pipeline:
//!
//! 1. [`RunCoordinator`] inspects the target and resolves an engine through
//!    the version selector.
//! 2. [`TestFilterBuilder`] turns the request into a [`Filter`] using the
//!    engine's metadata.
//! 3. The engine session counts and runs the matching tests.
//! 4. [`ResultAdapter`] flattens the engine's event stream into
//!    [`TestOutcome`]s for a [`TestListener`].
//!
//! The [`engine::manifest`] module provides an in-process engine that reads
//! assembly manifests.

pub mod adapter;
pub mod builder;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod events;
pub mod filter;
pub mod listener;
pub mod metadata;
pub mod report;
pub mod request;

pub use adapter::{normalize_message, ResultAdapter, StackTraceFilter};
pub use builder::TestFilterBuilder;
pub use coordinator::{RunCoordinator, RunState};
pub use engine::{
    AssemblyInfo, AssemblyInspector, EngineProvider, EngineSession, FilterTranslator,
    FrameworkReference,
};
pub use error::{Result, RunnerError};
pub use events::{EngineEvent, FailureSite, NativeResult, NativeStatus, NativeSuiteResult};
pub use filter::{ExplicitScope, Filter, TestNode};
pub use listener::{CollectingListener, Severity, TestListener, TestOutcome, TestState};
pub use metadata::{EngineGeneration, EngineMetadataProvider, FrameworkMarkers, MethodInfo, TypeInfo};
pub use report::{ReportFormat, ReportGenerator, RunReport};
pub use request::{CategoryFilters, MemberRef, RunRequest, RunTarget};
