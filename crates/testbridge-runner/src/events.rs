//! Engine-native result events

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Status as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeStatus {
    #[default]
    Passed,
    Failed,
    Ignored,
    Skipped,
    Inconclusive,
    NotRunnable,
    Invalid,
}

/// Where a failure originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureSite {
    #[default]
    Test,
    /// One-time setup of the enclosing fixture
    SetUp,
    /// One-time teardown of the enclosing fixture
    TearDown,
    /// Inherited from the parent suite's failure
    Parent,
    /// A child test failed
    Child,
}

/// Result of one test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeResult {
    pub full_name: String,
    pub status: NativeStatus,
    /// Engine-specific refinement of the status, e.g. `Invalid`
    pub label: Option<String>,
    pub message: Option<String>,
    pub stack_trace: Option<String>,
    pub duration: Duration,
    /// Captured console output
    pub output: Option<String>,
    pub site: FailureSite,
}

impl NativeResult {
    /// Create a result with no message, trace or output
    pub fn new(full_name: impl Into<String>, status: NativeStatus) -> Self {
        Self {
            full_name: full_name.into(),
            status,
            label: None,
            message: None,
            stack_trace: None,
            duration: Duration::ZERO,
            output: None,
            site: FailureSite::Test,
        }
    }

    /// Set the failure message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the stack trace
    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    /// Set where a failure originated
    pub fn with_site(mut self, site: FailureSite) -> Self {
        self.site = site;
        self
    }
}

/// Result of a fixture suite, with the results of the tests it ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeSuiteResult {
    pub full_name: String,
    pub status: NativeStatus,
    pub message: Option<String>,
    pub stack_trace: Option<String>,
    pub site: FailureSite,
    pub children: Vec<NativeResult>,
}

/// Events streamed by an engine while running, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    TestStarted { full_name: String },
    TestFinished { result: NativeResult },
    SuiteFinished { result: NativeSuiteResult },
    UnhandledException { text: String },
}
