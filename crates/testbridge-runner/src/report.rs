//! Run report generation
//!
//! Renders the outcomes collected during a run as plain text, JSON or JUnit XML.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coordinator::RunState;
use crate::error::{Result, RunnerError};
use crate::listener::{CollectingListener, Severity, TestOutcome, TestState};

/// Output format for run reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pretty,
    Json,
    Junit,
}

impl FromStr for ReportFormat {
    type Err = RunnerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "junit" | "xml" => Ok(Self::Junit),
            other => Err(RunnerError::InvalidRequest(format!(
                "unknown report format '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Junit => "junit",
        })
    }
}

/// Everything a run reported, grouped by fixture
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub assembly: String,
    /// e.g. `NUnit 2.5.5`; empty when nothing ran
    pub runner: String,
    pub state: RunState,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
    pub duration_ms: u64,
    pub fixtures: Vec<FixtureReport>,
    /// Warning and error lines written during the run
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureReport {
    pub name: String,
    pub duration_ms: u64,
    pub outcomes: Vec<TestOutcome>,
}

impl FixtureReport {
    fn count(&self, state: TestState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }
}

impl RunReport {
    pub fn new(assembly: impl Into<String>, state: RunState, outcomes: &[TestOutcome]) -> Self {
        let mut fixtures: Vec<FixtureReport> = Vec::new();
        for outcome in outcomes {
            let index = match fixtures.iter().position(|f| f.name == outcome.fixture()) {
                Some(index) => index,
                None => {
                    fixtures.push(FixtureReport {
                        name: outcome.fixture().to_string(),
                        duration_ms: 0,
                        outcomes: Vec::new(),
                    });
                    fixtures.len() - 1
                }
            };
            let fixture = &mut fixtures[index];
            fixture.duration_ms += outcome.duration.as_millis() as u64;
            fixture.outcomes.push(outcome.clone());
        }

        let count = |state: TestState| outcomes.iter().filter(|o| o.state == state).count();

        Self {
            assembly: assembly.into(),
            runner: outcomes.first().map(|o| o.runner.clone()).unwrap_or_default(),
            state,
            generated_at: Utc::now(),
            total: outcomes.len(),
            passed: count(TestState::Passed),
            failed: count(TestState::Failed),
            ignored: count(TestState::Ignored),
            duration_ms: fixtures.iter().map(|f| f.duration_ms).sum(),
            fixtures,
            diagnostics: Vec::new(),
        }
    }

    /// Report from what a [`CollectingListener`] received
    pub fn from_listener(
        assembly: impl Into<String>,
        state: RunState,
        listener: &CollectingListener,
    ) -> Self {
        let mut report = Self::new(assembly, state, &listener.outcomes);
        report.diagnostics = listener
            .lines
            .iter()
            .filter(|(severity, _)| matches!(severity, Severity::Warning | Severity::Error))
            .map(|(_, line)| line.clone())
            .collect();
        report
    }

    pub fn success(&self) -> bool {
        self.state != RunState::Failure
    }
}

/// Report generator for the supported formats
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn generate(report: &RunReport, format: ReportFormat) -> String {
        match format {
            ReportFormat::Pretty => Self::generate_pretty(report),
            ReportFormat::Json => Self::generate_json(report),
            ReportFormat::Junit => Self::generate_junit(report),
        }
    }

    /// Generate human-readable output
    pub fn generate_pretty(report: &RunReport) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!("  TEST RESULTS: {}\n", report.assembly));
        if !report.runner.is_empty() {
            output.push_str(&format!("  Runner: {}\n", report.runner));
        }
        output.push_str("═══════════════════════════════════════════════════════════════\n\n");

        for line in &report.diagnostics {
            for part in line.lines() {
                output.push_str(&format!("  ! {}\n", part));
            }
        }
        if !report.diagnostics.is_empty() {
            output.push('\n');
        }

        for fixture in &report.fixtures {
            output.push_str(&format!("  {} ({} tests)\n", fixture.name, fixture.outcomes.len()));
            output.push_str("  ─────────────────────────────────────────────────────────────\n");

            for outcome in &fixture.outcomes {
                let icon = match outcome.state {
                    TestState::Passed => "✓",
                    TestState::Failed => "✗",
                    TestState::Ignored => "○",
                };
                output.push_str(&format!(
                    "    {} {} ({}ms)\n",
                    icon,
                    outcome.short_name(),
                    outcome.duration.as_millis()
                ));

                if let Some(ref message) = outcome.message {
                    for line in message.lines().filter(|l| !l.is_empty()) {
                        output.push_str(&format!("        {}\n", line));
                    }
                }
                if outcome.state == TestState::Failed {
                    if let Some(ref trace) = outcome.stack_trace {
                        for line in trace.lines() {
                            output.push_str(&format!("          {}\n", line.trim()));
                        }
                    }
                }
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(
            "  SUMMARY: {} passed, {} failed, {} ignored ({}ms)\n",
            report.passed, report.failed, report.ignored, report.duration_ms
        ));
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        match report.state {
            RunState::Success => output.push_str("\n  ✓ All tests passed!\n\n"),
            RunState::Failure => output.push_str("\n  ✗ Some tests failed.\n\n"),
            RunState::NoTests => output.push_str("\n  ○ No tests to run.\n\n"),
        }

        output
    }

    /// Generate JSON output
    pub fn generate_json(report: &RunReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Generate JUnit XML output
    pub fn generate_junit(report: &RunReport) -> String {
        JUnitReport::from(report).to_xml()
    }

    /// Write report to file
    pub fn write_to_file(report: &RunReport, format: ReportFormat, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::generate(report, format))?;
        Ok(())
    }
}

/// JUnit XML report structure
#[derive(Debug, Clone)]
pub struct JUnitReport {
    pub name: String,
    pub tests: usize,
    pub failures: usize,
    pub skipped: usize,
    pub time: f64,
    pub timestamp: String,
    pub testsuites: Vec<JUnitTestSuite>,
}

#[derive(Debug, Clone)]
pub struct JUnitTestSuite {
    pub name: String,
    pub tests: usize,
    pub failures: usize,
    pub skipped: usize,
    pub time: f64,
    pub testcases: Vec<JUnitTestCase>,
}

#[derive(Debug, Clone)]
pub struct JUnitTestCase {
    pub name: String,
    pub classname: String,
    pub time: f64,
    pub failure: Option<JUnitFailure>,
    pub skipped: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JUnitFailure {
    pub message: String,
    pub content: String,
}

impl From<&RunReport> for JUnitReport {
    fn from(report: &RunReport) -> Self {
        Self {
            name: report.assembly.clone(),
            tests: report.total,
            failures: report.failed,
            skipped: report.ignored,
            time: report.duration_ms as f64 / 1000.0,
            timestamp: report.generated_at.to_rfc3339(),
            testsuites: report.fixtures.iter().map(|f| f.into()).collect(),
        }
    }
}

impl From<&FixtureReport> for JUnitTestSuite {
    fn from(fixture: &FixtureReport) -> Self {
        Self {
            name: fixture.name.clone(),
            tests: fixture.outcomes.len(),
            failures: fixture.count(TestState::Failed),
            skipped: fixture.count(TestState::Ignored),
            time: fixture.duration_ms as f64 / 1000.0,
            testcases: fixture
                .outcomes
                .iter()
                .map(|o| JUnitTestCase::from_outcome(o, &fixture.name))
                .collect(),
        }
    }
}

impl JUnitTestCase {
    fn from_outcome(outcome: &TestOutcome, classname: &str) -> Self {
        let message = outcome.message.clone().unwrap_or_default();
        Self {
            name: outcome.short_name().to_string(),
            classname: classname.to_string(),
            time: outcome.duration.as_secs_f64(),
            failure: (outcome.state == TestState::Failed).then(|| JUnitFailure {
                message: if message.is_empty() {
                    "Test failed".to_string()
                } else {
                    message.trim().to_string()
                },
                content: outcome.stack_trace.clone().unwrap_or_default(),
            }),
            skipped: (outcome.state == TestState::Ignored).then(|| message.trim().to_string()),
        }
    }
}

impl JUnitReport {
    /// Generate XML string
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<testsuites name=\"{}\" tests=\"{}\" failures=\"{}\" skipped=\"{}\" time=\"{:.3}\" timestamp=\"{}\">\n",
            escape_xml(&self.name),
            self.tests,
            self.failures,
            self.skipped,
            self.time,
            escape_xml(&self.timestamp)
        ));

        for suite in &self.testsuites {
            xml.push_str(&format!(
                "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" skipped=\"{}\" time=\"{:.3}\">\n",
                escape_xml(&suite.name),
                suite.tests,
                suite.failures,
                suite.skipped,
                suite.time
            ));

            for testcase in &suite.testcases {
                let open = format!(
                    "    <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\"",
                    escape_xml(&testcase.name),
                    escape_xml(&testcase.classname),
                    testcase.time
                );

                if let Some(ref failure) = testcase.failure {
                    xml.push_str(&open);
                    xml.push_str(">\n");
                    xml.push_str(&format!(
                        "      <failure message=\"{}\">{}</failure>\n",
                        escape_xml(&failure.message),
                        escape_xml(&failure.content)
                    ));
                    xml.push_str("    </testcase>\n");
                } else if let Some(ref reason) = testcase.skipped {
                    xml.push_str(&open);
                    xml.push_str(">\n");
                    if reason.is_empty() {
                        xml.push_str("      <skipped/>\n");
                    } else {
                        xml.push_str(&format!("      <skipped message=\"{}\"/>\n", escape_xml(reason)));
                    }
                    xml.push_str("    </testcase>\n");
                } else {
                    xml.push_str(&open);
                    xml.push_str("/>\n");
                }
            }

            xml.push_str("  </testsuite>\n");
        }

        xml.push_str("</testsuites>\n");

        xml
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::TestListener;
    use std::time::Duration;

    fn outcome(name: &str, state: TestState, message: Option<&str>, ms: u64) -> TestOutcome {
        TestOutcome {
            name: name.to_string(),
            state,
            message: message.map(String::from),
            stack_trace: (state == TestState::Failed).then(|| "at Example.Math.Adds()".to_string()),
            duration: Duration::from_millis(ms),
            total_tests: 3,
            runner: "NUnit 2.5.5".to_string(),
        }
    }

    fn sample_report() -> RunReport {
        let mut listener = CollectingListener::new();
        listener.write_line("Please install NUnit 2.5.5.0", Severity::Warning);
        listener.write_line("captured", Severity::Output);
        listener.test_finished(outcome("Example.MathTests.Adds", TestState::Passed, None, 10));
        listener.test_finished(outcome(
            "Example.MathTests.Divides",
            TestState::Failed,
            Some("Expected 5 <but> was 3"),
            15,
        ));
        listener.test_finished(outcome("Example.IoTests.Reads", TestState::Ignored, Some("not today"), 0));
        RunReport::from_listener("Example.Tests", RunState::Failure, &listener)
    }

    #[test]
    fn test_grouping_and_counts() {
        let report = sample_report();

        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.duration_ms, 25);
        assert_eq!(report.runner, "NUnit 2.5.5");
        assert_eq!(report.diagnostics, vec!["Please install NUnit 2.5.5.0"]);

        let names: Vec<&str> = report.fixtures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Example.MathTests", "Example.IoTests"]);
        assert!(!report.success());
    }

    #[test]
    fn test_json_output() {
        let json = ReportGenerator::generate_json(&sample_report());

        assert!(json.contains("\"passed\": 1"));
        assert!(json.contains("\"state\": \"failure\""));
        assert!(json.contains("\"duration\": 15"));
    }

    #[test]
    fn test_junit_output() {
        let xml = ReportGenerator::generate_junit(&sample_report());

        assert!(xml.contains("<?xml version=\"1.0\""));
        assert!(xml.contains("tests=\"3\""));
        assert!(xml.contains("<failure message=\"Expected 5 &lt;but&gt; was 3\">"));
        assert!(xml.contains("<skipped message=\"not today\"/>"));
        assert!(xml.contains("classname=\"Example.MathTests\""));
    }

    #[test]
    fn test_pretty_output() {
        let pretty = ReportGenerator::generate_pretty(&sample_report());

        assert!(pretty.contains("TEST RESULTS: Example.Tests"));
        assert!(pretty.contains("! Please install NUnit 2.5.5.0"));
        assert!(pretty.contains("✗ Divides (15ms)"));
        assert!(pretty.contains("1 passed, 1 failed, 1 ignored"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("xml".parse::<ReportFormat>().unwrap(), ReportFormat::Junit);
        assert!("html".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_write_to_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("reports").join("results.xml");

        ReportGenerator::write_to_file(&sample_report(), ReportFormat::Junit, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<testsuites"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
    }
}
