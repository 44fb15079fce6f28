//! The execution engine.
//!
//! # Architecture
//!
//! A run proceeds in fixed steps:
//! 1. **Naming**: the suite name comes from the program path, minus a
//!    `unittest_` prefix.
//! 2. **Ordering**: registry entries are stably sorted by name.
//! 3. **Reporting setup**: the XML report is opened with a placeholder
//!    header and the clock starts.
//! 4. **Execution**: every entry whose name starts with the filter prefix
//!    runs. Ordinary cases run inside one protected boundary; data-driven
//!    cases call their populate function, and each row it submits through
//!    [`RowRunner::run_row`] gets its own boundary.
//! 5. **Summary**: totals go to the console, the report header is
//!    rewritten, and the run fails if any case failed.
//!
//! The protected boundary is the `Result` a body returns: the engine maps the
//! [`Abort`] signal to an [`Outcome`] and nothing propagates further.

use std::fs;
use std::io::Write;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use log::{debug, error, warn};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::assertions::{Abort, TestContext, TestResult};
use crate::config::HarnessConfig;
use crate::pins::PinStore;
use crate::registry::{Registry, TestBody, TestCaseInfo};
use crate::report::{ReportWriter, SuiteTotals};

/// Program-name prefix that is not part of the suite name.
pub const SUITE_PREFIX: &str = "unittest_";

/// Suite name used when the program path is empty.
const FALLBACK_SUITE: &str = "unittest";

// =============================================================================
// OUTCOMES AND TALLIES
// =============================================================================

/// How one case or data row ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
    /// An armed assertion failed as expected; counts as a success.
    ExpectedFailure,
}

impl Outcome {
    pub fn from_result(result: &TestResult) -> Self {
        match result {
            Ok(()) => Outcome::Passed,
            Err(Abort::Failure) => Outcome::Failed,
            Err(Abort::Skip) | Err(Abort::SkipAll) => Outcome::Skipped,
            Err(Abort::ExpectedFailure) => Outcome::ExpectedFailure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Passed | Outcome::ExpectedFailure)
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    pub tests_run: usize,
    pub successes: usize,
    pub failures: usize,
    pub skipped: usize,
}

impl RunTally {
    pub fn record(&mut self, outcome: Outcome) {
        self.tests_run += 1;
        match outcome {
            Outcome::Passed | Outcome::ExpectedFailure => self.successes += 1,
            Outcome::Failed => self.failures += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    pub fn totals(&self, elapsed: Duration) -> SuiteTotals {
        SuiteTotals {
            tests: self.tests_run,
            failures: self.failures,
            skipped: self.skipped,
            elapsed,
        }
    }
}

/// One executed case or data row (`case[row]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub name: String,
    pub outcome: Outcome,
}

/// Result of [`Engine::run_all`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub suite: String,
    pub tally: RunTally,
    pub records: Vec<CaseRecord>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn succeeded(&self) -> bool {
        self.tally.failures == 0
    }

    /// 0 when nothing failed, 1 otherwise.
    pub fn exit_status(&self) -> i32 {
        if self.succeeded() {
            0
        } else {
            1
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.succeeded() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// PER-RUN STATE
// =============================================================================

struct RunState {
    console: Box<dyn WriteColor>,
    pins: PinStore,
    report: ReportWriter,
    tally: RunTally,
    records: Vec<CaseRecord>,
}

impl RunState {
    /// Runs one body inside the protected boundary and records its outcome.
    fn run_protected<F>(&mut self, name: &str, body: F) -> TestResult
    where
        F: FnOnce(&mut TestContext<'_>) -> TestResult,
    {
        let _ = write!(self.console, "{} ... ", name);
        let _ = self.console.flush();
        self.report.begin_case(name);

        let result = {
            let mut ctx = TestContext::new(&mut *self.console, &mut self.report, &mut self.pins);
            body(&mut ctx)
        };
        if result.is_ok() {
            let _ = self
                .console
                .set_color(ColorSpec::new().set_fg(Some(Color::Green)));
            let _ = writeln!(self.console, "ok");
            let _ = self.console.reset();
        }
        self.report.end_case();

        let outcome = Outcome::from_result(&result);
        debug!("{} finished: {:?}", name, outcome);
        self.tally.record(outcome);
        self.records.push(CaseRecord {
            name: name.to_string(),
            outcome,
        });
        result
    }
}

/// Handed to a data-driven case's populate function.
pub struct RowRunner<'a> {
    state: &'a mut RunState,
    case: &'a str,
}

impl RowRunner<'_> {
    /// Name of the data-driven case being populated.
    pub fn case_name(&self) -> &str {
        self.case
    }

    /// Runs one row, recorded as `case[label]`. Returns `true` when the row
    /// asked for the rest of the table to be skipped.
    pub fn run_row<F>(&mut self, label: &str, body: F) -> bool
    where
        F: FnOnce(&mut TestContext<'_>) -> TestResult,
    {
        let name = format!("{}[{}]", self.case, label);
        let result = self.state.run_protected(&name, body);
        result == Err(Abort::SkipAll)
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Runs a [`Registry`] and keeps the simulated pin state between cases.
pub struct Engine {
    config: HarnessConfig,
    state: RunState,
}

impl Engine {
    /// An engine writing its transcript to stdout.
    pub fn new(config: HarnessConfig) -> Self {
        let choice = if config.use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let console = StandardStream::stdout(choice);
        Self::with_console(config, console)
    }

    /// An engine writing its transcript to `console`.
    pub fn with_console(config: HarnessConfig, console: impl WriteColor + 'static) -> Self {
        let pins = PinStore::new(config.pin_capacity);
        Self {
            state: RunState {
                console: Box::new(console),
                pins,
                report: ReportWriter::disabled(""),
                tally: RunTally::default(),
                records: Vec::new(),
            },
            config,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs every selected case of `registry`.
    ///
    /// `args` are the process arguments, program path first. The last
    /// argument that does not start with `-` is a name-prefix filter.
    pub fn run_all(&mut self, registry: &Registry, args: &[String]) -> RunSummary {
        let program = args.first().map(String::as_str).unwrap_or_default();
        let suite = suite_name(program).to_string();
        let prefix = name_filter(args);

        let mut cases: Vec<&TestCaseInfo> = registry.iter().collect();
        cases.sort_by(|a, b| a.name.cmp(&b.name));

        self.state.report = open_report(&self.config, &mut *self.state.console, &suite);
        self.state.tally = RunTally::default();
        self.state.records.clear();
        let start = Instant::now();

        for case in cases {
            if let Some(prefix) = prefix {
                if !case.name.starts_with(prefix) {
                    continue;
                }
            }
            match &case.body {
                TestBody::Ordinary(body) => {
                    let body = *body;
                    let _ = self.state.run_protected(&case.name, body);
                }
                TestBody::DataDriven(populate) => {
                    let mut runner = RowRunner {
                        state: &mut self.state,
                        case: &case.name,
                    };
                    populate(&mut runner);
                }
            }
        }

        let capacity = registry.capacity();
        for name in registry.refused() {
            error!("reporting unregistered case '{}' as failed", name);
            let message = format!(
                "registry capacity exceeded ({} cases); case was not registered",
                capacity
            );
            let _ = self.state.run_protected(name, |ctx| ctx.fail(&message));
        }

        let elapsed = start.elapsed();
        let tally = self.state.tally;
        let _ = writeln!(
            self.state.console,
            "{} tests run, {} succeeded, {} skipped, {} failed",
            tally.tests_run, tally.successes, tally.skipped, tally.failures
        );
        let _ = self.state.console.flush();
        self.state.report.finish(&tally.totals(elapsed));

        RunSummary {
            suite,
            tally,
            records: std::mem::take(&mut self.state.records),
            elapsed,
        }
    }
}

/// Runs `registry` with configuration from the environment and returns the
/// process exit code.
pub fn run_all(registry: &Registry, args: &[String]) -> ExitCode {
    Engine::new(HarnessConfig::from_env())
        .run_all(registry, args)
        .exit_code()
}

// =============================================================================
// HELPERS
// =============================================================================

/// Basename of `program` without the [`SUITE_PREFIX`].
pub fn suite_name(program: &str) -> &str {
    let base = program
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(program);
    let name = base.strip_prefix(SUITE_PREFIX).unwrap_or(base);
    if name.is_empty() {
        FALLBACK_SUITE
    } else {
        name
    }
}

/// The last non-flag argument after the program path.
pub fn name_filter(args: &[String]) -> Option<&str> {
    args.iter()
        .skip(1)
        .filter(|arg| !arg.starts_with('-'))
        .last()
        .map(String::as_str)
}

/// Opens the report for `suite`, creating the configured directory first.
/// Any failure leaves a disabled writer.
fn open_report(config: &HarnessConfig, console: &mut dyn WriteColor, suite: &str) -> ReportWriter {
    if let Some(dir) = &config.report_dir {
        // An existing directory is the common case; a real problem shows up
        // when the file is created.
        if let Err(e) = fs::create_dir_all(dir) {
            debug!("could not create report directory {}: {}", dir.display(), e);
        }
    }
    let path = config.report_path(suite);
    let _ = writeln!(console, "Test artifacts: {}", path.display());
    match ReportWriter::create(&path, suite) {
        Ok(writer) => writer,
        Err(e) => {
            warn!("{}: {}", e.code_str(), e);
            if let Some(source) = std::error::Error::source(&e) {
                warn!("  caused by: {}", source);
            }
            ReportWriter::disabled(suite)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn quiet_engine() -> Engine {
        let config = HarnessConfig::default()
            .with_colors(false)
            .with_report_dir(std::env::temp_dir().join("testcase-engine-unit"));
        Engine::with_console(config, NoColor::new(Vec::new()))
    }

    fn pass(_ctx: &mut TestContext<'_>) -> TestResult {
        Ok(())
    }

    fn fail(ctx: &mut TestContext<'_>) -> TestResult {
        ctx.fail("always")
    }

    #[test]
    fn suite_name_strips_directory_and_prefix() {
        assert_eq!(suite_name("/usr/bin/unittest_grades"), "grades");
        assert_eq!(suite_name("target\\debug\\unittest_grades"), "grades");
        assert_eq!(suite_name("grades"), "grades");
        assert_eq!(suite_name("./my_unittest_x"), "my_unittest_x");
        assert_eq!(suite_name(""), FALLBACK_SUITE);
    }

    #[test]
    fn filter_is_last_non_flag_argument() {
        assert_eq!(name_filter(&args(&["prog"])), None);
        assert_eq!(name_filter(&args(&["prog", "-v"])), None);
        assert_eq!(name_filter(&args(&["prog", "Add", "-v"])), Some("Add"));
        assert_eq!(name_filter(&args(&["prog", "Add", "Sub"])), Some("Sub"));
        // The program path itself never filters.
        assert_eq!(name_filter(&args(&["Add"])), None);
    }

    #[test]
    fn tally_counts_expected_failures_as_successes() {
        let mut tally = RunTally::default();
        tally.record(Outcome::Passed);
        tally.record(Outcome::ExpectedFailure);
        tally.record(Outcome::Failed);
        tally.record(Outcome::Skipped);
        assert_eq!(
            tally,
            RunTally {
                tests_run: 4,
                successes: 2,
                failures: 1,
                skipped: 1
            }
        );
    }

    #[test]
    fn outcome_maps_every_signal() {
        assert_eq!(Outcome::from_result(&Ok(())), Outcome::Passed);
        assert_eq!(Outcome::from_result(&Err(Abort::Failure)), Outcome::Failed);
        assert_eq!(Outcome::from_result(&Err(Abort::Skip)), Outcome::Skipped);
        assert_eq!(Outcome::from_result(&Err(Abort::SkipAll)), Outcome::Skipped);
        assert_eq!(
            Outcome::from_result(&Err(Abort::ExpectedFailure)),
            Outcome::ExpectedFailure
        );
    }

    #[test]
    fn cases_run_sorted_and_filtered() {
        let mut registry = Registry::new();
        registry.register("Sub", pass).unwrap();
        registry.register("AddTwo", pass).unwrap();
        registry.register("AddOne", fail).unwrap();

        let mut engine = quiet_engine();
        let all = engine.run_all(&registry, &args(&["unittest_unit_sorted"]));
        let names: Vec<&str> = all.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["AddOne", "AddTwo", "Sub"]);
        assert_eq!(all.exit_status(), 1);
        assert_eq!(all.suite, "unit_sorted");

        let filtered = engine.run_all(&registry, &args(&["unittest_unit_sorted", "AddT"]));
        assert_eq!(filtered.tally.tests_run, 1);
        assert_eq!(filtered.records[0].name, "AddTwo");
        assert!(filtered.succeeded());
    }

    #[test]
    fn refused_registrations_fail_the_run() {
        let mut registry = Registry::with_capacity(1);
        registry.register("Kept", pass).unwrap();
        let _ = registry.register("Dropped", pass);

        let mut engine = quiet_engine();
        let summary = engine.run_all(&registry, &args(&["unittest_unit_refused"]));
        assert_eq!(summary.tally.tests_run, 2);
        assert_eq!(summary.tally.failures, 1);
        assert_eq!(
            summary.records[1],
            CaseRecord {
                name: "Dropped".to_string(),
                outcome: Outcome::Failed
            }
        );
    }

    #[test]
    fn pins_persist_between_cases() {
        fn set(ctx: &mut TestContext<'_>) -> TestResult {
            ctx.set_pin("Led", 1)
        }
        fn check(ctx: &mut TestContext<'_>) -> TestResult {
            ctx.compare_pin("Led", 1)
        }
        let mut registry = Registry::new();
        registry.register("A_set", set).unwrap();
        registry.register("B_check", check).unwrap();

        let mut engine = quiet_engine();
        let summary = engine.run_all(&registry, &args(&["unittest_unit_pins"]));
        assert_eq!(summary.tally.successes, 2);
    }
}
