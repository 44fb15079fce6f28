//! `testcase`: a unit-test harness for embedded-style code.
//!
//! Tests are registered explicitly into a [`Registry`], run one at a time by
//! the [`Engine`], and reported on the console and in a JUnit-style XML file.
//! Test bodies use the assertion methods and macros on [`TestContext`] and
//! propagate their [`Abort`] signals with `?`.
//!
//! ```rust,no_run
//! use testcase::{compare, Registry, TestContext, TestResult};
//!
//! fn add(ctx: &mut TestContext<'_>) -> TestResult {
//!     compare!(ctx, 2 + 2, 4)
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     let mut registry = Registry::new();
//!     registry.register("Add", add).unwrap();
//!     testcase::cli::run(&registry)
//! }
//! ```

pub use crate::assertions::{Abort, ExpectFailMode, SourceLocation, TestContext, TestResult};
pub use crate::config::HarnessConfig;
pub use crate::engine::{CaseRecord, Engine, Outcome, RowRunner, RunSummary, RunTally};
pub use crate::errors::HarnessError;
pub use crate::pins::PinStore;
pub use crate::registry::{DataRow, DataTestFn, Registry, TestCaseInfo, TestFn, TestKind};
pub use crate::report::{ReportWriter, SuiteTotals};

pub mod assertions;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod pins;
pub mod registry;
pub mod report;
