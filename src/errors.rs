//! Framework errors for the test harness.
//!
//! These are conditions caused by misuse of the harness itself (too many
//! registered cases, too many simulated pins) or by the report sink. They are
//! distinct from assertion outcomes, which travel as [`crate::Abort`] signals:
//! a `HarnessError` never decides whether a test passed, it only explains why
//! the harness had to fail one.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for harness failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("cannot register test case '{name}': registry is full ({capacity} cases)")]
    #[diagnostic(
        code(testcase::registry::full),
        help("raise `HarnessConfig::registry_capacity` or split the suite into several binaries")
    )]
    RegistryFull { name: String, capacity: usize },

    #[error("cannot define I/O pin '{name}': pin store is full ({capacity} pins)")]
    #[diagnostic(
        code(testcase::pins::full),
        help("too many distinct pins in one run; raise `HarnessConfig::pin_capacity`")
    )]
    PinStoreFull { name: String, capacity: usize },

    #[error("report file '{}' is unavailable", path.display())]
    #[diagnostic(code(testcase::report::io))]
    ReportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    /// Returns the stable diagnostic code, used as a prefix in log lines.
    pub fn code_str(&self) -> &'static str {
        match self {
            HarnessError::RegistryFull { .. } => "testcase::registry::full",
            HarnessError::PinStoreFull { .. } => "testcase::pins::full",
            HarnessError::ReportIo { .. } => "testcase::report::io",
        }
    }
}
