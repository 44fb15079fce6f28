//! Run configuration for the harness.
//!
//! The only value taken from the environment is the report directory; the
//! capacities are compile-time defaults that a client may override before
//! building its [`crate::Registry`] and [`crate::Engine`].

use std::env;
use std::path::PathBuf;

/// Environment variable naming the directory that receives `<suite>.xml`.
pub const REPORT_DIR_ENV: &str = "XML_UNIT_TEST_OUTPUT_DIR";

/// Default number of test cases a registry can hold.
pub const DEFAULT_REGISTRY_CAPACITY: usize = 1000;

/// Default number of distinct simulated I/O pins.
pub const DEFAULT_PIN_CAPACITY: usize = 256;

/// Configuration for test execution and reporting.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory for the XML report. `None` means the current directory,
    /// which is never created.
    pub report_dir: Option<PathBuf>,
    pub use_colors: bool,
    pub registry_capacity: usize,
    pub pin_capacity: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            report_dir: None,
            use_colors: atty::is(atty::Stream::Stdout),
            registry_capacity: DEFAULT_REGISTRY_CAPACITY,
            pin_capacity: DEFAULT_PIN_CAPACITY,
        }
    }
}

impl HarnessConfig {
    /// Defaults, with the report directory read from [`REPORT_DIR_ENV`].
    /// An empty value is treated as unset.
    pub fn from_env() -> Self {
        let report_dir = env::var_os(REPORT_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        Self {
            report_dir,
            ..Self::default()
        }
    }

    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_pin_capacity(mut self, capacity: usize) -> Self {
        self.pin_capacity = capacity;
        self
    }

    pub fn with_registry_capacity(mut self, capacity: usize) -> Self {
        self.registry_capacity = capacity;
        self
    }

    /// Path of the report file for `suite`.
    pub fn report_path(&self, suite: &str) -> PathBuf {
        let dir = self
            .report_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(format!("{}.xml", suite))
    }
}
