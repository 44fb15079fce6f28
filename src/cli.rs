//! Command-line entry point shared by test binaries.
//!
//! A test binary builds its registry and calls [`run`]. The harness itself
//! knows two flags; everything from the first positional argument on is
//! handed to the engine untouched, where the last non-flag token becomes the
//! name-prefix filter and other flags are ignored.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::config::HarnessConfig;
use crate::engine::Engine;
use crate::registry::Registry;

/// Arguments understood by every test binary.
#[derive(Debug, Parser)]
#[command(about = "Runs the unit tests compiled into this binary.")]
pub struct HarnessArgs {
    /// Disable colored console output.
    #[arg(long)]
    pub no_color: bool,

    /// Directory for the XML report (overrides XML_UNIT_TEST_OUTPUT_DIR).
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Test-name prefix, followed by any pass-through flags.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "PREFIX")]
    pub rest: Vec<String>,
}

impl HarnessArgs {
    /// Environment configuration with the command-line overrides applied.
    pub fn config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::from_env();
        if let Some(dir) = &self.report_dir {
            config = config.with_report_dir(dir);
        }
        if self.no_color {
            config = config.with_colors(false);
        }
        config
    }

    /// Arguments for [`Engine::run_all`]: the program path, then the
    /// pass-through tokens.
    pub fn engine_args(&self, program: &str) -> Vec<String> {
        std::iter::once(program.to_string())
            .chain(self.rest.iter().cloned())
            .collect()
    }
}

/// Initializes logging from `RUST_LOG` (default `warn`). Safe to call twice.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Parses the process arguments, runs `registry` and returns the exit code.
pub fn run(registry: &Registry) -> ExitCode {
    init_logging();
    let argv: Vec<String> = env::args().collect();
    let program = argv.first().cloned().unwrap_or_default();
    let args = HarnessArgs::parse_from(&argv);
    Engine::new(args.config())
        .run_all(registry, &args.engine_args(&program))
        .exit_code()
}
