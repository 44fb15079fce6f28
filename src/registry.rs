//! The test registry.
//!
//! Client code builds a [`Registry`] in an initialization routine before the
//! run starts, then hands it to the engine, which only reads it. Capacity is
//! fixed when the registry is created. A registration beyond capacity is
//! refused with [`HarnessError::RegistryFull`], and the refused name is kept
//! so the engine can report it as a failed case instead of losing it.
//!
//! Duplicate names are accepted. They sort next to each other in
//! registration order and both match the same filter prefixes.
//!
//! ## Usage
//! ```rust
//! use testcase::{compare, DataRow, Registry, TestContext, TestResult};
//!
//! fn add(ctx: &mut TestContext<'_>) -> TestResult {
//!     compare!(ctx, 2 + 2, 4)
//! }
//!
//! struct Sum { x: i64, y: i64, sum: i64 }
//!
//! fn sum(ctx: &mut TestContext<'_>, row: &Sum) -> TestResult {
//!     compare!(ctx, row.x + row.y, row.sum)
//! }
//!
//! fn sum_rows() -> Vec<DataRow<Sum>> {
//!     vec![
//!         DataRow::new("2 + 2 = 4", Sum { x: 2, y: 2, sum: 4 }),
//!         DataRow::new("2 + 6 = 8", Sum { x: 2, y: 6, sum: 8 }),
//!     ]
//! }
//!
//! let mut registry = Registry::new();
//! registry.register("Add", add).unwrap();
//! registry.register_data_driven("Sum", sum, sum_rows).unwrap();
//! assert_eq!(registry.len(), 2);
//! ```

use log::error;

use crate::assertions::{TestContext, TestResult};
use crate::config::{HarnessConfig, DEFAULT_REGISTRY_CAPACITY};
use crate::engine::RowRunner;
use crate::errors::HarnessError;

/// Body of an ordinary case.
pub type TestFn = fn(&mut TestContext<'_>) -> TestResult;

/// Per-row body of a data-driven case.
pub type DataTestFn<T> = fn(&mut TestContext<'_>, &T) -> TestResult;

/// Populate function of a data-driven case: walks the table and hands each
/// row to the runner.
pub type PopulateFn = Box<dyn Fn(&mut RowRunner<'_>)>;

/// One row of a data-driven table.
#[derive(Debug, Clone)]
pub struct DataRow<T> {
    pub name: &'static str,
    pub data: T,
}

impl<T> DataRow<T> {
    pub fn new(name: &'static str, data: T) -> Self {
        Self { name, data }
    }
}

pub enum TestBody {
    Ordinary(TestFn),
    DataDriven(PopulateFn),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    Ordinary,
    DataDriven,
}

/// A registered test case.
pub struct TestCaseInfo {
    pub name: String,
    pub body: TestBody,
}

impl TestCaseInfo {
    pub fn kind(&self) -> TestKind {
        match self.body {
            TestBody::Ordinary(_) => TestKind::Ordinary,
            TestBody::DataDriven(_) => TestKind::DataDriven,
        }
    }
}

/// Append-only, fixed-capacity list of test cases.
pub struct Registry {
    cases: Vec<TestCaseInfo>,
    capacity: usize,
    refused: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REGISTRY_CAPACITY)
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::with_capacity(config.registry_capacity)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cases: Vec::with_capacity(capacity),
            capacity,
            refused: Vec::new(),
        }
    }

    /// Registers an ordinary case.
    pub fn register(&mut self, name: &str, body: TestFn) -> Result<(), HarnessError> {
        self.push(name, TestBody::Ordinary(body))
    }

    /// Registers a data-driven case from a row test and a table.
    ///
    /// The generated populate loop stops after a row ends with skip-all.
    pub fn register_data_driven<T: 'static>(
        &mut self,
        name: &str,
        test: DataTestFn<T>,
        rows: fn() -> Vec<DataRow<T>>,
    ) -> Result<(), HarnessError> {
        self.register_populate(name, move |runner| {
            for row in rows() {
                if runner.run_row(row.name, |ctx| test(ctx, &row.data)) {
                    break;
                }
            }
        })
    }

    /// Registers a data-driven case driven by a hand-written populate
    /// function. Each call to [`RowRunner::run_row`] runs one protected row.
    pub fn register_populate<F>(&mut self, name: &str, populate: F) -> Result<(), HarnessError>
    where
        F: Fn(&mut RowRunner<'_>) + 'static,
    {
        self.push(name, TestBody::DataDriven(Box::new(populate)))
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestCaseInfo> {
        self.cases.iter()
    }

    /// Names that were refused because the registry was full.
    pub fn refused(&self) -> &[String] {
        &self.refused
    }

    fn push(&mut self, name: &str, body: TestBody) -> Result<(), HarnessError> {
        if self.cases.len() >= self.capacity {
            let err = HarnessError::RegistryFull {
                name: name.to_string(),
                capacity: self.capacity,
            };
            error!("{}: {}", err.code_str(), err);
            self.refused.push(name.to_string());
            return Err(err);
        }
        self.cases.push(TestCaseInfo {
            name: name.to_string(),
            body,
        });
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
