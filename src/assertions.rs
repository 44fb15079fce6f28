//! The assertion protocol.
//!
//! Every test body receives a [`TestContext`] and returns a [`TestResult`].
//! Assertions either return `Ok(())` or an [`Abort`] signal, which the body
//! propagates with `?` straight back to the engine's per-case boundary. The
//! four signal kinds are the only way a body can end early.
//!
//! ## Expected failures
//!
//! [`TestContext::expect_fail`] arms the *next* assertion only:
//!
//! | armed mode | assertion | result |
//! |---|---|---|
//! | none | passes | continue |
//! | none | fails | failure record, abort with [`Abort::Failure`] |
//! | abort | passes | failure record, abort with [`Abort::Failure`] |
//! | abort | fails | note, abort with [`Abort::ExpectedFailure`] |
//! | continue | passes | failure record, abort with [`Abort::Failure`] |
//! | continue | fails | note, continue |
//!
//! The armed state is consumed by every assertion, whatever its result.

use std::fmt::{self, Write as _};
use std::panic::Location;

use log::error;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::pins::PinStore;
use crate::report::ReportWriter;

/// Units per whole number for [`TestContext::compare_fixed`].
const FIXED_POINT_SCALE: f64 = 1000.0;
const FIXED_POINT_EPSILON: f64 = 0.0005;

/// Non-local exit from a test body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abort {
    /// An assertion failed, or the harness hit a framework-fatal condition.
    Failure,
    /// The case (or the current data row) does not apply.
    Skip,
    /// Like [`Abort::Skip`], and no further rows of the table run.
    SkipAll,
    /// An assertion armed with [`ExpectFailMode::AbortOnFailure`] failed as
    /// expected. Counts as a success.
    ExpectedFailure,
}

/// The return type of test bodies and assertions.
pub type TestResult = Result<(), Abort>;

/// What happens when an armed assertion fails as expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectFailMode {
    /// End the case, recording it as a success.
    AbortOnFailure,
    /// Keep running the rest of the body.
    ContinueOnFailure,
}

/// Where an assertion was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
        }
    }

    fn push_to(&self, out: &mut String) {
        let _ = write!(out, "    File: {}\n    Line: {}\n", self.file, self.line);
    }
}

#[derive(Debug, Clone)]
struct ExpectFail {
    mode: ExpectFailMode,
    message: String,
    location: SourceLocation,
}

/// Handle given to a running test body.
///
/// Borrowed from the engine for the duration of one case or data row; the
/// expect-fail state starts unarmed every time.
pub struct TestContext<'a> {
    console: &'a mut dyn WriteColor,
    report: &'a mut ReportWriter,
    pins: &'a mut PinStore,
    expect_fail: Option<ExpectFail>,
}

impl<'a> TestContext<'a> {
    pub(crate) fn new(
        console: &'a mut dyn WriteColor,
        report: &'a mut ReportWriter,
        pins: &'a mut PinStore,
    ) -> Self {
        Self {
            console,
            report,
            pins,
            expect_fail: None,
        }
    }

    // ------------------------------------------------------------------------
    // Assertions
    // ------------------------------------------------------------------------

    /// Checks that `ok` holds. `description` is shown on failure.
    #[track_caller]
    pub fn verify(&mut self, ok: bool, description: &str) -> TestResult {
        let location = SourceLocation::caller();
        self.conclude(
            ok,
            location,
            || format!("verify succeeded: {}\n", description),
            || format!("failed: {}\n", description),
        )
    }

    /// Integer equality. The source strings name the operands in the report;
    /// the [`compare!`](crate::compare) macro fills them in.
    ///
    /// Operands of any integer width (or `bool`) are compared exactly as
    /// `i128`. A value that does not fit fails the comparison; floats are
    /// rejected at compile time.
    #[track_caller]
    pub fn compare_int<A, E>(
        &mut self,
        actual: A,
        expected: E,
        actual_src: &str,
        expected_src: &str,
    ) -> TestResult
    where
        A: TryInto<i128> + Copy + fmt::Display,
        E: TryInto<i128> + Copy + fmt::Display,
    {
        let location = SourceLocation::caller();
        let widened: (Option<i128>, Option<i128>) =
            (actual.try_into().ok(), expected.try_into().ok());
        let ok = matches!(widened, (Some(a), Some(e)) if a == e);
        self.conclude(
            ok,
            location,
            || format!("compare succeeded: {} == {}\n", actual_src, expected_src),
            || match widened {
                (Some(a), Some(e)) => format!(
                    "failed: {} != {}\n    Actual: {} (0x{})\n    Expected: {} (0x{})\n",
                    actual_src,
                    expected_src,
                    a,
                    hex(a),
                    e,
                    hex(e)
                ),
                _ => format!(
                    "failed: {} != {}\n    Actual: {}\n    Expected: {}\n    Operand out of range for an integer compare\n",
                    actual_src, expected_src, actual, expected
                ),
            },
        )
    }

    /// Approximate equality: passes when `|actual - expected| < epsilon`.
    #[track_caller]
    pub fn compare_float(
        &mut self,
        actual: f64,
        expected: f64,
        epsilon: f64,
        actual_src: &str,
        expected_src: &str,
    ) -> TestResult {
        let location = SourceLocation::caller();
        self.conclude(
            (actual - expected).abs() < epsilon,
            location,
            || format!("compare succeeded: {} == {}\n", actual_src, expected_src),
            || {
                format!(
                    "failed: {} != {}\n    Actual: {}\n    Expected: {}\n    Epsilon: {}\n",
                    actual_src, expected_src, actual, expected, epsilon
                )
            },
        )
    }

    /// Compares a fixed-point value in thousandths against a real number,
    /// within half a unit of the last place.
    #[track_caller]
    pub fn compare_fixed(
        &mut self,
        actual_thousandths: i64,
        expected: f64,
        actual_src: &str,
        expected_src: &str,
    ) -> TestResult {
        self.compare_float(
            actual_thousandths as f64 / FIXED_POINT_SCALE,
            expected,
            FIXED_POINT_EPSILON,
            actual_src,
            expected_src,
        )
    }

    /// Pointer identity.
    #[track_caller]
    pub fn compare_ptr<T: ?Sized>(
        &mut self,
        actual: *const T,
        expected: *const T,
        actual_src: &str,
        expected_src: &str,
    ) -> TestResult {
        let location = SourceLocation::caller();
        self.conclude(
            std::ptr::eq(actual, expected),
            location,
            || format!("compare succeeded: {} == {}\n", actual_src, expected_src),
            || {
                format!(
                    "failed: {} != {}\n    Actual: ptr {:p}\n    Expected: ptr {:p}\n",
                    actual_src, expected_src, actual, expected
                )
            },
        )
    }

    /// Fails the case unconditionally.
    #[track_caller]
    pub fn fail(&mut self, message: &str) -> TestResult {
        let location = SourceLocation::caller();
        self.fail_at(location, message)
    }

    /// Abandons the current case or row and records it as skipped.
    #[track_caller]
    pub fn skip(&mut self, message: &str) -> TestResult {
        let location = SourceLocation::caller();
        self.skip_at(location, message, Abort::Skip)
    }

    /// Like [`skip`](Self::skip), and stops the remaining rows of a
    /// data-driven table.
    #[track_caller]
    pub fn skip_all(&mut self, message: &str) -> TestResult {
        let location = SourceLocation::caller();
        self.skip_at(location, message, Abort::SkipAll)
    }

    /// Declares that the next assertion is expected to fail.
    #[track_caller]
    pub fn expect_fail(&mut self, message: &str, mode: ExpectFailMode) {
        self.expect_fail = Some(ExpectFail {
            mode,
            message: message.to_string(),
            location: SourceLocation::caller(),
        });
    }

    /// The currently armed expect-fail mode, if any.
    pub fn expect_fail_mode(&self) -> Option<ExpectFailMode> {
        self.expect_fail.as_ref().map(|armed| armed.mode)
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Writes a line of free-form output to the console and to the case's
    /// report record.
    pub fn print(&mut self, text: &str) {
        let mut line = text.to_string();
        if !line.ends_with('\n') {
            line.push('\n');
        }
        let _ = self.console.write_all(line.as_bytes());
        self.report.system_out(&line);
    }

    /// Writes a failure block composed by the caller and fails the case.
    /// The first line becomes the report's failure message.
    pub fn print_fail(&mut self, text: &str) -> TestResult {
        self.expect_fail = None;
        let mut block = text.to_string();
        if !block.ends_with('\n') {
            block.push('\n');
        }
        self.emit_failure(&block);
        Err(Abort::Failure)
    }

    // ------------------------------------------------------------------------
    // Simulated I/O pins
    // ------------------------------------------------------------------------

    pub fn get_pin(&mut self, name: &str) -> i32 {
        self.pins.get(name)
    }

    /// Sets a pin. Running out of pin slots is a harness misuse and fails
    /// the case.
    #[track_caller]
    pub fn set_pin(&mut self, name: &str, value: i32) -> TestResult {
        let location = SourceLocation::caller();
        match self.pins.set(name, value) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("{}: {}", e.code_str(), e);
                self.fail_at(location, &e.to_string())
            }
        }
    }

    /// Compares the current value of pin `name` with `expected`.
    #[track_caller]
    pub fn compare_pin(&mut self, name: &str, expected: i32) -> TestResult {
        let actual = self.pins.get(name);
        let actual_src = format!("pin \"{}\"", name);
        let expected_src = expected.to_string();
        self.compare_int(actual, expected, &actual_src, &expected_src)
    }

    /// Prints every pin, sorted by name, to the console.
    pub fn dump_pins(&mut self) {
        let dump = self.pins.dump();
        let _ = self.console.write_all(dump.as_bytes());
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn conclude(
        &mut self,
        ok: bool,
        location: SourceLocation,
        succeeded: impl FnOnce() -> String,
        failed: impl FnOnce() -> String,
    ) -> TestResult {
        match (self.expect_fail.take(), ok) {
            (None, true) => Ok(()),
            (None, false) => {
                let mut text = failed();
                location.push_to(&mut text);
                self.emit_failure(&text);
                Err(Abort::Failure)
            }
            (Some(armed), true) => {
                let mut text = succeeded();
                location.push_to(&mut text);
                let _ = writeln!(text, "did not see expected failure: {}", armed.message);
                armed.location.push_to(&mut text);
                self.emit_failure(&text);
                Err(Abort::Failure)
            }
            (Some(armed), false) => {
                let mut text = failed();
                location.push_to(&mut text);
                let _ = writeln!(text, "expected failure: {}", armed.message);
                armed.location.push_to(&mut text);
                self.emit_note(&text);
                match armed.mode {
                    ExpectFailMode::AbortOnFailure => Err(Abort::ExpectedFailure),
                    ExpectFailMode::ContinueOnFailure => Ok(()),
                }
            }
        }
    }

    fn fail_at(&mut self, location: SourceLocation, message: &str) -> TestResult {
        self.expect_fail = None;
        let mut text = format!("failed: {}\n", message);
        location.push_to(&mut text);
        self.emit_failure(&text);
        Err(Abort::Failure)
    }

    fn skip_at(&mut self, location: SourceLocation, message: &str, signal: Abort) -> TestResult {
        self.expect_fail = None;
        let mut text = format!("skipped: {}\n", message);
        location.push_to(&mut text);
        self.console_block(Color::Yellow, &text);
        self.report.system_out(&text);
        self.report.skipped(message);
        Err(signal)
    }

    fn emit_failure(&mut self, text: &str) {
        self.console_block(Color::Red, text);
        let message = text.lines().next().unwrap_or_default();
        self.report.failure(message, text);
    }

    fn emit_note(&mut self, text: &str) {
        self.console_block(Color::Yellow, text);
        self.report.system_out(text);
    }

    /// Writes `text` with its first line colored.
    fn console_block(&mut self, color: Color, text: &str) {
        let (first, rest) = match text.find('\n') {
            Some(index) => text.split_at(index + 1),
            None => (text, ""),
        };
        let _ = self.console.set_color(ColorSpec::new().set_fg(Some(color)));
        let _ = self.console.write_all(first.as_bytes());
        let _ = self.console.reset();
        let _ = self.console.write_all(rest.as_bytes());
    }
}

/// Hex digits of `value`, as a 64-bit word when it fits in one.
fn hex(value: i128) -> String {
    match i64::try_from(value) {
        Ok(word) => format!("{:X}", word),
        Err(_) => format!("{:X}", value),
    }
}

// ============================================================================
// ASSERTION MACROS
// ============================================================================

/// Verifies a boolean condition, naming it in the failure message.
///
/// ```rust,ignore
/// verify!(ctx, grades.len() == 3)?;
/// ```
#[macro_export]
macro_rules! verify {
    ($ctx:expr, $cond:expr) => {
        $ctx.verify($cond, concat!(stringify!($cond), " is false"))
    };
}

/// Compares two integer values exactly, whatever their widths.
///
/// ```rust,ignore
/// compare!(ctx, 2 + 2, 4)?;
/// ```
///
/// Floating-point operands do not compile; use [`compare_float!`].
///
/// ```rust,compile_fail
/// use testcase::{compare, TestContext, TestResult};
///
/// fn truncating(ctx: &mut TestContext<'_>) -> TestResult {
///     compare!(ctx, 2.7, 2)
/// }
/// ```
#[macro_export]
macro_rules! compare {
    ($ctx:expr, $actual:expr, $expected:expr) => {
        $ctx.compare_int($actual, $expected, stringify!($actual), stringify!($expected))
    };
}

/// Compares two floating-point values within `epsilon`.
#[macro_export]
macro_rules! compare_float {
    ($ctx:expr, $actual:expr, $expected:expr, $epsilon:expr) => {
        $ctx.compare_float(
            ($actual) as f64,
            ($expected) as f64,
            ($epsilon) as f64,
            stringify!($actual),
            stringify!($expected),
        )
    };
}

/// Compares a fixed-point value in thousandths against a real number.
///
/// ```rust,ignore
/// compare_fixed!(ctx, battery_capacity_milli(), 2000.0)?;
/// ```
#[macro_export]
macro_rules! compare_fixed {
    ($ctx:expr, $actual:expr, $expected:expr) => {
        $ctx.compare_fixed(
            ::core::convert::Into::<i64>::into($actual),
            $expected,
            stringify!($actual),
            stringify!($expected),
        )
    };
}

/// Compares two pointers (or references) for identity.
#[macro_export]
macro_rules! compare_ptr {
    ($ctx:expr, $actual:expr, $expected:expr) => {
        $ctx.compare_ptr($actual, $expected, stringify!($actual), stringify!($expected))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::SharedSink;
    use termcolor::NoColor;

    struct Fixture {
        console: NoColor<Vec<u8>>,
        report: ReportWriter,
        sink: SharedSink,
        pins: PinStore,
    }

    impl Fixture {
        fn new() -> Self {
            let sink = SharedSink::default();
            Self {
                console: NoColor::new(Vec::new()),
                report: ReportWriter::new(sink.clone(), "unit"),
                sink,
                pins: PinStore::new(2),
            }
        }

        fn ctx(&mut self) -> TestContext<'_> {
            TestContext::new(&mut self.console, &mut self.report, &mut self.pins)
        }

        fn console_text(&self) -> String {
            String::from_utf8(self.console.get_ref().clone()).unwrap()
        }
    }

    #[test]
    fn passing_verify_is_silent() {
        let mut fx = Fixture::new();
        assert_eq!(fx.ctx().verify(true, "x"), Ok(()));
        assert!(fx.console_text().is_empty());
    }

    #[test]
    fn failing_compare_reports_both_values() {
        let mut fx = Fixture::new();
        let result = compare!(fx.ctx(), 2 + 2, 5);
        assert_eq!(result, Err(Abort::Failure));
        let text = fx.console_text();
        assert!(text.starts_with("failed: 2 + 2 != 5\n"));
        assert!(text.contains("Actual: 4 (0x4)"));
        assert!(text.contains("Expected: 5 (0x5)"));
        assert!(text.contains(&format!("File: {}", file!())));
        assert!(fx
            .sink
            .contents()
            .contains("<failure message=\"failed: 2 + 2 != 5\" type=\"failure\">"));
    }

    #[test]
    fn wide_operands_compare_exactly() {
        let mut fx = Fixture::new();
        assert_eq!(compare!(fx.ctx(), u64::MAX, -1), Err(Abort::Failure));
        assert_eq!(compare!(fx.ctx(), i64::MIN, i64::MIN), Ok(()));
        assert_eq!(compare!(fx.ctx(), 3usize, 3u8), Ok(()));
        assert_eq!(compare!(fx.ctx(), -1, 0), Err(Abort::Failure));
        assert!(fx.console_text().contains("Actual: -1 (0xFFFFFFFFFFFFFFFF)"));
        assert!(fx.console_text().contains("Actual: 18446744073709551615 (0xFFFFFFFFFFFFFFFF)"));
    }

    #[test]
    fn out_of_range_operand_fails_the_compare() {
        let mut fx = Fixture::new();
        assert_eq!(compare!(fx.ctx(), u128::MAX, u128::MAX), Err(Abort::Failure));
        let text = fx.console_text();
        assert!(text.starts_with("failed: u128::MAX != u128::MAX\n"));
        assert!(text.contains("Operand out of range for an integer compare"));
    }

    #[test]
    fn fixed_point_compare_uses_thousandths() {
        let mut fx = Fixture::new();
        assert_eq!(compare_fixed!(fx.ctx(), 2560i32, 2.56), Ok(()));
        assert_eq!(compare_fixed!(fx.ctx(), 2561i32, 2.56), Err(Abort::Failure));
        let text = fx.console_text();
        assert!(text.contains("Actual: 2.561\n"));
        assert!(text.contains("Epsilon: 0.0005\n"));
    }

    #[test]
    fn print_fail_writes_caller_block() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.expect_fail("ignored", ExpectFailMode::AbortOnFailure);
        assert_eq!(
            ctx.print_fail("table mismatch at row 3\n    got: 7"),
            Err(Abort::Failure)
        );
        assert_eq!(ctx.expect_fail_mode(), None);
        drop(ctx);
        assert_eq!(fx.console_text(), "table mismatch at row 3\n    got: 7\n");
        assert!(fx.sink.contents().contains(
            "<failure message=\"table mismatch at row 3\" type=\"failure\">table mismatch at row 3\n    got: 7\n</failure>"
        ));
    }

    #[test]
    fn verify_macro_names_condition() {
        let mut fx = Fixture::new();
        let done = false;
        assert_eq!(verify!(fx.ctx(), done), Err(Abort::Failure));
        assert!(fx.console_text().starts_with("failed: done is false\n"));
    }

    #[test]
    fn float_compare_reports_epsilon() {
        let mut fx = Fixture::new();
        assert_eq!(compare_float!(fx.ctx(), 1.0, 1.0005, 0.001), Ok(()));
        assert_eq!(compare_float!(fx.ctx(), 1.0, 1.5, 0.25), Err(Abort::Failure));
        let text = fx.console_text();
        assert!(text.contains("Actual: 1\n"));
        assert!(text.contains("Expected: 1.5\n"));
        assert!(text.contains("Epsilon: 0.25\n"));
    }

    #[test]
    fn pointer_compare_uses_identity() {
        let mut fx = Fixture::new();
        let a = 1;
        let b = 1;
        assert_eq!(compare_ptr!(fx.ctx(), &a, &a), Ok(()));
        assert_eq!(compare_ptr!(fx.ctx(), &a, &b), Err(Abort::Failure));
        assert!(fx.console_text().contains("Actual: ptr 0x"));
    }

    #[test]
    fn abort_mode_passing_assertion_is_a_failure() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.expect_fail("known bug", ExpectFailMode::AbortOnFailure);
        assert_eq!(ctx.verify(true, "fixed"), Err(Abort::Failure));
        drop(ctx);
        let text = fx.console_text();
        assert!(text.starts_with("verify succeeded: fixed\n"));
        assert!(text.contains("did not see expected failure: known bug\n"));
    }

    #[test]
    fn abort_mode_failing_assertion_is_an_expected_failure() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.expect_fail("known bug", ExpectFailMode::AbortOnFailure);
        assert_eq!(ctx.verify(false, "broken"), Err(Abort::ExpectedFailure));
        drop(ctx);
        assert!(fx.console_text().contains("expected failure: known bug\n"));
        let xml = fx.sink.contents();
        assert!(!xml.contains("<failure"));
        assert!(xml.contains("<system-out>\nfailed: broken\n"));
    }

    #[test]
    fn continue_mode_passing_assertion_is_a_failure() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.expect_fail("known bug", ExpectFailMode::ContinueOnFailure);
        assert_eq!(compare!(ctx, 1, 1), Err(Abort::Failure));
        drop(ctx);
        assert!(fx.console_text().starts_with("compare succeeded: 1 == 1\n"));
    }

    #[test]
    fn continue_mode_failure_continues_and_disarms() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.expect_fail("known bug", ExpectFailMode::ContinueOnFailure);
        assert_eq!(ctx.expect_fail_mode(), Some(ExpectFailMode::ContinueOnFailure));
        assert_eq!(ctx.verify(false, "broken"), Ok(()));
        assert_eq!(ctx.expect_fail_mode(), None);
        // The next assertion is a fresh, unarmed check.
        assert_eq!(ctx.verify(true, "fine"), Ok(()));
        assert_eq!(ctx.verify(false, "broken again"), Err(Abort::Failure));
    }

    #[test]
    fn expect_fail_covers_one_assertion_only() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.expect_fail("first only", ExpectFailMode::AbortOnFailure);
        assert_eq!(compare!(ctx, 0, 1), Err(Abort::ExpectedFailure));
        assert_eq!(ctx.expect_fail_mode(), None);
    }

    #[test]
    fn skip_signals_are_distinct() {
        let mut fx = Fixture::new();
        assert_eq!(fx.ctx().skip("n/a"), Err(Abort::Skip));
        assert_eq!(fx.ctx().skip_all("n/a"), Err(Abort::SkipAll));
        assert!(fx.console_text().starts_with("skipped: n/a\n"));
        assert!(fx.sink.contents().contains("<skipped message=\"n/a\"/>"));
    }

    #[test]
    fn fail_ignores_armed_expectation() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.expect_fail("irrelevant", ExpectFailMode::AbortOnFailure);
        assert_eq!(ctx.fail("bad input"), Err(Abort::Failure));
        assert_eq!(ctx.expect_fail_mode(), None);
    }

    #[test]
    fn pin_overflow_fails_the_case() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        assert_eq!(ctx.set_pin("A", 1), Ok(()));
        assert_eq!(ctx.set_pin("B", 2), Ok(()));
        assert_eq!(ctx.set_pin("C", 3), Err(Abort::Failure));
        assert_eq!(ctx.compare_pin("A", 1), Ok(()));
        assert_eq!(ctx.compare_pin("B", 0), Err(Abort::Failure));
        drop(ctx);
        assert!(fx.console_text().contains("pin store is full"));
        assert!(fx.console_text().contains("failed: pin \"B\" != 0\n"));
    }

    #[test]
    fn print_goes_to_console_and_report() {
        let mut fx = Fixture::new();
        fx.ctx().print("hello <world>");
        assert_eq!(fx.console_text(), "hello <world>\n");
        assert!(fx
            .sink
            .contents()
            .contains("<system-out>\nhello &lt;world&gt;\n</system-out>\n"));
    }

    #[test]
    fn dump_pins_writes_sorted_listing() {
        let mut fx = Fixture::new();
        let mut ctx = fx.ctx();
        ctx.set_pin("Zed", 1).unwrap();
        ctx.set_pin("Abe", 2).unwrap();
        ctx.dump_pins();
        drop(ctx);
        let text = fx.console_text();
        let abe = text.find("Abe").unwrap();
        let zed = text.find("Zed").unwrap();
        assert!(abe < zed);
    }
}
