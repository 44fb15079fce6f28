//! Self-test suite for the harness: every case here is expected to succeed.
//!
//! The code under test is a small output-file-name helper plus the pin
//! simulation; the cases also exercise each assertion kind and each way a
//! case can end.

use std::process::ExitCode;

use testcase::{
    compare, compare_fixed, compare_float, compare_ptr, verify, DataRow, ExpectFailMode,
    HarnessConfig, HarnessError, Registry, TestContext, TestResult,
};

/// Suffix inserted into graded output file names.
const GRADED_SUFFIX: &str = "-graded";

/// Output name for `input`: the suffix goes before the first extension of the
/// file name, ignoring leading dots. `None` when there is no file name.
fn graded_name(input: &str) -> Option<String> {
    let start = input.rfind('/').map_or(0, |i| i + 1);
    let file = &input[start..];
    let stem_start = file.len() - file.trim_start_matches('.').len();
    if stem_start == file.len() {
        return None;
    }
    let insert_at = match file[stem_start..].find('.') {
        Some(dot) => start + stem_start + dot,
        None => input.len(),
    };
    let mut out = String::with_capacity(input.len() + GRADED_SUFFIX.len());
    out.push_str(&input[..insert_at]);
    out.push_str(GRADED_SUFFIX);
    out.push_str(&input[insert_at..]);
    Some(out)
}

/// Mirrors the button pin onto the LED pin.
fn update_led(ctx: &mut TestContext<'_>) -> TestResult {
    let pressed = ctx.get_pin("Button");
    ctx.set_pin("Led", if pressed != 0 { 1 } else { 0 })
}

// ----------------------------------------------------------------------------
// Ordinary cases
// ----------------------------------------------------------------------------

fn math_add(ctx: &mut TestContext<'_>) -> TestResult {
    compare!(ctx, 2 + 2, 4)
}

fn float_sum(ctx: &mut TestContext<'_>) -> TestResult {
    compare_float!(ctx, 0.1 + 0.2, 0.3, 1e-9)
}

/// Battery capacity in thousandths of an amp-second.
fn battery_capacity_milli() -> i32 {
    2_000_000
}

fn fixed_capacity(ctx: &mut TestContext<'_>) -> TestResult {
    compare_fixed!(ctx, battery_capacity_milli(), 2000.0)
}

fn ptr_identity(ctx: &mut TestContext<'_>) -> TestResult {
    let table = [1u8, 2, 3];
    let first = &table[0];
    let alias = &table[..1][0];
    compare_ptr!(ctx, first, alias)
}

fn expect_fail_abort(ctx: &mut TestContext<'_>) -> TestResult {
    ctx.expect_fail("off-by-one is known", ExpectFailMode::AbortOnFailure);
    compare!(ctx, 1 + 1, 3)?;
    ctx.fail("not reached")
}

fn expect_fail_continue(ctx: &mut TestContext<'_>) -> TestResult {
    let ordered = [3, 1];
    ctx.expect_fail("ordering is reversed", ExpectFailMode::ContinueOnFailure);
    verify!(ctx, ordered[0] < ordered[1])?;
    verify!(ctx, ctx.expect_fail_mode().is_none())?;
    compare!(ctx, 2 - 1, 1)
}

fn filenames_no_name(ctx: &mut TestContext<'_>) -> TestResult {
    verify!(ctx, graded_name("testdata/").is_none())?;
    verify!(ctx, graded_name("testdata/..").is_none())
}

fn pins_led(ctx: &mut TestContext<'_>) -> TestResult {
    ctx.set_pin("Button", 1)?;
    update_led(ctx)?;
    ctx.compare_pin("Led", 1)?;
    ctx.set_pin("Button", 0)?;
    update_led(ctx)?;
    ctx.compare_pin("Led", 0)
}

fn pins_dump(ctx: &mut TestContext<'_>) -> TestResult {
    ctx.set_pin("Relay", 1)?;
    ctx.set_pin("Adc", 0x3FF)?;
    // Unset pins read as zero.
    ctx.compare_pin("Unwired", 0)?;
    ctx.dump_pins();
    Ok(())
}

fn display_print(ctx: &mut TestContext<'_>) -> TestResult {
    ctx.print("free-form output <kept> & escaped");
    Ok(())
}

// ----------------------------------------------------------------------------
// Data-driven cases
// ----------------------------------------------------------------------------

struct Graded {
    input: &'static str,
    output: &'static str,
}

fn filenames(ctx: &mut TestContext<'_>, row: &Graded) -> TestResult {
    let name = graded_name(row.input);
    verify!(ctx, name.as_deref() == Some(row.output))
}

fn filename_rows() -> Vec<DataRow<Graded>> {
    let row = |name, input, output| DataRow::new(name, Graded { input, output });
    vec![
        row(
            "Path and name with leading dots",
            "testdata/..names.txt",
            "testdata/..names-graded.txt",
        ),
        row(
            "Path and name with leading dot, no extension",
            "testdata/.names",
            "testdata/.names-graded",
        ),
        row(
            "Path and name with leading dot, extension",
            "testdata/.names.txt",
            "testdata/.names-graded.txt",
        ),
        row("Path and name, no extension", "testdata/names", "testdata/names-graded"),
        row(
            "Path and name, multi extension",
            "testdata/names.txt.t",
            "testdata/names-graded.txt.t",
        ),
        row("Name only, extension", "names.txt", "names-graded.txt"),
    ]
}

struct Sum {
    x: i32,
    y: i32,
    sum: i32,
    skip: Option<&'static str>,
}

fn math_sum(ctx: &mut TestContext<'_>, row: &Sum) -> TestResult {
    if let Some(reason) = row.skip {
        ctx.skip(reason)?;
    }
    compare!(ctx, row.x + row.y, row.sum)
}

fn sum_rows() -> Vec<DataRow<Sum>> {
    let row = |name, x, y, sum, skip| DataRow::new(name, Sum { x, y, sum, skip });
    vec![
        row("2 + 2 = 4", 2, 2, 4, None),
        row("2 + 3 = 5", 2, 3, 5, Some("not applicable on this target")),
        row("2 + 6 = 8", 2, 6, 8, None),
    ]
}

/// Registers every self-test case. A refused registration does not stop
/// the ones after it; every refusal is returned.
fn register_all(registry: &mut Registry) -> Vec<HarnessError> {
    let results = [
        registry.register("Math_Add", math_add),
        registry.register_data_driven("Math_Sum", math_sum, sum_rows),
        registry.register("Float_Sum", float_sum),
        registry.register("Fixed_Capacity", fixed_capacity),
        registry.register("Ptr_Identity", ptr_identity),
        registry.register("ExpectFail_Abort", expect_fail_abort),
        registry.register("ExpectFail_Continue", expect_fail_continue),
        registry.register_data_driven("Filenames_01", filenames, filename_rows),
        registry.register("Filenames_02", filenames_no_name),
        registry.register("Pins_Led", pins_led),
        registry.register("Pins_Dump", pins_dump),
        registry.register("Display_Print", display_print),
        registry.register_populate("Platform_Only", |runner| {
            for target in ["board-a", "board-b"] {
                let stop = runner.run_row(target, |ctx| {
                    if cfg!(target_os = "none") {
                        Ok(())
                    } else {
                        ctx.skip_all("requires target hardware")
                    }
                });
                if stop {
                    break;
                }
            }
        }),
    ];
    results.into_iter().filter_map(Result::err).collect()
}

fn main() -> ExitCode {
    let mut registry = Registry::from_config(&HarnessConfig::default());
    // The run still reports each refused case as failed.
    for e in register_all(&mut registry) {
        eprintln!("{:?}", miette::Report::new(e));
    }
    testcase::cli::run(&registry)
}
