//! Incremental JUnit-style XML report.
//!
//! The report is written while the suite runs, one `testcase` element at a
//! time. The suite totals are not known until the end, so the header is
//! written twice: first as a placeholder with every number rendered as zero,
//! then once more over the top of the first copy after seeking back to the
//! start of the file. Every numeric field has a fixed width, so both copies
//! have the same byte length and the overwrite leaves the case records that
//! follow the header intact.
//!
//! A writer without a sink accepts every call and writes nothing. A sink that
//! fails mid-run is dropped after logging a warning; reporting problems never
//! affect the verdict of the run.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use std::time::Duration;

use log::warn;

use crate::errors::HarnessError;

/// Width of the count fields in the header.
const COUNT_WIDTH: usize = 10;
/// Largest count that fits in [`COUNT_WIDTH`] digits.
const MAX_COUNT: u64 = 9_999_999_999;
/// Largest whole-second value that fits in the seven-digit time field.
const MAX_SECONDS: u64 = 9_999_999;

/// Anything the report can be written to and rewound.
pub trait ReportSink: Write + Seek {}

impl<T: Write + Seek> ReportSink for T {}

/// Final figures written into the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteTotals {
    pub tests: usize,
    pub failures: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

pub struct ReportWriter {
    sink: Option<Box<dyn ReportSink>>,
    suite: String,
}

impl ReportWriter {
    /// Starts a report on `sink` and writes the placeholder header.
    pub fn new(sink: impl ReportSink + 'static, suite: &str) -> Self {
        let mut writer = Self {
            sink: Some(Box::new(sink)),
            suite: suite.to_string(),
        };
        writer.write_header(&SuiteTotals::default());
        writer
    }

    /// Creates (or truncates) the report file at `path`.
    pub fn create(path: &Path, suite: &str) -> Result<Self, HarnessError> {
        let file = File::create(path).map_err(|source| HarnessError::ReportIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file, suite))
    }

    /// A writer that discards everything.
    pub fn disabled(suite: &str) -> Self {
        Self {
            sink: None,
            suite: suite.to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn begin_case(&mut self, name: &str) {
        let line = format!(
            "<testcase classname=\"{}\" name=\"{}\">\n",
            quote(&self.suite),
            quote(name)
        );
        self.emit(&line);
    }

    pub fn end_case(&mut self) {
        self.emit("</testcase>\n");
    }

    /// Free-form output of the current case.
    pub fn system_out(&mut self, text: &str) {
        let block = format!("<system-out>\n{}</system-out>\n", quote(text));
        self.emit(&block);
    }

    /// A failure block. `message` becomes the single-line `message`
    /// attribute, `body` the element text.
    pub fn failure(&mut self, message: &str, body: &str) {
        let block = format!(
            "<failure message=\"{}\" type=\"failure\">{}</failure>\n",
            quote_attr(message),
            quote(body)
        );
        self.emit(&block);
    }

    pub fn skipped(&mut self, message: &str) {
        let line = format!("<skipped message=\"{}\"/>\n", quote_attr(message));
        self.emit(&line);
    }

    /// Closes the document, rewrites the header with `totals` and releases
    /// the sink.
    pub fn finish(&mut self, totals: &SuiteTotals) {
        self.emit("</testsuite>\n</testsuites>\n");
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(e) = sink.seek(SeekFrom::Start(0)) {
            warn!("could not rewind report for suite '{}': {}", self.suite, e);
            self.sink = None;
            return;
        }
        self.write_header(totals);
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.flush() {
                warn!("could not flush report for suite '{}': {}", self.suite, e);
            }
        }
    }

    fn write_header(&mut self, totals: &SuiteTotals) {
        let header = render_header(&self.suite, totals);
        self.emit(&header);
    }

    fn emit(&mut self, text: &str) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(e) = sink.write_all(text.as_bytes()) {
            warn!(
                "report for suite '{}' disabled after write error: {}",
                self.suite, e
            );
            self.sink = None;
        }
    }
}

/// Renders the fixed-width document header.
pub fn render_header(suite: &str, totals: &SuiteTotals) -> String {
    let failures = clamp_count(totals.failures);
    let skipped = clamp_count(totals.skipped);
    let tests = clamp_count(totals.tests);
    let time = render_time(totals.elapsed);

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    let _ = writeln!(
        out,
        "<testsuites failures=\"{:0w$}\" skipped=\"{:0w$}\" tests=\"{:0w$}\" time=\"{}\">",
        failures,
        skipped,
        tests,
        time,
        w = COUNT_WIDTH
    );
    let _ = writeln!(
        out,
        "<testsuite failures=\"{:0w$}\" skipped=\"{:0w$}\" tests=\"{:0w$}\" time=\"{}\" name=\"{}\">",
        failures,
        skipped,
        tests,
        time,
        quote(suite),
        w = COUNT_WIDTH
    );
    out
}

fn clamp_count(count: usize) -> u64 {
    (count as u64).min(MAX_COUNT)
}

/// `SSSSSSS.mmm`, saturating at the widest value the field holds.
fn render_time(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs > MAX_SECONDS {
        return format!("{:07}.{:03}", MAX_SECONDS, 999);
    }
    format!("{:07}.{:03}", secs, elapsed.subsec_millis())
}

/// Escapes `"`, `&`, `<` and `>`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        push_quoted(&mut out, ch);
    }
    out
}

/// Like [`quote`], but drops line breaks so the result fits in an attribute.
pub fn quote_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars().filter(|ch| *ch != '\n' && *ch != '\r') {
        push_quoted(&mut out, ch);
    }
    out
}

fn push_quoted(out: &mut String, ch: char) {
    match ch {
        '"' => out.push_str("&quot;"),
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(ch),
    }
}
