//! Violation records and output sinks.

use std::io::Write;

use serde::Serialize;

use crate::node::Location;

/// One naming violation.
///
/// Created per mismatch during traversal and handed straight to a
/// [`ReportSink`]; the engine never retains it.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Where the offending declaration was spelled.
    pub location: Location,
    /// Display name of the declaration.
    pub display: String,
    /// Pattern the spelling failed to satisfy, as configured.
    pub pattern: String,
    /// Convention that resolved for the declaration.
    pub convention: &'static str,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: \"{}\" does not match \"{}\" associated with {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.display,
            self.pattern,
            self.convention
        )
    }
}

/// Receives each violation as it is found.
///
/// Reporting is a side effect only: nothing a sink does feeds back into
/// the traversal or alters the violation count.
pub trait ReportSink {
    /// Called once per violation, in traversal order.
    fn emit(&mut self, violation: &Violation);
}

/// Writes the single-line text diagnostic per violation.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    /// Creates a sink writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the sink and returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn emit(&mut self, violation: &Violation) {
        let _ = writeln!(self.out, "{violation}");
    }
}

/// Writes one JSON object per violation, for machine consumption.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    /// Creates a sink writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the sink and returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn emit(&mut self, violation: &Violation) {
        if serde_json::to_writer(&mut self.out, violation).is_ok() {
            let _ = writeln!(self.out);
        }
    }
}

/// Retains every violation; for tests and batching consumers.
#[derive(Debug, Default)]
pub struct CollectSink {
    /// Violations in the order they were emitted.
    pub violations: Vec<Violation>,
}

impl CollectSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for CollectSink {
    fn emit(&mut self, violation: &Violation) {
        self.violations.push(violation.clone());
    }
}
