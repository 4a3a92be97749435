//! Diagnostic trace sinks and process-wide `tracing` setup.
//!
//! The forecasting engine never depends on diagnostics for control flow. It
//! formats a trace line only when a [`DiagnosticSink`] is attached, and sink
//! failures are swallowed.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Target used for engine trace lines forwarded by [`TracingSink`].
pub const TRACE_TARGET: &str = "analog_forecast::trace";

/// Receiver of human-readable engine trace lines.
///
/// Implementations must be best-effort: a failing write is dropped.
pub trait DiagnosticSink: Send {
    /// Consumes one formatted line (without a trailing newline).
    fn write_line(&mut self, line: &str);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&str) + Send,
{
    fn write_line(&mut self, line: &str) {
        self(line);
    }
}

/// Writes each line to an [`std::io::Write`] destination, newline-terminated.
#[derive(Debug)]
pub struct WriterSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wraps a writer (a file, `io::stderr()`, a `Vec<u8>`...).
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> DiagnosticSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.writer, "{line}");
    }
}

/// Forwards each line as a `DEBUG` event on [`TRACE_TARGET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn write_line(&mut self, line: &str) {
        tracing::debug!(target: TRACE_TARGET, "{line}");
    }
}

/// Collects lines into a shared buffer that stays readable after the sink
/// has been handed to an engine.
///
/// # Examples
///
/// ```
/// use analog_forecast::diagnostics::{DiagnosticSink, MemorySink};
///
/// let sink = MemorySink::new();
/// let mut writer = sink.clone();
/// writer.write_line("hello");
/// assert_eq!(sink.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticSink for MemorySink {
    fn write_line(&mut self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Optional sink slot owned by an engine.
///
/// Formatting is deferred until a sink is known to be present.
#[derive(Default)]
pub struct Diagnostics {
    sink: Option<Box<dyn DiagnosticSink>>,
}

impl Diagnostics {
    /// A slot with nothing attached; every [`emit`](Self::emit) is a no-op.
    pub fn none() -> Self {
        Self { sink: None }
    }

    /// Replaces the current sink.
    pub fn attach(&mut self, sink: Box<dyn DiagnosticSink>) {
        self.sink = Some(sink);
    }

    /// Whether a sink is attached.
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Formats and writes one line if a sink is attached.
    pub fn emit(&mut self, args: fmt::Arguments<'_>) {
        if let Some(sink) = self.sink.as_mut() {
            sink.write_line(&args.to_string());
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Installs a global `fmt` subscriber for the binary.
///
/// `RUST_LOG` wins when set; otherwise the filter is `analog_forecast=info`,
/// or `analog_forecast=debug` when `verbose` is requested. A second call is
/// ignored.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "analog_forecast=debug"
    } else {
        "analog_forecast=info"
    };
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .try_init();
}
