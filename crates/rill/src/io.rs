//! Output abstraction for the `.` built-in and the leftover-stack listing.
//!
//! Everything the evaluator writes to stdout goes through a [`PrintWriter`],
//! so hosts can capture or suppress output. Error and trace output is not
//! routed here; it goes straight to stderr.

use std::io::{self, Write as _};

/// Sink for evaluator stdout.
pub trait PrintWriter {
    /// Writes a chunk of output text, verbatim. No separators or newlines
    /// are added; the evaluator emits those itself via [`Self::stdout_push`].
    fn stdout_write(&mut self, output: &str);

    /// Writes a single character (separators, newlines).
    fn stdout_push(&mut self, ch: char);
}

/// Default `PrintWriter` that writes straight to stdout.
#[derive(Debug, Default)]
pub struct StdPrint;

impl PrintWriter for StdPrint {
    fn stdout_write(&mut self, output: &str) {
        let mut out = io::stdout().lock();
        let _ = out.write_all(output.as_bytes());
        let _ = out.flush();
    }

    fn stdout_push(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        let mut out = io::stdout().lock();
        let _ = out.write_all(ch.encode_utf8(&mut buf).as_bytes());
        let _ = out.flush();
    }
}

/// A `PrintWriter` that collects all output into a string.
///
/// Useful for testing or capturing output programmatically.
#[derive(Debug, Default)]
pub struct CollectStringPrint(String);

impl CollectStringPrint {
    #[must_use]
    pub fn new() -> Self {
        Self(String::new())
    }

    /// The collected output so far.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.0
    }

    /// Consumes the writer and returns the collected output.
    #[must_use]
    pub fn into_output(self) -> String {
        self.0
    }
}

impl PrintWriter for CollectStringPrint {
    fn stdout_write(&mut self, output: &str) {
        self.0.push_str(output);
    }

    fn stdout_push(&mut self, ch: char) {
        self.0.push(ch);
    }
}

/// `PrintWriter` that ignores all output.
#[derive(Debug, Default)]
pub struct NoPrint;

impl PrintWriter for NoPrint {
    fn stdout_write(&mut self, _output: &str) {}

    fn stdout_push(&mut self, _ch: char) {}
}
