//! Error channel for the evaluator.
//!
//! Errors are side-channel messages, never first-class values: the dispatch
//! loop reports recoverable kinds to stderr and keeps going, while fatal kinds
//! unwind to the host as a [`Halt`] carrying the process exit code.

/// Result type alias for operations that can produce a runtime error.
pub(crate) type RunResult<T> = Result<T, RunError>;

/// Runtime error raised by a built-in or by the dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunError {
    /// An operation's argument pattern did not match the stack and no
    /// coercion applied. Reported as `"<op>: wrong argument list"`; the stack
    /// is left as it was.
    WrongArgs(&'static str),
    /// A condition body did not leave a BOOLEAN on the stack. Reported and
    /// the enclosing loop stops; outer execution continues.
    WrongCondition(&'static str),
    /// Unrecoverable misuse (`.` or `load` on an empty stack, unopenable
    /// file). Reported and the process exits with status 1.
    Fatal(String),
    /// Explicit `exit n`.
    Exit(i32),
}

impl RunError {
    /// True for the kinds the dispatch loop swallows after reporting.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::WrongArgs(_) | Self::WrongCondition(_))
    }
}

/// Terminal outcome of a run, as seen by the host.
///
/// `Halt::Exit(0)` never occurs: a run that finishes normally returns `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The program requested (or an error forced) process termination.
    Exit(i32),
}

impl Halt {
    /// The process exit code this halt maps to.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Exit(code) => code,
        }
    }
}
