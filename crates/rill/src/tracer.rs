//! Dispatch tracing, toggled at runtime by the `+dbg` / `-dbg` built-ins.
//!
//! The trace state lives on the interpreter rather than in module globals,
//! so embedding several interpreters in one process stays well-defined.
//! Events are written to stderr, keeping stdout reserved for program output.

use crate::value::Value;

/// How the dispatch loop handled a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dispatch {
    /// The word resolved to a native operation.
    Builtin,
    /// The word resolved to a user function; its body was evaluated.
    Function,
    /// The word resolved to a plain value which was pushed.
    Resolved,
    /// The word did not resolve and was classified as a literal.
    Literal,
}

impl Dispatch {
    fn label(self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Function => "call",
            Self::Resolved => "push",
            Self::Literal => "literal",
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Trace {
    enabled: bool,
}

impl Trace {
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// One line per dispatched word, with the stack depth after the step.
    pub fn step(&self, word: &[u8], how: Dispatch, depth: usize) {
        if self.enabled {
            let word = String::from_utf8_lossy(word);
            eprintln!("dbg: {:<12} {word} [depth {depth}]", how.label());
        }
    }

    /// Records a value pushed during quotation collection.
    pub fn quoted(&self, value: &Value, depth: u32) {
        if self.enabled {
            eprintln!("dbg: quote({depth})    {}", value.kind_name());
        }
    }
}
