//! File-content provider used by `load` and the CLI.
//!
//! The evaluator never touches the filesystem directly: it asks a
//! [`SourceLoader`] for a named buffer and wraps the result in a SOURCE
//! value. Hosts and tests swap in [`MemLoader`] to serve sources from
//! memory.

use std::{collections::HashMap, fs, io};

/// Resolves a source name to its content bytes.
pub trait SourceLoader {
    fn load(&mut self, name: &str) -> io::Result<Vec<u8>>;
}

/// Loads sources from the filesystem.
#[derive(Debug, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&mut self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(name)
    }
}

/// Serves sources from an in-memory table. Lookups for unknown names fail
/// like a missing file.
#[derive(Debug, Default)]
pub struct MemLoader {
    files: HashMap<String, Vec<u8>>,
}

impl MemLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a named source.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), content.into());
    }
}

impl SourceLoader for MemLoader {
    fn load(&mut self, name: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{name}: no such source")))
    }
}
