//! The two-level word environment: a global table and a stack of short-lived
//! scope frames.
//!
//! Lookup consults the innermost frame first (newest binding wins), then the
//! globals. A *named* frame starts blind: it sees only bindings it makes
//! itself, so misses fall straight through to globals. An *anonymous* frame
//! (a quotation body run via `!@` or a combinator) additionally sees the
//! bindings visible to its caller's frame.
//!
//! Frames share one flat binding stack; each frame records the floor below
//! which it must not look and the length to truncate back to on exit.

use indexmap::IndexMap;

use crate::{heap::Heap, value::Value};

/// Visibility rule for a new scope frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    /// Fresh frame for a named function body: sees only its own bindings.
    Named,
    /// Inline body: inherits the caller frame's visible bindings.
    Anonymous,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Bindings below this index are invisible to the frame.
    floor: usize,
    /// Binding-stack length when the frame was pushed; exit truncates here.
    len_at_entry: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Env {
    globals: IndexMap<Box<[u8]>, Value, ahash::RandomState>,
    bindings: Vec<(Box<[u8]>, Value)>,
    frames: Vec<Frame>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `name`: innermost scope frame first, then globals.
    pub fn find(&self, name: &[u8]) -> Option<&Value> {
        if let Some(frame) = self.frames.last() {
            for (key, value) in self.bindings[frame.floor..].iter().rev() {
                if key.as_ref() == name {
                    return Some(value);
                }
            }
        }
        self.globals.get(name)
    }

    /// True while at least one scope frame is active.
    pub fn in_scope(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Binds into the innermost scope frame, or into globals when no frame
    /// is active (`assign` semantics).
    pub fn bind(&mut self, name: Box<[u8]>, value: Value, heap: &mut Heap) {
        if self.in_scope() {
            self.bindings.push((name, value));
        } else {
            self.bind_global(name, value, heap);
        }
    }

    /// Binds into globals regardless of active frames (`fn` semantics).
    /// A shadowed previous binding is released through the heap.
    pub fn bind_global(&mut self, name: Box<[u8]>, value: Value, heap: &mut Heap) {
        if let Some(old) = self.globals.insert(name, value) {
            old.drop_with_heap(heap);
        }
    }

    pub fn push_frame(&mut self, kind: ScopeKind) {
        let len = self.bindings.len();
        let floor = match kind {
            ScopeKind::Named => len,
            ScopeKind::Anonymous => self.frames.last().map_or(len, |f| f.floor),
        };
        self.frames.push(Frame {
            floor,
            len_at_entry: len,
        });
    }

    /// Discards the innermost frame and every binding it added.
    pub fn pop_frame(&mut self, heap: &mut Heap) {
        let frame = self.frames.pop().expect("Env::pop_frame: no active frame");
        for (_, value) in self.bindings.drain(frame.len_at_entry..) {
            value.drop_with_heap(heap);
        }
    }

    /// Releases every binding. Used when tearing an interpreter down so the
    /// arena's live-object count goes back to zero.
    pub fn clear(&mut self, heap: &mut Heap) {
        while !self.frames.is_empty() {
            self.pop_frame(heap);
        }
        for (_, value) in self.bindings.drain(..) {
            value.drop_with_heap(heap);
        }
        for (_, value) in std::mem::take(&mut self.globals) {
            value.drop_with_heap(heap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> Box<[u8]> {
        name.as_bytes().into()
    }

    #[test]
    fn global_binding_is_visible() {
        let mut heap = Heap::new();
        let mut env = Env::new();
        env.bind(key("x"), Value::Int(3), &mut heap);
        assert!(matches!(env.find(b"x"), Some(Value::Int(3))));
    }

    #[test]
    fn rebinding_a_global_shadows_the_old_value() {
        let mut heap = Heap::new();
        let mut env = Env::new();
        env.bind_global(key("x"), Value::Int(1), &mut heap);
        env.bind_global(key("x"), Value::Int(2), &mut heap);
        assert!(matches!(env.find(b"x"), Some(Value::Int(2))));
    }

    #[test]
    fn scope_binding_is_discarded_on_exit() {
        let mut heap = Heap::new();
        let mut env = Env::new();
        env.push_frame(ScopeKind::Named);
        env.bind(key("x"), Value::Int(3), &mut heap);
        assert!(matches!(env.find(b"x"), Some(Value::Int(3))));
        env.pop_frame(&mut heap);
        assert!(env.find(b"x").is_none());
    }

    #[test]
    fn named_frame_hides_caller_bindings() {
        let mut heap = Heap::new();
        let mut env = Env::new();
        env.push_frame(ScopeKind::Named);
        env.bind(key("x"), Value::Int(1), &mut heap);
        env.push_frame(ScopeKind::Named);
        assert!(env.find(b"x").is_none());
        env.pop_frame(&mut heap);
        assert!(matches!(env.find(b"x"), Some(Value::Int(1))));
        env.pop_frame(&mut heap);
    }

    #[test]
    fn anonymous_frame_sees_caller_bindings() {
        let mut heap = Heap::new();
        let mut env = Env::new();
        env.push_frame(ScopeKind::Named);
        env.bind(key("x"), Value::Int(1), &mut heap);
        env.push_frame(ScopeKind::Anonymous);
        assert!(matches!(env.find(b"x"), Some(Value::Int(1))));
        env.bind(key("y"), Value::Int(2), &mut heap);
        env.pop_frame(&mut heap);
        // the anonymous frame's own addition is gone, the caller's stays
        assert!(env.find(b"y").is_none());
        assert!(matches!(env.find(b"x"), Some(Value::Int(1))));
        env.pop_frame(&mut heap);
    }

    #[test]
    fn scope_misses_fall_through_to_globals() {
        let mut heap = Heap::new();
        let mut env = Env::new();
        env.bind_global(key("g"), Value::Int(9), &mut heap);
        env.push_frame(ScopeKind::Named);
        assert!(matches!(env.find(b"g"), Some(Value::Int(9))));
        env.pop_frame(&mut heap);
    }

    #[test]
    fn newest_scope_binding_wins() {
        let mut heap = Heap::new();
        let mut env = Env::new();
        env.push_frame(ScopeKind::Named);
        env.bind(key("x"), Value::Int(1), &mut heap);
        env.bind(key("x"), Value::Int(2), &mut heap);
        assert!(matches!(env.find(b"x"), Some(Value::Int(2))));
        env.pop_frame(&mut heap);
    }
}
