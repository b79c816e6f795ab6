//! Typed argument extraction for built-ins.
//!
//! A built-in names the stack pattern it consumes, top first. The whole
//! pattern is validated before anything is popped, so a mismatch leaves the
//! stack exactly as it was and the caller reports a wrong-argument error.
//!
//! Where the stack holds a different variant than the pattern asks for, a
//! single-step coercion is attempted:
//!
//! * SOURCE → STRING: the source value is re-tagged as a slice over its own
//!   buffer; the reference it held keeps the buffer alive, so nothing else
//!   needs to stay on the stack.
//! * CHAR → INT: plain promotion of the byte value.

use crate::{
    heap::Heap,
    value::{StrSlice, Value},
};

/// One position of a built-in's argument pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgSpec {
    Int,
    Bool,
    Str,
    List,
    Array,
    Any,
}

impl ArgSpec {
    /// Whether `value` satisfies this spec directly or through a coercion.
    fn admits(self, value: &Value) -> bool {
        match self {
            Self::Int => matches!(value, Value::Int(_) | Value::Char(_)),
            Self::Bool => matches!(value, Value::Bool(_)),
            Self::Str => matches!(value, Value::Str(_) | Value::Source(_)),
            Self::List => matches!(value, Value::List(_)),
            Self::Array => matches!(value, Value::Array(_)),
            Self::Any => true,
        }
    }
}

/// Applies the coercion table. `value` is owned; a re-tagging coercion
/// transfers its reference to the result.
fn coerce(spec: ArgSpec, value: Value, heap: &Heap) -> Value {
    match (spec, value) {
        (ArgSpec::Int, Value::Char(c)) => Value::Int(i64::from(c)),
        (ArgSpec::Str, Value::Source(id)) => {
            let len = heap.source(id).len();
            Value::Str(StrSlice::whole(id, len))
        }
        (_, value) => value,
    }
}

/// Pops `N` arguments matching `specs` (index 0 is the stack top), applying
/// coercions. Returns `None` without touching the stack when the pattern
/// does not match.
pub(crate) fn take_args<const N: usize>(
    stack: &mut Vec<Value>,
    heap: &Heap,
    specs: [ArgSpec; N],
) -> Option<[Value; N]> {
    if stack.len() < N {
        return None;
    }
    for (i, spec) in specs.iter().enumerate() {
        if !spec.admits(&stack[stack.len() - 1 - i]) {
            return None;
        }
    }
    let mut out: [Value; N] = std::array::from_fn(|_| Value::Nothing);
    for (slot, spec) in out.iter_mut().zip(specs) {
        *slot = coerce(spec, stack.pop().expect("pattern length checked"), heap);
    }
    Some(out)
}
