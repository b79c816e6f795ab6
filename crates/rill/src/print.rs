//! Rendering of values for the `.` built-in and the leftover-stack listing.

use std::fmt::Write as _;

use crate::{
    heap::{Heap, HeapData},
    io::PrintWriter,
    value::{ListRef, Value},
};

/// Writes the content of `value` verbatim, with no trailing newline.
pub(crate) fn write_content(value: &Value, heap: &Heap, out: &mut impl PrintWriter) {
    let mut buf = String::new();
    push_content(&mut buf, value, heap);
    out.stdout_write(&buf);
}

/// Prints the leftover stack as `\n( … )\n`, top element first.
pub(crate) fn write_stack_listing(stack: &[Value], heap: &Heap, out: &mut impl PrintWriter) {
    let mut buf = String::from("\n(");
    for value in stack.iter().rev() {
        buf.push(' ');
        push_listing(&mut buf, value, heap);
    }
    buf.push_str(" )\n");
    out.stdout_write(&buf);
}

fn push_content(buf: &mut String, value: &Value, heap: &Heap) {
    match value {
        // NOTHING has no content
        Value::Nothing => {}
        Value::Bool(b) => buf.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => {
            let _ = write!(buf, "{n}");
        }
        Value::Char(c) => buf.push(*c as char),
        Value::Str(s) | Value::Sym(s) => buf.push_str(&String::from_utf8_lossy(heap.str_bytes(*s))),
        Value::Source(id) => buf.push_str(&String::from_utf8_lossy(heap.source(*id).bytes())),
        Value::Array(id) => {
            let HeapData::Array(slices) = heap.get(*id) else {
                unreachable!("Array value must point at Array data");
            };
            buf.push('(');
            for slice in slices {
                buf.push(' ');
                buf.push_str(&String::from_utf8_lossy(heap.str_bytes(*slice)));
            }
            buf.push_str(" )");
        }
        Value::List(list) | Value::Func(list) => push_list(buf, *list, heap),
        Value::Builtin(b) => buf.push_str(b.name()),
    }
}

fn push_list(buf: &mut String, list: ListRef, heap: &Heap) {
    buf.push('(');
    let mut cur = list;
    while let Some(id) = cur {
        let (head, tail) = heap.cons_parts(id);
        buf.push(' ');
        push_content(buf, head, heap);
        cur = tail;
    }
    buf.push_str(" )");
}

/// Like content, but with the placeholders the listing uses for values whose
/// content is empty or bulky.
fn push_listing(buf: &mut String, value: &Value, heap: &Heap) {
    match value {
        Value::Nothing => buf.push_str("nothing"),
        Value::Source(id) => {
            let _ = write!(buf, "SOURCE {}", heap.source(*id).name());
        }
        other => push_content(buf, other, heap),
    }
}
