//! String and array access operations.

use crate::{
    args::{ArgSpec, take_args},
    error::{RunError, RunResult},
    heap::HeapData,
    run::Interp,
    source::SourceLoader,
    value::Value,
};

/// `len` pushes the byte length of the STRING on top (SOURCE borrows as a
/// string).
pub(super) fn len(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let [s] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::Str]).ok_or(RunError::WrongArgs("len"))?;
    let Value::Str(s) = s else {
        unreachable!("pattern guarantees a Str");
    };
    let length = i64::from(s.len);
    Value::Str(s).drop_with_heap(&mut vm.heap);
    vm.stack.push(Value::Int(length));
    Ok(())
}

fn is_index(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Char(_))
}

fn is_sequence(value: &Value) -> bool {
    matches!(value, Value::Str(_) | Value::Source(_) | Value::Array(_) | Value::List(_))
}

fn as_index(value: Value) -> i64 {
    match value {
        Value::Int(n) => n,
        Value::Char(c) => i64::from(c),
        _ => unreachable!("checked by is_index"),
    }
}

/// `@` indexes the sequence with the integer, accepting the operands in
/// either order: STRING yields the CHAR at the index, ARRAY the STRING,
/// LIST the element. Out of range yields NOTHING.
pub(super) fn at(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let depth = vm.stack.len();
    if depth < 2 {
        return Err(RunError::WrongArgs("@"));
    }
    let (top, below) = (&vm.stack[depth - 1], &vm.stack[depth - 2]);
    let (index, sequence) = if is_index(top) && is_sequence(below) {
        let index = vm.stack.pop().expect("depth checked");
        let sequence = vm.stack.pop().expect("depth checked");
        (as_index(index), sequence)
    } else if is_sequence(top) && is_index(below) {
        let sequence = vm.stack.pop().expect("depth checked");
        let index = vm.stack.pop().expect("depth checked");
        (as_index(index), sequence)
    } else {
        return Err(RunError::WrongArgs("@"));
    };

    let result = index_sequence(vm, index, &sequence);
    sequence.drop_with_heap(&mut vm.heap);
    vm.stack.push(result);
    Ok(())
}

fn index_sequence(vm: &Interp<impl SourceLoader>, index: i64, sequence: &Value) -> Value {
    if index < 0 {
        return Value::Nothing;
    }
    let index = index as usize;
    match sequence {
        Value::Str(s) => {
            let bytes = vm.heap.str_bytes(*s);
            bytes.get(index).map_or(Value::Nothing, |&b| Value::Char(b))
        }
        Value::Source(id) => {
            let bytes = vm.heap.source(*id).bytes();
            bytes.get(index).map_or(Value::Nothing, |&b| Value::Char(b))
        }
        Value::Array(id) => {
            let HeapData::Array(slices) = vm.heap.get(*id) else {
                unreachable!("Array value must point at Array data");
            };
            slices.get(index).map_or(Value::Nothing, |&slice| {
                vm.heap.inc_ref(slice.owner);
                Value::Str(slice)
            })
        }
        Value::List(list) => vm
            .heap
            .list_get(*list, index)
            .map_or(Value::Nothing, |element| element.clone_with_heap(&vm.heap)),
        _ => unreachable!("checked by is_sequence"),
    }
}

/// `s end start substr` pushes the half-open slice `[start, end)` of the
/// STRING; bounds are clamped to the string.
pub(super) fn substr(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let [start, end, s] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::Int, ArgSpec::Int, ArgSpec::Str])
        .ok_or(RunError::WrongArgs("substr"))?;
    let (Value::Int(start), Value::Int(end), Value::Str(s)) = (start, end, s) else {
        unreachable!("pattern guarantees Int Int Str");
    };
    let length = i64::from(s.len);
    let start = start.clamp(0, length) as u32;
    let end = end.clamp(i64::from(start), length) as u32;
    // the popped string's reference carries over to the narrowed slice
    vm.stack.push(Value::Str(s.narrow(start, end)));
    Ok(())
}

/// `s ( seps ) cut` finds the first occurrence of any separator in the
/// STRING. Found: pushes suffix then prefix (prefix on top). Not found:
/// pushes NOTHING then the whole string.
pub(super) fn cut(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let [seps, s] =
        take_args(&mut vm.stack, &vm.heap, [ArgSpec::Array, ArgSpec::Str]).ok_or(RunError::WrongArgs("cut"))?;
    let (Value::Array(seps_id), Value::Str(s)) = (seps, s) else {
        unreachable!("pattern guarantees Array Str");
    };

    let found = {
        let HeapData::Array(separators) = vm.heap.get(seps_id) else {
            unreachable!("Array value must point at Array data");
        };
        let bytes = vm.heap.str_bytes(s);
        let mut hit = None;
        'scan: for i in 0..bytes.len() {
            for &sep in separators {
                let sep_bytes = vm.heap.str_bytes(sep);
                if sep_bytes.len() <= bytes.len() - i && bytes[i..i + sep_bytes.len()] == *sep_bytes {
                    hit = Some((i as u32, sep_bytes.len() as u32));
                    break 'scan;
                }
            }
        }
        hit
    };
    vm.heap.dec_ref(seps_id);

    match found {
        Some((at, sep_len)) => {
            // both halves share the buffer: one reference comes from the
            // popped string, the second is taken here
            vm.heap.inc_ref(s.owner);
            vm.stack.push(Value::Str(s.narrow(at + sep_len, s.len)));
            vm.stack.push(Value::Str(s.narrow(0, at)));
        }
        None => {
            vm.stack.push(Value::Nothing);
            vm.stack.push(Value::Str(s));
        }
    }
    Ok(())
}

/// `string?` peeks at the top of the stack: `true` only for a STRING. A
/// NOTHING on top is consumed; anything else stays put.
pub(super) fn is_string(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let verdict = match vm.stack.last() {
        Some(Value::Nothing) => {
            vm.stack.pop();
            false
        }
        Some(Value::Str(_)) => true,
        _ => false,
    };
    vm.stack.push(Value::Bool(verdict));
    Ok(())
}
