//! Arithmetic, relational and equality operations.
//!
//! The stack holds operands in reverse source order, so every binary
//! operation pops the top operand `a`, the next operand `b`, and applies
//! `b OP a`. That keeps the source-order intuition: `3 5 <` is true because
//! 3 was written before 5.

use super::Builtin;
use crate::{
    args::{ArgSpec, take_args},
    error::{RunError, RunResult},
    run::Interp,
    source::SourceLoader,
    value::{Value, value_eq},
};

fn int_pair(vm: &mut Interp<impl SourceLoader>, op: &'static str) -> RunResult<(i64, i64)> {
    let [a, b] =
        take_args(&mut vm.stack, &vm.heap, [ArgSpec::Int, ArgSpec::Int]).ok_or(RunError::WrongArgs(op))?;
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Ok((a, b)),
        _ => unreachable!("pattern guarantees two ints"),
    }
}

/// `+`, `-`, `*` over INT x INT (CHAR promotes).
pub(super) fn arith(vm: &mut Interp<impl SourceLoader>, op: Builtin) -> RunResult<()> {
    let (a, b) = int_pair(vm, op.name())?;
    let result = match op {
        Builtin::Add => b.wrapping_add(a),
        Builtin::Sub => b.wrapping_sub(a),
        Builtin::Mul => b.wrapping_mul(a),
        _ => unreachable!("arith only handles + - *"),
    };
    vm.stack.push(Value::Int(result));
    Ok(())
}

/// `<`, `>`, `<=`, `>=` over INT x INT (CHAR promotes).
pub(super) fn relational(vm: &mut Interp<impl SourceLoader>, op: Builtin) -> RunResult<()> {
    let (a, b) = int_pair(vm, op.name())?;
    let result = match op {
        Builtin::Lt => b < a,
        Builtin::Gt => b > a,
        Builtin::Le => b <= a,
        Builtin::Ge => b >= a,
        _ => unreachable!("relational only handles < > <= >="),
    };
    vm.stack.push(Value::Bool(result));
    Ok(())
}

/// `=` / `!=` over any two values. Variants without a defined equality
/// report and compare unequal.
pub(super) fn eq(vm: &mut Interp<impl SourceLoader>, negate: bool) -> RunResult<()> {
    let op = if negate { "!=" } else { "=" };
    let [a, b] =
        take_args(&mut vm.stack, &vm.heap, [ArgSpec::Any, ArgSpec::Any]).ok_or(RunError::WrongArgs(op))?;
    let result = match value_eq(&a, &b, &vm.heap) {
        Some(equal) => equal,
        None => {
            eprintln!("{op}: unsupported comparison for {}", a.kind_name());
            false
        }
    };
    a.drop_with_heap(&mut vm.heap);
    b.drop_with_heap(&mut vm.heap);
    vm.stack.push(Value::Bool(result ^ negate));
    Ok(())
}

/// `value ( options ) in` tests whether some element of the options list
/// resolves to a value equal to `value`.
pub(super) fn in_list(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let [options, value] =
        take_args(&mut vm.stack, &vm.heap, [ArgSpec::List, ArgSpec::Any]).ok_or(RunError::WrongArgs("in"))?;
    let Value::List(options) = options else {
        unreachable!("pattern guarantees a List");
    };
    let elements = vm.heap.list_to_vec(options);
    if let Some(head) = options {
        vm.heap.dec_ref(head);
    }
    let mut found = false;
    for element in elements {
        let resolved = vm.resolve_value(element);
        if !found && value_eq(&resolved, &value, &vm.heap) == Some(true) {
            found = true;
        }
        resolved.drop_with_heap(&mut vm.heap);
    }
    value.drop_with_heap(&mut vm.heap);
    vm.stack.push(Value::Bool(found));
    Ok(())
}
