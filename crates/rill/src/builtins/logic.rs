//! Boolean operations.
//!
//! `&` and `or` run in one of two modes: pair mode pops two BOOLEANs that
//! are already on the stack (so there is nothing left to short-circuit), or
//! list mode pops a single LIST of deferred tests and evaluates its elements
//! one by one, stopping as soon as the outcome is decided.
//!
//! A deferred test is whatever one element evaluates to: a word naming a
//! function or binding that leaves a BOOLEAN, or a nested test body. When an
//! element opens a quotation, the following elements feed it until it
//! closes; the collected LIST then runs as the test body. An element that
//! leaves anything other than a BOOLEAN is a wrong condition.

use super::Builtin;
use crate::{
    args::{ArgSpec, take_args},
    error::{RunError, RunResult},
    io::PrintWriter,
    run::Interp,
    source::SourceLoader,
    value::Value,
};

/// `not` negates the BOOLEAN on top.
pub(super) fn not(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let [v] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::Bool]).ok_or(RunError::WrongArgs("not"))?;
    let Value::Bool(b) = v else {
        unreachable!("pattern guarantees a Bool");
    };
    vm.stack.push(Value::Bool(!b));
    Ok(())
}

/// `&` / `or` in either pair or list mode.
pub(super) fn junction(
    vm: &mut Interp<impl SourceLoader>,
    op: Builtin,
    print: &mut impl PrintWriter,
) -> RunResult<()> {
    let all_must_hold = matches!(op, Builtin::And);
    if let Some([a, b]) = take_args(&mut vm.stack, &vm.heap, [ArgSpec::Bool, ArgSpec::Bool]) {
        let (Value::Bool(a), Value::Bool(b)) = (a, b) else {
            unreachable!("pattern guarantees two Bools");
        };
        let result = if all_must_hold { a && b } else { a || b };
        vm.stack.push(Value::Bool(result));
        return Ok(());
    }
    let [tests] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::List]).ok_or(RunError::WrongArgs(op.name()))?;
    let Value::List(tests) = tests else {
        unreachable!("pattern guarantees a List");
    };
    let elements = vm.heap.list_to_vec(tests);
    if let Some(head) = tests {
        vm.heap.dec_ref(head);
    }

    let mut result = all_must_hold;
    let mut outcome = Ok(());
    let mut iter = elements.into_iter();
    for element in iter.by_ref() {
        if let Err(err) = vm.step_value(element, print) {
            outcome = Err(err);
            break;
        }
        if vm.quote.is_some() {
            // mid-quotation: the test body is still being collected
            continue;
        }
        match pop_verdict(vm, op.name(), print) {
            Ok(b) => {
                if b != all_must_hold {
                    // decided: all-true broken for `&`, any-true met for `or`
                    result = b;
                    break;
                }
            }
            Err(err) => {
                outcome = Err(err);
                break;
            }
        }
    }
    for rest in iter {
        rest.drop_with_heap(&mut vm.heap);
    }
    outcome?;
    vm.stack.push(Value::Bool(result));
    Ok(())
}

/// Pops one test outcome. A LIST outcome is itself a deferred body: run it
/// and pop again.
fn pop_verdict(vm: &mut Interp<impl SourceLoader>, op: &'static str, print: &mut impl PrintWriter) -> RunResult<bool> {
    match vm.stack.pop() {
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::List(body)) => {
            let run = vm.eval_anonymous(body, print);
            if let Some(head) = body {
                vm.heap.dec_ref(head);
            }
            run?;
            match vm.stack.pop() {
                Some(Value::Bool(b)) => Ok(b),
                Some(other) => {
                    other.drop_with_heap(&mut vm.heap);
                    Err(RunError::WrongCondition(op))
                }
                None => Err(RunError::WrongCondition(op)),
            }
        }
        Some(other) => {
            other.drop_with_heap(&mut vm.heap);
            Err(RunError::WrongCondition(op))
        }
        None => Err(RunError::WrongCondition(op)),
    }
}
