//! Conditional and loop combinators.
//!
//! Combinators own the LIST bodies they pop and release them on every exit
//! path, whether or not the body ever ran.

use crate::{
    args::{ArgSpec, take_args},
    error::{RunError, RunResult},
    io::PrintWriter,
    run::Interp,
    source::SourceLoader,
    value::{ListRef, Value},
};

fn release(vm: &mut Interp<impl SourceLoader>, body: ListRef) {
    if let Some(head) = body {
        vm.heap.dec_ref(head);
    }
}

fn pop_condition(vm: &mut Interp<impl SourceLoader>, op: &'static str) -> RunResult<bool> {
    match vm.stack.pop() {
        Some(Value::Bool(b)) => Ok(b),
        Some(other) => {
            other.drop_with_heap(&mut vm.heap);
            Err(RunError::WrongCondition(op))
        }
        None => Err(RunError::WrongCondition(op)),
    }
}

/// `?` evaluates the true-body when the BOOLEAN holds, the false-body (when
/// given) otherwise: `bool ( false-body ) ( true-body ) ?` or
/// `bool ( true-body ) ?`.
pub(super) fn cond(vm: &mut Interp<impl SourceLoader>, print: &mut impl PrintWriter) -> RunResult<()> {
    let (chosen, dropped) =
        if let Some([t, f, w]) = take_args(&mut vm.stack, &vm.heap, [ArgSpec::List, ArgSpec::List, ArgSpec::Bool]) {
            let (Value::List(t), Value::List(f), Value::Bool(w)) = (t, f, w) else {
                unreachable!("pattern guarantees List List Bool");
            };
            if w { (Some(t), Some(f)) } else { (Some(f), Some(t)) }
        } else if let Some([t, w]) = take_args(&mut vm.stack, &vm.heap, [ArgSpec::List, ArgSpec::Bool]) {
            let (Value::List(t), Value::Bool(w)) = (t, w) else {
                unreachable!("pattern guarantees List Bool");
            };
            if w { (Some(t), None) } else { (None, Some(t)) }
        } else {
            return Err(RunError::WrongArgs("?"));
        };
    if let Some(body) = dropped {
        release(vm, body);
    }
    if let Some(body) = chosen {
        let result = vm.eval_anonymous(body, print);
        release(vm, body);
        result?;
    }
    Ok(())
}

/// `( cond ) ( body ) doWhile` runs body, then cond, repeating while cond
/// leaves `true`.
pub(super) fn do_while(vm: &mut Interp<impl SourceLoader>, print: &mut impl PrintWriter) -> RunResult<()> {
    let [body, cond] =
        take_args(&mut vm.stack, &vm.heap, [ArgSpec::List, ArgSpec::List]).ok_or(RunError::WrongArgs("doWhile"))?;
    let (Value::List(body), Value::List(cond)) = (body, cond) else {
        unreachable!("pattern guarantees two Lists");
    };
    let result = loop {
        if let Err(err) = vm.eval_anonymous(body, print) {
            break Err(err);
        }
        if let Err(err) = vm.eval_anonymous(cond, print) {
            break Err(err);
        }
        match pop_condition(vm, "doWhile") {
            Ok(true) => {}
            Ok(false) => break Ok(()),
            Err(err) => break Err(err),
        }
    };
    release(vm, body);
    release(vm, cond);
    result
}

/// `( cond ) ( body ) whileDo` tests cond first; while it leaves `true`,
/// runs body and tests again.
pub(super) fn while_do(vm: &mut Interp<impl SourceLoader>, print: &mut impl PrintWriter) -> RunResult<()> {
    let [body, cond] =
        take_args(&mut vm.stack, &vm.heap, [ArgSpec::List, ArgSpec::List]).ok_or(RunError::WrongArgs("whileDo"))?;
    let (Value::List(body), Value::List(cond)) = (body, cond) else {
        unreachable!("pattern guarantees two Lists");
    };
    let result = loop {
        if let Err(err) = vm.eval_anonymous(cond, print) {
            break Err(err);
        }
        match pop_condition(vm, "whileDo") {
            Ok(true) => {}
            Ok(false) => break Ok(()),
            Err(err) => break Err(err),
        }
        if let Err(err) = vm.eval_anonymous(body, print) {
            break Err(err);
        }
    };
    release(vm, body);
    release(vm, cond);
    result
}

/// `to from ( body ) doCounting` pushes each integer `from..=to` in turn and
/// evaluates body.
pub(super) fn do_counting(vm: &mut Interp<impl SourceLoader>, print: &mut impl PrintWriter) -> RunResult<()> {
    let [body, from, to] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::List, ArgSpec::Int, ArgSpec::Int])
        .ok_or(RunError::WrongArgs("doCounting"))?;
    let (Value::List(body), Value::Int(from), Value::Int(to)) = (body, from, to) else {
        unreachable!("pattern guarantees List Int Int");
    };
    let mut result = Ok(());
    for i in from..=to {
        vm.stack.push(Value::Int(i));
        if let Err(err) = vm.eval_anonymous(body, print) {
            result = Err(err);
            break;
        }
    }
    release(vm, body);
    result
}

/// `!@` evaluates the LIST on top as a body under the current environment.
pub(super) fn apply(vm: &mut Interp<impl SourceLoader>, print: &mut impl PrintWriter) -> RunResult<()> {
    let [body] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::List]).ok_or(RunError::WrongArgs("!@"))?;
    let Value::List(body) = body else {
        unreachable!("pattern guarantees a List");
    };
    let result = vm.eval_anonymous(body, print);
    release(vm, body);
    result
}
