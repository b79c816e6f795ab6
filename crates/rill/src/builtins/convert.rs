//! Conversions between strings, symbols and integers.

use crate::{
    args::{ArgSpec, take_args},
    error::{RunError, RunResult},
    run::Interp,
    source::SourceLoader,
    value::{StrSlice, Value, parse_int},
};

/// `>int` parses the STRING on top as a decimal integer; NOTHING on failure.
pub(super) fn to_int(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let [s] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::Str]).ok_or(RunError::WrongArgs(">int"))?;
    let Value::Str(s) = s else {
        unreachable!("pattern guarantees a Str");
    };
    let parsed = parse_int(vm.heap.str_bytes(s));
    Value::Str(s).drop_with_heap(&mut vm.heap);
    vm.stack.push(parsed.map_or(Value::Nothing, Value::Int));
    Ok(())
}

/// `>sym` re-tags the STRING on top as an ITSELF of the same word.
pub(super) fn to_sym(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let [s] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::Str]).ok_or(RunError::WrongArgs(">sym"))?;
    let Value::Str(s) = s else {
        unreachable!("pattern guarantees a Str");
    };
    vm.stack.push(Value::Sym(s));
    Ok(())
}

/// `>str` turns an ITSELF into a STRING of its word, or an INT into its
/// decimal text (backed by a fresh buffer).
pub(super) fn to_str(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    match vm.stack.last() {
        Some(Value::Sym(_)) => {
            let Some(Value::Sym(s)) = vm.stack.pop() else {
                unreachable!("just matched a Sym");
            };
            vm.stack.push(Value::Str(s));
            Ok(())
        }
        Some(Value::Int(_)) => {
            let Some(Value::Int(n)) = vm.stack.pop() else {
                unreachable!("just matched an Int");
            };
            let text = n.to_string();
            let length = text.len();
            let id = vm.heap.new_source("", text.into_bytes());
            vm.stack.push(Value::Str(StrSlice::whole(id, length)));
            Ok(())
        }
        _ => Err(RunError::WrongArgs(">str")),
    }
}
