//! `fn` and `assign`: the stream-aware definers.
//!
//! Both words precede their operands in source order. Invoking one arms a
//! pending definition on the interpreter: the next token is captured raw as
//! the name, and the next value that lands on the stack becomes the payload.
//! `fn` requires a LIST and binds a FUNCTION into globals; `assign` binds
//! any value into the innermost scope (globals at top level).

use crate::{
    error::RunResult,
    run::{DefTarget, Interp},
    source::SourceLoader,
};

pub(super) fn defun(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    vm.arm_definition(DefTarget::Function);
    Ok(())
}

pub(super) fn assign(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    vm.arm_definition(DefTarget::Variable);
    Ok(())
}
