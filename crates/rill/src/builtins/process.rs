//! Process termination.

use crate::{
    error::{RunError, RunResult},
    run::Interp,
    source::SourceLoader,
    value::Value,
};

/// `exit n` terminates the run with status `n`.
pub(super) fn exit(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let Some(Value::Int(code)) = vm.stack.last() else {
        return Err(RunError::WrongArgs("exit"));
    };
    let code = *code as i32;
    vm.stack.pop();
    Err(RunError::Exit(code))
}
