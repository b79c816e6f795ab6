//! Stack manipulation and list-building operations.

use crate::{
    args::{ArgSpec, take_args},
    error::{RunError, RunResult},
    run::Interp,
    source::SourceLoader,
    value::Value,
};

/// `;` drops the entire stack.
pub(super) fn drop_stack(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    for value in std::mem::take(&mut vm.stack) {
        value.drop_with_heap(&mut vm.heap);
    }
    Ok(())
}

/// `;1` drops the top of the stack; a no-op when the stack is empty.
pub(super) fn drop_top(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    if let Some(value) = vm.stack.pop() {
        value.drop_with_heap(&mut vm.heap);
    }
    Ok(())
}

/// `clone` duplicates the top of the stack, sharing compound payloads.
pub(super) fn dup(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let copy = vm
        .stack
        .last()
        .map(|value| value.clone_with_heap(&vm.heap))
        .ok_or(RunError::WrongArgs("clone"))?;
    vm.stack.push(copy);
    Ok(())
}

/// `n >>|` pulls the element at depth `n` (counted after the count is
/// popped, 0 being the top) up to the top.
pub(super) fn roll(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let Some(Value::Int(n)) = vm.stack.last() else {
        return Err(RunError::WrongArgs(">>|"));
    };
    let n = *n;
    // after popping the count there must be at least n+1 elements
    if n < 0 || n as usize >= vm.stack.len() - 1 {
        return Err(RunError::WrongArgs(">>|"));
    }
    vm.stack.pop();
    let index = vm.stack.len() - 1 - n as usize;
    let value = vm.stack.remove(index);
    vm.stack.push(value);
    Ok(())
}

/// `n v stash` inserts `v` at depth `n` of the remaining stack: consed onto
/// the LIST sitting there, or wrapped in a fresh single-element LIST when
/// that position does not hold one.
pub(super) fn stash(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let len = vm.stack.len();
    if len < 2 {
        return Err(RunError::WrongArgs("stash"));
    }
    let Value::Int(n) = &vm.stack[len - 2] else {
        return Err(RunError::WrongArgs("stash"));
    };
    let n = *n;
    if n < 0 || n as usize > len - 2 {
        return Err(RunError::WrongArgs("stash"));
    }
    let value = vm.stack.pop().expect("length checked");
    vm.stack.pop(); // the depth count
    let depth = n as usize;
    let remaining = vm.stack.len();
    if depth < remaining {
        let index = remaining - 1 - depth;
        if matches!(vm.stack[index], Value::List(_)) {
            let Value::List(tail) = std::mem::replace(&mut vm.stack[index], Value::Nothing) else {
                unreachable!("just matched a List");
            };
            let node = vm.heap.cons(value, tail);
            vm.stack[index] = Value::List(Some(node));
            return Ok(());
        }
    }
    let node = vm.heap.cons(value, None);
    vm.stack.insert(remaining - depth, Value::List(Some(node)));
    Ok(())
}

/// `reverse` replaces the LIST on top with a reversed copy.
pub(super) fn reverse(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let [list] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::List]).ok_or(RunError::WrongArgs("reverse"))?;
    let Value::List(list) = list else {
        unreachable!("pattern guarantees a List");
    };
    let reversed = vm.heap.list_reversed(list);
    if let Some(head) = list {
        vm.heap.dec_ref(head);
    }
    vm.stack.push(Value::List(reversed));
    Ok(())
}

/// `a b c n lst` collects the `n` elements below the count into a LIST,
/// preserving their source order (the deepest becomes the head).
pub(super) fn lst(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let Some(Value::Int(n)) = vm.stack.last() else {
        return Err(RunError::WrongArgs("lst"));
    };
    let n = *n;
    if n < 0 || n as usize > vm.stack.len() - 1 {
        return Err(RunError::WrongArgs("lst"));
    }
    vm.stack.pop();
    let split = vm.stack.len() - n as usize;
    let items = vm.stack.split_off(split);
    let list = vm.heap.list_from_vec(items);
    vm.stack.push(Value::List(list));
    Ok(())
}

/// `pop` / `next` detaches the head of the LIST on top, leaving the shrunk
/// list on top and the detached element underneath. An empty list yields
/// NOTHING underneath and stays empty.
pub(super) fn detach_head(vm: &mut Interp<impl SourceLoader>, op: &'static str) -> RunResult<()> {
    let [list] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::List]).ok_or(RunError::WrongArgs(op))?;
    let Value::List(list) = list else {
        unreachable!("pattern guarantees a List");
    };
    match list {
        None => {
            vm.stack.push(Value::Nothing);
            vm.stack.push(Value::List(None));
        }
        Some(id) => {
            let (head, tail) = {
                let (head, tail) = vm.heap.cons_parts(id);
                (head.clone_with_heap(&vm.heap), tail)
            };
            if let Some(tail_id) = tail {
                vm.heap.inc_ref(tail_id);
            }
            vm.heap.dec_ref(id);
            vm.stack.push(head);
            vm.stack.push(Value::List(tail));
        }
    }
    Ok(())
}

/// `empty?` consumes the LIST on top and pushes whether it had no elements.
pub(super) fn is_empty(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let [list] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::List]).ok_or(RunError::WrongArgs("empty?"))?;
    let Value::List(list) = list else {
        unreachable!("pattern guarantees a List");
    };
    let empty = list.is_none();
    Value::List(list).drop_with_heap(&mut vm.heap);
    vm.stack.push(Value::Bool(empty));
    Ok(())
}
