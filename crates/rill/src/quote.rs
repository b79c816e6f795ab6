//! Quotation: turning a run of live tokens into a LIST without executing
//! them.
//!
//! The `(` built-in suspends the current stack and switches the dispatch
//! loop into collection mode. Every following token is kept as a raw ITSELF
//! word — numerals and sigils included, classification happens only when a
//! body element is later evaluated. Nested parens are tracked with a depth
//! counter and stay in the collected list as plain `(` / `)` words. The
//! matching close restores the suspended stack and pushes the collected
//! words as a LIST in source order.

use crate::{
    error::RunResult,
    run::Interp,
    source::SourceLoader,
    value::{StrSlice, Value},
};

/// Collection state while a quotation is open. One slot suffices: nesting is
/// tracked purely by the depth counter.
#[derive(Debug)]
pub(crate) struct QuoteState {
    pub depth: u32,
    pub saved_stack: Vec<Value>,
}

/// The `(` built-in: suspend the stack and start collecting.
pub(crate) fn begin_quote(vm: &mut Interp<impl SourceLoader>) {
    vm.quote = Some(QuoteState {
        depth: 1,
        saved_stack: std::mem::take(&mut vm.stack),
    });
}

/// Feeds one source token to an open quotation.
pub(crate) fn feed_token(vm: &mut Interp<impl SourceLoader>, token: StrSlice) -> RunResult<()> {
    let bytes = vm.heap.str_bytes(token);
    let opens = bytes == b"(";
    let closes = bytes == b")";
    let state = vm.quote.as_mut().expect("feed_token requires an open quotation");
    if opens {
        state.depth += 1;
    } else if closes {
        state.depth -= 1;
        if state.depth == 0 {
            close(vm);
            return Ok(());
        }
    }
    vm.heap.inc_ref(token.owner);
    let word = Value::Sym(token);
    vm.trace.quoted(&word, vm.quote.as_ref().expect("still open").depth);
    vm.stack.push(word);
    Ok(())
}

/// Feeds one already-built value (a body element) to an open quotation.
pub(crate) fn feed_value(vm: &mut Interp<impl SourceLoader>, value: Value) -> RunResult<()> {
    let paren = match &value {
        Value::Sym(s) => match vm.heap.str_bytes(*s) {
            b"(" => Some(true),
            b")" => Some(false),
            _ => None,
        },
        _ => None,
    };
    let state = vm.quote.as_mut().expect("feed_value requires an open quotation");
    match paren {
        Some(true) => state.depth += 1,
        Some(false) => {
            state.depth -= 1;
            if state.depth == 0 {
                value.drop_with_heap(&mut vm.heap);
                close(vm);
                return Ok(());
            }
        }
        None => {}
    }
    let depth = vm.quote.as_ref().expect("still open").depth;
    vm.trace.quoted(&value, depth);
    vm.stack.push(value);
    Ok(())
}

/// Restores the suspended stack and pushes the collected words as a LIST.
/// Collection happened in stack order, which is already source order.
fn close(vm: &mut Interp<impl SourceLoader>) {
    let state = vm.quote.take().expect("close requires an open quotation");
    let collected = std::mem::replace(&mut vm.stack, state.saved_stack);
    let list = vm.heap.list_from_vec(collected);
    vm.stack.push(Value::List(list));
}
