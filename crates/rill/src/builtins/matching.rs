//! The `match` combinator.
//!
//! `match` pops a single LIST (the match form) and re-parses it: balanced
//! `(` / `)` ITSELF words collapse into nested LISTs. The collapse works on
//! clones of the elements, never writing through the caller's possibly
//! shared chain. When the collapsed form is `[rules subject]` the subject
//! comes from the form itself; otherwise the whole form is the rules and the
//! subject is popped from the stack.
//!
//! Rules alternate condition and action, with an optional bare `=` between
//! the two and an optional trailing default. The first holding condition
//! picks its action: a LIST action is evaluated, anything else is pushed.
//! The subject is consumed either way; no rule and no default push NOTHING.

use crate::{
    args::{ArgSpec, take_args},
    error::{RunError, RunResult},
    io::PrintWriter,
    run::Interp,
    source::SourceLoader,
    value::{Value, value_eq},
};

pub(super) fn match_rules(vm: &mut Interp<impl SourceLoader>, print: &mut impl PrintWriter) -> RunResult<()> {
    let [form] = take_args(&mut vm.stack, &vm.heap, [ArgSpec::List]).ok_or(RunError::WrongArgs("match"))?;
    let Value::List(form) = form else {
        unreachable!("pattern guarantees a List");
    };
    let collapsed = collapse_parens(vm, form);

    let (mut rules, subject) = if collapsed.len() == 2 && matches!(collapsed[0], Value::List(_)) {
        let mut parts = collapsed.into_iter();
        let Some(Value::List(rules_list)) = parts.next() else {
            unreachable!("first element checked to be a List");
        };
        let subject = parts.next().expect("length checked");
        let rules = vm.heap.list_to_vec(rules_list);
        if let Some(head) = rules_list {
            vm.heap.dec_ref(head);
        }
        (rules, vm.resolve_value(subject))
    } else {
        // classic postfix form: the form is the rules, the subject below
        let Some(subject) = vm.stack.pop() else {
            for value in collapsed {
                value.drop_with_heap(&mut vm.heap);
            }
            return Err(RunError::WrongArgs("match"));
        };
        (collapsed, vm.resolve_value(subject))
    };

    let scanned = scan_rules(vm, &mut rules, &subject, print);
    let chosen = match &scanned {
        Ok(Some(index)) => Some(std::mem::replace(&mut rules[*index], Value::Nothing)),
        _ => None,
    };
    for value in rules {
        value.drop_with_heap(&mut vm.heap);
    }
    subject.drop_with_heap(&mut vm.heap);
    scanned?;

    match chosen {
        Some(Value::List(action)) => {
            let result = vm.eval_anonymous(action, print);
            if let Some(head) = action {
                vm.heap.dec_ref(head);
            }
            result
        }
        Some(value) => {
            vm.stack.push(value);
            Ok(())
        }
        None => {
            vm.stack.push(Value::Nothing);
            Ok(())
        }
    }
}

/// Clones the chain's elements, folding each balanced `( … )` run into a
/// nested LIST. The input list reference is consumed. Unbalanced closers
/// stay plain words; unbalanced openers close implicitly at the end.
fn collapse_parens(vm: &mut Interp<impl SourceLoader>, list: crate::value::ListRef) -> Vec<Value> {
    let elements = vm.heap.list_to_vec(list);
    if let Some(head) = list {
        vm.heap.dec_ref(head);
    }

    let mut levels: Vec<Vec<Value>> = vec![Vec::new()];
    for element in elements {
        let paren = match &element {
            Value::Sym(s) => match vm.heap.str_bytes(*s) {
                b"(" => Some(true),
                b")" => Some(false),
                _ => None,
            },
            _ => None,
        };
        match paren {
            Some(true) => {
                element.drop_with_heap(&mut vm.heap);
                levels.push(Vec::new());
            }
            Some(false) if levels.len() > 1 => {
                element.drop_with_heap(&mut vm.heap);
                let group = levels.pop().expect("depth checked");
                let nested = vm.heap.list_from_vec(group);
                levels.last_mut().expect("base level").push(Value::List(nested));
            }
            _ => levels.last_mut().expect("base level").push(element),
        }
    }
    while levels.len() > 1 {
        let group = levels.pop().expect("length checked");
        let nested = vm.heap.list_from_vec(group);
        levels.last_mut().expect("base level").push(Value::List(nested));
    }
    levels.pop().expect("base level")
}

/// Walks the rules, consuming conditions as it tests them. Returns the index
/// of the chosen action (still inside `rules`) or `None` when nothing held.
fn scan_rules(
    vm: &mut Interp<impl SourceLoader>,
    rules: &mut [Value],
    subject: &Value,
    print: &mut impl PrintWriter,
) -> RunResult<Option<usize>> {
    let len = rules.len();
    let mut i = 0;
    while i < len {
        if i == len - 1 {
            // a single trailing element is the default
            return Ok(Some(i));
        }
        let condition = std::mem::replace(&mut rules[i], Value::Nothing);
        let mut action = i + 1;
        if action + 1 < len && is_eq_word(vm, &rules[action]) {
            action += 1;
        }
        if condition_holds(vm, condition, subject, print)? {
            return Ok(Some(action));
        }
        i = action + 1;
    }
    Ok(None)
}

fn is_eq_word(vm: &Interp<impl SourceLoader>, value: &Value) -> bool {
    matches!(value, Value::Sym(s) if vm.heap.str_bytes(*s) == b"=")
}

/// A condition holds when it is a LIST body that, run against a copy of the
/// subject, leaves BOOLEAN `true` — or a literal whose resolved value equals
/// the subject.
fn condition_holds(
    vm: &mut Interp<impl SourceLoader>,
    condition: Value,
    subject: &Value,
    print: &mut impl PrintWriter,
) -> RunResult<bool> {
    match condition {
        Value::List(body) => {
            let base = vm.stack.len();
            vm.stack.push(subject.clone_with_heap(&vm.heap));
            let run = vm.eval_anonymous(body, print);
            if let Some(head) = body {
                vm.heap.dec_ref(head);
            }
            run?;
            let verdict = match vm.stack.pop() {
                Some(Value::Bool(b)) => Ok(b),
                Some(other) => {
                    other.drop_with_heap(&mut vm.heap);
                    Err(RunError::WrongCondition("match"))
                }
                None => Err(RunError::WrongCondition("match")),
            };
            // discard any residue the test body left behind (including an
            // unconsumed subject copy)
            while vm.stack.len() > base {
                let residue = vm.stack.pop().expect("length checked");
                residue.drop_with_heap(&mut vm.heap);
            }
            verdict
        }
        literal => {
            let resolved = vm.resolve_value(literal);
            let equal = value_eq(&resolved, subject, &vm.heap) == Some(true);
            resolved.drop_with_heap(&mut vm.heap);
            Ok(equal)
        }
    }
}
