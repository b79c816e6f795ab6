//! The `.` (content) and `load` built-ins.
//!
//! Both are fatal on an empty stack, and `load` is fatal on an unopenable
//! file, matching the language's contract that content misuse ends the
//! process with status 1.

use crate::{
    error::{RunError, RunResult},
    heap::HeapData,
    io::PrintWriter,
    print::write_content,
    run::Interp,
    source::SourceLoader,
    value::Value,
};

/// `.` pops the top value and writes its content, no trailing newline.
pub(super) fn dot(vm: &mut Interp<impl SourceLoader>, print: &mut impl PrintWriter) -> RunResult<()> {
    let Some(value) = vm.stack.pop() else {
        return Err(RunError::Fatal("ERROR: syntax error .".to_owned()));
    };
    write_content(&value, &vm.heap, print);
    value.drop_with_heap(&mut vm.heap);
    Ok(())
}

/// `load` resolves the name on top through the host's source loader and
/// pushes a SOURCE. ARRAY and LIST arguments map over their elements,
/// yielding a LIST of SOURCEs in element order.
pub(super) fn load(vm: &mut Interp<impl SourceLoader>) -> RunResult<()> {
    let Some(value) = vm.stack.pop() else {
        return Err(RunError::Fatal("ERROR: syntax error load".to_owned()));
    };
    let loaded = load_value(vm, value)?;
    vm.stack.push(loaded);
    Ok(())
}

fn load_value(vm: &mut Interp<impl SourceLoader>, value: Value) -> RunResult<Value> {
    match value {
        Value::Sym(s) | Value::Str(s) => {
            let name = String::from_utf8_lossy(vm.heap.str_bytes(s)).into_owned();
            vm.heap.dec_ref(s.owner);
            load_named(vm, &name)
        }
        Value::Array(id) => {
            let names: Vec<String> = {
                let HeapData::Array(slices) = vm.heap.get(id) else {
                    unreachable!("Array value must point at Array data");
                };
                slices
                    .iter()
                    .map(|&slice| String::from_utf8_lossy(vm.heap.str_bytes(slice)).into_owned())
                    .collect()
            };
            vm.heap.dec_ref(id);
            let mut sources = Vec::with_capacity(names.len());
            for name in names {
                match load_named(vm, &name) {
                    Ok(source) => sources.push(source),
                    Err(err) => {
                        for opened in sources {
                            opened.drop_with_heap(&mut vm.heap);
                        }
                        return Err(err);
                    }
                }
            }
            Ok(Value::List(vm.heap.list_from_vec(sources)))
        }
        Value::List(list) => {
            let elements = vm.heap.list_to_vec(list);
            Value::List(list).drop_with_heap(&mut vm.heap);
            let mut sources = Vec::with_capacity(elements.len());
            let mut elements = elements.into_iter();
            for element in elements.by_ref() {
                match load_value(vm, element) {
                    Ok(source) => sources.push(source),
                    Err(err) => {
                        for opened in sources {
                            opened.drop_with_heap(&mut vm.heap);
                        }
                        for rest in elements {
                            rest.drop_with_heap(&mut vm.heap);
                        }
                        return Err(err);
                    }
                }
            }
            Ok(Value::List(vm.heap.list_from_vec(sources)))
        }
        other => {
            other.drop_with_heap(&mut vm.heap);
            Ok(Value::Nothing)
        }
    }
}

fn load_named(vm: &mut Interp<impl SourceLoader>, name: &str) -> RunResult<Value> {
    match vm.loader.load(name) {
        Ok(bytes) => Ok(Value::Source(vm.heap.new_source(name, bytes))),
        Err(_) => Err(RunError::Fatal(format!("{name}: can't open"))),
    }
}
