//! The interpreter: environment seeding, the dispatch loop, and body
//! evaluation.

use strum::IntoEnumIterator;

use crate::{
    builtins::Builtin,
    env::{Env, ScopeKind},
    error::{Halt, RunError, RunResult},
    heap::{Heap, HeapData, HeapId},
    io::PrintWriter,
    print::write_stack_listing,
    quote,
    quote::QuoteState,
    source::{FsLoader, SourceLoader},
    token::tokenize,
    tracer::{Dispatch, Trace},
    value::{ListRef, StrSlice, Value, classify_word},
};

/// Which definer armed the pending definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DefTarget {
    /// `fn`: payload must be a LIST, bound as a FUNCTION into globals.
    Function,
    /// `assign`: any payload, bound into the innermost scope.
    Variable,
}

impl DefTarget {
    fn op(self) -> &'static str {
        match self {
            Self::Function => "fn",
            Self::Variable => "assign",
        }
    }
}

/// State of the stream-aware definers (`fn` / `assign`). Arming one captures
/// the next token as the name, then the next value landing on the open
/// stack as the payload.
#[derive(Debug)]
pub(crate) enum Pending {
    None,
    WantName(DefTarget),
    WantBody {
        target: DefTarget,
        name: Box<[u8]>,
        /// Stack depth when the name was captured; the first value pushed
        /// past it completes the definition.
        mark: usize,
    },
}

/// The evaluator.
///
/// Holds the value stack, the environment, the arena heap and the quotation
/// and definition state. Generic over the [`SourceLoader`] that `load` and
/// [`Interp::run_file`] resolve names through.
///
/// # Example
/// ```
/// use rill::{CollectStringPrint, Interp};
///
/// let mut interp = Interp::new(vec![]);
/// let mut print = CollectStringPrint::new();
/// interp.run_str("7 3 + .", "example", &mut print).unwrap();
/// assert_eq!(print.output(), "10");
/// ```
#[derive(Debug)]
pub struct Interp<L: SourceLoader = FsLoader> {
    pub(crate) heap: Heap,
    pub(crate) env: Env,
    pub(crate) stack: Vec<Value>,
    pub(crate) quote: Option<QuoteState>,
    pub(crate) pending: Pending,
    pub(crate) trace: Trace,
    pub(crate) loader: L,
}

impl Interp<FsLoader> {
    /// An interpreter reading sources from the filesystem. `args` becomes
    /// the `args` ARRAY.
    #[must_use]
    pub fn new(args: Vec<String>) -> Self {
        Self::with_loader(args, FsLoader)
    }
}

impl<L: SourceLoader> Interp<L> {
    /// An interpreter with a custom source loader.
    pub fn with_loader(args: Vec<String>, loader: L) -> Self {
        let mut heap = Heap::new();
        let mut env = Env::new();

        for builtin in Builtin::iter() {
            env.bind_global(key(builtin.name()), Value::Builtin(builtin), &mut heap);
        }

        env.bind_global(key("#nl"), Value::Char(b'\n'), &mut heap);
        env.bind_global(key("#space"), Value::Char(b' '), &mut heap);
        env.bind_global(key("#tab"), Value::Char(b'\t'), &mut heap);
        env.bind_global(key("#paropn"), Value::Int(40), &mut heap);
        env.bind_global(key("#parcls"), Value::Int(41), &mut heap);

        let whitespace = {
            let buf = heap.new_source("(kernel)", b" \n\t".to_vec());
            // three slices share the buffer
            heap.inc_ref(buf);
            heap.inc_ref(buf);
            let slices = (0..3)
                .map(|i| StrSlice {
                    owner: buf,
                    start: i,
                    len: 1,
                })
                .collect();
            heap.allocate(HeapData::Array(slices))
        };
        env.bind_global(key("whitespace"), Value::Array(whitespace), &mut heap);

        let args_array = {
            let mut bytes = Vec::new();
            let mut spans = Vec::with_capacity(args.len());
            for arg in &args {
                spans.push((bytes.len() as u32, arg.len() as u32));
                bytes.extend_from_slice(arg.as_bytes());
            }
            if spans.is_empty() {
                heap.allocate(HeapData::Array(Vec::new()))
            } else {
                let buf = heap.new_source("(args)", bytes);
                for _ in 1..spans.len() {
                    heap.inc_ref(buf);
                }
                let slices = spans
                    .into_iter()
                    .map(|(start, len)| StrSlice { owner: buf, start, len })
                    .collect();
                heap.allocate(HeapData::Array(slices))
            }
        };
        env.bind_global(key("args"), Value::Array(args_array), &mut heap);

        Self {
            heap,
            env,
            stack: Vec::new(),
            quote: None,
            pending: Pending::None,
            trace: Trace::default(),
            loader,
        }
    }

    /// Runs the embedded prelude under the name `(builtin init)`.
    pub fn run_prelude(&mut self, print: &mut impl PrintWriter) -> Result<(), Halt> {
        self.run_str(crate::PRELUDE, "(builtin init)", print)
    }

    /// Runs `code` as one top-level source: tokenize, dispatch every token,
    /// and print the leftover stack (top first) when it is non-empty.
    pub fn run_str(&mut self, code: &str, name: &str, print: &mut impl PrintWriter) -> Result<(), Halt> {
        let source = self.heap.new_source(name, code.as_bytes().to_vec());
        let result = self.run_source(source, print);
        self.heap.dec_ref(source);
        self.settle(result)
    }

    /// Loads `name` through the source loader and runs it. A missing file
    /// reports `"<name>: can't open"` and halts with status 1.
    pub fn run_file(&mut self, name: &str, print: &mut impl PrintWriter) -> Result<(), Halt> {
        let bytes = match self.loader.load(name) {
            Ok(bytes) => bytes,
            Err(_) => {
                eprintln!("{name}: can't open");
                return Err(Halt::Exit(1));
            }
        };
        let source = self.heap.new_source(name, bytes);
        let result = self.run_source(source, print);
        self.heap.dec_ref(source);
        self.settle(result)
    }

    /// Current value-stack depth.
    #[must_use]
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Number of live objects in the arena, for leak checks.
    #[must_use]
    pub fn heap_live_objects(&self) -> usize {
        self.heap.live_objects()
    }

    fn settle(&mut self, result: RunResult<()>) -> Result<(), Halt> {
        match result {
            Ok(()) => Ok(()),
            Err(RunError::Exit(code)) => {
                self.abandon_run();
                Err(Halt::Exit(code))
            }
            Err(RunError::Fatal(message)) => {
                eprintln!("{message}");
                self.abandon_run();
                Err(Halt::Exit(1))
            }
            Err(err) => {
                report_recoverable(&err);
                Ok(())
            }
        }
    }

    /// Dispatches every token of `source`, then finishes the run.
    pub(crate) fn run_source(&mut self, source: HeapId, print: &mut impl PrintWriter) -> RunResult<()> {
        // the buffer must outlive every token slice taken from it
        self.heap.inc_ref(source);
        let tokens = tokenize(&self.heap, source);
        let mut result = Ok(());
        for token in tokens {
            if let Err(err) = self.step_token(token, print) {
                result = Err(err);
                break;
            }
        }
        if result.is_ok() {
            self.finish_run(print);
        }
        self.heap.dec_ref(source);
        result
    }

    /// One dispatch step for a live source token.
    fn step_token(&mut self, token: StrSlice, print: &mut impl PrintWriter) -> RunResult<()> {
        if self.quote.is_some() {
            quote::feed_token(self, token)?;
            self.check_pending_body();
            return Ok(());
        }
        if matches!(self.pending, Pending::WantName(_)) {
            let name = self.heap.str_bytes(token).to_vec();
            self.capture_name(&name);
            return Ok(());
        }
        self.resolve_apply(token, print)?;
        self.check_pending_body();
        Ok(())
    }

    /// One dispatch step for an already-built value (a body element).
    /// Unresolved ITSELF elements go through word resolution; everything
    /// else already carries its final variant and is pushed.
    pub(crate) fn step_value(&mut self, value: Value, print: &mut impl PrintWriter) -> RunResult<()> {
        if self.quote.is_some() {
            quote::feed_value(self, value)?;
            self.check_pending_body();
            return Ok(());
        }
        if matches!(self.pending, Pending::WantName(_)) {
            match value {
                Value::Sym(s) => {
                    let name = self.heap.str_bytes(s).to_vec();
                    self.capture_name(&name);
                    self.heap.dec_ref(s.owner);
                }
                other => {
                    self.report_abandoned_pending();
                    other.drop_with_heap(&mut self.heap);
                }
            }
            return Ok(());
        }
        match value {
            Value::Sym(s) => {
                let result = self.resolve_apply(s, print);
                self.heap.dec_ref(s.owner);
                result?;
            }
            other => self.stack.push(other),
        }
        self.check_pending_body();
        Ok(())
    }

    /// Resolves a word and acts on the outcome: invoke a built-in, evaluate
    /// a function body, push a resolved value, or classify a literal.
    /// The literal token `nothing` never resolves through the environment.
    fn resolve_apply(&mut self, word: StrSlice, print: &mut impl PrintWriter) -> RunResult<()> {
        enum Action {
            Builtin(Builtin),
            Call(ListRef),
            Push(Value),
            Literal,
        }
        let action = {
            let bytes = self.heap.str_bytes(word);
            if bytes == b"nothing" {
                Action::Push(Value::Nothing)
            } else {
                match self.env.find(bytes) {
                    Some(Value::Builtin(builtin)) => Action::Builtin(*builtin),
                    Some(Value::Func(body)) => {
                        if let Some(head) = *body {
                            self.heap.inc_ref(head);
                        }
                        Action::Call(*body)
                    }
                    Some(found) => Action::Push(found.clone_with_heap(&self.heap)),
                    None => Action::Literal,
                }
            }
        };
        match action {
            Action::Builtin(builtin) => {
                self.trace_step(word, Dispatch::Builtin);
                self.apply_builtin(builtin, print)
            }
            Action::Call(body) => {
                self.trace_step(word, Dispatch::Function);
                let result = self.eval_body(body, ScopeKind::Named, print);
                if let Some(head) = body {
                    self.heap.dec_ref(head);
                }
                result
            }
            Action::Push(value) => {
                self.stack.push(value);
                self.trace_step(word, Dispatch::Resolved);
                Ok(())
            }
            Action::Literal => {
                let value = classify_word(word, &self.heap);
                self.stack.push(value);
                self.trace_step(word, Dispatch::Literal);
                Ok(())
            }
        }
    }

    /// Invokes a built-in, reporting recoverable errors and carrying on.
    fn apply_builtin(&mut self, builtin: Builtin, print: &mut impl PrintWriter) -> RunResult<()> {
        match builtin.call(self, print) {
            Err(err) if err.is_recoverable() => {
                report_recoverable(&err);
                Ok(())
            }
            other => other,
        }
    }

    /// Evaluates a body as an anonymous frame (inherits the caller frame's
    /// visible bindings). The caller keeps ownership of `body`.
    pub(crate) fn eval_anonymous(&mut self, body: ListRef, print: &mut impl PrintWriter) -> RunResult<()> {
        self.eval_body(body, ScopeKind::Anonymous, print)
    }

    fn eval_body(&mut self, body: ListRef, kind: ScopeKind, print: &mut impl PrintWriter) -> RunResult<()> {
        // hold the chain alive for the whole walk: the body's binding can be
        // shadowed from inside the body itself
        if let Some(head) = body {
            self.heap.inc_ref(head);
        }
        self.env.push_frame(kind);
        let result = self.eval_elements(body, print);
        self.env.pop_frame(&mut self.heap);
        if let Some(head) = body {
            self.heap.dec_ref(head);
        }
        result
    }

    fn eval_elements(&mut self, body: ListRef, print: &mut impl PrintWriter) -> RunResult<()> {
        let mut cur = body;
        while let Some(id) = cur {
            let (value, tail) = {
                let (head, tail) = self.heap.cons_parts(id);
                (head.clone_with_heap(&self.heap), tail)
            };
            self.step_value(value, print)?;
            cur = tail;
        }
        Ok(())
    }

    /// Resolves a value the way a dispatched word would, but without
    /// executing anything: built-in and function words stay literal. Used by
    /// `in` and `match` conditions.
    pub(crate) fn resolve_value(&mut self, value: Value) -> Value {
        let Value::Sym(s) = value else { return value };
        let resolved = {
            let bytes = self.heap.str_bytes(s);
            if bytes == b"nothing" {
                Some(Value::Nothing)
            } else {
                match self.env.find(bytes) {
                    Some(Value::Builtin(_) | Value::Func(_)) | None => None,
                    Some(found) => Some(found.clone_with_heap(&self.heap)),
                }
            }
        };
        let result = resolved.unwrap_or_else(|| classify_word(s, &self.heap));
        self.heap.dec_ref(s.owner);
        result
    }

    // --- pending definitions (`fn` / `assign`) ---

    /// Arms a pending definition; an unfinished earlier one is reported and
    /// dropped.
    pub(crate) fn arm_definition(&mut self, target: DefTarget) {
        if !matches!(self.pending, Pending::None) {
            self.report_abandoned_pending();
        }
        self.pending = Pending::WantName(target);
    }

    fn capture_name(&mut self, word: &[u8]) {
        let Pending::WantName(target) = std::mem::replace(&mut self.pending, Pending::None) else {
            unreachable!("capture_name requires an armed definition");
        };
        // a quoted name (`fn 'dbl …`) binds the bare word
        let name = match word.strip_prefix(b"'") {
            Some(rest) if !rest.is_empty() => rest,
            _ => word,
        };
        self.pending = Pending::WantBody {
            target,
            name: name.into(),
            mark: self.stack.len(),
        };
    }

    /// Completes an armed definition once a value has landed on the open
    /// stack.
    pub(crate) fn check_pending_body(&mut self) {
        if self.quote.is_some() {
            return;
        }
        let Pending::WantBody { mark, .. } = &mut self.pending else {
            return;
        };
        let depth = self.stack.len();
        if depth <= *mark {
            *mark = depth;
            return;
        }
        let Pending::WantBody { target, name, .. } = std::mem::replace(&mut self.pending, Pending::None) else {
            unreachable!("just matched WantBody");
        };
        let value = self.stack.pop().expect("stack grew past the mark");
        match target {
            DefTarget::Function => match value {
                Value::List(body) => self.env.bind_global(name, Value::Func(body), &mut self.heap),
                other => {
                    other.drop_with_heap(&mut self.heap);
                    eprintln!("fn: wrong argument list");
                }
            },
            DefTarget::Variable => self.env.bind(name, value, &mut self.heap),
        }
    }

    fn report_abandoned_pending(&mut self) {
        let pending = std::mem::replace(&mut self.pending, Pending::None);
        let op = match pending {
            Pending::None => return,
            Pending::WantName(target) => target.op(),
            Pending::WantBody { target, .. } => target.op(),
        };
        eprintln!("{op}: wrong argument list");
    }

    // --- end of run ---

    /// End-of-source bookkeeping: flush half-finished definitions and
    /// quotations, then print and clear the leftover stack.
    fn finish_run(&mut self, print: &mut impl PrintWriter) {
        if !matches!(self.pending, Pending::None) {
            self.report_abandoned_pending();
        }
        if let Some(state) = self.quote.take() {
            eprintln!("unterminated quotation");
            let collected = std::mem::replace(&mut self.stack, state.saved_stack);
            for value in collected {
                value.drop_with_heap(&mut self.heap);
            }
        }
        if !self.stack.is_empty() {
            write_stack_listing(&self.stack, &self.heap, print);
            for value in std::mem::take(&mut self.stack) {
                value.drop_with_heap(&mut self.heap);
            }
        }
    }

    /// Drops all transient state after a halt, keeping globals usable.
    fn abandon_run(&mut self) {
        self.pending = Pending::None;
        if let Some(state) = self.quote.take() {
            let collected = std::mem::replace(&mut self.stack, state.saved_stack);
            for value in collected {
                value.drop_with_heap(&mut self.heap);
            }
        }
        for value in std::mem::take(&mut self.stack) {
            value.drop_with_heap(&mut self.heap);
        }
    }

    fn trace_step(&self, word: StrSlice, how: Dispatch) {
        self.trace.step(self.heap.str_bytes(word), how, self.stack.len());
    }
}

impl<L: SourceLoader> Drop for Interp<L> {
    fn drop(&mut self) {
        // release bindings and stack through the heap so a leak check on the
        // arena sees zero live objects afterwards
        self.abandon_run();
        let mut env = std::mem::take(&mut self.env);
        env.clear(&mut self.heap);
    }
}

fn key(name: &str) -> Box<[u8]> {
    name.as_bytes().into()
}

fn report_recoverable(err: &RunError) {
    match err {
        RunError::WrongArgs(op) => eprintln!("{op}: wrong argument list"),
        RunError::WrongCondition(op) => eprintln!("wrong condition for {op}"),
        RunError::Fatal(_) | RunError::Exit(_) => {}
    }
}
