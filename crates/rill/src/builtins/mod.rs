//! The native kernel: every operation the initial environment binds.
//!
//! Each built-in consumes a typed argument pattern from the stack (see
//! [`crate::args`]) and writes its result back. Implementations are grouped
//! into small submodules by concern; [`Builtin::call`] is the single
//! dispatch point.

mod compare;
mod content;
mod control;
mod convert;
mod define;
mod logic;
mod matching;
mod process;
mod stack;
mod strings;

use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::RunResult,
    io::PrintWriter,
    run::Interp,
    source::SourceLoader,
};

/// Enumerates every native operation, keyed by its source-level word.
///
/// Strum derives supply the word table: `EnumIter` seeds the initial global
/// environment, `EnumString`/`IntoStaticStr` map between words and variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
pub(crate) enum Builtin {
    // Quotation
    #[strum(serialize = "(")]
    Quote,

    // Stack & flow
    #[strum(serialize = ";")]
    DropStack,
    #[strum(serialize = ";1")]
    DropTop,
    #[strum(serialize = "clone")]
    Dup,
    #[strum(serialize = ">>|")]
    Roll,
    #[strum(serialize = "stash")]
    Stash,
    #[strum(serialize = "reverse")]
    Reverse,
    #[strum(serialize = "lst")]
    Lst,
    #[strum(serialize = "pop")]
    Pop,
    #[strum(serialize = "next")]
    Next,
    #[strum(serialize = "empty?")]
    IsEmpty,

    // Arithmetic & comparison
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "=")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,

    // Booleans
    #[strum(serialize = "&")]
    And,
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "not")]
    Not,

    // Control
    #[strum(serialize = "?")]
    If,
    #[strum(serialize = "match")]
    Match,
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "doWhile")]
    DoWhile,
    #[strum(serialize = "whileDo")]
    WhileDo,
    #[strum(serialize = "doCounting")]
    DoCounting,
    #[strum(serialize = "!@")]
    Apply,

    // I/O & content
    #[strum(serialize = "load")]
    Load,
    #[strum(serialize = ".")]
    Content,

    // Strings & arrays
    #[strum(serialize = "len")]
    Len,
    #[strum(serialize = "@")]
    At,
    #[strum(serialize = "substr")]
    Substr,
    #[strum(serialize = "cut")]
    Cut,
    #[strum(serialize = "string?")]
    IsString,

    // Conversions
    #[strum(serialize = ">int")]
    ToInt,
    #[strum(serialize = ">sym")]
    ToSym,
    #[strum(serialize = ">str")]
    ToStr,

    // Definitions
    #[strum(serialize = "fn")]
    Defun,
    #[strum(serialize = "assign")]
    Assign,

    // Debugging & process
    #[strum(serialize = "+dbg")]
    DbgOn,
    #[strum(serialize = "-dbg")]
    DbgOff,
    #[strum(serialize = "exit")]
    Exit,
}

impl Builtin {
    /// The source-level word this operation is bound to.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Runs the operation against the interpreter's stack and environment.
    pub fn call(self, vm: &mut Interp<impl SourceLoader>, print: &mut impl PrintWriter) -> RunResult<()> {
        match self {
            Self::Quote => {
                crate::quote::begin_quote(vm);
                Ok(())
            }

            Self::DropStack => stack::drop_stack(vm),
            Self::DropTop => stack::drop_top(vm),
            Self::Dup => stack::dup(vm),
            Self::Roll => stack::roll(vm),
            Self::Stash => stack::stash(vm),
            Self::Reverse => stack::reverse(vm),
            Self::Lst => stack::lst(vm),
            Self::Pop | Self::Next => stack::detach_head(vm, self.name()),
            Self::IsEmpty => stack::is_empty(vm),

            Self::Add | Self::Sub | Self::Mul => compare::arith(vm, self),
            Self::Lt | Self::Gt | Self::Le | Self::Ge => compare::relational(vm, self),
            Self::Eq => compare::eq(vm, false),
            Self::Ne => compare::eq(vm, true),

            Self::And | Self::Or => logic::junction(vm, self, print),
            Self::Not => logic::not(vm),

            Self::If => control::cond(vm, print),
            Self::Match => matching::match_rules(vm, print),
            Self::In => compare::in_list(vm),
            Self::DoWhile => control::do_while(vm, print),
            Self::WhileDo => control::while_do(vm, print),
            Self::DoCounting => control::do_counting(vm, print),
            Self::Apply => control::apply(vm, print),

            Self::Load => content::load(vm),
            Self::Content => content::dot(vm, print),

            Self::Len => strings::len(vm),
            Self::At => strings::at(vm),
            Self::Substr => strings::substr(vm),
            Self::Cut => strings::cut(vm),
            Self::IsString => strings::is_string(vm),

            Self::ToInt => convert::to_int(vm),
            Self::ToSym => convert::to_sym(vm),
            Self::ToStr => convert::to_str(vm),

            Self::Defun => define::defun(vm),
            Self::Assign => define::assign(vm),

            Self::DbgOn => {
                vm.trace.enable();
                Ok(())
            }
            Self::DbgOff => {
                vm.trace.disable();
                Ok(())
            }
            Self::Exit => process::exit(vm),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn words_round_trip_through_strum() {
        for builtin in Builtin::iter() {
            let word = builtin.name();
            assert_eq!(Builtin::from_str(word).unwrap(), builtin);
        }
    }

    #[test]
    fn kernel_has_the_expected_vocabulary() {
        for word in [";", ";1", "clone", ">>|", "stash", "lst", "pop", "next", "empty?", "fn", "assign", "doWhile"] {
            assert!(Builtin::from_str(word).is_ok(), "missing kernel word {word}");
        }
        assert!(Builtin::from_str("nothing").is_err(), "nothing is a literal, not a builtin");
    }
}
