//! The embedded prelude: bootstrap vocabulary defined in the language
//! itself.

use rill::{CollectStringPrint, Interp};

fn run(code: &str) -> String {
    let mut interp = Interp::new(vec![]);
    let mut print = CollectStringPrint::new();
    interp.run_prelude(&mut print).unwrap();
    interp.run_str(code, "test", &mut print).unwrap();
    print.into_output()
}

#[test]
fn prelude_runs_clean() {
    let mut interp = Interp::new(vec![]);
    let mut print = CollectStringPrint::new();
    interp.run_prelude(&mut print).unwrap();
    assert_eq!(print.output(), "");
    assert_eq!(interp.stack_depth(), 0);
}

#[test]
fn swap_exchanges_the_top_two() {
    assert_eq!(run("3 4 swap - ."), "1");
}

#[test]
fn nip_drops_the_second() {
    assert_eq!(run("1 2 nip ."), "2");
}

#[test]
fn inc_and_dec() {
    assert_eq!(run("41 inc ."), "42");
    assert_eq!(run("43 dec ."), "42");
}

#[test]
fn neg_flips_the_sign() {
    assert_eq!(run("5 neg ."), "-5");
    assert_eq!(run("-5 neg ."), "5");
}

#[test]
fn when_runs_the_body_only_on_true() {
    assert_eq!(run("1 1 = ( 42 ) when ."), "42");
    assert_eq!(run("1 2 = ( 42 ) when"), "");
}

#[test]
fn prelude_words_compose() {
    assert_eq!(run("10 3 swap nip inc ."), "11");
}
