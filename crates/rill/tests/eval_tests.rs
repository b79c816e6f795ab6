//! End-to-end evaluator behavior: dispatch, literals, quotation, scope
//! discipline and the top-level leftover-stack print.

use rill::{CollectStringPrint, Halt, Interp};

fn run(code: &str) -> String {
    let mut interp = Interp::new(vec![]);
    let mut print = CollectStringPrint::new();
    interp.run_str(code, "test", &mut print).unwrap();
    print.into_output()
}

fn run_halt(code: &str) -> (Result<(), Halt>, String) {
    let mut interp = Interp::new(vec![]);
    let mut print = CollectStringPrint::new();
    let result = interp.run_str(code, "test", &mut print);
    (result, print.into_output())
}

// === canonical programs ===

#[test]
fn addition_and_print() {
    assert_eq!(run("7 3 + ."), "10");
}

#[test]
fn quotation_prints_its_words() {
    assert_eq!(run("( a b c ) ."), "( a b c )");
}

#[test]
fn list_indexing() {
    assert_eq!(run("2 ( 1 2 3 ) @ ."), "3");
}

#[test]
fn inline_body_evaluation() {
    assert_eq!(run("( 1 1 + ) !@ ."), "2");
}

#[test]
fn function_definition_and_call() {
    assert_eq!(run("fn dbl ( 2 * ) 21 dbl ."), "42");
}

#[test]
fn match_form_with_rules_and_subject() {
    assert_eq!(run("( ( a = ( 1 ) b = ( 2 ) ) a ) match ."), "1");
}

// === literals ===

#[test]
fn integer_literals() {
    assert_eq!(run("5 ."), "5");
    assert_eq!(run("-5 ."), "-5");
    assert_eq!(run("0 ."), "0");
}

#[test]
fn lone_minus_is_a_word() {
    assert_eq!(run("- ."), "-");
}

#[test]
fn char_sigils() {
    assert_eq!(run("#A ."), "A");
    assert_eq!(run("#space . #tab ."), " \t");
}

#[test]
fn named_char_constants() {
    assert_eq!(run("#nl ."), "\n");
    assert_eq!(run("#paropn . #parcls ."), "4041");
}

#[test]
fn quoted_word_strips_one_apostrophe() {
    assert_eq!(run("'dbl ."), "dbl");
    assert_eq!(run("''x ."), "'x");
}

#[test]
fn unknown_word_is_itself() {
    assert_eq!(run("banana ."), "banana");
}

#[test]
fn nothing_is_a_literal() {
    assert_eq!(run("nothing nothing = ."), "true");
}

// === leftover stack ===

#[test]
fn leftover_stack_prints_top_first() {
    assert_eq!(run("1 2 3"), "\n( 3 2 1 )\n");
}

#[test]
fn leftover_after_arithmetic() {
    assert_eq!(run("7 3 +"), "\n( 10 )\n");
}

#[test]
fn empty_program_prints_nothing() {
    assert_eq!(run(""), "");
}

#[test]
fn leftover_spells_out_nothing() {
    assert_eq!(run("nothing"), "\n( nothing )\n");
}

// === quotation ===

#[test]
fn quotation_preserves_saved_stack() {
    assert_eq!(run("5 ( x y )"), "\n( ( x y ) 5 )\n");
}

#[test]
fn nested_parens_stay_words() {
    assert_eq!(run("( a ( b ) c ) ."), "( a ( b ) c )");
}

#[test]
fn quotation_keeps_numerals_raw() {
    // inner tokens are ITSELF words until evaluated
    assert_eq!(run("( 1 2 ) ."), "( 1 2 )");
}

#[test]
fn empty_quotation_is_an_empty_list() {
    assert_eq!(run("( ) empty? ."), "true");
}

#[test]
fn unterminated_quotation_restores_the_stack() {
    assert_eq!(run("5 ( a b"), "\n( 5 )\n");
}

#[test]
fn stray_close_paren_is_a_word() {
    assert_eq!(run(") ."), ")");
}

// === comparisons (stack order is reverse of source order) ===

#[test]
fn less_than_follows_source_order() {
    assert_eq!(run("3 5 < ."), "true");
    assert_eq!(run("5 3 < ."), "false");
}

#[test]
fn greater_and_bounds() {
    assert_eq!(run("5 3 > ."), "true");
    assert_eq!(run("3 3 >= ."), "true");
    assert_eq!(run("3 3 <= ."), "true");
    assert_eq!(run("4 3 <= ."), "false");
}

#[test]
fn subtraction_takes_top_from_below() {
    assert_eq!(run("10 4 - ."), "6");
}

// === equality ===

#[test]
fn equality_per_variant() {
    assert_eq!(run("1 1 = ."), "true");
    assert_eq!(run("1 2 = ."), "false");
    assert_eq!(run("#a #a = ."), "true");
    assert_eq!(run("'ab >str 'ab >str = ."), "true");
    assert_eq!(run("'ab >str 'cd >str = ."), "false");
    assert_eq!(run("'a 'a = ."), "true");
}

#[test]
fn cross_variant_equality_is_false() {
    assert_eq!(run("1 '1 >str = ."), "false");
    assert_eq!(run("nothing 0 = ."), "false");
}

#[test]
fn unsupported_equality_reports_and_is_false() {
    assert_eq!(run("( a ) ( a ) = ."), "false");
}

#[test]
fn not_equal() {
    assert_eq!(run("1 2 != ."), "true");
    assert_eq!(run("1 1 != ."), "false");
}

// === integer round trip ===

#[test]
fn int_round_trips_through_str() {
    assert_eq!(run("1073741824 >str >int ."), "1073741824");
    assert_eq!(run("-1073741824 >str >int ."), "-1073741824");
    assert_eq!(run("0 >str >int ."), "0");
}

// === scope discipline ===

#[test]
fn assignment_in_function_is_invisible_outside() {
    assert_eq!(run("fn f ( assign x 3 ) f x ."), "x");
}

#[test]
fn top_level_assignment_is_global() {
    assert_eq!(run("assign x 3 x ."), "3");
}

#[test]
fn anonymous_body_sees_caller_scope() {
    assert_eq!(run("fn f ( assign x 7 ( x ) !@ . ) f"), "7");
}

#[test]
fn named_function_does_not_see_caller_scope() {
    assert_eq!(run("fn g ( x . ) fn h ( assign x 7 g ) h"), "x");
}

#[test]
fn inline_body_assignment_is_discarded() {
    assert_eq!(run("( assign x 3 ) !@ x ."), "x");
}

#[test]
fn globals_persist_across_runs() {
    let mut interp = Interp::new(vec![]);
    let mut print = CollectStringPrint::new();
    interp.run_str("assign x 41", "first", &mut print).unwrap();
    interp.run_str("x 1 + .", "second", &mut print).unwrap();
    assert_eq!(print.output(), "42");
}

// === functions ===

#[test]
fn quoted_function_name() {
    assert_eq!(run("fn 'sq ( clone * ) 6 sq ."), "36");
}

#[test]
fn redefinition_shadows() {
    assert_eq!(run("fn f ( 1 ) fn f ( 2 ) f ."), "2");
}

#[test]
fn recursive_function() {
    assert_eq!(run("fn fact ( clone 1 > ( ) ( clone 1 - fact * ) ? ) 5 fact ."), "120");
}

#[test]
fn function_body_bound_from_a_variable() {
    assert_eq!(run("assign body ( 3 * ) fn tpl body 7 tpl ."), "21");
}

#[test]
fn fn_with_non_list_payload_reports() {
    // the payload 5 is not a LIST; the definition is dropped and 5 consumed
    assert_eq!(run("fn f 5 f ."), "f");
}

// === initial environment ===

#[test]
fn whitespace_array_contents() {
    assert_eq!(run("whitespace ."), "(   \n \t )");
    assert_eq!(run("1 whitespace @ ."), "\n");
}

#[test]
fn args_array_from_argv() {
    let mut interp = Interp::new(vec!["alpha".to_owned(), "beta".to_owned()]);
    let mut print = CollectStringPrint::new();
    interp.run_str("args . 1 args @ .", "test", &mut print).unwrap();
    assert_eq!(print.output(), "( alpha beta )beta");
}

#[test]
fn empty_args_array() {
    assert_eq!(run("args ."), "( )");
}

// === halts ===

#[test]
fn exit_propagates_its_code() {
    let (result, output) = run_halt("3 exit");
    assert_eq!(result, Err(Halt::Exit(3)));
    assert_eq!(output, "");
}

#[test]
fn dot_on_empty_stack_is_fatal() {
    let (result, _) = run_halt(".");
    assert_eq!(result, Err(Halt::Exit(1)));
}

#[test]
fn interp_survives_a_halt() {
    let mut interp = Interp::new(vec![]);
    let mut print = CollectStringPrint::new();
    assert_eq!(interp.run_str("1 exit", "first", &mut print), Err(Halt::Exit(1)));
    assert_eq!(interp.stack_depth(), 0);
    interp.run_str("2 3 + .", "second", &mut print).unwrap();
    assert_eq!(print.output(), "5");
}

// === error recovery ===

#[test]
fn wrong_arguments_leave_the_stack_untouched() {
    // `not` rejects the INT; execution continues with the 1 still there
    assert_eq!(run("1 not 1 1 + ."), "2\n( 1 )\n");
}

#[test]
fn trace_toggles_do_not_touch_stdout() {
    assert_eq!(run("+dbg 1 2 + -dbg ."), "3");
}
