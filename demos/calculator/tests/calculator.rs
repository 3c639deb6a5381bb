//! End-to-end tests driving the calculator grammar through `lalr::build`,
//! exercising assignment, precedence, associativity, unary minus, and the
//! error paths a careless change here would most likely break.

use lalr::ConflictPolicy;

#[path = "../src/grammar.rs"]
mod grammar;

use grammar::{config, token_to_value, Value};

fn eval(parser: &lalr_driver::Parser<Value>, lexer: &lalr_lexer::Lexer, input: &str) -> Result<i64, String> {
    match parser.parse(input, lexer, |tok| token_to_value(parser, tok)) {
        Ok(Value::Num(n)) => Ok(n),
        Ok(Value::Ident(name)) => Err(format!("undefined variable: {name}")),
        Err(e) => Err(e.to_string()),
    }
}

#[test]
fn assignment_statement_always_evaluates_to_zero() {
    let (config, _env) = config();
    let (parser, lexer, _warnings) = lalr::build(config).unwrap();
    assert_eq!(eval(&parser, &lexer, "x = -1"), Ok(0));
}

#[test]
fn precedence_binds_multiply_tighter_than_plus() {
    let (config, _env) = config();
    let (parser, lexer, _) = lalr::build(config).unwrap();
    assert_eq!(eval(&parser, &lexer, "1 + 2 * 3"), Ok(7));
}

#[test]
fn left_associative_subtraction() {
    let (config, _env) = config();
    let (parser, lexer, _) = lalr::build(config).unwrap();
    assert_eq!(eval(&parser, &lexer, "2 - 1"), Ok(1));
}

#[test]
fn left_associative_division() {
    let (config, _env) = config();
    let (parser, lexer, _) = lalr::build(config).unwrap();
    assert_eq!(eval(&parser, &lexer, "3 * 4 / 2"), Ok(6));
}

#[test]
fn unary_minus_binds_tighter_than_binary_operators() {
    let (config, _env) = config();
    let (parser, lexer, _) = lalr::build(config).unwrap();
    assert_eq!(eval(&parser, &lexer, "-2 * 3"), Ok(-6));
    assert_eq!(eval(&parser, &lexer, "10 + -2"), Ok(8));
}

#[test]
fn parentheses_override_precedence() {
    let (config, _env) = config();
    let (parser, lexer, _) = lalr::build(config).unwrap();
    assert_eq!(eval(&parser, &lexer, "(1 + 2) * 3"), Ok(9));
}

#[test]
fn division_by_zero_is_a_reported_error_not_a_panic() {
    let (config, _env) = config();
    let (parser, lexer, _) = lalr::build(config).unwrap();
    assert!(eval(&parser, &lexer, "1 / 0").is_err());
}

#[test]
fn reading_an_undefined_variable_is_an_error() {
    let (config, _env) = config();
    let (parser, lexer, _) = lalr::build(config).unwrap();
    assert!(eval(&parser, &lexer, "y + 1").is_err());
}

#[test]
fn assignment_is_visible_to_later_expressions_sharing_a_parser() {
    let (config, _env) = config();
    let (parser, lexer, _) = lalr::build(config).unwrap();
    assert_eq!(eval(&parser, &lexer, "x = 5"), Ok(0));
    assert_eq!(eval(&parser, &lexer, "x + 1"), Ok(6));
}

#[test]
fn ambiguous_precedence_declares_a_shift_reduce_warning_under_resolve_policy() {
    let (config, _env) = config();
    let (_grammar, _table, warnings) = lalr::build_for_report(config, ConflictPolicy::Resolve).unwrap();
    // the grammar as declared has a precedence entry for every operator, so
    // no conflict should surface here; this pins that invariant down.
    assert!(warnings.iter().all(|w| !matches!(w, lalr::Warning::ShiftReduceConflict { .. })));
}
