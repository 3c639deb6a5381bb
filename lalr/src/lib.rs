//! A runtime-configured LALR(1) parser generator combined with a
//! regex-driven tokenizer: given terminal patterns, a precedence table, and
//! a set of syntax rules with semantic actions, [`build`] constructs a
//! deterministic parser ready to consume input strings.
//!
//! This crate is a thin assembly layer over its three collaborators:
//! [`lalr_grammar`] (grammar analysis and table construction),
//! [`lalr_lexer`] (tokenizing), and [`lalr_driver`] (the parse-time
//! driver). See each crate's own documentation for the algorithms involved.
#![warn(missing_docs)]

pub mod config;
pub mod error;

pub use config::{Config, RefinementDecl, TerminalDecl};
pub use error::BuildError;

pub use lalr_driver::{ParseError, Parser};
pub use lalr_grammar::report;
pub use lalr_grammar::{Assoc, ConflictPolicy, Grammar, ParseTable, PrecedenceGroup, RuleAlt, SyntaxRule, Warning};
pub use lalr_lexer::{Context, LexError, Lexer, Token};

/// Build a parser and its tokenizer from a [`Config`], using
/// [`ConflictPolicy::FailFast`] (the default: a reduce/reduce conflict
/// aborts construction). Use [`build_with_policy`] to opt into
/// [`ConflictPolicy::Resolve`].
pub fn build<V>(config: Config<V>) -> Result<(Parser<V>, Lexer, Vec<Warning>), BuildError> {
    build_with_policy(config, ConflictPolicy::default())
}

/// Build a parser and its tokenizer from a [`Config`] under an explicit
/// [`ConflictPolicy`].
pub fn build_with_policy<V>(
    config: Config<V>,
    policy: ConflictPolicy,
) -> Result<(Parser<V>, Lexer, Vec<Warning>), BuildError> {
    let (grammar_spec, lexer_spec) = config.into_specs();

    let (grammar, _automaton, table, warnings) = lalr_grammar::build(grammar_spec, policy)?;
    let lexer = Lexer::build(&grammar.symbols, lexer_spec)?;
    let parser = Parser::new(grammar, table);

    Ok((parser, lexer, warnings))
}

/// Build a grammar and its parse table from a [`Config`] without wrapping
/// them in a [`Parser`], so that a caller can render a diagnostics
/// [`report`] over them. Building twice from an equivalent [`Config`] (once
/// via this function, once via [`build`]) yields byte-identical tables, per
/// the generator's idempotence guarantee.
pub fn build_for_report<V>(
    config: Config<V>,
    policy: ConflictPolicy,
) -> Result<(Grammar<V>, ParseTable, Vec<Warning>), BuildError> {
    let (grammar_spec, _lexer_spec) = config.into_specs();
    let (grammar, _automaton, table, warnings) = lalr_grammar::build(grammar_spec, policy)?;
    Ok((grammar, table, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Value {
        Str(String),
    }

    fn ambiguous_config() -> Config<Value> {
        Config {
            terminals: vec![
                TerminalDecl { name: "NUMBER".into(), pattern: r"[0-9]+".into() },
                TerminalDecl { name: "PLUS".into(), pattern: r"\+".into() },
            ],
            refinements: vec![],
            ignored: vec![' '],
            precedence: vec![],
            rules: vec![SyntaxRule {
                name: "expr".into(),
                alternatives: vec![
                    RuleAlt::new("expr PLUS expr", Rc::new(|v: Vec<Value>| Ok(v[0].clone()))),
                    RuleAlt::passthrough("NUMBER"),
                ],
            }],
        }
    }

    #[test]
    fn undeclared_precedence_surfaces_shift_reduce_warning() {
        let (_, _, warnings) = build_for_report(ambiguous_config(), ConflictPolicy::FailFast).unwrap();
        assert!(warnings
            .iter()
            .any(|w| matches!(w, Warning::ShiftReduceConflict { terminal, .. } if terminal == "PLUS")));
    }

    fn epsilon_config() -> Config<Value> {
        Config {
            terminals: vec![TerminalDecl { name: "A".into(), pattern: "a".into() }],
            refinements: vec![],
            ignored: vec![' '],
            precedence: vec![],
            rules: vec![SyntaxRule {
                name: "start".into(),
                alternatives: vec![
                    RuleAlt::new("", Rc::new(|_: Vec<Value>| Ok(Value::Str(String::new())))),
                    RuleAlt::new("A start", Rc::new(|v: Vec<Value>| Ok(v[1].clone()))),
                ],
            }],
        }
    }

    #[test]
    fn epsilon_grammar_accepts_empty_and_repeated_input() {
        let (parser, lexer, _) = build(epsilon_config()).unwrap();
        let to_value = |tok: &Token| Value::Str(tok.text.clone());
        assert!(parser.parse("", &lexer, to_value).is_ok());
        assert!(parser.parse("aaa", &lexer, to_value).is_ok());
    }
}
