//! Grammar analysis and LALR(1) table construction.
//!
//! This crate owns the algorithmically dense core of the workspace: turning
//! a declared set of terminals, precedence groups, and syntax rules into a
//! deterministic ACTION/GOTO table via the canonical LR(0) collection and
//! the DeRemer–Pennello efficient lookahead algorithm. It knows nothing
//! about how tokens are produced ([`lalr_lexer`]) or how the tables drive a
//! parse ([`lalr_driver`]) — both consume its output.
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod error;
pub mod grammar;
pub mod items;
pub mod lookahead;
pub mod lr0;
pub mod precedence;
pub mod production;
pub mod report;
pub mod symbol;
pub mod table;

pub use error::{ConfigError, ConflictPolicy, Warning};
pub use grammar::{Grammar, GrammarSpec, RuleAlt, SyntaxRule};
pub use lookahead::{LookaheadComputer, LookaheadTable};
pub use lr0::LR0Automaton;
pub use precedence::{Assoc, PrecedenceGroup};
pub use production::{Action, Production};
pub use symbol::{NonterminalId, Symbol, SymbolTable, TerminalId};
pub use table::{ParseTable, TableBuilder};

/// Build a grammar, its LR(0) automaton, LALR lookaheads, and the finished
/// parse table in one pass. This is the crate's single entry point; callers
/// that need intermediate artifacts (e.g. to render a [`report`]) can call
/// [`Grammar::build`], [`LR0Automaton::build`], [`LookaheadComputer::compute`],
/// and [`TableBuilder::build`] directly instead.
pub fn build<V>(
    spec: GrammarSpec<V>,
    policy: ConflictPolicy,
) -> Result<(Grammar<V>, LR0Automaton, ParseTable, Vec<Warning>), ConfigError> {
    let (grammar, mut warnings) = Grammar::build(spec)?;
    let automaton = LR0Automaton::build(&grammar.items, &grammar.productions);
    let lookaheads = LookaheadComputer::new(&grammar, &automaton, &grammar.items).compute();
    let builder = TableBuilder::new(&grammar, &automaton, &grammar.items, &lookaheads, policy);
    let (table, table_warnings) = builder.build()?;
    warnings.extend(table_warnings);
    Ok((grammar, automaton, table, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn calculator_spec() -> GrammarSpec<i64> {
        GrammarSpec {
            terminals: vec![
                "NUMBER".into(),
                "PLUS".into(),
                "MINUS".into(),
                "TIMES".into(),
                "DIVIDE".into(),
                "LPAREN".into(),
                "RPAREN".into(),
            ],
            refinements: vec![],
            precedence: vec![
                PrecedenceGroup {
                    assoc: Assoc::Left,
                    level: 1,
                    terminals: vec!["PLUS".into(), "MINUS".into()],
                },
                PrecedenceGroup {
                    assoc: Assoc::Left,
                    level: 2,
                    terminals: vec!["TIMES".into(), "DIVIDE".into()],
                },
                PrecedenceGroup {
                    assoc: Assoc::Left,
                    level: 3,
                    terminals: vec!["UMINUS".into()],
                },
            ],
            rules: vec![SyntaxRule {
                name: "expr".into(),
                alternatives: vec![
                    RuleAlt::new("expr PLUS expr", Rc::new(|mut v: Vec<i64>| {
                        let b = v.pop().unwrap();
                        let a = v.pop().unwrap();
                        Ok(a + b)
                    })),
                    RuleAlt::new("expr MINUS expr", Rc::new(|mut v: Vec<i64>| {
                        let b = v.pop().unwrap();
                        let a = v.pop().unwrap();
                        Ok(a - b)
                    })),
                    RuleAlt::new("expr TIMES expr", Rc::new(|mut v: Vec<i64>| {
                        let b = v.pop().unwrap();
                        let a = v.pop().unwrap();
                        Ok(a * b)
                    })),
                    RuleAlt::new("expr DIVIDE expr", Rc::new(|mut v: Vec<i64>| {
                        let b = v.pop().unwrap();
                        let a = v.pop().unwrap();
                        Ok(a / b)
                    })),
                    RuleAlt::new("MINUS expr %prec UMINUS", Rc::new(|mut v: Vec<i64>| {
                        Ok(-v.pop().unwrap())
                    })),
                    RuleAlt::new("LPAREN expr RPAREN", Rc::new(|mut v: Vec<i64>| {
                        v.pop().ok_or_else(|| "missing inner expr".to_string())
                    })),
                    RuleAlt::passthrough("NUMBER"),
                ],
            }],
        }
    }

    #[test]
    fn calculator_grammar_builds_without_conflicts_reported_as_fatal() {
        let (_, _, table, warnings) = build(calculator_spec(), ConflictPolicy::FailFast).unwrap();
        assert!(table.state_count() > 1);
        for w in &warnings {
            assert!(
                !matches!(w, Warning::ReduceReduceConflict { .. }),
                "unexpected reduce/reduce conflict: {w}"
            );
        }
    }

    #[test]
    fn duplicate_production_is_rejected() {
        let mut spec = calculator_spec();
        spec.rules[0].alternatives.push(RuleAlt::passthrough("NUMBER"));
        let err = Grammar::build(spec).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateProduction(_)));
    }

    #[test]
    fn undefined_prec_tag_is_rejected() {
        let mut spec = calculator_spec();
        spec.rules[0]
            .alternatives
            .push(RuleAlt::passthrough("MINUS expr %prec NOPE"));
        let err = Grammar::build(spec).unwrap_err();
        assert!(matches!(err, ConfigError::UndefinedPrecTag { .. }));
    }

    #[test]
    fn non_terminating_nonterminal_is_rejected() {
        let spec: GrammarSpec<i64> = GrammarSpec {
            terminals: vec!["A".into()],
            refinements: vec![],
            precedence: vec![],
            rules: vec![
                SyntaxRule {
                    name: "start".into(),
                    alternatives: vec![RuleAlt::passthrough("loop")],
                },
                SyntaxRule {
                    name: "loop".into(),
                    alternatives: vec![RuleAlt::passthrough("loop A")],
                },
            ],
        };
        let err = Grammar::build(spec).unwrap_err();
        assert!(matches!(err, ConfigError::NonTerminating(_)));
    }

    #[test]
    fn typo_in_rhs_is_an_undefined_symbol_warning_not_a_fatal_non_terminating_error() {
        let spec: GrammarSpec<i64> = GrammarSpec {
            terminals: vec!["A".into()],
            refinements: vec![],
            precedence: vec![],
            rules: vec![SyntaxRule {
                name: "start".into(),
                alternatives: vec![RuleAlt::passthrough("A speling_mistake")],
            }],
        };
        let (_, warnings) = Grammar::build(spec).unwrap();
        assert!(warnings.iter().any(|w| matches!(
            w,
            Warning::UndefinedSymbol { rule, symbol }
                if rule == "start" && symbol == "speling_mistake"
        )));
    }

    #[test]
    fn unreachable_and_unused_rules_are_warned_not_fatal() {
        let spec: GrammarSpec<i64> = GrammarSpec {
            terminals: vec!["A".into()],
            refinements: vec![],
            precedence: vec![],
            rules: vec![
                SyntaxRule {
                    name: "start".into(),
                    alternatives: vec![RuleAlt::passthrough("A")],
                },
                SyntaxRule {
                    name: "dead".into(),
                    alternatives: vec![RuleAlt::passthrough("A")],
                },
            ],
        };
        let (_, warnings) = Grammar::build(spec).unwrap();
        assert!(warnings
            .iter()
            .any(|w| matches!(w, Warning::UnreachableRule(name) if name == "dead")));
    }

    #[test]
    fn epsilon_rule_is_nullable_and_does_not_block_first_follow() {
        let spec: GrammarSpec<i64> = GrammarSpec {
            terminals: vec!["A".into(), "B".into()],
            refinements: vec![],
            precedence: vec![],
            rules: vec![
                SyntaxRule {
                    name: "start".into(),
                    alternatives: vec![RuleAlt::passthrough("maybe_a B")],
                },
                SyntaxRule {
                    name: "maybe_a".into(),
                    alternatives: vec![RuleAlt::passthrough("A"), RuleAlt::passthrough("")],
                },
            ],
        };
        let (grammar, _) = Grammar::build(spec).unwrap();
        let maybe_a = grammar.symbols.nonterminal("maybe_a").unwrap();
        assert!(grammar.is_nullable(Symbol::Nonterminal(maybe_a)));
    }
}
