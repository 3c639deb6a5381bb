//! Shift/reduce parse-time driver: a state stack and a value stack execute
//! a built ACTION/GOTO table against a lexed token stream, invoking
//! production actions on reduce.
#![warn(missing_docs)]

pub mod error;

use log::trace;

use lalr_grammar::table::Action as ParserAction;
use lalr_grammar::{Grammar, ParseTable, Production, SymbolTable};
use lalr_lexer::{Lexer, Token};

pub use error::ParseError;

/// A parser built from a [`Grammar`]'s productions and a constructed
/// [`ParseTable`]. Immutable and freely shareable: many threads may drive
/// independent parses against the same `Parser` concurrently, each owning
/// its own state and value stacks.
pub struct Parser<V> {
    table: ParseTable,
    productions: Vec<Production<V>>,
    symbols: SymbolTable,
}

impl<V> Parser<V> {
    /// Assemble a driver from a grammar and its already-built parse table.
    /// Consumes the grammar; only its productions and symbol table are
    /// needed at parse time (the LR(0)/lookahead artifacts are construction-
    /// only and may be dropped).
    pub fn new(grammar: Grammar<V>, table: ParseTable) -> Self {
        Self {
            table,
            productions: grammar.productions,
            symbols: grammar.symbols,
        }
    }

    /// The declared name of a terminal, for callers that need to branch a
    /// `token_to_value` conversion on which terminal was matched.
    pub fn terminal_name(&self, terminal: lalr_grammar::TerminalId) -> &str {
        self.symbols.terminal_name(terminal)
    }

    /// Parse `input`, lexing it with `lexer` and converting each shifted
    /// token to a value via `token_to_value`.
    pub fn parse(
        &self,
        input: &str,
        lexer: &Lexer,
        token_to_value: impl Fn(&Token) -> V,
    ) -> Result<V, ParseError> {
        let tokens = lexer.lex(input).map_err(ParseError::Lex)?;
        let mut state_stack: Vec<usize> = vec![0];
        let mut value_stack: Vec<V> = Vec::new();
        let mut idx = 0usize;

        loop {
            let state = *state_stack.last().expect("state stack is never empty during a parse");
            let current = tokens.get(idx);

            let action = match current {
                Some(tok) => self.table.action(state, tok.terminal),
                None => self.table.action_end(state),
            };

            match action {
                Some(ParserAction::Shift(target)) => {
                    let tok = current.expect("a shift action is only ever proposed for a present token");
                    value_stack.push(token_to_value(tok));
                    state_stack.push(target);
                    idx += 1;
                }
                Some(ParserAction::Reduce(production_id)) => {
                    self.reduce(production_id, &mut state_stack, &mut value_stack)?;
                }
                Some(ParserAction::Accept) => {
                    trace!("accept after {idx} tokens");
                    return Ok(value_stack
                        .pop()
                        .expect("accept leaves exactly one value on the value stack"));
                }
                Some(ParserAction::Error) => {
                    let tok = current.expect("a nonassoc error action only applies to a present terminal");
                    return Err(ParseError::NonAssocViolation {
                        terminal: self.symbols.terminal_name(tok.terminal).to_string(),
                        line: tok.line,
                        col: tok.col,
                    });
                }
                None => {
                    return Err(match current {
                        Some(tok) => ParseError::UnexpectedToken {
                            terminal: self.symbols.terminal_name(tok.terminal).to_string(),
                            text: tok.text.clone(),
                            line: tok.line,
                            col: tok.col,
                        },
                        None => ParseError::UnexpectedEnd,
                    });
                }
            }
        }
    }

    fn reduce(
        &self,
        production_id: usize,
        state_stack: &mut Vec<usize>,
        value_stack: &mut Vec<V>,
    ) -> Result<(), ParseError> {
        let production = &self.productions[production_id];
        let rhs_len = production.rhs.len();

        let popped: Vec<V> = value_stack.split_off(value_stack.len() - rhs_len);
        state_stack.truncate(state_stack.len() - rhs_len);

        let result = match &production.action {
            Some(action) => action(popped).map_err(ParseError::ActionFailed)?,
            None => {
                let mut popped = popped;
                if popped.len() == 1 {
                    popped.pop().unwrap()
                } else {
                    return Err(ParseError::MissingAction { production: production_id });
                }
            }
        };

        value_stack.push(result);
        let top = *state_stack.last().expect("state stack is never empty during a reduce");
        let goto_state = self
            .table
            .goto(top, production.lhs)
            .expect("goto must be defined for a just-reduced lhs, by the table's own construction");
        state_stack.push(goto_state);
        trace!("reduced by production {production_id}, goto state {goto_state}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lalr_grammar::{Assoc, ConflictPolicy, GrammarSpec, PrecedenceGroup, RuleAlt, SyntaxRule};
    use lalr_lexer::{LexerSpec, TerminalPattern};
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Value {
        Num(i64),
    }

    fn num(v: &Value) -> i64 {
        match v {
            Value::Num(n) => *n,
        }
    }

    fn build_calculator() -> (Parser<Value>, Lexer) {
        let spec = GrammarSpec {
            terminals: vec!["NUMBER".into(), "PLUS".into(), "TIMES".into(), "LPAREN".into(), "RPAREN".into()],
            refinements: vec![],
            precedence: vec![
                PrecedenceGroup { assoc: Assoc::Left, level: 1, terminals: vec!["PLUS".into()] },
                PrecedenceGroup { assoc: Assoc::Left, level: 2, terminals: vec!["TIMES".into()] },
            ],
            rules: vec![SyntaxRule {
                name: "expr".into(),
                alternatives: vec![
                    RuleAlt::new("expr PLUS expr", Rc::new(|v: Vec<Value>| Ok(Value::Num(num(&v[0]) + num(&v[1]))))),
                    RuleAlt::new("expr TIMES expr", Rc::new(|v: Vec<Value>| Ok(Value::Num(num(&v[0]) * num(&v[1]))))),
                    RuleAlt::new("LPAREN expr RPAREN", Rc::new(|v: Vec<Value>| Ok(v[1].clone()))),
                    RuleAlt::passthrough("NUMBER"),
                ],
            }],
        };
        let (grammar, automaton, table, _warnings) = lalr_grammar::build(spec, ConflictPolicy::FailFast).unwrap();
        let _ = automaton;

        let mut symbols = lalr_grammar::SymbolTable::new();
        for name in ["NUMBER", "PLUS", "TIMES", "LPAREN", "RPAREN"] {
            symbols.intern_terminal(name);
        }
        let lexer_spec = LexerSpec {
            patterns: vec![
                TerminalPattern { name: "NUMBER".into(), pattern: r"[0-9]+".into() },
                TerminalPattern { name: "PLUS".into(), pattern: r"\+".into() },
                TerminalPattern { name: "TIMES".into(), pattern: r"\*".into() },
                TerminalPattern { name: "LPAREN".into(), pattern: r"\(".into() },
                TerminalPattern { name: "RPAREN".into(), pattern: r"\)".into() },
            ],
            ignored: vec![' '],
        };
        let lexer = Lexer::build(&symbols, lexer_spec).unwrap();
        (Parser::new(grammar, table), lexer)
    }

    #[test]
    fn evaluates_precedence_correctly() {
        let (parser, lexer) = build_calculator();
        let result = parser
            .parse("2 + 3 * 4", &lexer, |tok| Value::Num(tok.text.parse().unwrap_or(0)))
            .unwrap();
        assert_eq!(result, Value::Num(14));
    }

    #[test]
    fn parentheses_override_precedence() {
        let (parser, lexer) = build_calculator();
        let result = parser
            .parse("(2 + 3) * 4", &lexer, |tok| Value::Num(tok.text.parse().unwrap_or(0)))
            .unwrap();
        assert_eq!(result, Value::Num(20));
    }

    #[test]
    fn unexpected_token_is_reported() {
        let (parser, lexer) = build_calculator();
        let err = parser
            .parse("2 +", &lexer, |tok| Value::Num(tok.text.parse().unwrap_or(0)))
            .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd));
    }
}
