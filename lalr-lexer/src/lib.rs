//! Regex-driven tokenizer: turns input text into a stream of tokens using a
//! terminal name→regex map, a keyword-refinement table, and an
//! ignored-character list, all sourced from a [`lalr_grammar::SymbolTable`].
//!
//! Regex engine internals are explicitly out of scope here; this crate
//! leans entirely on the `regex` crate rather than hand-rolling an NFA/DFA.
#![warn(missing_docs)]

pub mod context;
pub mod error;

use log::{debug, trace};
use regex::Regex;

use lalr_grammar::{SymbolTable, TerminalId};

pub use context::Context;
pub use error::{LexError, LexerBuildError};

/// One declared terminal pattern: a name (already interned in the grammar's
/// [`SymbolTable`]) and the regex text that recognizes it.
pub struct TerminalPattern {
    /// Terminal name; must already be registered in the symbol table passed
    /// to [`Lexer::build`].
    pub name: String,
    /// Regex source, anchored implicitly at the current scan position.
    pub pattern: String,
}

/// Everything [`Lexer::build`] needs beyond the symbol table: one pattern
/// per non-refined terminal, and the set of characters skipped between
/// tokens.
pub struct LexerSpec {
    /// Patterns in declaration order; declaration order breaks length ties
    /// during matching.
    pub patterns: Vec<TerminalPattern>,
    /// Characters (other than the patterns themselves) skipped between
    /// tokens. Newlines are always skipped and additionally bump the line
    /// counter even if absent from this list.
    pub ignored: Vec<char>,
}

/// A single recognized token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Which terminal this token was recognized as (after any keyword
    /// refinement has been applied).
    pub terminal: TerminalId,
    /// The exact matched text.
    pub text: String,
    /// 0-based line number the token starts on.
    pub line: usize,
    /// 0-based column within that line.
    pub col: usize,
    /// Byte offset into the original input.
    pub byte_offset: usize,
}

struct CompiledPattern {
    terminal: TerminalId,
    regex: Regex,
}

/// A compiled tokenizer over a fixed set of terminal patterns.
pub struct Lexer {
    patterns: Vec<CompiledPattern>,
    ignored: std::collections::HashSet<char>,
    refinements: Vec<lalr_grammar::symbol::Refinement>,
}

impl Lexer {
    /// Compile a lexer from a symbol table and its pattern/ignored-char
    /// spec. Every non-refined terminal in `symbols` must have a pattern;
    /// every pattern must name a declared terminal.
    pub fn build(symbols: &SymbolTable, spec: LexerSpec) -> Result<Self, LexerBuildError> {
        let refined: std::collections::HashSet<TerminalId> =
            symbols.refinements().iter().map(|r| r.refined).collect();

        let mut patterns = Vec::with_capacity(spec.patterns.len());
        let mut seen: std::collections::HashSet<TerminalId> = std::collections::HashSet::new();
        for p in &spec.patterns {
            let terminal = symbols
                .terminal(&p.name)
                .ok_or_else(|| LexerBuildError::MissingPattern { terminal: p.name.clone() })?;
            let anchored = format!("\\A(?:{})", p.pattern);
            let regex = Regex::new(&anchored).map_err(|e| LexerBuildError::InvalidPattern {
                terminal: p.name.clone(),
                message: e.to_string(),
            })?;
            patterns.push(CompiledPattern { terminal, regex });
            seen.insert(terminal);
        }

        for t in symbols.terminal_ids() {
            if !seen.contains(&t) && !refined.contains(&t) {
                return Err(LexerBuildError::MissingPattern {
                    terminal: symbols.terminal_name(t).to_string(),
                });
            }
        }

        debug!("compiled lexer with {} patterns", patterns.len());
        Ok(Self {
            patterns,
            ignored: spec.ignored.into_iter().collect(),
            refinements: symbols.refinements().to_vec(),
        })
    }

    /// Tokenize the full input, returning every recognized token in order,
    /// or the [`Context`]-wrapped [`LexError`] at the first unmatched
    /// position.
    pub fn lex(&self, input: &str) -> Result<Vec<Token>, Context<LexError>> {
        let lines: Vec<&str> = input.split('\n').collect();
        let mut tokens = Vec::new();
        let mut pos = 0usize;
        let mut line = 0usize;
        let mut line_start = 0usize;

        while pos < input.len() {
            let ch = input[pos..].chars().next().expect("pos within input.len() bounds a char boundary");
            if ch == '\n' {
                pos += ch.len_utf8();
                line += 1;
                line_start = pos;
                continue;
            }
            if self.ignored.contains(&ch) {
                pos += ch.len_utf8();
                continue;
            }

            match self.longest_match(&input[pos..]) {
                Some((mut terminal, matched_len)) => {
                    let text = &input[pos..pos + matched_len];
                    for refinement in &self.refinements {
                        if refinement.base == terminal && refinement.literal == text {
                            terminal = refinement.refined;
                            break;
                        }
                    }
                    tokens.push(Token {
                        terminal,
                        text: text.to_string(),
                        line,
                        col: pos - line_start,
                        byte_offset: pos,
                    });
                    pos += matched_len;
                }
                None => {
                    let col = pos - line_start;
                    return Err(Context::new(
                        LexError::NoMatch { byte_offset: pos },
                        lines.get(line).copied().unwrap_or("").to_string(),
                        line,
                        col,
                        "<input>".to_string(),
                    ));
                }
            }
        }

        trace!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }

    fn longest_match(&self, remaining: &str) -> Option<(TerminalId, usize)> {
        let mut best: Option<(TerminalId, usize)> = None;
        for p in &self.patterns {
            if let Some(m) = p.regex.find(remaining) {
                let len = m.end();
                if len == 0 {
                    continue;
                }
                match best {
                    Some((_, best_len)) if best_len >= len => {}
                    _ => best = Some((p.terminal, len)),
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lalr_grammar::SymbolTable;

    fn calculator_lexer() -> (SymbolTable, Lexer) {
        let mut symbols = SymbolTable::new();
        for name in ["NUMBER", "PLUS", "MINUS", "LPAREN", "RPAREN", "IDENT"] {
            symbols.intern_terminal(name);
        }
        symbols.add_refinement("IDENT", "LET", "let").unwrap();

        let spec = LexerSpec {
            patterns: vec![
                TerminalPattern { name: "NUMBER".into(), pattern: r"[0-9]+".into() },
                TerminalPattern { name: "PLUS".into(), pattern: r"\+".into() },
                TerminalPattern { name: "MINUS".into(), pattern: r"-".into() },
                TerminalPattern { name: "LPAREN".into(), pattern: r"\(".into() },
                TerminalPattern { name: "RPAREN".into(), pattern: r"\)".into() },
                TerminalPattern { name: "IDENT".into(), pattern: r"[a-zA-Z_][a-zA-Z0-9_]*".into() },
            ],
            ignored: vec![' ', '\t'],
        };
        let lexer = Lexer::build(&symbols, spec).unwrap();
        (symbols, lexer)
    }

    #[test]
    fn tokenizes_arithmetic_expression() {
        let (symbols, lexer) = calculator_lexer();
        let tokens = lexer.lex("12 + (x - 3)").unwrap();
        let kinds: Vec<&str> = tokens
            .iter()
            .map(|t| symbols.terminal_name(t.terminal))
            .collect();
        assert_eq!(kinds, ["NUMBER", "PLUS", "LPAREN", "IDENT", "MINUS", "NUMBER", "RPAREN"]);
        assert_eq!(tokens[3].text, "x");
    }

    #[test]
    fn keyword_refinement_retypes_matching_literal() {
        let (symbols, lexer) = calculator_lexer();
        let tokens = lexer.lex("let x").unwrap();
        assert_eq!(symbols.terminal_name(tokens[0].terminal), "LET");
        assert_eq!(symbols.terminal_name(tokens[1].terminal), "IDENT");
    }

    #[test]
    fn longest_match_wins_over_declaration_order() {
        let (symbols, lexer) = calculator_lexer();
        // IDENT ("letter") would match 1 char at a time under NUMBER's
        // pattern never applying, but longest-match must still prefer the
        // 6-character IDENT match over any shorter terminal that happens to
        // also match a prefix.
        let tokens = lexer.lex("letter").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(symbols.terminal_name(tokens[0].terminal), "IDENT");
        assert_eq!(tokens[0].text, "letter");
    }

    #[test]
    fn unmatched_character_reports_position() {
        let (_, lexer) = calculator_lexer();
        let err = lexer.lex("12 @ 3").unwrap_err();
        assert_eq!(*err.kind(), LexError::NoMatch { byte_offset: 3 });
        assert_eq!(err.col(), 3);
    }

    #[test]
    fn newline_bumps_line_counter() {
        let (_, lexer) = calculator_lexer();
        let tokens = lexer.lex("1\n2").unwrap();
        assert_eq!(tokens[0].line, 0);
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[1].col, 0);
    }
}
