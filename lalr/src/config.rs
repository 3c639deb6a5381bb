//! The configuration boundary: everything a caller supplies to [`build`] in
//! one place, spanning both the lexer's and the grammar's concerns.

use lalr_grammar::{GrammarSpec, PrecedenceGroup, SyntaxRule};
use lalr_lexer::{LexerSpec, TerminalPattern};

/// One declared terminal: its name, the regex that recognizes it, and
/// whether it's a real lexer pattern or the target of a keyword refinement.
pub struct TerminalDecl {
    /// Identifier matching `[A-Za-z_][A-Za-z0-9_]*`.
    pub name: String,
    /// Regex source fragment recognizing this terminal's text.
    pub pattern: String,
}

/// A keyword refinement: `base[refined]: literal`. At lex time, a `base`
/// token whose text equals `literal` is retyped to `refined`.
pub struct RefinementDecl {
    /// The already-declared terminal whose text is inspected.
    pub base: String,
    /// The new terminal name the token becomes when `literal` matches.
    pub refined: String,
    /// The exact literal text that triggers the refinement.
    pub literal: String,
}

/// Everything needed to build a parser: terminal patterns, keyword
/// refinements, ignored characters, a precedence table, and syntax rules.
/// The first rule's name becomes the start symbol.
pub struct Config<V> {
    /// Declared terminal patterns, in the order the lexer tries them.
    pub terminals: Vec<TerminalDecl>,
    /// Keyword refinements layered on top of `terminals`.
    pub refinements: Vec<RefinementDecl>,
    /// Characters skipped between tokens (besides `\n`, which is always
    /// skipped and bumps the line counter).
    pub ignored: Vec<char>,
    /// Ordered precedence groups.
    pub precedence: Vec<PrecedenceGroup>,
    /// Syntax rules; the first rule's name is the start symbol.
    pub rules: Vec<SyntaxRule<V>>,
}

impl<V> Config<V> {
    pub(crate) fn into_specs(self) -> (GrammarSpec<V>, LexerSpec) {
        let grammar_spec = GrammarSpec {
            terminals: self.terminals.iter().map(|t| t.name.clone()).collect(),
            refinements: self
                .refinements
                .iter()
                .map(|r| (r.base.clone(), r.refined.clone(), r.literal.clone()))
                .collect(),
            precedence: self.precedence,
            rules: self.rules,
        };
        let lexer_spec = LexerSpec {
            patterns: self
                .terminals
                .into_iter()
                .map(|t| TerminalPattern { name: t.name, pattern: t.pattern })
                .collect(),
            ignored: self.ignored,
        };
        (grammar_spec, lexer_spec)
    }
}
