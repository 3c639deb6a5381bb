//! Symbol tables: the set of declared terminals and nonterminals, and the
//! keyword-refinement table that lets one terminal re-label another based on
//! its matched text.

use std::collections::HashMap;
use std::fmt;

/// Reserved names that a grammar author may never declare as a terminal or
/// nonterminal.
pub const RESERVED_NAMES: [&str; 3] = ["$end", "<empty>", "S'"];

/// Index of a terminal within a [`SymbolTable`], stable for the lifetime of
/// the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalId(pub u32);

/// Index of a nonterminal within a [`SymbolTable`], stable for the lifetime
/// of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonterminalId(pub u32);

/// A single grammar symbol: a terminal, a nonterminal, or the synthetic
/// end-of-input marker `$end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// A token type emitted by the lexer.
    Terminal(TerminalId),
    /// A name defined by rules; never appears in the token stream.
    Nonterminal(NonterminalId),
    /// The synthetic end-of-input terminal, `$end`.
    End,
}

impl Symbol {
    /// Whether this symbol is a terminal (including `$end`).
    pub fn is_terminal(self) -> bool {
        matches!(self, Symbol::Terminal(_) | Symbol::End)
    }
}

/// A single keyword refinement: when a `base` token's text equals `literal`,
/// it is retyped to `refined` at lex time.
#[derive(Debug, Clone)]
pub struct Refinement {
    /// The terminal whose text is inspected.
    pub base: TerminalId,
    /// The exact literal the base token's text must equal.
    pub literal: String,
    /// The terminal the token is retyped to when the literal matches.
    pub refined: TerminalId,
}

/// Errors that can occur while a [`SymbolTable`] is being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    /// A name was declared as both a terminal (or refinement) and as a rule's
    /// left-hand side.
    DuplicateRuleAndTerminalName(String),
    /// A name collides with one of [`RESERVED_NAMES`].
    ReservedName(String),
    /// A keyword refinement's `BASE` half names a terminal that was never
    /// declared.
    UndefinedRefinementBase(String),
}

impl fmt::Display for SymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRuleAndTerminalName(name) => {
                write!(f, "duplicate name with tokentype: {name}")
            }
            Self::ReservedName(name) => write!(f, "name is reserved: {name}"),
            Self::UndefinedRefinementBase(name) => {
                write!(f, "refinement base terminal is undefined: {name}")
            }
        }
    }
}

/// The set of declared terminals and nonterminals for a grammar, plus any
/// keyword refinements.
///
/// Terminals and nonterminals occupy separate id spaces; a name can only be
/// one or the other (checked at registration time by [`Grammar`][crate::grammar::Grammar]
/// once rule left-hand sides are known).
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    terminal_names: Vec<String>,
    terminal_ids: HashMap<String, TerminalId>,
    nonterminal_names: Vec<String>,
    nonterminal_ids: HashMap<String, NonterminalId>,
    refinements: Vec<Refinement>,
}

impl SymbolTable {
    /// Construct an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a terminal by name, returning its id. Re-registering the
    /// same name returns the existing id.
    pub fn intern_terminal(&mut self, name: &str) -> TerminalId {
        if let Some(&id) = self.terminal_ids.get(name) {
            return id;
        }
        let id = TerminalId(self.terminal_names.len() as u32);
        self.terminal_names.push(name.to_string());
        self.terminal_ids.insert(name.to_string(), id);
        id
    }

    /// Register a nonterminal by name, returning its id. Re-registering the
    /// same name returns the existing id.
    pub fn intern_nonterminal(&mut self, name: &str) -> NonterminalId {
        if let Some(&id) = self.nonterminal_ids.get(name) {
            return id;
        }
        let id = NonterminalId(self.nonterminal_names.len() as u32);
        self.nonterminal_names.push(name.to_string());
        self.nonterminal_ids.insert(name.to_string(), id);
        id
    }

    /// Look up a terminal by name.
    pub fn terminal(&self, name: &str) -> Option<TerminalId> {
        self.terminal_ids.get(name).copied()
    }

    /// Look up a nonterminal by name.
    pub fn nonterminal(&self, name: &str) -> Option<NonterminalId> {
        self.nonterminal_ids.get(name).copied()
    }

    /// Look up a symbol of either kind, preferring a terminal if both exist
    /// (callers are expected to have rejected that ambiguity already).
    pub fn symbol(&self, name: &str) -> Option<Symbol> {
        if name == "$end" {
            return Some(Symbol::End);
        }
        if let Some(t) = self.terminal(name) {
            return Some(Symbol::Terminal(t));
        }
        self.nonterminal(name).map(Symbol::Nonterminal)
    }

    /// The declared name of a terminal.
    pub fn terminal_name(&self, id: TerminalId) -> &str {
        &self.terminal_names[id.0 as usize]
    }

    /// The declared name of a nonterminal.
    pub fn nonterminal_name(&self, id: NonterminalId) -> &str {
        &self.nonterminal_names[id.0 as usize]
    }

    /// The name of any symbol, including `$end`.
    pub fn symbol_name(&self, sym: Symbol) -> String {
        match sym {
            Symbol::Terminal(t) => self.terminal_name(t).to_string(),
            Symbol::Nonterminal(n) => self.nonterminal_name(n).to_string(),
            Symbol::End => "$end".to_string(),
        }
    }

    /// Number of declared terminals (not counting `$end`).
    pub fn terminal_count(&self) -> usize {
        self.terminal_names.len()
    }

    /// Number of declared nonterminals.
    pub fn nonterminal_count(&self) -> usize {
        self.nonterminal_names.len()
    }

    /// Iterate over all declared terminal ids in declaration order.
    pub fn terminal_ids(&self) -> impl Iterator<Item = TerminalId> {
        (0..self.terminal_names.len() as u32).map(TerminalId)
    }

    /// Iterate over all declared nonterminal ids in declaration order.
    pub fn nonterminal_ids(&self) -> impl Iterator<Item = NonterminalId> {
        (0..self.nonterminal_names.len() as u32).map(NonterminalId)
    }

    /// Register a keyword refinement: `base[refined]: literal`.
    ///
    /// `base` must already be a declared terminal. `refined` is registered
    /// as a new terminal (it never appears as a regex alternative of its
    /// own).
    pub fn add_refinement(
        &mut self,
        base_name: &str,
        refined_name: &str,
        literal: &str,
    ) -> Result<(), SymbolError> {
        let base = self
            .terminal(base_name)
            .ok_or_else(|| SymbolError::UndefinedRefinementBase(base_name.to_string()))?;
        let refined = self.intern_terminal(refined_name);
        self.refinements.push(Refinement {
            base,
            literal: literal.to_string(),
            refined,
        });
        Ok(())
    }

    /// All registered keyword refinements, in declaration order.
    pub fn refinements(&self) -> &[Refinement] {
        &self.refinements
    }

    /// Reject a name that collides with a reserved name or, when `other`
    /// reports that the name is already declared in the opposite symbol
    /// space, with that declaration.
    pub fn check_name(name: &str) -> Result<(), SymbolError> {
        if RESERVED_NAMES.contains(&name) {
            return Err(SymbolError::ReservedName(name.to_string()));
        }
        Ok(())
    }
}
