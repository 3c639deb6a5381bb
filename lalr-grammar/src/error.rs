//! Construction-time error and warning taxonomy.

use std::fmt;

use crate::precedence::PrecedenceConflict;
use crate::symbol::SymbolError;

/// Hard errors that abort [`crate::grammar::Grammar::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Two alternatives reduced to the same canonical `LHS -> s1 s2 ...`
    /// string.
    DuplicateProduction(String),
    /// The same terminal (or `%prec` tag) was listed in more than one
    /// precedence group.
    PrecedenceConflict(PrecedenceConflict),
    /// A `%prec` clause did not appear immediately before the trailing tag,
    /// or nothing followed `%prec` at all.
    MalformedPrec {
        /// The nonterminal whose alternative was malformed.
        rule: String,
    },
    /// A `%prec TAG` referenced a tag with no declared precedence.
    UndefinedPrecTag {
        /// The nonterminal whose alternative carried the bad tag.
        rule: String,
        /// The undeclared tag name.
        tag: String,
    },
    /// A name was declared as both a terminal and a rule left-hand side, or
    /// otherwise collided with a reserved name.
    Symbol(SymbolError),
    /// Some nonterminal cannot derive any string of terminals; LALR
    /// construction over such a grammar cannot terminate meaningfully.
    NonTerminating(Vec<String>),
    /// An rhs symbol is neither a declared terminal nor any rule's
    /// left-hand side.
    UndefinedSymbol {
        /// The nonterminal whose alternative referenced the symbol.
        rule: String,
        /// The undefined name.
        symbol: String,
    },
    /// A reduce/reduce conflict was found and [`ConflictPolicy::FailFast`]
    /// (the default) is in effect.
    ReduceReduceConflict {
        /// The automaton state at which the conflict occurs.
        state: usize,
        /// The terminal both productions would reduce on.
        lookahead: String,
        /// Production ids competing for the reduction, in declaration order.
        productions: Vec<usize>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateProduction(rule) => write!(f, "duplicate production {rule}"),
            Self::PrecedenceConflict(e) => write!(f, "{e}"),
            Self::MalformedPrec { rule } => {
                write!(f, "syntax error in {rule}: malformed %prec clause")
            }
            Self::UndefinedPrecTag { rule, tag } => {
                write!(f, "nothing known about the precedence of {tag} (used in {rule})")
            }
            Self::Symbol(e) => write!(f, "{e}"),
            Self::NonTerminating(names) => {
                write!(f, "nonterminal(s) cannot derive any terminal string: {}", names.join(", "))
            }
            Self::UndefinedSymbol { rule, symbol } => {
                write!(f, "undefined symbol {symbol} used in rule {rule}")
            }
            Self::ReduceReduceConflict {
                state,
                lookahead,
                productions,
            } => write!(
                f,
                "reduce/reduce conflict in state {state} on {lookahead} between productions {productions:?}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<SymbolError> for ConfigError {
    fn from(value: SymbolError) -> Self {
        Self::Symbol(value)
    }
}

impl From<PrecedenceConflict> for ConfigError {
    fn from(value: PrecedenceConflict) -> Self {
        Self::PrecedenceConflict(value)
    }
}

/// Non-fatal diagnostics accumulated during `build` and returned alongside
/// the constructed parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An rhs symbol is neither a declared terminal nor any rule's
    /// left-hand side. Parsing will simply never be able to shift or
    /// reduce through it.
    UndefinedSymbol {
        /// The nonterminal whose alternative referenced the symbol.
        rule: String,
        /// The undefined name.
        symbol: String,
    },
    /// A declared terminal never appears in any production's rhs.
    UnusedTerminal(String),
    /// A nonterminal appears only as a left-hand side, never referenced
    /// from any rhs.
    UnusedRule(String),
    /// A nonterminal is not reachable from the start symbol.
    UnreachableRule(String),
    /// A shift/reduce conflict was resolved via precedence, or shift won by
    /// default because one side lacked a declared precedence.
    ShiftReduceConflict {
        /// The automaton state at which the conflict occurs.
        state: usize,
        /// The terminal being shifted or reduced on.
        terminal: String,
        /// How the conflict was resolved.
        resolution: String,
    },
    /// A reduce/reduce conflict was resolved by keeping the earlier
    /// production (only emitted under [`ConflictPolicy::Resolve`]).
    ReduceReduceConflict {
        /// The automaton state at which the conflict occurs.
        state: usize,
        /// The terminal both productions would reduce on.
        lookahead: String,
        /// Production ids competing for the reduction, in declaration order.
        productions: Vec<usize>,
    },
    /// A precedence group listed a terminal or tag that is never used as a
    /// production's implicit precedence nor referenced by any `%prec`.
    UnusedPrecedence(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedSymbol { rule, symbol } => {
                write!(f, "undefined symbol {symbol} used in rule {rule}")
            }
            Self::UnusedTerminal(name) => write!(f, "terminal {name} is never used"),
            Self::UnusedRule(name) => write!(f, "rule {name} is never used"),
            Self::UnreachableRule(name) => write!(f, "rule {name} is unreachable from the start symbol"),
            Self::ShiftReduceConflict {
                state,
                terminal,
                resolution,
            } => write!(
                f,
                "shift/reduce conflict in state {state} on {terminal}: {resolution}"
            ),
            Self::ReduceReduceConflict {
                state,
                lookahead,
                productions,
            } => write!(
                f,
                "reduce/reduce conflict in state {state} on {lookahead} between productions {productions:?}, kept {}",
                productions.first().copied().unwrap_or(0)
            ),
            Self::UnusedPrecedence(name) => write!(f, "precedence declared for {name} is never used"),
        }
    }
}

/// How `build` should handle a reduce/reduce conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Abort construction with [`ConfigError::ReduceReduceConflict`].
    #[default]
    FailFast,
    /// Keep the earlier-declared production and emit
    /// [`Warning::ReduceReduceConflict`].
    Resolve,
}
