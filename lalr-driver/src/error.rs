//! Parse-time error taxonomy.

use std::fmt;

use lalr_lexer::{Context, LexError};

/// A failure while driving the ACTION/GOTO tables against a token stream.
#[derive(Debug, Clone)]
pub enum ParseError {
    /// The lexer could not recognize the input at some position.
    Lex(Context<LexError>),
    /// No ACTION entry exists for this state and token: a syntax error.
    UnexpectedToken {
        /// The offending token's terminal name.
        terminal: String,
        /// The offending token's matched text.
        text: String,
        /// 0-based line the token starts on.
        line: usize,
        /// 0-based column within that line.
        col: usize,
    },
    /// Input ended but no ACTION entry exists for `$end` in the current
    /// state.
    UnexpectedEnd,
    /// A `NonAssoc` precedence declaration made this terminal a hard error
    /// at this point in the grammar (see `ConfigError`/`Warning` shift/reduce
    /// resolution).
    NonAssocViolation {
        /// The offending terminal name.
        terminal: String,
        /// 0-based line the token starts on.
        line: usize,
        /// 0-based column within that line.
        col: usize,
    },
    /// A production's semantic action returned an error.
    ActionFailed(String),
    /// A production with more than one rhs symbol (or zero) carries no
    /// action; the driver has nothing sensible to push. Caught here rather
    /// than at grammar-build time because a passthrough production is valid
    /// when its rhs length is exactly one.
    MissingAction {
        /// The production with no action and an rhs length other than one.
        production: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lex(c) => write!(f, "{c}"),
            ParseError::UnexpectedToken { terminal, text, line, col } => write!(
                f,
                "unexpected token {terminal} (\"{text}\") at line {}, column {}",
                line + 1,
                col + 1
            ),
            ParseError::UnexpectedEnd => write!(f, "unexpected end of input"),
            ParseError::NonAssocViolation { terminal, line, col } => write!(
                f,
                "non-associative operator {terminal} used associatively at line {}, column {}",
                line + 1,
                col + 1
            ),
            ParseError::ActionFailed(message) => write!(f, "semantic action failed: {message}"),
            ParseError::MissingAction { production } => {
                write!(f, "production {production} has no action and cannot be passed through")
            }
        }
    }
}

impl std::error::Error for ParseError {}
