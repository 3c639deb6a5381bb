//! Lex-time error taxonomy and lexer-construction errors.

use std::fmt;

/// A failure encountered while tokenizing input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No declared terminal pattern matched at the current position.
    NoMatch {
        /// Byte offset into the original input.
        byte_offset: usize,
    },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::NoMatch { byte_offset } => {
                write!(f, "no terminal pattern matches input at byte {byte_offset}")
            }
        }
    }
}

impl std::error::Error for LexError {}

/// A failure while compiling a [`crate::Lexer`] from its declared patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerBuildError {
    /// A terminal name in the pattern map has no corresponding regex, or a
    /// regex fails to compile.
    InvalidPattern {
        /// The terminal the bad pattern belongs to.
        terminal: String,
        /// The compiler's error message.
        message: String,
    },
    /// A declared terminal has no entry in the pattern map and is not the
    /// target of a keyword refinement (refined terminals are retyped at
    /// match time and never matched directly).
    MissingPattern {
        /// The terminal with no regex.
        terminal: String,
    },
}

impl fmt::Display for LexerBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexerBuildError::InvalidPattern { terminal, message } => {
                write!(f, "invalid regex pattern for terminal {terminal}: {message}")
            }
            LexerBuildError::MissingPattern { terminal } => {
                write!(f, "terminal {terminal} has no regex pattern")
            }
        }
    }
}

impl std::error::Error for LexerBuildError {}
