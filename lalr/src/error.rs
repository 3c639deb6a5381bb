//! The top-level build-error union: either the grammar layer or the lexer
//! layer can fail to construct from a [`crate::Config`].

use std::fmt;

use lalr_grammar::ConfigError;
use lalr_lexer::LexerBuildError;

/// A failure while building a parser from a [`crate::Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The grammar layer rejected the configuration.
    Grammar(ConfigError),
    /// The lexer layer rejected the configuration.
    Lexer(LexerBuildError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Grammar(e) => write!(f, "{e}"),
            BuildError::Lexer(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<ConfigError> for BuildError {
    fn from(value: ConfigError) -> Self {
        Self::Grammar(value)
    }
}

impl From<LexerBuildError> for BuildError {
    fn from(value: LexerBuildError) -> Self {
        Self::Lexer(value)
    }
}
