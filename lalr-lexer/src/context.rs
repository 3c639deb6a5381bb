//! Locational context wrapping for lex-time errors: a caret under the
//! offending column, colored for terminal output.

use std::fmt::{self, Display};

use colored::Colorize;

/// Gives locational context to an inner error/warning type.
#[derive(Debug, Clone)]
pub struct Context<T: Display> {
    kind: T,
    line: String,
    line_num: usize,
    col: usize,
    source_name: String,
}

impl<T: Display> Context<T> {
    /// Construct a new context around `kind` at `(line_num, col)` of
    /// `source_name`, with `line` the full text of the offending line.
    pub fn new(kind: T, line: String, line_num: usize, col: usize, source_name: String) -> Self {
        Self {
            kind,
            line,
            line_num,
            col,
            source_name,
        }
    }

    /// Convert the inner error type while keeping the same location.
    pub fn map_kind<F: FnOnce(T) -> U, U: Display>(self, f: F) -> Context<U> {
        Context {
            kind: f(self.kind),
            line: self.line,
            line_num: self.line_num,
            col: self.col,
            source_name: self.source_name,
        }
    }

    /// The wrapped error/warning value.
    pub fn kind(&self) -> &T {
        &self.kind
    }

    /// 0-based line number.
    pub fn line_num(&self) -> usize {
        self.line_num
    }

    /// 0-based column within the line.
    pub fn col(&self) -> usize {
        self.col
    }
}

impl<T: Display> Display for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {}:{}:{}:\n{}\n{}{}\n",
            self.kind,
            self.source_name.purple(),
            (self.line_num + 1).to_string().purple(),
            (self.col + 1).to_string().purple(),
            self.line,
            " ".repeat(self.col),
            "^~~ happened here".blue()
        )
    }
}

impl<T: Display> std::error::Error for Context<T> where T: std::fmt::Debug {}
