//! The precedence/associativity table used to resolve shift/reduce
//! conflicts and to give productions an implicit precedence.

use std::collections::HashMap;
use std::fmt;

use crate::symbol::TerminalId;

/// Associativity of a precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// `a OP b OP c` parses as `(a OP b) OP c`.
    Left,
    /// `a OP b OP c` parses as `a OP (b OP c)`.
    Right,
    /// `a OP b OP c` is a parse-time error.
    NonAssoc,
}

impl fmt::Display for Assoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Assoc::Left => "left",
            Assoc::Right => "right",
            Assoc::NonAssoc => "nonassoc",
        };
        write!(f, "{s}")
    }
}

/// A single declared precedence level: an associativity and the ordered list
/// of terminal (or `%prec` tag) names carrying it.
#[derive(Debug, Clone)]
pub struct PrecedenceGroup {
    /// Associativity shared by every terminal in this group.
    pub assoc: Assoc,
    /// Priority level; higher binds tighter. Must be a positive integer.
    pub level: u32,
    /// The terminal or synthetic-tag names carrying this level.
    pub terminals: Vec<String>,
}

/// A terminal's resolved precedence: its level and the associativity of the
/// group it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecedenceEntry {
    /// Priority level; 0 means "no declared precedence".
    pub level: u32,
    /// Associativity of the owning group.
    pub assoc: Assoc,
}

impl Default for PrecedenceEntry {
    fn default() -> Self {
        Self {
            level: 0,
            assoc: Assoc::Left,
        }
    }
}

/// Error produced when the same terminal or tag name is listed in more than
/// one precedence group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceConflict(pub String);

impl fmt::Display for PrecedenceConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "precedence conflict for token type {}", self.0)
    }
}

/// Maps a terminal (or a synthetic `%prec` tag that never appears in any
/// rhs) to a precedence level and associativity.
///
/// Tag names share a namespace with terminal ids once resolved against the
/// grammar's [`SymbolTable`][crate::symbol::SymbolTable]; until then this
/// table is keyed by the raw declared name so that tags which name no real
/// terminal (e.g. `UMINUS`) still resolve.
#[derive(Debug, Default, Clone)]
pub struct PrecedenceTable {
    by_name: HashMap<String, PrecedenceEntry>,
    by_terminal: HashMap<TerminalId, PrecedenceEntry>,
    used: std::collections::HashSet<String>,
}

impl PrecedenceTable {
    /// Build a table from an ordered list of precedence groups. Levels are
    /// taken verbatim from each group (callers that want "declaration order
    /// implies increasing precedence" should number their groups
    /// accordingly; this table does not renumber them).
    pub fn new(groups: &[PrecedenceGroup]) -> Result<Self, PrecedenceConflict> {
        let mut table = Self::default();
        for group in groups {
            for name in &group.terminals {
                if table.by_name.contains_key(name) {
                    return Err(PrecedenceConflict(name.clone()));
                }
                table.by_name.insert(
                    name.clone(),
                    PrecedenceEntry {
                        level: group.level,
                        assoc: group.assoc,
                    },
                );
            }
        }
        Ok(table)
    }

    /// Resolve a declared name (terminal name or `%prec` tag) to its
    /// precedence entry, if any.
    pub fn lookup_name(&self, name: &str) -> Option<PrecedenceEntry> {
        self.by_name.get(name).copied()
    }

    /// Bind a terminal id to its precedence entry, once the grammar's
    /// symbol table is available. Must be called once per terminal that
    /// appears by name in this table.
    pub fn bind_terminal(&mut self, name: &str, id: TerminalId) {
        if let Some(entry) = self.by_name.get(name) {
            self.by_terminal.insert(id, *entry);
        }
    }

    /// Look up a terminal's precedence by id, after [`Self::bind_terminal`]
    /// has been called for it.
    pub fn lookup_terminal(&self, id: TerminalId) -> Option<PrecedenceEntry> {
        self.by_terminal.get(&id).copied()
    }

    /// Mark a tag name as having been referenced by a `%prec` clause.
    pub fn mark_used(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }

    /// Names declared in the table but never referenced by a production's
    /// rightmost terminal or a `%prec` clause.
    pub fn unused(&self) -> Vec<&str> {
        self.by_name
            .keys()
            .filter(|name| !self.used.contains(*name))
            .map(String::as_str)
            .collect()
    }
}
