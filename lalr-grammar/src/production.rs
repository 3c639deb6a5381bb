//! Productions: a left-hand nonterminal, an ordered right-hand side, a
//! resolved precedence, and an optional semantic action.

use std::rc::Rc;

use crate::symbol::{NonterminalId, Symbol};

/// A semantic action: given the popped values of a production's rhs (in
/// left-to-right order), produce the value pushed for its lhs, or an error
/// string surfaced to the caller of `parse`.
pub type Action<V> = Rc<dyn Fn(Vec<V>) -> Result<V, String>>;

/// A single grammar rule `lhs -> rhs`, with its resolved precedence and
/// optional action.
///
/// Production 0 is always the augmented start rule `S' -> start $end` and
/// carries no action (the driver never reduces it; it only recognizes it to
/// emit `accept`).
#[derive(Clone)]
pub struct Production<V> {
    /// Index into [`crate::grammar::Grammar::productions`]; production 0 is
    /// always the augmented start rule.
    pub id: usize,
    /// The nonterminal this production expands.
    pub lhs: NonterminalId,
    /// The ordered sequence of symbols on the right-hand side. May be empty
    /// (an ε-production).
    pub rhs: Vec<Symbol>,
    /// Precedence level used for shift/reduce resolution; 0 means "no
    /// declared precedence, shift wins by default".
    pub prec_level: u32,
    /// The semantic action invoked on reduce, if any.
    pub action: Option<Action<V>>,
}

impl<V> std::fmt::Debug for Production<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Production")
            .field("id", &self.id)
            .field("lhs", &self.lhs)
            .field("rhs", &self.rhs)
            .field("prec_level", &self.prec_level)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

impl<V> Production<V> {
    /// The canonical string form `LHS -> s1 s2 ...` used to detect
    /// duplicate productions, given a symbol-naming function.
    pub fn canonical_form(&self, name_lhs: &str, name_rhs: impl Fn(Symbol) -> String) -> String {
        let mut s = format!("{name_lhs}->");
        for sym in &self.rhs {
            s.push(' ');
            s.push_str(&name_rhs(*sym));
        }
        s
    }
}
