//! The LR(0) item graph: for every production, the chain of items at dot
//! positions `0..=rhs.len()`, plus the set of productions to add during
//! closure when the dot sits just before a nonterminal.

use crate::symbol::Symbol;

/// A specific dot position within one production.
///
/// Two items are equal iff `(production_id, dot)` match; the grammar they
/// index into is implicit (an `LRItem` is only meaningful alongside the
/// [`LRItemGraph`] that produced it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LRItem {
    /// Which production this item walks.
    pub production_id: usize,
    /// How many rhs symbols have been consumed so far.
    pub dot: usize,
}

impl LRItem {
    /// The item at dot position 0 of the given production.
    pub fn initial(production_id: usize) -> Self {
        Self {
            production_id,
            dot: 0,
        }
    }

    /// The item with the dot advanced by one position.
    pub fn advanced(self) -> Self {
        Self {
            production_id: self.production_id,
            dot: self.dot + 1,
        }
    }
}

/// Per-production metadata precomputed once so that closure and goto never
/// need to look past a flat array access.
#[derive(Debug, Clone)]
struct ProductionItems {
    /// rhs length; an item's dot ranges over `0..=rhs_len`.
    rhs_len: usize,
    /// `after[dot]` is the nonterminal immediately right of the dot at that
    /// position, if any.
    after: Vec<Option<Symbol>>,
}

/// Precomputed chain-of-items structure over every production in a grammar.
///
/// This exists purely to make [`crate::lr0::LR0Automaton`]'s closure and
/// goto operations table lookups instead of re-deriving "what symbol is
/// right of the dot" from a production's rhs vector every time.
#[derive(Debug, Clone)]
pub struct LRItemGraph {
    productions: Vec<ProductionItems>,
}

impl LRItemGraph {
    /// Build the item graph from a grammar's symbol sequences, one per
    /// production in declaration order (including the augmented production
    /// 0).
    pub fn new(rhs_by_production: &[Vec<Symbol>]) -> Self {
        let productions = rhs_by_production
            .iter()
            .map(|rhs| ProductionItems {
                rhs_len: rhs.len(),
                after: (0..=rhs.len())
                    .map(|dot| rhs.get(dot).copied())
                    .collect(),
            })
            .collect();
        Self { productions }
    }

    /// The symbol immediately right of the dot, or `None` if the item is at
    /// the end of its production.
    pub fn symbol_after_dot(&self, item: LRItem) -> Option<Symbol> {
        self.productions[item.production_id].after[item.dot]
    }

    /// Whether the item's dot sits at the end of its production's rhs.
    pub fn is_complete(&self, item: LRItem) -> bool {
        item.dot == self.productions[item.production_id].rhs_len
    }

    /// Length of a production's rhs.
    pub fn rhs_len(&self, production_id: usize) -> usize {
        self.productions[production_id].rhs_len
    }
}
