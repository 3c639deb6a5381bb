//! The canonical collection of LR(0) item sets: closure, goto, and the
//! deterministic worklist that builds every reachable state exactly once.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::trace;

use crate::items::{LRItem, LRItemGraph};
use crate::production::Production;
use crate::symbol::Symbol;

/// A deduplication key for a kernel item set: the sorted, deduplicated list
/// of `(production_id, dot)` pairs. Two states with the same kernel are the
/// same state, regardless of how closure reached them.
pub type KernelKey = Vec<(usize, usize)>;

/// One state of the LR(0) automaton: its kernel items (the items present
/// before closure) and its full closure.
#[derive(Debug, Clone)]
pub struct LR0State {
    /// Items present before closure (goto's image, or `{item 0 of
    /// production 0}` for the initial state).
    pub kernel: Vec<LRItem>,
    /// Kernel items plus every item added by closure.
    pub items: BTreeSet<LRItem>,
    /// Outgoing transitions on each symbol, to the index of the target
    /// state.
    pub transitions: BTreeMap<Symbol, usize>,
}

fn kernel_key(kernel: &[LRItem]) -> KernelKey {
    let mut key: Vec<(usize, usize)> = kernel.iter().map(|i| (i.production_id, i.dot)).collect();
    key.sort_unstable();
    key.dedup();
    key
}

/// The canonical collection of LR(0) states reachable from the augmented
/// start item, plus the transition function between them.
#[derive(Debug)]
pub struct LR0Automaton {
    /// States in construction order; state 0 is always the initial state.
    pub states: Vec<LR0State>,
}

impl LR0Automaton {
    /// Build the canonical collection for a grammar whose production 0 is
    /// the augmented start rule `S' -> start $end`.
    pub fn build<V>(items: &LRItemGraph, productions: &[Production<V>]) -> Self {
        let by_lhs: HashMap<crate::symbol::NonterminalId, Vec<usize>> = {
            let mut map: HashMap<crate::symbol::NonterminalId, Vec<usize>> = HashMap::new();
            for production in productions {
                map.entry(production.lhs).or_default().push(production.id);
            }
            map
        };

        let initial_kernel = vec![LRItem::initial(0)];
        let initial_closure = Self::closure(items, &by_lhs, &initial_kernel);
        let mut states = vec![LR0State {
            kernel: initial_kernel.clone(),
            items: initial_closure,
            transitions: BTreeMap::new(),
        }];
        let mut index_by_kernel: HashMap<KernelKey, usize> = HashMap::new();
        index_by_kernel.insert(kernel_key(&initial_kernel), 0);

        let mut worklist = vec![0usize];
        while let Some(state_id) = worklist.pop() {
            let symbols: BTreeSet<Symbol> = states[state_id]
                .items
                .iter()
                .filter_map(|&item| items.symbol_after_dot(item))
                .collect();

            for sym in symbols {
                let target_kernel = Self::goto_kernel(items, &states[state_id].items, sym);
                if target_kernel.is_empty() {
                    continue;
                }
                let key = kernel_key(&target_kernel);
                let target_id = match index_by_kernel.get(&key) {
                    Some(&id) => id,
                    None => {
                        let closure = Self::closure(items, &by_lhs, &target_kernel);
                        let id = states.len();
                        states.push(LR0State {
                            kernel: target_kernel.clone(),
                            items: closure,
                            transitions: BTreeMap::new(),
                        });
                        index_by_kernel.insert(key, id);
                        worklist.push(id);
                        id
                    }
                };
                states[state_id].transitions.insert(sym, target_id);
            }
        }

        trace!("LR(0) automaton has {} states", states.len());
        Self { states }
    }

    fn goto_kernel(items: &LRItemGraph, from: &BTreeSet<LRItem>, sym: Symbol) -> Vec<LRItem> {
        from.iter()
            .filter(|&&item| items.symbol_after_dot(item) == Some(sym))
            .map(|&item| item.advanced())
            .collect()
    }

    fn closure(
        items: &LRItemGraph,
        by_lhs: &HashMap<crate::symbol::NonterminalId, Vec<usize>>,
        kernel: &[LRItem],
    ) -> BTreeSet<LRItem> {
        let mut closure: BTreeSet<LRItem> = kernel.iter().copied().collect();
        let mut worklist: Vec<LRItem> = kernel.to_vec();
        let mut added_for: std::collections::HashSet<crate::symbol::NonterminalId> =
            std::collections::HashSet::new();

        while let Some(item) = worklist.pop() {
            let Some(Symbol::Nonterminal(n)) = items.symbol_after_dot(item) else {
                continue;
            };
            if !added_for.insert(n) {
                continue;
            }
            if let Some(production_ids) = by_lhs.get(&n) {
                for &pid in production_ids {
                    let new_item = LRItem::initial(pid);
                    if closure.insert(new_item) {
                        worklist.push(new_item);
                    }
                }
            }
        }
        closure
    }
}
