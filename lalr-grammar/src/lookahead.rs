//! The DeRemer–Pennello efficient LALR lookahead algorithm: nonterminal
//! transitions, the `reads`/`includes`/`lookback` relations, and the
//! fixed-point propagation that attaches a lookahead set to every completed
//! item in every state.

use std::collections::{BTreeSet, HashMap};

use log::trace;

use crate::grammar::Grammar;
use crate::items::LRItemGraph;
use crate::lr0::LR0Automaton;
use crate::symbol::{NonterminalId, Symbol};

/// A nonterminal transition `(state, nonterminal)`, the unit the
/// DeRemer–Pennello relations are defined over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transition {
    /// The source state.
    pub state: usize,
    /// The nonterminal whose goto edge this transition follows.
    pub nonterminal: NonterminalId,
}

/// Completed-item lookahead sets, indexed by state and production id.
#[derive(Debug, Default)]
pub struct LookaheadTable {
    by_state: Vec<HashMap<usize, BTreeSet<Symbol>>>,
}

impl LookaheadTable {
    fn with_state_count(n: usize) -> Self {
        Self {
            by_state: (0..n).map(|_| HashMap::new()).collect(),
        }
    }

    /// The lookahead set attached to a completed item `(state, production)`,
    /// or an empty set if the item never appears completed in that state.
    pub fn get(&self, state: usize, production_id: usize) -> BTreeSet<Symbol> {
        self.by_state[state]
            .get(&production_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every `(production_id, lookaheads)` pair completed in a given state.
    pub fn reduce_items(&self, state: usize) -> impl Iterator<Item = (usize, &BTreeSet<Symbol>)> {
        self.by_state[state].iter().map(|(&p, set)| (p, set))
    }

    fn entry(&mut self, state: usize, production_id: usize) -> &mut BTreeSet<Symbol> {
        self.by_state[state].entry(production_id).or_default()
    }
}

/// Computes LALR(1) lookaheads for an already-built LR(0) automaton.
pub struct LookaheadComputer<'g, V> {
    grammar: &'g Grammar<V>,
    automaton: &'g LR0Automaton,
    items: &'g LRItemGraph,
    transition_index: HashMap<Transition, usize>,
    transitions: Vec<Transition>,
}

impl<'g, V> LookaheadComputer<'g, V> {
    /// Prepare a computer over a built automaton. Call [`Self::compute`] to
    /// run the algorithm.
    pub fn new(grammar: &'g Grammar<V>, automaton: &'g LR0Automaton, items: &'g LRItemGraph) -> Self {
        let mut transitions = Vec::new();
        let mut transition_index = HashMap::new();
        for (state_id, state) in automaton.states.iter().enumerate() {
            for (&sym, _) in &state.transitions {
                if let Symbol::Nonterminal(n) = sym {
                    let t = Transition {
                        state: state_id,
                        nonterminal: n,
                    };
                    transition_index.insert(t, transitions.len());
                    transitions.push(t);
                }
            }
        }
        Self {
            grammar,
            automaton,
            items,
            transition_index,
            transitions,
        }
    }

    fn goto(&self, state: usize, sym: Symbol) -> Option<usize> {
        self.automaton.states[state].transitions.get(&sym).copied()
    }

    fn productions_with_lhs(&self, lhs: NonterminalId) -> impl Iterator<Item = &crate::production::Production<V>> {
        self.grammar.productions.iter().filter(move |p| p.lhs == lhs)
    }

    /// DR(p, A): terminals that can be shifted immediately after following
    /// the `(p, A)` transition, read off the kernel items of `goto(p, A)`.
    fn direct_read(&self, t: Transition) -> BTreeSet<Symbol> {
        let target = self.goto(t.state, Symbol::Nonterminal(t.nonterminal)).expect(
            "nonterminal transition recorded from automaton.transitions must have a goto target",
        );
        let mut set = BTreeSet::new();
        for &item in &self.automaton.states[target].kernel {
            if let Some(sym @ (Symbol::Terminal(_) | Symbol::End)) = self.items.symbol_after_dot(item) {
                set.insert(sym);
            }
        }
        if t.state == 0 && t.nonterminal == self.grammar.start {
            set.insert(Symbol::End);
        }
        set
    }

    /// Run the full algorithm, returning the attached lookahead sets.
    pub fn compute(&self) -> LookaheadTable {
        let mut direct_read: HashMap<Transition, BTreeSet<Symbol>> = HashMap::new();
        for &t in &self.transitions {
            direct_read.insert(t, self.direct_read(t));
        }

        // includers[target_idx] = source transition indices (p', B) with
        // (p', B) includes (target).
        let mut includers: Vec<Vec<usize>> = vec![Vec::new(); self.transitions.len()];
        // lookback[idx] = (end_state, production_id) pairs.
        let mut lookback: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.transitions.len()];

        for (idx, &t) in self.transitions.iter().enumerate() {
            for production in self.productions_with_lhs(t.nonterminal) {
                let mut current_state = t.state;
                for k in 0..production.rhs.len() {
                    let sym = production.rhs[k];
                    if let Symbol::Nonterminal(inner) = sym {
                        let suffix_nullable = self.grammar.sequence_nullable(&production.rhs[k + 1..]);
                        if suffix_nullable {
                            let source = Transition {
                                state: current_state,
                                nonterminal: inner,
                            };
                            if let Some(&source_idx) = self.transition_index.get(&source) {
                                includers[idx].push(source_idx);
                            }
                        }
                    }
                    current_state = self
                        .goto(current_state, sym)
                        .expect("walking a production's rhs from its originating state must follow real goto edges");
                }
                lookback[idx].push((current_state, production.id));
            }
        }

        // Fixed-point: F(t) = direct_read(t) U union F(source) for source in includers[t].
        let mut follow: Vec<BTreeSet<Symbol>> = self
            .transitions
            .iter()
            .map(|t| direct_read[t].clone())
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for idx in 0..self.transitions.len() {
                let addition: BTreeSet<Symbol> = includers[idx]
                    .iter()
                    .flat_map(|&src| follow[src].iter().copied())
                    .collect();
                let before = follow[idx].len();
                follow[idx].extend(addition);
                if follow[idx].len() != before {
                    changed = true;
                }
            }
        }

        let mut table = LookaheadTable::with_state_count(self.automaton.states.len());
        for (idx, targets) in lookback.iter().enumerate() {
            for &(state, production_id) in targets {
                table.entry(state, production_id).extend(follow[idx].iter().copied());
            }
        }

        trace!(
            "lookahead fixed-point converged over {} nonterminal transitions",
            self.transitions.len()
        );
        table
    }
}
