//! ACTION/GOTO table assembly with deterministic shift/reduce and
//! reduce/reduce conflict resolution.

use std::collections::HashMap;

use log::{info, warn};

use crate::error::{ConfigError, ConflictPolicy, Warning};
use crate::grammar::Grammar;
use crate::items::LRItemGraph;
use crate::lookahead::LookaheadTable;
use crate::lr0::LR0Automaton;
use crate::precedence::Assoc;
use crate::symbol::{NonterminalId, Symbol, TerminalId};

/// One cell of the ACTION table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Shift the current token and move to the given state.
    Shift(usize),
    /// Reduce by the given production id.
    Reduce(usize),
    /// Accept: the augmented start production has been recognized.
    Accept,
    /// A `NonAssoc` shift/reduce conflict: using this terminal here is a
    /// parse-time error, by grammar design.
    Error,
}

/// The finished ACTION/GOTO tables over an [`LR0Automaton`]'s states.
#[derive(Debug, Default)]
pub struct ParseTable {
    action: Vec<HashMap<TerminalId, Action>>,
    action_end: Vec<Option<Action>>,
    goto: Vec<HashMap<NonterminalId, usize>>,
}

impl ParseTable {
    /// Look up the action for a terminal in a state (`None` is a parse
    /// error: no declared shift, reduce, or accept applies).
    pub fn action(&self, state: usize, terminal: TerminalId) -> Option<Action> {
        self.action[state].get(&terminal).copied()
    }

    /// Look up the action for `$end` in a state.
    pub fn action_end(&self, state: usize) -> Option<Action> {
        self.action_end[state]
    }

    /// Look up the goto target for a nonterminal in a state.
    pub fn goto(&self, state: usize, nonterminal: NonterminalId) -> Option<usize> {
        self.goto[state].get(&nonterminal).copied()
    }

    /// Number of states in the underlying automaton.
    pub fn state_count(&self) -> usize {
        self.action.len()
    }

    /// All terminal actions declared in a state, for diagnostics.
    pub fn state_actions(&self, state: usize) -> impl Iterator<Item = (TerminalId, Action)> + '_ {
        self.action[state].iter().map(|(&t, &a)| (t, a))
    }

    /// All goto entries declared in a state, for diagnostics.
    pub fn state_gotos(&self, state: usize) -> impl Iterator<Item = (NonterminalId, usize)> + '_ {
        self.goto[state].iter().map(|(&n, &s)| (n, s))
    }
}

/// Assembles [`ParseTable`] from a built automaton and its lookaheads.
pub struct TableBuilder<'g, V> {
    grammar: &'g Grammar<V>,
    automaton: &'g LR0Automaton,
    items: &'g LRItemGraph,
    lookaheads: &'g LookaheadTable,
    policy: ConflictPolicy,
}

impl<'g, V> TableBuilder<'g, V> {
    /// Prepare a builder over a grammar's automaton and lookahead sets.
    pub fn new(
        grammar: &'g Grammar<V>,
        automaton: &'g LR0Automaton,
        items: &'g LRItemGraph,
        lookaheads: &'g LookaheadTable,
        policy: ConflictPolicy,
    ) -> Self {
        Self {
            grammar,
            automaton,
            items,
            lookaheads,
            policy,
        }
    }

    /// Build the ACTION/GOTO tables, resolving shift/reduce and
    /// reduce/reduce conflicts by precedence, associativity, and
    /// declaration order. Returns the table and any non-fatal warnings, or
    /// a fatal [`ConfigError`] if `ConflictPolicy::FailFast` hits a
    /// reduce/reduce conflict.
    pub fn build(&self) -> Result<(ParseTable, Vec<Warning>), ConfigError> {
        let n = self.automaton.states.len();
        let mut table = ParseTable {
            action: vec![HashMap::new(); n],
            action_end: vec![None; n],
            goto: vec![HashMap::new(); n],
        };
        let mut warnings = Vec::new();

        for (state_id, state) in self.automaton.states.iter().enumerate() {
            // Shifts and goto, straight from the LR(0) transition function.
            for (&sym, &target) in &state.transitions {
                match sym {
                    Symbol::Terminal(t) => {
                        self.set_terminal_action(
                            &mut table,
                            &mut warnings,
                            state_id,
                            t,
                            Action::Shift(target),
                        )?;
                    }
                    Symbol::End => {
                        table.action_end[state_id] = Some(Action::Shift(target));
                    }
                    Symbol::Nonterminal(n) => {
                        table.goto[state_id].insert(n, target);
                    }
                }
            }

            // Accept: the augmented production completed on `$end`.
            for &item in &state.items {
                if item.production_id == crate::grammar::AUGMENTED_START_ID && self.items.is_complete(item) {
                    table.action_end[state_id] = Some(Action::Accept);
                }
            }

            // Reduces, from the attached LALR lookaheads.
            for (production_id, lookaheads) in self.lookaheads.reduce_items(state_id) {
                if production_id == crate::grammar::AUGMENTED_START_ID {
                    continue;
                }
                for &la in lookaheads {
                    match la {
                        Symbol::Terminal(t) => {
                            self.set_terminal_action(
                                &mut table,
                                &mut warnings,
                                state_id,
                                t,
                                Action::Reduce(production_id),
                            )?;
                        }
                        Symbol::End => {
                            self.set_end_action(&mut table, &mut warnings, state_id, production_id)?;
                        }
                        Symbol::Nonterminal(_) => unreachable!("lookahead sets only ever contain terminal-like symbols"),
                    }
                }
            }
        }

        info!("assembled parse table over {n} states");
        Ok((table, warnings))
    }

    fn set_terminal_action(
        &self,
        table: &mut ParseTable,
        warnings: &mut Vec<Warning>,
        state: usize,
        terminal: TerminalId,
        proposed: Action,
    ) -> Result<(), ConfigError> {
        match table.action[state].get(&terminal).copied() {
            None => {
                table.action[state].insert(terminal, proposed);
            }
            Some(existing) => {
                let resolved = self.resolve(state, terminal, existing, proposed, warnings)?;
                table.action[state].insert(terminal, resolved);
            }
        }
        Ok(())
    }

    fn set_end_action(
        &self,
        table: &mut ParseTable,
        warnings: &mut Vec<Warning>,
        state: usize,
        production_id: usize,
    ) -> Result<(), ConfigError> {
        match table.action_end[state] {
            None => table.action_end[state] = Some(Action::Reduce(production_id)),
            Some(Action::Reduce(other)) => {
                let resolved = self.resolve_reduce_reduce(state, "$end", other, production_id, warnings)?;
                table.action_end[state] = Some(Action::Reduce(resolved));
            }
            Some(Action::Accept) => {
                // The augmented item always wins; $end after a completed
                // start symbol is unambiguous by construction.
            }
            Some(_) => unreachable!("$end is never shifted except by the augmented production"),
        }
        Ok(())
    }

    fn resolve(
        &self,
        state: usize,
        terminal: TerminalId,
        existing: Action,
        proposed: Action,
        warnings: &mut Vec<Warning>,
    ) -> Result<Action, ConfigError> {
        match (existing, proposed) {
            (Action::Shift(a), Action::Shift(b)) => {
                if a != b {
                    panic!("internal invariant violated: state {state} proposes shifting {terminal:?} to both {a} and {b}");
                }
                Ok(existing)
            }
            (Action::Shift(_), Action::Reduce(p)) | (Action::Reduce(p), Action::Shift(_)) => {
                self.resolve_shift_reduce(state, terminal, p, warnings)
            }
            (Action::Reduce(a), Action::Reduce(b)) => {
                let name = self.grammar.symbols.terminal_name(terminal).to_string();
                let winner = self.resolve_reduce_reduce(state, &name, a, b, warnings)?;
                Ok(Action::Reduce(winner))
            }
            _ => panic!("internal invariant violated: unexpected action pair in state {state} on {terminal:?}"),
        }
    }

    fn resolve_shift_reduce(
        &self,
        state: usize,
        terminal: TerminalId,
        reduce_production: usize,
        warnings: &mut Vec<Warning>,
    ) -> Result<Action, ConfigError> {
        let shift_target = self.automaton.states[state]
            .transitions
            .get(&Symbol::Terminal(terminal))
            .copied()
            .expect("a shift/reduce conflict implies a shift action exists for this terminal");

        let shift_prec = self.grammar.terminal_precedence(terminal);
        let production = &self.grammar.productions[reduce_production];
        let reduce_prec = if production.prec_level == 0 {
            None
        } else {
            Some((production.prec_level, self.grammar.production_assoc(production)))
        };

        let name = self.grammar.symbols.terminal_name(terminal).to_string();

        let resolution = match (shift_prec, reduce_prec) {
            (Some((sl, _)), Some((rl, _))) if rl > sl => {
                warnings.push(Warning::ShiftReduceConflict {
                    state,
                    terminal: name,
                    resolution: format!("reduce (production {reduce_production} precedence {rl} > shift precedence {sl})"),
                });
                return Ok(Action::Reduce(reduce_production));
            }
            (Some((sl, _)), Some((rl, _))) if sl > rl => {
                format!("shift (shift precedence {sl} > production {reduce_production} precedence {rl})")
            }
            (Some((sl, assoc)), Some((rl, _))) if sl == rl => match assoc {
                Assoc::Left => {
                    warnings.push(Warning::ShiftReduceConflict {
                        state,
                        terminal: name,
                        resolution: format!("reduce (left-associative at precedence {sl})"),
                    });
                    return Ok(Action::Reduce(reduce_production));
                }
                Assoc::Right => format!("shift (right-associative at precedence {sl})"),
                Assoc::NonAssoc => {
                    warnings.push(Warning::ShiftReduceConflict {
                        state,
                        terminal: name,
                        resolution: "error (nonassoc)".to_string(),
                    });
                    return Ok(Action::Error);
                }
            },
            _ => "shift (no declared precedence on one or both sides)".to_string(),
        };

        warnings.push(Warning::ShiftReduceConflict {
            state,
            terminal: name,
            resolution,
        });
        Ok(Action::Shift(shift_target))
    }

    fn resolve_reduce_reduce(
        &self,
        state: usize,
        lookahead: &str,
        a: usize,
        b: usize,
        warnings: &mut Vec<Warning>,
    ) -> Result<usize, ConfigError> {
        let (winner, loser) = if a < b { (a, b) } else { (b, a) };
        match self.policy {
            ConflictPolicy::FailFast => Err(ConfigError::ReduceReduceConflict {
                state,
                lookahead: lookahead.to_string(),
                productions: vec![winner, loser],
            }),
            ConflictPolicy::Resolve => {
                warn!("reduce/reduce conflict in state {state} on {lookahead}: keeping production {winner} over {loser}");
                warnings.push(Warning::ReduceReduceConflict {
                    state,
                    lookahead: lookahead.to_string(),
                    productions: vec![winner, loser],
                });
                Ok(winner)
            }
        }
    }
}
