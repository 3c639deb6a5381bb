//! Grammar assembly: augmenting the start rule, parsing rule alternatives,
//! static checks, and the nullable/FIRST/FOLLOW fixed-points.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, trace};

use crate::error::{ConfigError, Warning};
use crate::items::LRItemGraph;
use crate::precedence::{Assoc, PrecedenceGroup, PrecedenceTable};
use crate::production::{Action, Production};
use crate::symbol::{NonterminalId, Symbol, SymbolTable, TerminalId};

/// One alternative of a rule: a whitespace-separated rhs (possibly ending
/// in `%prec TAG`) and its semantic action.
pub struct RuleAlt<V> {
    /// e.g. `"expr PLUS expr"` or `"MINUS expr %prec UMINUS"`.
    pub rhs: String,
    /// Invoked on reduce with the popped rhs values, in order.
    pub action: Option<Action<V>>,
}

impl<V> RuleAlt<V> {
    /// Construct an alternative with an action.
    pub fn new(rhs: impl Into<String>, action: Action<V>) -> Self {
        Self {
            rhs: rhs.into(),
            action: Some(action),
        }
    }

    /// Construct an alternative with no action (the popped single value, if
    /// any, is passed through unchanged by the driver).
    pub fn passthrough(rhs: impl Into<String>) -> Self {
        Self {
            rhs: rhs.into(),
            action: None,
        }
    }
}

/// A nonterminal and its alternatives, as supplied by the grammar author.
pub struct SyntaxRule<V> {
    /// The nonterminal being defined.
    pub name: String,
    /// One or more alternative right-hand sides.
    pub alternatives: Vec<RuleAlt<V>>,
}

/// Everything [`Grammar::build`] needs: terminal names (sourced from the
/// lexer's terminal map, see `lalr-lexer`), keyword refinements, precedence
/// groups, and syntax rules. The first rule's name becomes the start
/// symbol.
pub struct GrammarSpec<V> {
    /// Declared terminal names, in the order the lexer will try them.
    pub terminals: Vec<String>,
    /// `(base, refined, literal)` triples; `base` must be in `terminals`.
    pub refinements: Vec<(String, String, String)>,
    /// Ordered precedence groups.
    pub precedence: Vec<PrecedenceGroup>,
    /// Syntax rules; the first rule's name is the start symbol.
    pub rules: Vec<SyntaxRule<V>>,
}

/// The fully analyzed grammar: productions, symbol table, precedence table,
/// and the nullable/FIRST/FOLLOW fixed-points.
pub struct Grammar<V> {
    /// Declared terminals and nonterminals.
    pub symbols: SymbolTable,
    /// Resolved precedence table.
    pub precedence: PrecedenceTable,
    /// All productions, including the augmented production 0.
    pub productions: Vec<Production<V>>,
    /// The (pre-augmentation) start nonterminal.
    pub start: NonterminalId,
    /// Precomputed item chains, shared by the LR(0) automaton.
    pub items: LRItemGraph,
    nullable: HashSet<NonterminalId>,
    first_sets: HashMap<NonterminalId, BTreeSet<Symbol>>,
    follow_sets: HashMap<NonterminalId, BTreeSet<Symbol>>,
}

/// The augmented start production is always at index 0.
pub const AUGMENTED_START_ID: usize = 0;

impl<V> Grammar<V> {
    /// Build and statically check a grammar, returning it along with any
    /// non-fatal warnings, or a [`ConfigError`] if construction cannot
    /// proceed.
    pub fn build(spec: GrammarSpec<V>) -> Result<(Self, Vec<Warning>), ConfigError> {
        let mut symbols = SymbolTable::new();
        for name in &spec.terminals {
            crate::symbol::SymbolTable::check_name(name)?;
            symbols.intern_terminal(name);
        }

        let mut precedence = PrecedenceTable::new(&spec.precedence)?;

        for (base, refined, literal) in &spec.refinements {
            symbols.add_refinement(base, refined, literal)?;
        }

        if spec.rules.is_empty() {
            return Err(ConfigError::UndefinedSymbol {
                rule: "<grammar>".to_string(),
                symbol: "<no rules declared>".to_string(),
            });
        }
        let start_name = spec.rules[0].name.clone();

        // Pre-register every rule's lhs as a nonterminal so that forward
        // references within rhs strings resolve.
        for rule in &spec.rules {
            crate::symbol::SymbolTable::check_name(&rule.name)?;
            if symbols.terminal(&rule.name).is_some() {
                return Err(ConfigError::Symbol(
                    crate::symbol::SymbolError::DuplicateRuleAndTerminalName(rule.name.clone()),
                ));
            }
            symbols.intern_nonterminal(&rule.name);
        }

        // Every nonterminal id that exists at this point came from a real
        // rule lhs. `parse_alternative` below mints a fresh nonterminal id
        // for any rhs token that isn't a declared terminal or lhs name, so
        // any id minted after this point is, by construction, undefined.
        let declared_nonterminals: HashSet<NonterminalId> = symbols.nonterminal_ids().collect();

        let start = symbols.nonterminal(&start_name).unwrap();

        let mut productions: Vec<Production<V>> = Vec::new();
        // Production 0: S' -> start $end
        productions.push(Production {
            id: AUGMENTED_START_ID,
            lhs: symbols.intern_nonterminal("S'"),
            rhs: vec![Symbol::Nonterminal(start), Symbol::End],
            prec_level: 0,
            action: None,
        });

        let mut canonical_forms: HashSet<String> = HashSet::new();
        let mut warnings = Vec::new();

        for rule in spec.rules {
            for alt in rule.alternatives {
                let production = Self::parse_alternative(
                    &mut symbols,
                    &mut precedence,
                    &rule.name,
                    alt,
                    productions.len(),
                )?;

                let canon = production.canonical_form(&rule.name, |s| symbols.symbol_name(s));
                if !canonical_forms.insert(canon.clone()) {
                    return Err(ConfigError::DuplicateProduction(canon));
                }
                productions.push(production);
            }
        }

        // Nonterminal ids minted by `parse_alternative` for rhs tokens that
        // matched neither a terminal nor a declared lhs: these are the
        // phantom nonterminals behind an `UndefinedSymbol` warning, and must
        // not also fail the whole build as `NonTerminating` (they trivially
        // have no productions, so they can never derive a terminal string).
        let undefined_nonterminals: HashSet<NonterminalId> = symbols
            .nonterminal_ids()
            .filter(|n| !declared_nonterminals.contains(n))
            .collect();

        Self::check_undefined_symbols(&symbols, &productions, &undefined_nonterminals, &mut warnings);
        Self::check_unused_terminals(&symbols, &productions, &mut warnings);
        Self::check_unused_and_unreachable_rules(&symbols, &productions, start, &mut warnings);
        for name in precedence.unused() {
            warnings.push(Warning::UnusedPrecedence(name.to_string()));
        }

        let rhs_by_production: Vec<Vec<Symbol>> =
            productions.iter().map(|p| p.rhs.clone()).collect();
        let items = LRItemGraph::new(&rhs_by_production);

        let nullable = Self::compute_nullable(&productions);
        Self::check_non_terminating(&symbols, &productions, &nullable, &undefined_nonterminals)?;

        let mut grammar = Self {
            symbols,
            precedence,
            productions,
            start,
            items,
            nullable,
            first_sets: HashMap::new(),
            follow_sets: HashMap::new(),
        };
        grammar.compute_first_sets();
        grammar.compute_follow_sets();

        Ok((grammar, warnings))
    }

    fn parse_alternative(
        symbols: &mut SymbolTable,
        precedence: &mut PrecedenceTable,
        rule_name: &str,
        alt: RuleAlt<V>,
        next_id: usize,
    ) -> Result<Production<V>, ConfigError> {
        let mut tokens: Vec<&str> = alt.rhs.split_whitespace().collect();

        let mut prec_level = 0u32;
        let mut has_explicit_prec = false;

        if let Some(pos) = tokens.iter().position(|t| *t == "%prec") {
            if pos != tokens.len() - 2 {
                return Err(ConfigError::MalformedPrec {
                    rule: rule_name.to_string(),
                });
            }
            let tag = tokens[tokens.len() - 1];
            let entry = precedence.lookup_name(tag).ok_or_else(|| ConfigError::UndefinedPrecTag {
                rule: rule_name.to_string(),
                tag: tag.to_string(),
            })?;
            precedence.mark_used(tag);
            prec_level = entry.level;
            has_explicit_prec = true;
            tokens.truncate(pos);
        }

        let lhs = symbols.intern_nonterminal(rule_name);
        let mut rhs = Vec::with_capacity(tokens.len());
        let mut rightmost_terminal: Option<TerminalId> = None;
        for tok in &tokens {
            let sym = match symbols.terminal(tok) {
                Some(t) => {
                    rightmost_terminal = Some(t);
                    Symbol::Terminal(t)
                }
                None => Symbol::Nonterminal(symbols.intern_nonterminal(tok)),
            };
            rhs.push(sym);
        }

        if !has_explicit_prec {
            if let Some(t) = rightmost_terminal {
                let name = symbols.terminal_name(t).to_string();
                precedence.bind_terminal(&name, t);
                if let Some(entry) = precedence.lookup_terminal(t) {
                    precedence.mark_used(&name);
                    prec_level = entry.level;
                }
            }
        }

        Ok(Production {
            id: next_id,
            lhs,
            rhs,
            prec_level,
            action: alt.action,
        })
    }

    fn check_undefined_symbols(
        symbols: &SymbolTable,
        productions: &[Production<V>],
        undefined: &HashSet<NonterminalId>,
        warnings: &mut Vec<Warning>,
    ) {
        for production in &productions[1..] {
            let rule_name = symbols.nonterminal_name(production.lhs).to_string();
            for sym in &production.rhs {
                if let Symbol::Nonterminal(n) = sym {
                    if undefined.contains(n) {
                        warnings.push(Warning::UndefinedSymbol {
                            rule: rule_name.clone(),
                            symbol: symbols.nonterminal_name(*n).to_string(),
                        });
                    }
                }
            }
        }
    }

    fn check_unused_terminals(
        symbols: &SymbolTable,
        productions: &[Production<V>],
        warnings: &mut Vec<Warning>,
    ) {
        let mut used: HashSet<TerminalId> = HashSet::new();
        for production in productions {
            for sym in &production.rhs {
                if let Symbol::Terminal(t) = sym {
                    used.insert(*t);
                }
            }
        }
        for t in symbols.terminal_ids() {
            if !used.contains(&t) {
                warnings.push(Warning::UnusedTerminal(symbols.terminal_name(t).to_string()));
            }
        }
    }

    fn check_unused_and_unreachable_rules(
        symbols: &SymbolTable,
        productions: &[Production<V>],
        start: NonterminalId,
        warnings: &mut Vec<Warning>,
    ) {
        let mut referenced: HashSet<NonterminalId> = HashSet::new();
        for production in productions {
            for sym in &production.rhs {
                if let Symbol::Nonterminal(n) = sym {
                    referenced.insert(*n);
                }
            }
        }
        for n in symbols.nonterminal_ids() {
            if n != start && !referenced.contains(&n) && symbols.nonterminal_name(n) != "S'" {
                warnings.push(Warning::UnusedRule(symbols.nonterminal_name(n).to_string()));
            }
        }

        // reachability via BFS over rhs nonterminals starting at `start`
        let mut reachable: HashSet<NonterminalId> = HashSet::new();
        let mut worklist = vec![start];
        reachable.insert(start);
        while let Some(n) = worklist.pop() {
            for production in productions {
                if production.lhs != n {
                    continue;
                }
                for sym in &production.rhs {
                    if let Symbol::Nonterminal(m) = sym {
                        if reachable.insert(*m) {
                            worklist.push(*m);
                        }
                    }
                }
            }
        }
        for n in symbols.nonterminal_ids() {
            if !reachable.contains(&n) && symbols.nonterminal_name(n) != "S'" {
                warnings.push(Warning::UnreachableRule(symbols.nonterminal_name(n).to_string()));
            }
        }
    }

    fn compute_nullable(productions: &[Production<V>]) -> HashSet<NonterminalId> {
        let mut nullable = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for production in productions {
                if nullable.contains(&production.lhs) {
                    continue;
                }
                let all_nullable = production
                    .rhs
                    .iter()
                    .all(|s| matches!(s, Symbol::Nonterminal(n) if nullable.contains(n)));
                if all_nullable {
                    nullable.insert(production.lhs);
                    changed = true;
                }
            }
        }
        nullable
    }

    fn check_non_terminating(
        symbols: &SymbolTable,
        productions: &[Production<V>],
        nullable: &HashSet<NonterminalId>,
        undefined: &HashSet<NonterminalId>,
    ) -> Result<(), ConfigError> {
        // A nonterminal "derives a terminal string" if some fixed point of
        // "every rhs symbol is either a terminal or already known to derive
        // a terminal string" includes it. Nullable nonterminals trivially
        // derive the empty (terminal) string.
        let mut terminating: HashSet<NonterminalId> = nullable.clone();
        let mut changed = true;
        while changed {
            changed = false;
            for production in productions {
                if terminating.contains(&production.lhs) {
                    continue;
                }
                let ok = production.rhs.iter().all(|s| match s {
                    Symbol::Terminal(_) | Symbol::End => true,
                    Symbol::Nonterminal(n) => terminating.contains(n),
                });
                if ok {
                    terminating.insert(production.lhs);
                    changed = true;
                }
            }
        }

        let bad: Vec<String> = symbols
            .nonterminal_ids()
            .filter(|n| {
                !terminating.contains(n) && symbols.nonterminal_name(*n) != "S'" && !undefined.contains(n)
            })
            .map(|n| symbols.nonterminal_name(n).to_string())
            .collect();

        if bad.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::NonTerminating(bad))
        }
    }

    /// Whether a symbol can derive the empty string (always false for
    /// terminals and `$end`).
    pub fn is_nullable(&self, sym: Symbol) -> bool {
        match sym {
            Symbol::Nonterminal(n) => self.nullable.contains(&n),
            _ => false,
        }
    }

    fn first_of_sequence_into(&self, seq: &[Symbol], out: &mut BTreeSet<Symbol>) -> bool {
        for sym in seq {
            match sym {
                Symbol::Terminal(_) | Symbol::End => {
                    out.insert(*sym);
                    return false;
                }
                Symbol::Nonterminal(n) => {
                    out.extend(self.first_sets.get(n).into_iter().flatten().copied());
                    if !self.nullable.contains(n) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// FIRST(α) for an arbitrary symbol sequence (terminals included
    /// verbatim, nonterminals expanded). Used by closure and by the
    /// DeRemer–Pennello READ computation.
    pub fn first_of_sequence(&self, seq: &[Symbol]) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.first_of_sequence_into(seq, &mut out);
        out
    }

    /// Whether every symbol of `seq` is nullable (vacuously true for an
    /// empty sequence).
    pub fn sequence_nullable(&self, seq: &[Symbol]) -> bool {
        seq.iter().all(|s| self.is_nullable(*s))
    }

    fn compute_first_sets(&mut self) {
        for n in self.symbols.nonterminal_ids() {
            self.first_sets.insert(n, BTreeSet::new());
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                let mut addition = BTreeSet::new();
                self.first_of_sequence_into(&production.rhs, &mut addition);
                let set = self.first_sets.get_mut(&production.lhs).unwrap();
                let before = set.len();
                set.extend(addition);
                if set.len() != before {
                    changed = true;
                }
            }
        }
        trace!("FIRST sets converged over {} nonterminals", self.symbols.nonterminal_count());
    }

    fn compute_follow_sets(&mut self) {
        for n in self.symbols.nonterminal_ids() {
            self.follow_sets.insert(n, BTreeSet::new());
        }
        self.follow_sets.get_mut(&self.start).unwrap().insert(Symbol::End);

        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                for (i, sym) in production.rhs.iter().enumerate() {
                    let Symbol::Nonterminal(n) = sym else {
                        continue;
                    };
                    let beta = &production.rhs[i + 1..];
                    let mut addition = self.first_of_sequence(beta);
                    let beta_nullable = self.sequence_nullable(beta);
                    if beta_nullable {
                        addition.extend(self.follow_sets.get(&production.lhs).into_iter().flatten().copied());
                    }
                    let set = self.follow_sets.get_mut(n).unwrap();
                    let before = set.len();
                    set.extend(addition);
                    if set.len() != before {
                        changed = true;
                    }
                }
            }
        }
        debug!("FOLLOW sets converged over {} nonterminals", self.symbols.nonterminal_count());
    }

    /// FIRST(N) for a nonterminal, after construction.
    pub fn first(&self, n: NonterminalId) -> &BTreeSet<Symbol> {
        &self.first_sets[&n]
    }

    /// FOLLOW(N) for a nonterminal, after construction.
    pub fn follow(&self, n: NonterminalId) -> &BTreeSet<Symbol> {
        &self.follow_sets[&n]
    }

    /// Resolve a production's effective associativity, used when its
    /// precedence level ties with a shift terminal's. Defaults to
    /// [`Assoc::Left`] when the production's rightmost terminal carries no
    /// declared group.
    pub fn production_assoc(&self, production: &Production<V>) -> Assoc {
        production
            .rhs
            .iter()
            .rev()
            .find_map(|s| match s {
                Symbol::Terminal(t) => self.precedence.lookup_terminal(*t),
                _ => None,
            })
            .map(|e| e.assoc)
            .unwrap_or(Assoc::Left)
    }

    /// Warn-free accessor used by `TableBuilder`: the declared precedence of
    /// a terminal, if any.
    pub fn terminal_precedence(&self, t: TerminalId) -> Option<(u32, Assoc)> {
        self.precedence.lookup_terminal(t).map(|e| (e.level, e.assoc))
    }
}
