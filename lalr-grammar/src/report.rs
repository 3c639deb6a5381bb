//! Markdown diagnostics report: a read-only rendering of an already-built
//! grammar and parse table, not part of the parse contract.

use std::fmt::Write as _;

use crate::grammar::Grammar;
use crate::symbol::Symbol;
use crate::table::{Action, ParseTable};

/// Render a grammar and its parse table as a Markdown audit document.
///
/// State anchors are `S<i>`, production anchors are `P<i>`. ACTION cells are
/// encoded `s<j>` (shift), `r<i>` (reduce), `accepted`, or `none` (a
/// declared `NonAssoc` parse error).
pub fn render<V>(grammar: &Grammar<V>, table: &ParseTable) -> String {
    let mut out = String::new();

    writeln!(out, "# Grammar report\n").unwrap();

    writeln!(out, "## Terminals\n").unwrap();
    writeln!(out, "| terminal | used in productions |").unwrap();
    writeln!(out, "|---|---|").unwrap();
    for t in grammar.symbols.terminal_ids() {
        let users: Vec<String> = grammar
            .productions
            .iter()
            .filter(|p| p.rhs.contains(&Symbol::Terminal(t)))
            .map(|p| format!("[P{}](#p{})", p.id, p.id))
            .collect();
        writeln!(
            out,
            "| `{}` | {} |",
            grammar.symbols.terminal_name(t),
            if users.is_empty() { "—".to_string() } else { users.join(", ") }
        )
        .unwrap();
    }

    writeln!(out, "\n## Nonterminals\n").unwrap();
    for n in grammar.symbols.nonterminal_ids() {
        writeln!(out, "- `{}`", grammar.symbols.nonterminal_name(n)).unwrap();
    }

    writeln!(out, "\n## Productions\n").unwrap();
    for production in &grammar.productions {
        let rhs: Vec<String> = production
            .rhs
            .iter()
            .map(|&s| grammar.symbols.symbol_name(s))
            .collect();
        writeln!(
            out,
            "<a name=\"p{}\"></a>`P{}`: `{} -> {}` (precedence {})",
            production.id,
            production.id,
            grammar.symbols.nonterminal_name(production.lhs),
            if rhs.is_empty() { "<empty>".to_string() } else { rhs.join(" ") },
            production.prec_level,
        )
        .unwrap();
        writeln!(out).unwrap();
    }

    writeln!(out, "\n## ACTION / GOTO tables\n").unwrap();
    for state in 0..table.state_count() {
        writeln!(out, "<a name=\"s{state}\"></a>### State {state}\n").unwrap();
        writeln!(out, "| terminal | action |").unwrap();
        writeln!(out, "|---|---|").unwrap();
        let mut rows: Vec<(String, Action)> = table
            .state_actions(state)
            .map(|(t, a)| (grammar.symbols.terminal_name(t).to_string(), a))
            .collect();
        if let Some(end_action) = table.action_end(state) {
            rows.push(("$end".to_string(), end_action));
        }
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, action) in rows {
            writeln!(out, "| `{name}` | {} |", encode_action(action)).unwrap();
        }

        writeln!(out, "\n| nonterminal | goto |").unwrap();
        writeln!(out, "|---|---|").unwrap();
        let mut gotos: Vec<(String, usize)> = table
            .state_gotos(state)
            .map(|(n, s)| (grammar.symbols.nonterminal_name(n).to_string(), s))
            .collect();
        gotos.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, target) in gotos {
            writeln!(out, "| `{name}` | [S{target}](#s{target}) |").unwrap();
        }
        writeln!(out).unwrap();
    }

    out
}

fn encode_action(action: Action) -> String {
    match action {
        Action::Shift(s) => format!("`s{s}` ([S{s}](#s{s}))"),
        Action::Reduce(p) => format!("`r{p}` ([P{p}](#p{p}))"),
        Action::Accept => "`accepted`".to_string(),
        Action::Error => "`none`".to_string(),
    }
}
