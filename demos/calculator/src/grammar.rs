//! The calculator grammar: assignment statements and arithmetic expressions
//! over integers, with a persistent variable environment across inputs.
//!
//! Terminal names (NAME, NUMBER, PLUS, MINUS, MULTIPLY, DIVIDE, ASSIGN,
//! LPAREN, RPAREN) and precedence levels (`+`/`-` below `*`/`/` below unary
//! minus) follow a conventional calculator grammar. An assignment
//! expression always evaluates to `0`, matching source behavior rather
//! than propagating the assigned value; division guards against a zero
//! divisor rather than panicking.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use lalr::{Assoc, Config, PrecedenceGroup, RuleAlt, SyntaxRule, TerminalDecl};
use lalr_driver::Parser;
use lalr_lexer::Token;

/// A value flowing through the calculator's parse: either a number, or a
/// variable name still awaiting lookup (only ever produced by the `NAME`
/// terminal's leaf rule; every nonterminal's own actions yield `Num`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// An evaluated integer result.
    Num(i64),
    /// A bare identifier, before it's looked up or assigned to.
    Ident(String),
}

impl Value {
    fn as_num(&self) -> Result<i64, String> {
        match self {
            Value::Num(n) => Ok(*n),
            Value::Ident(name) => Err(format!("undefined variable: {name}")),
        }
    }

    fn as_ident(&self) -> &str {
        match self {
            Value::Ident(name) => name,
            Value::Num(_) => panic!("as_ident called on a Num value"),
        }
    }
}

/// Convert a shifted token into its leaf [`Value`], keyed on the terminal's
/// declared name. `NUMBER` text is parsed as an integer here; a `NAME`
/// stays an unresolved `Ident` so that the `NAME ASSIGN expr` production
/// can read it as an lvalue and the bare `NAME` production can look it up
/// as an rvalue. Operators and punctuation are never read by an action.
pub fn token_to_value(parser: &Parser<Value>, tok: &Token) -> Value {
    match parser.terminal_name(tok.terminal) {
        "NUMBER" => Value::Num(tok.text.parse().unwrap_or(0)),
        _ => Value::Ident(tok.text.clone()),
    }
}

/// The variable environment shared by an assignment's action and a bare
/// name's lookup. Shared via `Rc<RefCell<_>>` because both actions are
/// captured into `'static` closures stored in the grammar's productions,
/// independent of the parse that eventually runs them.
pub type Env = Rc<RefCell<HashMap<String, i64>>>;

/// Build the calculator's [`Config`], closing over a fresh, empty `Env`.
pub fn config() -> (Config<Value>, Env) {
    let env: Env = Rc::new(RefCell::new(HashMap::new()));

    let assign_env = env.clone();
    let name_env = env.clone();

    let config = Config {
        terminals: vec![
            TerminalDecl { name: "NAME".into(), pattern: r"[A-Za-z_][A-Za-z0-9_]*".into() },
            TerminalDecl { name: "NUMBER".into(), pattern: r"[0-9]+".into() },
            TerminalDecl { name: "ASSIGN".into(), pattern: r"=".into() },
            TerminalDecl { name: "PLUS".into(), pattern: r"\+".into() },
            TerminalDecl { name: "MINUS".into(), pattern: r"-".into() },
            TerminalDecl { name: "MULTIPLY".into(), pattern: r"\*".into() },
            TerminalDecl { name: "DIVIDE".into(), pattern: r"/".into() },
            TerminalDecl { name: "LPAREN".into(), pattern: r"\(".into() },
            TerminalDecl { name: "RPAREN".into(), pattern: r"\)".into() },
        ],
        refinements: vec![],
        ignored: vec![' ', '\t'],
        precedence: vec![
            PrecedenceGroup { assoc: Assoc::Left, level: 1, terminals: vec!["PLUS".into(), "MINUS".into()] },
            PrecedenceGroup { assoc: Assoc::Left, level: 2, terminals: vec!["MULTIPLY".into(), "DIVIDE".into()] },
            PrecedenceGroup { assoc: Assoc::Left, level: 3, terminals: vec!["UMINUS".into()] },
        ],
        rules: vec![SyntaxRule {
            name: "expr".into(),
            alternatives: vec![
                RuleAlt::new(
                    "NAME ASSIGN expr",
                    Rc::new(move |v: Vec<Value>| {
                        let value = v[2].as_num()?;
                        assign_env.borrow_mut().insert(v[0].as_ident().to_string(), value);
                        Ok(Value::Num(0))
                    }),
                ),
                RuleAlt::new(
                    "expr PLUS expr",
                    Rc::new(|v: Vec<Value>| Ok(Value::Num(v[0].as_num()? + v[2].as_num()?))),
                ),
                RuleAlt::new(
                    "expr MINUS expr",
                    Rc::new(|v: Vec<Value>| Ok(Value::Num(v[0].as_num()? - v[2].as_num()?))),
                ),
                RuleAlt::new(
                    "expr MULTIPLY expr",
                    Rc::new(|v: Vec<Value>| Ok(Value::Num(v[0].as_num()? * v[2].as_num()?))),
                ),
                RuleAlt::new(
                    "expr DIVIDE expr",
                    Rc::new(|v: Vec<Value>| {
                        let divisor = v[2].as_num()?;
                        if divisor == 0 {
                            return Err("division by zero".to_string());
                        }
                        Ok(Value::Num(v[0].as_num()? / divisor))
                    }),
                ),
                RuleAlt::new("MINUS expr %prec UMINUS", Rc::new(|v: Vec<Value>| Ok(Value::Num(-v[1].as_num()?)))),
                RuleAlt::new("LPAREN expr RPAREN", Rc::new(|v: Vec<Value>| Ok(Value::Num(v[1].as_num()?)))),
                RuleAlt::new("NUMBER", Rc::new(|v: Vec<Value>| Ok(Value::Num(v[0].as_num()?)))),
                RuleAlt::new(
                    "NAME",
                    Rc::new(move |v: Vec<Value>| {
                        let name = v[0].as_ident();
                        name_env
                            .borrow()
                            .get(name)
                            .map(|n| Value::Num(*n))
                            .ok_or_else(|| format!("undefined variable: {name}"))
                    }),
                ),
            ],
        }],
    };

    (config, env)
}
