//! A small calculator built on the `lalr` workspace: each positional
//! argument is parsed and evaluated as one expression, in order, against a
//! variable environment shared across the whole run.
//!
//! Run `cargo doc --open` to view this documentation in a browser.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::process::ExitCode;

use clap::Parser as ClapParser;
use colored::Colorize;

mod grammar;

use grammar::{config, token_to_value, Value};

/// Command line arguments accepted by the calculator.
#[derive(Clone, PartialEq, Eq, ClapParser)]
#[command(version, about)]
struct Args {
    /// emit the grammar's ACTION/GOTO table report as Markdown instead of
    /// evaluating any expressions
    #[arg(short, long)]
    report: bool,
    /// display each expression's token stream before its result
    #[arg(short, long)]
    verbose: bool,
    /// expressions to evaluate, in order, left to right
    expressions: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.report {
        let (config, _env) = config();
        return match lalr::build_for_report(config, lalr::ConflictPolicy::Resolve) {
            Ok((grammar, table, warnings)) => {
                for warning in &warnings {
                    eprintln!("{} {}", "[WARN]".yellow(), warning);
                }
                println!("{}", lalr::report::render(&grammar, &table));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{} {}", "[ERROR]".red(), e);
                ExitCode::FAILURE
            }
        };
    }

    if args.expressions.is_empty() {
        eprintln!("{} Missing expressions to evaluate!", "[ERROR]".red());
        return ExitCode::FAILURE;
    }

    let (config, _env) = config();
    let (parser, lexer, warnings) = match lalr::build(config) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red(), e);
            return ExitCode::FAILURE;
        }
    };
    for warning in &warnings {
        eprintln!("{} {}", "[WARN]".yellow(), warning);
    }

    let mut status = ExitCode::SUCCESS;

    for expr in &args.expressions {
        if args.verbose {
            println!("input: {expr}");
        }
        let result = parser.parse(expr, &lexer, |tok| token_to_value(&parser, tok));
        match result {
            Ok(Value::Num(n)) => println!("{n}"),
            Ok(Value::Ident(name)) => {
                eprintln!("{} undefined variable: {name}", "[ERROR]".red());
                status = ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("{} {}", "[ERROR]".red(), e);
                status = ExitCode::FAILURE;
            }
        }
    }

    status
}
