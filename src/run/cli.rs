use anyhow::{Context, Result};
use serde_json::Value;

use crate::tools::{render_summary, ToolFacade, TOOLS};

pub(crate) fn as_cli(args: &[String], tools: &ToolFacade) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => cli_add(&args[2..], tools),
        "list" | "ls" => cli_list(&args[2..], tools),
        "summary" | "s" => cli_summary(&args[2..], tools),
        "call" => cli_call(&args[2..], tools),
        "tools" => {
            cli_tools();
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expense-ledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("expense-ledger — local expense tracker");
    println!();
    println!("Usage: expense-ledger [--db <path>] <command>");
    println!();
    println!("Commands:");
    println!("  add <amount> <category> [description]   Record an expense");
    println!("  list [--limit N]                        List the most recent expenses (default 10)");
    println!("  summary [YYYY-MM]                       Spending by category (default: current month)");
    println!("  call <tool> [json-args]                 Invoke a tool by name");
    println!("  tools                                   List available tools");
    println!("  --help, -h                              Show this help");
    println!("  --version, -V                           Show version");
    println!();
    println!("Environment:");
    println!("  {}    Database file path", crate::config::DB_ENV);
    println!("  {}    Lock wait in milliseconds", crate::config::BUSY_TIMEOUT_ENV);
}

/// Remove a leading global `flag <value>` (before the subcommand) from
/// `args`, returning the value. Later occurrences belong to the subcommand.
pub(crate) fn take_flag(args: &mut Vec<String>, flag: &str) -> Result<Option<String>> {
    if args.get(1).map(String::as_str) != Some(flag) {
        return Ok(None);
    }
    if args.len() < 3 {
        anyhow::bail!("{flag} requires a value");
    }
    let value = args.remove(2);
    args.remove(1);
    Ok(Some(value))
}

fn cli_add(args: &[String], tools: &ToolFacade) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: expense-ledger add <amount> <category> [description]");
    }

    let amount: f64 = args[0]
        .parse()
        .with_context(|| format!("Invalid amount: {}", args[0]))?;
    let category = &args[1];
    let description = args[2..].join(" ");

    println!("{}", tools.add_expense(amount, category, Some(description.as_str()))?);
    Ok(())
}

fn cli_list(args: &[String], tools: &ToolFacade) -> Result<()> {
    let limit = parse_limit(args)?;
    print!("{}", ensure_newline(tools.list_expenses(limit)?));
    Ok(())
}

fn cli_summary(args: &[String], tools: &ToolFacade) -> Result<()> {
    let month = args.first().filter(|a| !a.starts_with('-'));

    let text = match month {
        Some(m) => render_summary(&tools.store().summary_for_month(m)?),
        None => tools.get_monthly_summary()?,
    };
    println!("{text}");
    Ok(())
}

fn cli_call(args: &[String], tools: &ToolFacade) -> Result<()> {
    let Some(name) = args.first() else {
        anyhow::bail!("Usage: expense-ledger call <tool> [json-args]");
    };
    let params = match args.get(1) {
        Some(raw) => serde_json::from_str::<Value>(raw)
            .with_context(|| format!("Arguments for {name} are not valid JSON"))?,
        None => Value::Null,
    };

    print!("{}", ensure_newline(tools.call(name, params)?));
    Ok(())
}

fn cli_tools() {
    println!("{:<22} {:<52} Arguments", "Tool", "Description");
    println!("{}", "─".repeat(100));
    for tool in TOOLS {
        println!("{:<22} {:<52} {}", tool.name, tool.description, tool.arguments);
    }
}

/// `--limit N` or a bare first positional number.
fn parse_limit(args: &[String]) -> Result<Option<i64>> {
    let raw = args
        .windows(2)
        .find(|w| w[0] == "--limit" || w[0] == "-n")
        .map(|w| w[1].as_str())
        .or_else(|| args.first().map(String::as_str).filter(|a| !a.starts_with('-')));

    raw.map(|r| {
        r.parse::<i64>()
            .with_context(|| format!("Invalid limit: {r}"))
    })
    .transpose()
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
