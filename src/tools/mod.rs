//! Named tools over the ledger store.
//!
//! Every tool takes typed arguments, applies defaults, calls exactly one
//! store operation and returns a single block of text.

mod render;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::db::LedgerStore;
use crate::error::{LedgerError, Result};

pub(crate) use render::render_summary;

pub(crate) const DEFAULT_LIMIT: i64 = 10;

pub(crate) struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: &'static str,
}

pub(crate) const TOOLS: &[ToolInfo] = &[
    ToolInfo {
        name: "add_expense",
        description: "Add a new expense to the tracker",
        arguments: "amount: number, category: text, description: text = \"\"",
    },
    ToolInfo {
        name: "list_expenses",
        description: "List the most recent expenses",
        arguments: "limit: integer = 10",
    },
    ToolInfo {
        name: "get_monthly_summary",
        description: "Get a summary of spending grouped by category for the current month",
        arguments: "(none)",
    },
];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AddExpenseArgs {
    amount: f64,
    category: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListExpensesArgs {
    #[serde(default = "default_limit")]
    limit: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Stateless translation layer between tool calls and the store.
pub(crate) struct ToolFacade {
    store: LedgerStore,
}

impl ToolFacade {
    pub(crate) fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Dispatch a tool by name. `null` arguments mean "all defaults".
    pub(crate) fn call(&self, name: &str, args: Value) -> Result<String> {
        debug!(tool = name, "tool call");
        let args = if args.is_null() {
            Value::Object(Default::default())
        } else {
            args
        };

        match name {
            "add_expense" => {
                let a: AddExpenseArgs = parse_args(name, args)?;
                self.add_expense(a.amount, &a.category, Some(a.description.as_str()))
            }
            "list_expenses" => {
                let a: ListExpensesArgs = parse_args(name, args)?;
                self.list_expenses(Some(a.limit))
            }
            "get_monthly_summary" => {
                let _: NoArgs = parse_args(name, args)?;
                self.get_monthly_summary()
            }
            other => Err(LedgerError::UnknownTool(other.to_string())),
        }
    }

    pub(crate) fn add_expense(
        &self,
        amount: f64,
        category: &str,
        description: Option<&str>,
    ) -> Result<String> {
        if !amount.is_finite() {
            return Err(reject(format!("amount must be a finite number, got {amount}")));
        }
        if category.trim().is_empty() {
            return Err(reject("category must not be empty".into()));
        }
        let expense = self
            .store
            .record(amount, category, description.unwrap_or_default())?;
        Ok(render::render_confirmation(&expense))
    }

    pub(crate) fn list_expenses(&self, limit: Option<i64>) -> Result<String> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let limit = u32::try_from(limit)
            .ok()
            .filter(|l| *l > 0)
            .ok_or_else(|| reject(format!("limit must be a positive integer, got {limit}")))?;
        let expenses = self.store.recent(limit)?;
        Ok(render::render_listing(&expenses))
    }

    pub(crate) fn get_monthly_summary(&self) -> Result<String> {
        let summary = self.store.monthly_summary()?;
        Ok(render::render_summary(&summary))
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| reject(format!("{tool}: {e}")))
}

fn reject(msg: String) -> LedgerError {
    warn!(reason = %msg, "rejected tool arguments");
    LedgerError::InvalidArgument(msg)
}
