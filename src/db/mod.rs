mod schema;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::models::*;

/// File-backed expense table.
///
/// Holds no connection between calls: every operation opens a connection,
/// runs one statement and drops it, so concurrent writers are serialized by
/// SQLite's own locking and wait at most `busy_timeout`.
#[derive(Debug, Clone)]
pub(crate) struct LedgerStore {
    config: LedgerConfig,
}

impl LedgerStore {
    pub(crate) fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    pub(crate) fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Ensure the `expenses` table exists. Safe to call on every start.
    pub(crate) fn init(&self) -> Result<()> {
        self.config.ensure_parent_dir()?;
        let conn = self.connect()?;
        conn.execute_batch(schema::SCHEMA)?;
        info!(path = %self.config.db_path().display(), "expense schema ready");
        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        let path = self.config.db_path();
        debug!(path = %path.display(), "opening ledger connection");
        let conn = Connection::open(path)?;
        conn.busy_timeout(self.config.busy_timeout)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(conn)
    }

    // ── Writes ────────────────────────────────────────────────

    /// Append one expense stamped with the current local time.
    pub(crate) fn record(&self, amount: f64, category: &str, description: &str) -> Result<Expense> {
        self.record_at(amount, category, description, Local::now().naive_local())
    }

    pub(crate) fn record_at(
        &self,
        amount: f64,
        category: &str,
        description: &str,
        timestamp: NaiveDateTime,
    ) -> Result<Expense> {
        let date = timestamp.format(DATE_FORMAT).to_string();
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO expenses (amount, category, description, date) VALUES (?1, ?2, ?3, ?4)",
            params![amount, category, description, date],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, amount, category, "expense recorded");
        Ok(Expense {
            id,
            amount,
            category: category.to_string(),
            description: description.to_string(),
            date,
        })
    }

    // ── Reads ─────────────────────────────────────────────────

    /// The `limit` most recent expenses, newest first. Equal timestamps fall
    /// back to identity, highest first.
    pub(crate) fn recent(&self, limit: u32) -> Result<Vec<Expense>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, amount, category, COALESCE(description, ''), date
             FROM expenses
             ORDER BY date DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![i64::from(limit)], |row| {
            Ok(Expense {
                id: row.get(0)?,
                amount: row.get(1)?,
                category: row.get(2)?,
                description: row.get(3)?,
                date: row.get(4)?,
            })
        })?;
        let expenses = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(limit, returned = expenses.len(), "listed recent expenses");
        Ok(expenses)
    }

    /// Spending by category for the current local month.
    pub(crate) fn monthly_summary(&self) -> Result<MonthlySummary> {
        let month = Local::now().format(MONTH_FORMAT).to_string();
        self.summary_for_month(&month)
    }

    /// Spending by category for `month` (`YYYY-MM`), categories in byte order.
    pub(crate) fn summary_for_month(&self, month: &str) -> Result<MonthlySummary> {
        validate_month(month)?;
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount)
             FROM expenses
             WHERE date LIKE ?1
             GROUP BY category
             ORDER BY category",
        )?;
        let rows = stmt.query_map(params![format!("{month}%")], |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                amount: row.get(1)?,
            })
        })?;
        let categories = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(month, categories = categories.len(), "summarized month");
        Ok(MonthlySummary {
            month: month.to_string(),
            categories,
        })
    }
}

fn validate_month(month: &str) -> Result<()> {
    let well_formed = month.len() == 7
        && NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(LedgerError::InvalidArgument(format!(
            "month must be YYYY-MM, got '{month}'"
        )))
    }
}

#[cfg(test)]
mod tests;
