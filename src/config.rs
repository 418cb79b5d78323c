use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

pub(crate) const DB_ENV: &str = "EXPENSE_LEDGER_DB";
pub(crate) const BUSY_TIMEOUT_ENV: &str = "EXPENSE_LEDGER_BUSY_TIMEOUT_MS";
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the ledger lives and how long a call waits on a locked database.
#[derive(Debug, Clone)]
pub(crate) struct LedgerConfig {
    pub db_path: PathBuf,
    pub busy_timeout: Duration,
}

impl LedgerConfig {
    pub(crate) fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub(crate) fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Resolve the config: explicit path, then `EXPENSE_LEDGER_DB`, then the
    /// platform data directory.
    pub(crate) fn resolve(explicit: Option<&str>) -> anyhow::Result<Self> {
        Self::resolve_from(
            explicit,
            std::env::var(DB_ENV).ok(),
            std::env::var(BUSY_TIMEOUT_ENV).ok(),
            default_db_path,
        )
    }

    fn resolve_from(
        explicit: Option<&str>,
        env_db: Option<String>,
        env_busy_timeout: Option<String>,
        data_dir_path: impl FnOnce() -> anyhow::Result<PathBuf>,
    ) -> anyhow::Result<Self> {
        let db_path = match (explicit, env_db) {
            (Some(p), _) => PathBuf::from(shellexpand(p)),
            (None, Some(p)) if !p.is_empty() => PathBuf::from(shellexpand(&p)),
            _ => data_dir_path()?,
        };

        let mut config = Self::new(db_path);
        if let Some(ms) = env_busy_timeout {
            let ms: u64 = ms
                .parse()
                .map_err(|_| anyhow::anyhow!("{BUSY_TIMEOUT_ENV} must be a number of milliseconds, got '{ms}'"))?;
            config = config.with_busy_timeout(Duration::from_millis(ms));
        }
        Ok(config)
    }

    /// Create the parent directory of the database file if it is missing.
    pub(crate) fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub(crate) fn db_path(&self) -> &Path {
        &self.db_path
    }
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "expense-ledger", "ExpenseLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().join("expenses.db"))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
