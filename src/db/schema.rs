/// Idempotent; never drops or alters existing data.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    amount      REAL NOT NULL,
    category    TEXT NOT NULL,
    description TEXT,
    date        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
"#;
