use thiserror::Error;

pub(crate) type Result<T> = std::result::Result<T, LedgerError>;

/// Failures surfaced by the ledger store and the tool façade.
///
/// An empty result is never an error; it renders as a sentinel message.
#[derive(Debug, Error)]
pub(crate) enum LedgerError {
    /// The database could not be opened, locked, read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool arguments were rejected before reaching storage.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}
