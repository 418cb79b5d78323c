mod config;
mod db;
mod error;
mod models;
mod run;
mod tools;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    init_logging();

    let mut args: Vec<String> = std::env::args().collect();
    let db_flag = run::take_flag(&mut args, "--db")?;

    if args.len() < 2 {
        run::print_usage();
        return Ok(());
    }

    let config = config::LedgerConfig::resolve(db_flag.as_deref())?;
    let store = db::LedgerStore::new(config);
    store.init().with_context(|| {
        format!(
            "Failed to initialize ledger at {}",
            store.config().db_path().display()
        )
    })?;

    let facade = tools::ToolFacade::new(store);
    run::as_cli(&args, &facade)
}

/// Log to stderr so tool output on stdout stays clean. `RUST_LOG` overrides
/// the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
