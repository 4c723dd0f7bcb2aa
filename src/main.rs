//! `contacts` — serve an in-memory contact book.
//!
//! ```text
//! RUST_LOG=debug contacts --addr 127.0.0.1:3000
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use contacts::config::Config;
use contacts::{ContactStore, Server, api};

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = if cfg.no_seed { ContactStore::new() } else { ContactStore::seeded() };
    info!(contacts = store.len(), "store ready");

    match Server::bind(cfg.addr).serve(api::routes(Arc::new(store))).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
