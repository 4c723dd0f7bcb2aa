//! Command-line and environment configuration for the `contacts` binary.

use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "contacts")]
#[command(version)]
#[command(about = "In-memory contact book over HTTP", long_about = None)]
pub struct Config {
    /// Address to listen on.
    #[arg(short, long, env = "CONTACTS_ADDR", value_name = "HOST:PORT", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// Start with an empty contact book instead of the demo contact.
    #[arg(long, env = "CONTACTS_NO_SEED")]
    pub no_seed: bool,

    /// Log filter used when RUST_LOG is unset, e.g. `debug` or `contacts=trace`.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log: String,
}
