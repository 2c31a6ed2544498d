//! `kraken-demo`: prints selected fields from Kraken's public time, assets,
//! asset pairs and ticker endpoints.
//!
//! Takes no arguments. The report goes to stdout, logs go to stderr
//! (filtered by `RUST_LOG`, default `warn`). Exits with status 1 after
//! logging the first failed call.

use std::process::ExitCode;

use kraken_public_demo::demo;
use kraken_public_demo::rest::SpotRestClient;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let client = SpotRestClient::with_credentials(demo::PLACEHOLDER_KEY, demo::PLACEHOLDER_SECRET);
    demo::execute(&client, std::io::stdout().lock()).await
}
