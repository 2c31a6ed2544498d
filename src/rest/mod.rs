//! Kraken Spot public REST API client.
//!
//! The [`KrakenClient`] trait abstracts the public operations so the demo
//! runner can be driven by [`SpotRestClient`] or by any other implementation.
//!
//! ```rust,ignore
//! use kraken_public_demo::rest::{KrakenClient, SpotRestClient};
//!
//! async fn use_client<C: KrakenClient>(client: &C) -> kraken_public_demo::Result<()> {
//!     let time = client.get_server_time().await?;
//!     println!("Server time: {}", time.unixtime);
//!     Ok(())
//! }
//! ```

mod client;
mod endpoints;
pub mod public;
mod traits;

pub use client::{SpotRestClient, SpotRestClientBuilder};
pub use endpoints::*;
pub use traits::KrakenClient;
