//! # Kraken Public Demo
//!
//! Walks a handful of Kraken's public REST endpoints and prints selected
//! fields of each response.
//!
//! ## Contents
//!
//! - [`rest`] - async client for the public Spot REST endpoints
//! - [`demo`] - the fixed call-and-print sequence driven by the binary;
//!   [`demo::execute`] maps its outcome to an exit code
//! - [`auth`] - credential holder handed to the client at construction
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kraken_public_demo::demo;
//! use kraken_public_demo::rest::SpotRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SpotRestClient::with_credentials(demo::PLACEHOLDER_KEY, demo::PLACEHOLDER_SECRET);
//!     demo::run(&client, std::io::stdout().lock()).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod demo;
pub mod error;
pub mod rest;

pub use error::KrakenError;

/// Result type alias using KrakenError
pub type Result<T> = std::result::Result<T, KrakenError>;
