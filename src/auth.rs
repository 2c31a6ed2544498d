//! API key and secret handed to the client at construction.
//!
//! Only public endpoints are called, so nothing is ever signed. The secret
//! stays inside a [`SecretString`] and shows up as `[REDACTED]` in debug
//! output.

use secrecy::SecretString;

/// Key/secret pair.
#[derive(Clone)]
pub struct Credentials {
    /// The API key (public identifier)
    pub api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    /// Wrap an API key and secret.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret)
            .finish()
    }
}
