//! [`SpotRestClient`] and its builder.

use std::collections::HashMap;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::error::{ApiError, KrakenError};
use crate::rest::endpoints::KRAKEN_BASE_URL;
use crate::rest::public::{
    AssetInfo, AssetInfoRequest, AssetPair, AssetPairsRequest, HistoryRequest, OhlcRequest,
    OhlcResponse, OrderBook, OrderBookRequest, RecentSpreads, RecentTrades, ServerTime,
    SystemStatus, TickerInfo,
};
use crate::rest::traits::KrakenClient;

/// Async client for Kraken's public Spot endpoints.
///
/// Every request passes through `reqwest-middleware` with a tracing span per
/// call. Transient failures are retried only when
/// [`SpotRestClientBuilder::max_retries`] is above zero, which it is not by
/// default.
///
/// ```rust,no_run
/// use kraken_public_demo::rest::SpotRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SpotRestClient::with_credentials("Hello", "There");
///     let time = client.get_server_time().await?;
///     println!("{} ({})", time.rfc1123, time.unixtime);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SpotRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    credentials: Option<Credentials>,
}

impl SpotRestClient {
    /// Client against the live API with no credentials.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Client against the live API holding a key and secret that public
    /// calls never read.
    pub fn with_credentials(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::builder()
            .credentials(Credentials::new(api_key, api_secret))
            .build()
    }

    pub fn builder() -> SpotRestClientBuilder {
        SpotRestClientBuilder::new()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.api_key.as_str())
    }

    pub(crate) async fn get<T>(&self, endpoint: &str) -> Result<T, KrakenError>
    where
        T: DeserializeOwned,
    {
        self.fetch(endpoint, String::new()).await
    }

    pub(crate) async fn get_with<T, Q>(&self, endpoint: &str, params: &Q) -> Result<T, KrakenError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let query = serde_urlencoded::to_string(params)
            .map_err(|e| KrakenError::InvalidArgument(e.to_string()))?;
        self.fetch(endpoint, query).await
    }

    async fn fetch<T>(&self, endpoint: &str, query: String) -> Result<T, KrakenError>
    where
        T: DeserializeOwned,
    {
        let mut url = format!("{}{}", self.base_url, endpoint);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        debug!(%endpoint, %query, "GET");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_envelope(endpoint, status, &body).inspect_err(|err| {
            warn!(%endpoint, %status, error = %err, "request failed");
        })
    }
}

/// Unwrap Kraken's `{"error": [...], "result": ...}` body.
///
/// A non-empty `error` wins over any `result`. Kraken usually answers 200
/// even on failure, so the HTTP status only shows up in the message when no
/// result came back.
fn decode_envelope<T>(endpoint: &str, status: StatusCode, body: &str) -> Result<T, KrakenError>
where
    T: DeserializeOwned,
{
    #[derive(serde::Deserialize)]
    struct Envelope<T> {
        #[serde(default)]
        error: Vec<String>,
        result: Option<T>,
    }

    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| {
        KrakenError::InvalidResponse(format!("{endpoint}: undecodable body ({e}): {body}"))
    })?;

    if let Some(api_error) = ApiError::from_error_array(&envelope.error) {
        return Err(if api_error.is_rate_limit() {
            KrakenError::RateLimitExceeded {
                retry_after_ms: None,
            }
        } else {
            KrakenError::Api(api_error)
        });
    }

    match envelope.result {
        Some(result) => Ok(result),
        None if !status.is_success() => Err(KrakenError::InvalidResponse(format!(
            "HTTP {status}: {body}"
        ))),
        None => Err(KrakenError::InvalidResponse(format!(
            "{endpoint}: envelope has no result"
        ))),
    }
}

impl Default for SpotRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SpotRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotRestClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

/// Settings for a [`SpotRestClient`].
pub struct SpotRestClientBuilder {
    base_url: String,
    credentials: Option<Credentials>,
    user_agent: Option<String>,
    max_retries: u32,
}

impl SpotRestClientBuilder {
    /// Live API, no credentials, no retries.
    pub fn new() -> Self {
        Self {
            base_url: KRAKEN_BASE_URL.to_string(),
            credentials: None,
            user_agent: None,
            max_retries: 0,
        }
    }

    /// Point the client elsewhere, e.g. at a mock server. A trailing `/` is dropped.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Defaults to `kraken-public-demo/<version>`.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Retries for transient failures, with exponential backoff.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn build(self) -> SpotRestClient {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("kraken-public-demo/{}", env!("CARGO_PKG_VERSION")));
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("kraken-public-demo")),
        );

        // Falls back to reqwest's defaults if the TLS backend refuses the builder.
        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let backoff = ExponentialBackoff::builder().build_with_max_retries(self.max_retries);
        let http_client = ClientBuilder::new(inner)
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(backoff))
            .build();

        SpotRestClient {
            http_client,
            base_url: self.base_url,
            credentials: self.credentials,
        }
    }
}

impl Default for SpotRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KrakenClient for SpotRestClient {
    async fn get_server_time(&self) -> Result<ServerTime, KrakenError> {
        SpotRestClient::get_server_time(self).await
    }

    async fn get_system_status(&self) -> Result<SystemStatus, KrakenError> {
        SpotRestClient::get_system_status(self).await
    }

    async fn get_assets(
        &self,
        request: Option<&AssetInfoRequest>,
    ) -> Result<HashMap<String, AssetInfo>, KrakenError> {
        SpotRestClient::get_assets(self, request).await
    }

    async fn get_asset_pairs(
        &self,
        request: Option<&AssetPairsRequest>,
    ) -> Result<HashMap<String, AssetPair>, KrakenError> {
        SpotRestClient::get_asset_pairs(self, request).await
    }

    async fn get_ticker(&self, pairs: &str) -> Result<HashMap<String, TickerInfo>, KrakenError> {
        SpotRestClient::get_ticker(self, pairs).await
    }

    async fn get_ohlc(&self, request: &OhlcRequest) -> Result<OhlcResponse, KrakenError> {
        SpotRestClient::get_ohlc(self, request).await
    }

    async fn get_order_book(
        &self,
        request: &OrderBookRequest,
    ) -> Result<HashMap<String, OrderBook>, KrakenError> {
        SpotRestClient::get_order_book(self, request).await
    }

    async fn get_recent_trades(&self, request: &HistoryRequest) -> Result<RecentTrades, KrakenError> {
        SpotRestClient::get_recent_trades(self, request).await
    }

    async fn get_recent_spreads(
        &self,
        request: &HistoryRequest,
    ) -> Result<RecentSpreads, KrakenError> {
        SpotRestClient::get_recent_spreads(self, request).await
    }
}
