//! Public endpoints. None of them need credentials.

mod types;

pub use types::*;

use std::collections::HashMap;

use crate::error::KrakenError;
use crate::rest::SpotRestClient;
use crate::rest::endpoints::public;

#[derive(serde::Serialize)]
struct PairQuery<'a> {
    pair: &'a str,
}

impl SpotRestClient {
    /// `GET /0/public/Time`.
    pub async fn get_server_time(&self) -> Result<ServerTime, KrakenError> {
        self.get(public::TIME).await
    }

    /// `GET /0/public/SystemStatus`.
    pub async fn get_system_status(&self) -> Result<SystemStatus, KrakenError> {
        self.get(public::SYSTEM_STATUS).await
    }

    /// `GET /0/public/Assets`, keyed by Kraken asset name (`XXBT`, `BCH`, ...).
    pub async fn get_assets(
        &self,
        request: Option<&AssetInfoRequest>,
    ) -> Result<HashMap<String, AssetInfo>, KrakenError> {
        match request {
            Some(query) => self.get_with(public::ASSETS, query).await,
            None => self.get(public::ASSETS).await,
        }
    }

    /// `GET /0/public/AssetPairs`, keyed by Kraken pair name (`XXBTZEUR`, ...).
    pub async fn get_asset_pairs(
        &self,
        request: Option<&AssetPairsRequest>,
    ) -> Result<HashMap<String, AssetPair>, KrakenError> {
        match request {
            Some(query) => self.get_with(public::ASSET_PAIRS, query).await,
            None => self.get(public::ASSET_PAIRS).await,
        }
    }

    /// `GET /0/public/Ticker` for a comma-separated list of pairs.
    pub async fn get_ticker(
        &self,
        pairs: &str,
    ) -> Result<HashMap<String, TickerInfo>, KrakenError> {
        self.get_with(public::TICKER, &PairQuery { pair: pairs }).await
    }

    /// `GET /0/public/OHLC`. At most 720 candles come back per call.
    pub async fn get_ohlc(&self, request: &OhlcRequest) -> Result<OhlcResponse, KrakenError> {
        self.get_with(public::OHLC, request).await
    }

    /// `GET /0/public/Depth`.
    ///
    /// A `count` outside `1..=500` fails with
    /// [`KrakenError::InvalidArgument`] and nothing is sent.
    pub async fn get_order_book(
        &self,
        request: &OrderBookRequest,
    ) -> Result<HashMap<String, OrderBook>, KrakenError> {
        request.validate()?;
        self.get_with(public::DEPTH, request).await
    }

    /// `GET /0/public/Trades`, up to 1000 trades after `since`.
    pub async fn get_recent_trades(
        &self,
        request: &HistoryRequest,
    ) -> Result<RecentTrades, KrakenError> {
        self.get_with(public::TRADES, request).await
    }

    /// `GET /0/public/Spread`.
    pub async fn get_recent_spreads(
        &self,
        request: &HistoryRequest,
    ) -> Result<RecentSpreads, KrakenError> {
        self.get_with(public::SPREAD, request).await
    }
}
