//! The [`KrakenClient`] seam.
//!
//! The demo runner is generic over this trait, so tests can drive it with
//! scripted implementations instead of an HTTP server.

use std::collections::HashMap;
use std::future::Future;

use crate::error::KrakenError;
use crate::rest::public::{
    AssetInfo, AssetInfoRequest, AssetPair, AssetPairsRequest, HistoryRequest, OhlcRequest,
    OhlcResponse, OrderBook, OrderBookRequest, RecentSpreads, RecentTrades, ServerTime,
    SystemStatus, TickerInfo,
};

/// Kraken's public REST operations.
pub trait KrakenClient: Send + Sync {
    fn get_server_time(&self) -> impl Future<Output = Result<ServerTime, KrakenError>> + Send;

    fn get_system_status(&self) -> impl Future<Output = Result<SystemStatus, KrakenError>> + Send;

    /// `true` when [`get_system_status`](Self::get_system_status) reports `online`.
    ///
    /// A failed call is an error, not `false`.
    fn is_online(&self) -> impl Future<Output = Result<bool, KrakenError>> + Send {
        async move { Ok(self.get_system_status().await?.is_online()) }
    }

    fn get_assets(
        &self,
        request: Option<&AssetInfoRequest>,
    ) -> impl Future<Output = Result<HashMap<String, AssetInfo>, KrakenError>> + Send;

    fn get_asset_pairs(
        &self,
        request: Option<&AssetPairsRequest>,
    ) -> impl Future<Output = Result<HashMap<String, AssetPair>, KrakenError>> + Send;

    /// `pairs` is comma-separated.
    fn get_ticker(
        &self,
        pairs: &str,
    ) -> impl Future<Output = Result<HashMap<String, TickerInfo>, KrakenError>> + Send;

    fn get_ohlc(
        &self,
        request: &OhlcRequest,
    ) -> impl Future<Output = Result<OhlcResponse, KrakenError>> + Send;

    fn get_order_book(
        &self,
        request: &OrderBookRequest,
    ) -> impl Future<Output = Result<HashMap<String, OrderBook>, KrakenError>> + Send;

    fn get_recent_trades(
        &self,
        request: &HistoryRequest,
    ) -> impl Future<Output = Result<RecentTrades, KrakenError>> + Send;

    fn get_recent_spreads(
        &self,
        request: &HistoryRequest,
    ) -> impl Future<Output = Result<RecentSpreads, KrakenError>> + Send;
}
