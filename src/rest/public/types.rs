//! Request and response shapes for the public endpoints.
//!
//! Kraken encodes series rows (candles, trades, spreads, book levels) as
//! positional JSON arrays. The row structs below derive `Deserialize`, which
//! reads such arrays field by field in declaration order.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};

use crate::error::KrakenError;

/// `Time` result.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTime {
    /// Seconds since the Unix epoch.
    pub unixtime: i64,
    /// Same instant, RFC 1123 formatted.
    pub rfc1123: String,
}

/// `SystemStatus` result.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemStatus {
    /// `online`, `maintenance`, `cancel_only` or `post_only`.
    pub status: String,
    /// Server timestamp, RFC 3339.
    pub timestamp: String,
}

impl SystemStatus {
    /// Whether the exchange accepts all requests.
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

/// Query for `Assets`. The default asks for every asset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetInfoRequest {
    /// Comma-separated asset names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// Asset class; Kraken assumes `currency`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aclass: Option<String>,
}

/// One entry of the `Assets` result.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetInfo {
    pub aclass: String,
    pub altname: String,
    /// Precision used for balances.
    pub decimals: u8,
    /// Precision used when displaying amounts.
    pub display_decimals: u8,
    #[serde(default)]
    pub collateral_value: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Which slice of pair metadata `AssetPairs` returns.
///
/// Only [`AssetPairDetail::Info`] carries every field of [`AssetPair`]; the
/// narrower levels omit names and decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetPairDetail {
    #[default]
    Info,
    Leverage,
    Fees,
    Margin,
}

/// Query for `AssetPairs`. The default asks for every pair.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetPairsRequest {
    /// Comma-separated pair names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<AssetPairDetail>,
}

/// One step of a volume-tiered fee schedule: `[volume, percent fee]`.
pub type FeeTier = (u64, Decimal);

/// One entry of the `AssetPairs` result.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetPair {
    pub altname: String,
    #[serde(default)]
    pub wsname: Option<String>,
    pub aclass_base: String,
    pub base: String,
    pub aclass_quote: String,
    pub quote: String,
    /// Volume lot unit, usually `unit`.
    #[serde(default)]
    pub lot: Option<String>,
    #[serde(default)]
    pub cost_decimals: u8,
    pub pair_decimals: u8,
    pub lot_decimals: u8,
    pub lot_multiplier: u32,
    #[serde(default)]
    pub leverage_buy: Vec<u32>,
    #[serde(default)]
    pub leverage_sell: Vec<u32>,
    /// Taker fees by 30-day volume.
    #[serde(default)]
    pub fees: Vec<FeeTier>,
    /// Maker fees by 30-day volume.
    #[serde(default)]
    pub fees_maker: Option<Vec<FeeTier>>,
    /// Currency the fee volume is counted in.
    #[serde(default)]
    pub fee_volume_currency: Option<String>,
    /// Margin level (percent) that triggers a margin call.
    #[serde(default)]
    pub margin_call: Option<u32>,
    /// Margin level (percent) that triggers liquidation.
    #[serde(default)]
    pub margin_stop: Option<u32>,
    #[serde(default)]
    pub ordermin: Option<Decimal>,
    #[serde(default)]
    pub costmin: Option<Decimal>,
    #[serde(default)]
    pub tick_size: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One entry of the `Ticker` result. Field names follow Kraken's one-letter
/// keys; two-element arrays are `[today, last 24 hours]`.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerInfo {
    /// Ask `[price, whole lot volume, lot volume]`.
    pub a: Vec<Decimal>,
    /// Bid `[price, whole lot volume, lot volume]`.
    pub b: Vec<Decimal>,
    /// Last trade `[price, lot volume]`.
    pub c: Vec<Decimal>,
    /// Volume.
    pub v: Vec<Decimal>,
    /// Volume-weighted average price.
    pub p: Vec<Decimal>,
    /// Trade count.
    pub t: Vec<u64>,
    /// Low.
    pub l: Vec<Decimal>,
    /// High.
    pub h: Vec<Decimal>,
    /// Opening price today.
    pub o: Decimal,
}

/// Candle width accepted by `OHLC`, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u32")]
pub enum OhlcInterval {
    Min1,
    Min5,
    Min15,
    Min30,
    Hour1,
    Hour4,
    Day1,
    Week1,
    Day15,
}

impl From<OhlcInterval> for u32 {
    fn from(interval: OhlcInterval) -> u32 {
        match interval {
            OhlcInterval::Min1 => 1,
            OhlcInterval::Min5 => 5,
            OhlcInterval::Min15 => 15,
            OhlcInterval::Min30 => 30,
            OhlcInterval::Hour1 => 60,
            OhlcInterval::Hour4 => 240,
            OhlcInterval::Day1 => 1440,
            OhlcInterval::Week1 => 10080,
            OhlcInterval::Day15 => 21600,
        }
    }
}

impl TryFrom<u32> for OhlcInterval {
    type Error = KrakenError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Ok(match minutes {
            1 => Self::Min1,
            5 => Self::Min5,
            15 => Self::Min15,
            30 => Self::Min30,
            60 => Self::Hour1,
            240 => Self::Hour4,
            1440 => Self::Day1,
            10080 => Self::Week1,
            21600 => Self::Day15,
            other => {
                return Err(KrakenError::InvalidArgument(format!(
                    "OHLC interval must be one of 1, 5, 15, 30, 60, 240, 1440, 10080, 21600 minutes, got {other}"
                )));
            }
        })
    }
}

/// Query for `OHLC`.
#[derive(Debug, Clone, Serialize)]
pub struct OhlcRequest {
    pub pair: String,
    /// Kraken defaults to one minute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<OhlcInterval>,
    /// Only candles after this cursor (a previous response's `last`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<i64>,
}

impl OhlcRequest {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            interval: None,
            since: None,
        }
    }

    pub fn interval(mut self, interval: OhlcInterval) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn since(mut self, since: i64) -> Self {
        self.since = Some(since);
        self
    }
}

/// One candle: `[time, open, high, low, close, vwap, volume, count]`.
#[derive(Debug, Clone, Deserialize)]
pub struct OhlcEntry {
    pub time: i64,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub vwap: Decimal,
    pub volume: Decimal,
    pub count: u64,
}

/// Largest depth `Depth` accepts.
pub const MAX_BOOK_DEPTH: u16 = 500;

/// Query for `Depth`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderBookRequest {
    pub pair: String,
    /// Levels per side, 1 to [`MAX_BOOK_DEPTH`]. Kraken defaults to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u16>,
}

impl OrderBookRequest {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            count: None,
        }
    }

    pub fn count(mut self, count: u16) -> Self {
        self.count = Some(count);
        self
    }

    /// Reject a depth outside `1..=500` before it reaches Kraken.
    pub fn validate(&self) -> Result<(), KrakenError> {
        match self.count {
            Some(count) if !(1..=MAX_BOOK_DEPTH).contains(&count) => {
                Err(KrakenError::InvalidArgument(format!(
                    "order book count must be within 1..={MAX_BOOK_DEPTH}, got {count}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Both sides of one pair's book.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBook {
    /// Lowest price first.
    pub asks: Vec<BookLevel>,
    /// Highest price first.
    pub bids: Vec<BookLevel>,
}

/// One price level: `[price, volume, timestamp]`.
#[derive(Debug, Clone, Deserialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub volume: Decimal,
    pub timestamp: i64,
}

/// Query for `Trades` and `Spread`: a pair and an optional cursor.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRequest {
    pub pair: String,
    /// A previous response's `last`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
}

impl HistoryRequest {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            since: None,
        }
    }

    pub fn since(mut self, since: impl ToString) -> Self {
        self.since = Some(since.to_string());
        self
    }
}

/// One trade: `[price, volume, time, side, order type, misc, trade id]`.
///
/// Older responses stop before the trade id.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeEntry {
    pub price: Decimal,
    pub volume: Decimal,
    pub time: f64,
    /// `b` or `s`.
    pub side: String,
    /// `m` (market) or `l` (limit).
    pub order_type: String,
    pub misc: String,
    #[serde(default)]
    pub trade_id: Option<i64>,
}

/// One spread sample: `[time, bid, ask]`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpreadEntry {
    pub time: i64,
    pub bid: Decimal,
    pub ask: Decimal,
}

/// Result of a paged series endpoint: rows keyed by pair, plus the `last`
/// cursor to pass as `since` on the next call.
///
/// Kraken puts `last` next to the pair keys in the same object, so it is
/// split off by hand.
#[derive(Debug, Clone)]
pub struct PairSeries<T, C> {
    pub rows: HashMap<String, Vec<T>>,
    pub last: C,
}

impl<T, C> PairSeries<T, C> {
    /// Rows for `pair`, if Kraken returned any.
    pub fn rows_for(&self, pair: &str) -> Option<&[T]> {
        self.rows.get(pair).map(Vec::as_slice)
    }
}

impl<'de, T, C> Deserialize<'de> for PairSeries<T, C>
where
    T: DeserializeOwned,
    C: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut object: HashMap<String, serde_json::Value> = HashMap::deserialize(deserializer)?;
        let last = object
            .remove("last")
            .ok_or_else(|| D::Error::missing_field("last"))?;
        let last = C::deserialize(last).map_err(D::Error::custom)?;
        let rows = object
            .into_iter()
            .map(|(pair, value)| -> Result<(String, Vec<T>), D::Error> {
                let rows = Vec::<T>::deserialize(value).map_err(D::Error::custom)?;
                Ok((pair, rows))
            })
            .collect::<Result<HashMap<_, _>, D::Error>>()?;
        Ok(Self { rows, last })
    }
}

/// `OHLC` result; `last` is a Unix timestamp.
pub type OhlcResponse = PairSeries<OhlcEntry, i64>;
/// `Trades` result; `last` is a nanosecond cursor sent as a string.
pub type RecentTrades = PairSeries<TradeEntry, String>;
/// `Spread` result; `last` is a Unix timestamp.
pub type RecentSpreads = PairSeries<SpreadEntry, i64>;
