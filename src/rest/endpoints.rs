//! Kraken REST API endpoint constants.

/// Base URL for the Kraken REST API.
pub const KRAKEN_BASE_URL: &str = "https://api.kraken.com";

/// Public endpoints (no authentication required).
pub mod public {
    /// Get server time.
    pub const TIME: &str = "/0/public/Time";
    /// Get system status.
    pub const SYSTEM_STATUS: &str = "/0/public/SystemStatus";
    /// Get asset info.
    pub const ASSETS: &str = "/0/public/Assets";
    /// Get tradable asset pairs.
    pub const ASSET_PAIRS: &str = "/0/public/AssetPairs";
    /// Get ticker information.
    pub const TICKER: &str = "/0/public/Ticker";
    /// Get OHLC candles.
    pub const OHLC: &str = "/0/public/OHLC";
    /// Get order book.
    pub const DEPTH: &str = "/0/public/Depth";
    /// Get recent trades.
    pub const TRADES: &str = "/0/public/Trades";
    /// Get recent spreads.
    pub const SPREAD: &str = "/0/public/Spread";
}

/// Kraken's canonical pair names, as used for response keys.
pub mod pairs {
    /// Bitcoin / Euro.
    pub const XXBTZEUR: &str = "XXBTZEUR";
    /// Ripple / Euro.
    pub const XXRPZEUR: &str = "XXRPZEUR";
    /// Bitcoin Cash / Euro.
    pub const BCHEUR: &str = "BCHEUR";
}
