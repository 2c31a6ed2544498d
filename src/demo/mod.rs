//! The fixed call-and-print sequence.
//!
//! [`run`] makes four public calls in order (server time, assets, asset
//! pairs, ticker) and prints a hard-coded subset of each response. The first
//! failing call ends the run: its error is returned and nothing after it is
//! called or printed.

mod report;

pub use report::{Fees, List, Opt, Report, SEPARATOR};

use std::io::Write;
use std::process::ExitCode;

use tracing::{debug, error};

use crate::error::KrakenError;
use crate::rest::KrakenClient;
use crate::rest::pairs::{BCHEUR, XXBTZEUR, XXRPZEUR};

/// API key handed to the client. Only public endpoints are called.
pub const PLACEHOLDER_KEY: &str = "Hello";
/// API secret handed to the client. Only public endpoints are called.
pub const PLACEHOLDER_SECRET: &str = "There";

/// Asset whose metadata is printed.
pub const ASSET: &str = "BCH";
/// Pair whose metadata is printed.
pub const ASSET_PAIR: &str = BCHEUR;
/// Pairs requested from the ticker endpoint.
pub const TICKER_PAIRS: [&str; 2] = [XXBTZEUR, XXRPZEUR];
/// Ticker pair whose fields are printed.
pub const TICKER_PAIR: &str = XXBTZEUR;

/// Run the whole sequence and turn the outcome into the process exit code.
///
/// A failure is logged at `error` level and yields [`ExitCode::FAILURE`].
pub async fn execute<C, W>(client: &C, out: W) -> ExitCode
where
    C: KrakenClient,
    W: Write,
{
    match run(client, out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "demo run failed");
            ExitCode::FAILURE
        }
    }
}

/// Run the whole sequence against `client`, writing the report to `out`.
///
/// Stops at the first failed call. A successful response that lacks the
/// hard-coded key ([`ASSET`], [`ASSET_PAIR`] or [`TICKER_PAIR`]) also stops
/// the run with [`KrakenError::InvalidResponse`]; nothing is printed for the
/// missing entry.
pub async fn run<C, W>(client: &C, out: W) -> crate::Result<()>
where
    C: KrakenClient,
    W: Write,
{
    let mut report = Report::new(out);

    report.section(format!(
        "SpotRestClient::with_credentials({PLACEHOLDER_KEY:?}, {PLACEHOLDER_SECRET:?})"
    ))?;

    print_server_time(client, &mut report).await?;
    print_asset(client, &mut report).await?;
    print_asset_pair(client, &mut report).await?;
    print_ticker(client, &mut report).await?;

    report.flush()?;
    Ok(())
}

/// Fetch the server time and print both fields.
pub async fn print_server_time<C, W>(client: &C, report: &mut Report<W>) -> crate::Result<()>
where
    C: KrakenClient,
    W: Write,
{
    report.section("SpotRestClient::get_server_time() -> ServerTime")?;
    let time = client.get_server_time().await?;
    debug!(unixtime = time.unixtime, "server time received");

    report.field("String", "ServerTime.rfc1123", &time.rfc1123)?;
    report.field("i64", "ServerTime.unixtime", time.unixtime)?;
    Ok(())
}

/// Fetch all assets and print four fields of [`ASSET`].
pub async fn print_asset<C, W>(client: &C, report: &mut Report<W>) -> crate::Result<()>
where
    C: KrakenClient,
    W: Write,
{
    report.section("SpotRestClient::get_assets(None) -> HashMap<String, AssetInfo>")?;
    let assets = client.get_assets(None).await?;
    debug!(count = assets.len(), "assets received");
    let asset = assets.get(ASSET).ok_or_else(|| missing("asset", ASSET))?;

    let path = |field: &str| format!("AssetInfo[{ASSET}].{field}");
    report.field("String", &path("altname"), &asset.altname)?;
    report.field("String", &path("aclass"), &asset.aclass)?;
    report.field("u8", &path("decimals"), asset.decimals)?;
    report.field("u8", &path("display_decimals"), asset.display_decimals)?;
    Ok(())
}

/// Fetch all asset pairs and print the fields of [`ASSET_PAIR`].
pub async fn print_asset_pair<C, W>(client: &C, report: &mut Report<W>) -> crate::Result<()>
where
    C: KrakenClient,
    W: Write,
{
    report.section("SpotRestClient::get_asset_pairs(None) -> HashMap<String, AssetPair>")?;
    let pairs = client.get_asset_pairs(None).await?;
    debug!(count = pairs.len(), "asset pairs received");
    let pair = pairs
        .get(ASSET_PAIR)
        .ok_or_else(|| missing("asset pair", ASSET_PAIR))?;

    let path = |field: &str| format!("AssetPair[{ASSET_PAIR}].{field}");
    report.field("String", &path("altname"), &pair.altname)?;
    report.field("String", &path("aclass_base"), &pair.aclass_base)?;
    report.field("String", &path("base"), &pair.base)?;
    report.field("String", &path("aclass_quote"), &pair.aclass_quote)?;
    report.field("String", &path("quote"), &pair.quote)?;
    report.field("Option<String>", &path("lot"), Opt(pair.lot.as_deref()))?;
    report.field("u8", &path("pair_decimals"), pair.pair_decimals)?;
    report.field("u8", &path("lot_decimals"), pair.lot_decimals)?;
    report.field("u32", &path("lot_multiplier"), pair.lot_multiplier)?;
    report.field("Vec<u32>", &path("leverage_buy"), List(&pair.leverage_buy))?;
    report.field("Vec<u32>", &path("leverage_sell"), List(&pair.leverage_sell))?;
    report.field("Vec<FeeTier>", &path("fees"), Fees(&pair.fees))?;
    report.field(
        "Option<Vec<FeeTier>>",
        &path("fees_maker"),
        Opt(pair.fees_maker.as_deref().map(Fees)),
    )?;
    report.field(
        "Option<String>",
        &path("fee_volume_currency"),
        Opt(pair.fee_volume_currency.as_deref()),
    )?;
    report.field("Option<u32>", &path("margin_call"), Opt(pair.margin_call))?;
    report.field("Option<u32>", &path("margin_stop"), Opt(pair.margin_stop))?;
    Ok(())
}

/// Fetch the ticker for [`TICKER_PAIRS`] and print the fields of [`TICKER_PAIR`].
pub async fn print_ticker<C, W>(client: &C, report: &mut Report<W>) -> crate::Result<()>
where
    C: KrakenClient,
    W: Write,
{
    let requested = TICKER_PAIRS.join(",");
    report.section(format!(
        "SpotRestClient::get_ticker({requested:?}) -> HashMap<String, TickerInfo>"
    ))?;
    let tickers = client.get_ticker(&requested).await?;
    debug!(count = tickers.len(), "tickers received");
    let ticker = tickers
        .get(TICKER_PAIR)
        .ok_or_else(|| missing("ticker pair", TICKER_PAIR))?;

    let path = |field: &str| format!("TickerInfo[{TICKER_PAIR}].{field}");
    report.field("Vec<Decimal>", &path("ask"), List(&ticker.a))?;
    report.field("Vec<Decimal>", &path("bid"), List(&ticker.b))?;
    report.field("Vec<Decimal>", &path("close"), List(&ticker.c))?;
    report.field("Vec<Decimal>", &path("volume"), List(&ticker.v))?;
    report.field("Vec<Decimal>", &path("volume_average_price"), List(&ticker.p))?;
    report.field("Vec<u64>", &path("trades"), List(&ticker.t))?;
    report.field("Vec<Decimal>", &path("low"), List(&ticker.l))?;
    report.field("Vec<Decimal>", &path("high"), List(&ticker.h))?;
    report.field("Decimal", &path("opening_price"), ticker.o)?;
    Ok(())
}

fn missing(kind: &str, key: &str) -> KrakenError {
    KrakenError::InvalidResponse(format!("{kind} {key} missing from response"))
}
