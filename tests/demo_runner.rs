use std::collections::HashMap;
use std::process::ExitCode;
use std::sync::Mutex;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kraken_public_demo::KrakenError;
use kraken_public_demo::auth::Credentials;
use kraken_public_demo::demo::{self, SEPARATOR};
use kraken_public_demo::rest::public::{
    AssetInfo, AssetInfoRequest, AssetPair, AssetPairsRequest, HistoryRequest, OhlcRequest,
    OhlcResponse, OrderBook, OrderBookRequest, PairSeries, RecentSpreads, RecentTrades,
    ServerTime, SystemStatus, TickerInfo,
};
use kraken_public_demo::rest::{KrakenClient, SpotRestClient};
use tracing_test::traced_test;

fn time_body() -> serde_json::Value {
    serde_json::json!({
        "error": [],
        "result": {
            "unixtime": 1_700_000_000,
            "rfc1123": "Tue, 14 Nov 23 22:13:20 +0000"
        }
    })
}

fn assets_body() -> serde_json::Value {
    serde_json::json!({
        "error": [],
        "result": {
            "BCH": {
                "aclass": "currency",
                "altname": "BCH",
                "decimals": 10,
                "display_decimals": 5
            },
            "XXBT": {
                "aclass": "currency",
                "altname": "XBT",
                "decimals": 10,
                "display_decimals": 5
            }
        }
    })
}

fn asset_pairs_body() -> serde_json::Value {
    serde_json::json!({
        "error": [],
        "result": {
            "BCHEUR": {
                "altname": "BCHEUR",
                "wsname": "BCH/EUR",
                "aclass_base": "currency",
                "base": "BCH",
                "aclass_quote": "currency",
                "quote": "ZEUR",
                "lot": "unit",
                "cost_decimals": 5,
                "pair_decimals": 2,
                "lot_decimals": 8,
                "lot_multiplier": 1,
                "leverage_buy": [2, 3],
                "leverage_sell": [2, 3],
                "fees": [[0, 0.4], [10000, 0.35]],
                "fees_maker": [[0, 0.25], [10000, 0.2]],
                "fee_volume_currency": "ZUSD",
                "margin_call": 80,
                "margin_stop": 40
            }
        }
    })
}

fn ticker_body() -> serde_json::Value {
    serde_json::json!({
        "error": [],
        "result": {
            "XXBTZEUR": {
                "a": ["52609.6", "1", "1.000"],
                "b": ["52609.5", "2", "2.000"],
                "c": ["52641.1", "0.0008"],
                "v": ["1920.8", "7954.0"],
                "p": ["52389.9", "54022.9"],
                "t": [23329, 80463],
                "l": ["51513.9", "51513.9"],
                "h": ["53219.9", "57200.0"],
                "o": "52280.4"
            },
            "XXRPZEUR": {
                "a": ["0.55", "100", "100.000"],
                "b": ["0.54", "200", "200.000"],
                "c": ["0.545", "10"],
                "v": ["1000", "5000"],
                "p": ["0.544", "0.541"],
                "t": [12, 40],
                "l": ["0.53", "0.52"],
                "h": ["0.56", "0.57"],
                "o": "0.535"
            }
        }
    })
}

async fn mount(server: &MockServer, endpoint: &str, body: serde_json::Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

fn build_client(server: &MockServer) -> SpotRestClient {
    SpotRestClient::builder()
        .base_url(server.uri())
        .credentials(Credentials::new(
            demo::PLACEHOLDER_KEY,
            demo::PLACEHOLDER_SECRET,
        ))
        .build()
}

#[tokio::test]
async fn test_full_run_prints_every_field_in_order() {
    let server = MockServer::start().await;
    mount(&server, "/0/public/Time", time_body(), 1).await;
    mount(&server, "/0/public/Assets", assets_body(), 1).await;
    mount(&server, "/0/public/AssetPairs", asset_pairs_body(), 1).await;
    Mock::given(method("GET"))
        .and(path("/0/public/Ticker"))
        .and(query_param("pair", "XXBTZEUR,XXRPZEUR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ticker_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server);
    let mut out = Vec::new();
    demo::run(&client, &mut out).await.unwrap();
    let out = String::from_utf8(out).unwrap();

    let expected = [
        "SpotRestClient::with_credentials(\"Hello\", \"There\")",
        "SpotRestClient::get_server_time() -> ServerTime",
        "(String)                 : ServerTime.rfc1123 : Tue, 14 Nov 23 22:13:20 +0000",
        "(i64)                    : ServerTime.unixtime : 1700000000",
        "SpotRestClient::get_assets(None) -> HashMap<String, AssetInfo>",
        "(String)                 : AssetInfo[BCH].altname : BCH",
        "(String)                 : AssetInfo[BCH].aclass : currency",
        "(u8)                     : AssetInfo[BCH].decimals : 10",
        "(u8)                     : AssetInfo[BCH].display_decimals : 5",
        "SpotRestClient::get_asset_pairs(None) -> HashMap<String, AssetPair>",
        "(String)                 : AssetPair[BCHEUR].altname : BCHEUR",
        "(String)                 : AssetPair[BCHEUR].aclass_base : currency",
        "(String)                 : AssetPair[BCHEUR].base : BCH",
        "(String)                 : AssetPair[BCHEUR].aclass_quote : currency",
        "(String)                 : AssetPair[BCHEUR].quote : ZEUR",
        "(Option<String>)         : AssetPair[BCHEUR].lot : unit",
        "(u8)                     : AssetPair[BCHEUR].pair_decimals : 2",
        "(u8)                     : AssetPair[BCHEUR].lot_decimals : 8",
        "(u32)                    : AssetPair[BCHEUR].lot_multiplier : 1",
        "(Vec<u32>)               : AssetPair[BCHEUR].leverage_buy : [2 3]",
        "(Vec<u32>)               : AssetPair[BCHEUR].leverage_sell : [2 3]",
        "(Vec<FeeTier>)           : AssetPair[BCHEUR].fees : [[0 0.4] [10000 0.35]]",
        "(Option<Vec<FeeTier>>)   : AssetPair[BCHEUR].fees_maker : [[0 0.25] [10000 0.2]]",
        "(Option<String>)         : AssetPair[BCHEUR].fee_volume_currency : ZUSD",
        "(Option<u32>)            : AssetPair[BCHEUR].margin_call : 80",
        "(Option<u32>)            : AssetPair[BCHEUR].margin_stop : 40",
        "SpotRestClient::get_ticker(\"XXBTZEUR,XXRPZEUR\") -> HashMap<String, TickerInfo>",
        "(Vec<Decimal>)           : TickerInfo[XXBTZEUR].ask : [52609.6 1 1.000]",
        "(Vec<Decimal>)           : TickerInfo[XXBTZEUR].bid : [52609.5 2 2.000]",
        "(Vec<Decimal>)           : TickerInfo[XXBTZEUR].close : [52641.1 0.0008]",
        "(Vec<Decimal>)           : TickerInfo[XXBTZEUR].volume : [1920.8 7954.0]",
        "(Vec<Decimal>)           : TickerInfo[XXBTZEUR].volume_average_price : [52389.9 54022.9]",
        "(Vec<u64>)               : TickerInfo[XXBTZEUR].trades : [23329 80463]",
        "(Vec<Decimal>)           : TickerInfo[XXBTZEUR].low : [51513.9 51513.9]",
        "(Vec<Decimal>)           : TickerInfo[XXBTZEUR].high : [53219.9 57200.0]",
        "(Decimal)                : TickerInfo[XXBTZEUR].opening_price : 52280.4",
    ];

    let lines: Vec<&str> = out.lines().filter(|l| *l != SEPARATOR).collect();
    assert_eq!(lines, expected);
    assert_eq!(out.lines().filter(|l| *l == SEPARATOR).count(), 5);
    assert!(!out.contains("XXRPZEUR]"));
}

#[tokio::test]
async fn test_api_error_stops_before_next_call() {
    let server = MockServer::start().await;
    mount(&server, "/0/public/Time", time_body(), 1).await;
    mount(
        &server,
        "/0/public/Assets",
        serde_json::json!({ "error": ["EService:Unavailable"] }),
        1,
    )
    .await;
    mount(&server, "/0/public/AssetPairs", asset_pairs_body(), 0).await;
    mount(&server, "/0/public/Ticker", ticker_body(), 0).await;

    let client = build_client(&server);
    let mut out = Vec::new();
    let err = demo::run(&client, &mut out).await.unwrap_err();
    let out = String::from_utf8(out).unwrap();

    match err {
        KrakenError::Api(api) => assert_eq!(api.code, "EService"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(out.contains("ServerTime.unixtime : 1700000000"));
    assert!(out.ends_with("SpotRestClient::get_assets(None) -> HashMap<String, AssetInfo>\n"));
    assert!(!out.contains("AssetInfo[BCH]"));
    assert!(!out.contains("get_asset_pairs"));
}

#[tokio::test]
async fn test_transport_failure_on_first_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/0/public/Time"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;
    mount(&server, "/0/public/Assets", assets_body(), 0).await;

    let client = build_client(&server);
    let mut out = Vec::new();
    let err = demo::run(&client, &mut out).await.unwrap_err();
    assert!(matches!(err, KrakenError::InvalidResponse(_)));

    let out = String::from_utf8(out).unwrap();
    assert!(!out.contains("ServerTime."));
}

#[tokio::test]
async fn test_missing_asset_key_is_fatal() {
    let server = MockServer::start().await;
    mount(&server, "/0/public/Time", time_body(), 1).await;
    mount(
        &server,
        "/0/public/Assets",
        serde_json::json!({
            "error": [],
            "result": {
                "XXBT": {
                    "aclass": "currency",
                    "altname": "XBT",
                    "decimals": 10,
                    "display_decimals": 5
                }
            }
        }),
        1,
    )
    .await;
    mount(&server, "/0/public/AssetPairs", asset_pairs_body(), 0).await;

    let client = build_client(&server);
    let mut out = Vec::new();
    let err = demo::run(&client, &mut out).await.unwrap_err();
    match err {
        KrakenError::InvalidResponse(msg) => assert!(msg.contains("BCH")),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Client that serves canned responses and records the order of calls.
struct ScriptedClient {
    calls: Mutex<Vec<&'static str>>,
    fail_on: &'static str,
}

impl ScriptedClient {
    fn failing_on(fail_on: &'static str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on,
        }
    }

    fn record(&self, call: &'static str) -> Result<(), KrakenError> {
        self.calls.lock().unwrap().push(call);
        if call == self.fail_on {
            return Err(KrakenError::InvalidResponse(format!("{call} scripted failure")));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

fn result_of<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> T {
    serde_json::from_value(body["result"].clone()).unwrap()
}

impl KrakenClient for ScriptedClient {
    async fn get_server_time(&self) -> Result<ServerTime, KrakenError> {
        self.record("time")?;
        Ok(result_of(time_body()))
    }

    async fn get_system_status(&self) -> Result<SystemStatus, KrakenError> {
        self.record("status")?;
        Ok(SystemStatus {
            status: "online".to_string(),
            timestamp: "2023-11-14T22:13:20Z".to_string(),
        })
    }

    async fn get_assets(
        &self,
        _request: Option<&AssetInfoRequest>,
    ) -> Result<HashMap<String, AssetInfo>, KrakenError> {
        self.record("assets")?;
        Ok(result_of(assets_body()))
    }

    async fn get_asset_pairs(
        &self,
        _request: Option<&AssetPairsRequest>,
    ) -> Result<HashMap<String, AssetPair>, KrakenError> {
        self.record("asset_pairs")?;
        Ok(result_of(asset_pairs_body()))
    }

    async fn get_ticker(&self, _pairs: &str) -> Result<HashMap<String, TickerInfo>, KrakenError> {
        self.record("ticker")?;
        Ok(result_of(ticker_body()))
    }

    async fn get_ohlc(&self, _request: &OhlcRequest) -> Result<OhlcResponse, KrakenError> {
        self.record("ohlc")?;
        Ok(PairSeries {
            rows: HashMap::new(),
            last: 0,
        })
    }

    async fn get_order_book(
        &self,
        _request: &OrderBookRequest,
    ) -> Result<HashMap<String, OrderBook>, KrakenError> {
        self.record("depth")?;
        Ok(HashMap::new())
    }

    async fn get_recent_trades(&self, _request: &HistoryRequest) -> Result<RecentTrades, KrakenError> {
        self.record("trades")?;
        Ok(PairSeries {
            rows: HashMap::new(),
            last: String::new(),
        })
    }

    async fn get_recent_spreads(
        &self,
        _request: &HistoryRequest,
    ) -> Result<RecentSpreads, KrakenError> {
        self.record("spreads")?;
        Ok(PairSeries {
            rows: HashMap::new(),
            last: 0,
        })
    }
}

#[tokio::test]
async fn test_calls_made_in_fixed_order() {
    let client = ScriptedClient::failing_on("none");
    let mut out = Vec::new();
    demo::run(&client, &mut out).await.unwrap();
    assert_eq!(client.calls(), vec!["time", "assets", "asset_pairs", "ticker"]);
}

#[tokio::test]
async fn test_each_failure_stops_the_sequence() {
    let sequence = ["time", "assets", "asset_pairs", "ticker"];
    for (i, &failing) in sequence.iter().enumerate() {
        let client = ScriptedClient::failing_on(failing);
        let mut out = Vec::new();
        let err = demo::run(&client, &mut out).await.unwrap_err();

        assert!(err.to_string().contains("scripted failure"));
        assert_eq!(client.calls(), sequence[..=i].to_vec());
    }
}

#[tokio::test]
#[traced_test]
async fn test_execute_logs_error_and_fails() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/0/public/Time",
        serde_json::json!({ "error": ["EService:Unavailable"] }),
        1,
    )
    .await;
    mount(&server, "/0/public/Assets", assets_body(), 0).await;

    let client = build_client(&server);
    let mut out = Vec::new();
    let code = demo::execute(&client, &mut out).await;

    assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));
    assert!(logs_contain("ERROR"));
    assert!(logs_contain("demo run failed"));
    assert!(logs_contain("EService: Unavailable"));
}

#[tokio::test]
#[traced_test]
async fn test_execute_succeeds_without_error_log() {
    let client = ScriptedClient::failing_on("none");
    let mut out = Vec::new();
    let code = demo::execute(&client, &mut out).await;

    assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));
    assert!(!logs_contain("demo run failed"));
}
