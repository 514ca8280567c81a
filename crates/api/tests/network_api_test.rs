use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use chainrest_api::create_app;
use chainrest_core::{ApiConfig, ApiNodeConfig, FeeStatsConfig, NetworkError, NetworkResult};
use chainrest_domain::{BlockRepository, NetworkIdentity};
use chainrest_infrastructure::{DatabaseManager, InMemoryBlockRepository, NetworkService};

const NETWORK_PROPERTIES: &str = r#"
[network]
identifier = testnet
epochAdjustment = 1573430400s

[chain]
maxDifficultyBlocks = 4
defaultDynamicFeeMultiplier = 10'000

[fork_heights]
totalVotingBalanceCalculationFix = 0

[treasury_reissuance_transaction_signatures]
B3 = true
A1 = true
C2 = false

[plugin:catapult.plugins.namespace]
rootNamespaceRentalFeePerBlock = 1'000
childNamespaceRentalFee = 10'000

[plugin:catapult.plugins.mosaic]
mosaicRentalFee = 50'000
"#;

const NODE_PROPERTIES: &str = "[node]\nminFeeMultiplier = 100\n";

const INFLATION_PROPERTIES: &str = r#"
[inflation]
starting-at-height-100 = 50
starting-at-height-2 = 100
starting-at-height-1000 = 0
"#;

/// 始终失败的区块仓储
struct FailingBlockRepository;

#[async_trait]
impl BlockRepository for FailingBlockRepository {
    async fn latest_blocks_fee_multiplier(&self, _count: u32) -> NetworkResult<Vec<u32>> {
        Err(NetworkError::Internal("数据库不可用".to_string()))
    }
}

struct TestApp {
    _dir: TempDir,
    database: Arc<DatabaseManager>,
    router: Router,
}

fn write_files(dir: &Path, network: Option<&str>, inflation: Option<&str>) -> ApiNodeConfig {
    let files = ApiNodeConfig {
        network_property_file_path: dir.join("config-network.properties").display().to_string(),
        node_property_file_path: dir.join("config-node.properties").display().to_string(),
        inflation_property_file_path: dir.join("config-inflation.properties").display().to_string(),
    };

    if let Some(network) = network {
        std::fs::write(&files.network_property_file_path, network).unwrap();
    }
    if let Some(inflation) = inflation {
        std::fs::write(&files.inflation_property_file_path, inflation).unwrap();
    }
    std::fs::write(&files.node_property_file_path, NODE_PROPERTIES).unwrap();

    files
}

async fn create_test_app(
    network: Option<&str>,
    inflation: Option<&str>,
    blocks: Arc<dyn BlockRepository>,
) -> TestApp {
    let dir = TempDir::new().unwrap();
    let files = write_files(dir.path(), network, inflation);

    let service = NetworkService::new(
        files,
        FeeStatsConfig {
            num_blocks_transaction_fee_stats: 3,
        },
        blocks,
    );

    let identity = NetworkIdentity {
        name: "testnet".to_string(),
        description: "catapult development network".to_string(),
    };

    let database = Arc::new(DatabaseManager::connect("sqlite::memory:", 1).await.unwrap());
    let router = create_app(
        identity,
        Arc::new(service),
        database.clone(),
        &ApiConfig::default(),
    );

    TestApp {
        _dir: dir,
        database,
        router,
    }
}

async fn default_app() -> TestApp {
    create_test_app(
        Some(NETWORK_PROPERTIES),
        Some(INFLATION_PROPERTIES),
        Arc::new(InMemoryBlockRepository::with_fee_multipliers([7, 0, 20, 30])),
    )
    .await
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = default_app().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
    assert_eq!(body["network"], "testnet");
    assert_eq!(body["service"], "chainrest");
}

#[tokio::test]
async fn test_health_reports_database_down() {
    let app = default_app().await;
    app.database.close().await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "down");
}

#[tokio::test]
async fn test_network_identity() {
    let app = default_app().await;

    let (status, body) = get(&app, "/network").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"name": "testnet", "description": "catapult development network"})
    );
}

#[tokio::test]
async fn test_network_properties() {
    let app = default_app().await;

    let (status, body) = get(&app, "/network/properties").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["network"]["identifier"], "testnet");
    assert_eq!(body["chain"]["maxDifficultyBlocks"], "4");
    assert_eq!(body["forkHeights"]["totalVotingBalanceCalculationFix"], "0");
    assert_eq!(body["plugins"]["mosaic"]["mosaicRentalFee"], "50'000");
    assert_eq!(body["treasuryReissuanceTransactionSignatures"], json!(["A1", "B3"]));
    assert!(body.get("corruptAggregateTransactionHashes").is_none());
}

#[tokio::test]
async fn test_network_properties_missing_file() {
    let app = create_test_app(
        None,
        Some(INFLATION_PROPERTIES),
        Arc::new(InMemoryBlockRepository::new()),
    )
    .await;

    let (status, body) = get(&app, "/network/properties").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        json!({
            "code": "InvalidArgument",
            "message": "there was an error reading the network properties file"
        })
    );
}

#[tokio::test]
async fn test_inflation_schedule() {
    let app = default_app().await;

    let (status, body) = get(&app, "/network/inflation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"startHeight": "2", "rewardAmount": "100"},
            {"startHeight": "100", "rewardAmount": "50"},
            {"startHeight": "1000", "rewardAmount": "0"}
        ])
    );
}

#[tokio::test]
async fn test_inflation_at_height() {
    let app = default_app().await;

    let (_, body) = get(&app, "/network/inflation/at/1").await;
    assert_eq!(body, json!({"startHeight": "N/A", "rewardAmount": "0"}));

    let (_, body) = get(&app, "/network/inflation/at/99").await;
    assert_eq!(body, json!({"startHeight": "2", "rewardAmount": "100"}));

    let (_, body) = get(&app, "/network/inflation/at/100").await;
    assert_eq!(body, json!({"startHeight": "100", "rewardAmount": "50"}));

    let (status, body) = get(&app, "/network/inflation/at/18446744073709551615").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["startHeight"], "1000");
}

#[tokio::test]
async fn test_inflation_at_invalid_height() {
    let app = default_app().await;

    let (status, body) = get(&app, "/network/inflation/at/abc").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "InvalidArgument");
    assert_eq!(
        body["message"],
        "there was an error reading the inflation properties file"
    );
}

#[tokio::test]
async fn test_inflation_empty_schedule() {
    let app = create_test_app(
        Some(NETWORK_PROPERTIES),
        Some("[inflation]\n"),
        Arc::new(InMemoryBlockRepository::new()),
    )
    .await;

    let (status, body) = get(&app, "/network/inflation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = get(&app, "/network/inflation/at/10").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "InvalidArgument");
}

#[tokio::test]
async fn test_transaction_fees() {
    let app = default_app().await;

    // 最近 3 个区块: 30, 20, 0
    let (status, body) = get(&app, "/network/fees/transaction").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "averageFeeMultiplier": 3350,
            "medianFeeMultiplier": 30,
            "highestFeeMultiplier": 30,
            "lowestFeeMultiplier": 0,
            "minFeeMultiplier": 100
        })
    );
}

#[tokio::test]
async fn test_transaction_fees_without_blocks() {
    let app = create_test_app(
        Some(NETWORK_PROPERTIES),
        Some(INFLATION_PROPERTIES),
        Arc::new(InMemoryBlockRepository::new()),
    )
    .await;

    let (status, body) = get(&app, "/network/fees/transaction").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["averageFeeMultiplier"].is_null());
    assert!(body["lowestFeeMultiplier"].is_null());
    assert_eq!(body["minFeeMultiplier"], 100);
}

#[tokio::test]
async fn test_transaction_fees_failures_are_internal() {
    let app = create_test_app(
        None,
        Some(INFLATION_PROPERTIES),
        Arc::new(InMemoryBlockRepository::new()),
    )
    .await;

    let (status, body) = get(&app, "/network/fees/transaction").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "Internal");
}

#[tokio::test]
async fn test_rental_fees() {
    let app = default_app().await;

    // 最近 4 个区块: 30, 20, 0, 7 -> [30, 20, 10000, 7] -> 中位数 25
    let (status, body) = get(&app, "/network/fees/rental").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "effectiveRootNamespaceRentalFeePerBlock": "25000",
            "effectiveChildNamespaceRentalFee": "250000",
            "effectiveMosaicRentalFee": "1250000"
        })
    );
}

#[tokio::test]
async fn test_rental_fees_overflow_is_invalid_argument() {
    let network = NETWORK_PROPERTIES.replace(
        "mosaicRentalFee = 50'000",
        "mosaicRentalFee = 18'446'744'073'709'551'615",
    );
    let app = create_test_app(
        Some(&network),
        Some(INFLATION_PROPERTIES),
        Arc::new(InMemoryBlockRepository::with_fee_multipliers([2])),
    )
    .await;

    let (status, body) = get(&app, "/network/fees/rental").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "there was an error reading the network properties file"
    );
}

#[tokio::test]
async fn test_rental_fees_repository_failure_is_internal() {
    let app = create_test_app(
        Some(NETWORK_PROPERTIES),
        Some(INFLATION_PROPERTIES),
        Arc::new(FailingBlockRepository),
    )
    .await;

    let (status, body) = get(&app, "/network/fees/rental").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "Internal");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = default_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/network/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
