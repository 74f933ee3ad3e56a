//! Routes exercised end to end against fixture snapshot directories.

use std::fs;
use std::sync::Arc;

use api::{app, AppState};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shared::time::now_millis;
use shared::{CacheTtls, DataError, DataResult, DbRepo, PriceRow, PriceStore, SnapshotLoader};
use tempfile::TempDir;
use tower::ServiceExt;

fn write(dir: &TempDir, name: &str, value: Value) {
    fs::write(dir.path().join(name), value.to_string()).unwrap();
}

fn snapshot_app(dir: &TempDir) -> Router {
    app(AppState::new(Arc::new(SnapshotLoader::new(dir.path()))))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(snapshot_app(&dir), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_crypto_prices_from_bare_map() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "crypto-prices.json",
        json!({"BTC": {"price": 65000, "timestamp": 1700000000}}),
    );
    let start = now_millis();

    let (status, body) = get(snapshot_app(&dir), "/api/crypto-prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prices"]["BTC"]["price"], 65000.0);
    assert_eq!(body["prices"]["BTC"]["timestamp"], 1_700_000_000_000i64);
    assert_eq!(body["prices"]["BTC"]["symbol"], "BTC");
    assert!(body["serverTime"].as_i64().unwrap() >= start);
}

#[tokio::test]
async fn test_missing_snapshot_is_404_envelope() {
    let dir = TempDir::new().unwrap();
    let (status, body) = get(snapshot_app(&dir), "/api/trades").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert!(body["msg"].as_str().unwrap().contains("trades.json"));
}

#[tokio::test]
async fn test_malformed_snapshot_is_500_envelope() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("leaderboard.json"), "{not json").unwrap();
    let (status, body) = get(snapshot_app(&dir), "/api/leaderboard").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
}

#[tokio::test]
async fn test_unknown_model_analytics_is_empty_record() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "analytics.json",
        json!({"analytics": [{"model_id": "gpt-5", "updated_at": 1700000000}]}),
    );

    let (status, body) = get(snapshot_app(&dir), "/api/analytics/qwen3-max").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analytics"]["model_id"], "qwen3-max");
    assert_eq!(body["analytics"]["updated_at"], 0.0);
    assert!(body["serverTime"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_model_analytics_prefers_per_model_file() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "analytics-gpt-5.json",
        json!({"analytics": {"model_id": "gpt-5", "updated_at": 1700000500}}),
    );
    write(
        &dir,
        "analytics.json",
        json!({"analytics": [{"model_id": "gpt-5", "updated_at": 1700000000}]}),
    );

    let (status, body) = get(snapshot_app(&dir), "/api/analytics/gpt-5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["analytics"]["updated_at"], 1_700_000_500.0);
}

#[tokio::test]
async fn test_positions_limit_is_accepted_not_applied() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "positions.json",
        json!({"accountTotals": [
            {"model_id": "gpt-5", "positions": {}},
            {"model_id": "claude", "positions": {}}
        ]}),
    );

    let (status, body) = get(snapshot_app(&dir), "/api/positions?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accountTotals"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_bad_positions_limit_is_400_envelope() {
    let dir = TempDir::new().unwrap();
    write(&dir, "positions.json", json!({"accountTotals": []}));

    let (status, body) = get(snapshot_app(&dir), "/api/positions?limit=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(!body["msg"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_every_resource_carries_server_time() {
    let dir = TempDir::new().unwrap();
    write(&dir, "crypto-prices.json", json!({"prices": {}}));
    write(&dir, "account-totals.json", json!({"accountTotals": []}));
    write(&dir, "trades.json", json!({"trades": []}));
    write(&dir, "since-inception-values.json", json!({"sinceInceptionValues": []}));
    write(&dir, "leaderboard.json", json!({"leaderboard": []}));
    write(&dir, "analytics.json", json!({"analytics": []}));
    write(&dir, "positions.json", json!({"accountTotals": []}));
    write(&dir, "conversations.json", json!({"conversations": []}));
    let start = now_millis();

    for uri in [
        "/api/crypto-prices",
        "/api/account-totals",
        "/api/trades",
        "/api/since-inception-values",
        "/api/leaderboard",
        "/api/analytics",
        "/api/analytics/gpt-5",
        "/api/positions",
        "/api/conversations",
    ] {
        let (status, body) = get(snapshot_app(&dir), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body["serverTime"].as_i64().unwrap() >= start, "{uri}");
    }
}

struct DownStore;

#[async_trait]
impl PriceStore for DownStore {
    async fn latest_prices(&self) -> DataResult<Vec<PriceRow>> {
        Err(DataError::Query(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn test_database_outage_serves_snapshot_prices() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "crypto-prices.json",
        json!({"prices": {"BTC": {"symbol": "BTC", "price": 65000, "timestamp": 1700000000000i64}}}),
    );
    let repo = DbRepo::new(
        Arc::new(DownStore),
        None,
        SnapshotLoader::new(dir.path()),
        CacheTtls::default(),
    );

    let (status, body) = get(app(AppState::new(Arc::new(repo))), "/api/crypto-prices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prices"]["BTC"]["price"], 65000.0);
}
