use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{
    AccountTotalsResponse, AnalyticsResponse, ConversationsResponse, CryptoPricesResponse,
    LeaderboardResponse, ModelAnalyticsResponse, PositionsResponse, SinceInceptionResponse,
    TradesResponse,
};

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct PositionsQuery {
    pub limit: Option<u32>,
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn crypto_prices(State(state): State<AppState>) -> ApiResult<CryptoPricesResponse> {
    Ok(Json(state.source.load_crypto_prices().await?))
}

pub async fn account_totals(State(state): State<AppState>) -> ApiResult<AccountTotalsResponse> {
    Ok(Json(state.source.load_account_totals().await?))
}

pub async fn trades(State(state): State<AppState>) -> ApiResult<TradesResponse> {
    Ok(Json(state.source.load_trades().await?))
}

pub async fn since_inception(State(state): State<AppState>) -> ApiResult<SinceInceptionResponse> {
    Ok(Json(state.source.load_since_inception().await?))
}

pub async fn leaderboard(State(state): State<AppState>) -> ApiResult<LeaderboardResponse> {
    Ok(Json(state.source.load_leaderboard().await?))
}

pub async fn analytics(State(state): State<AppState>) -> ApiResult<AnalyticsResponse> {
    Ok(Json(state.source.load_analytics().await?))
}

pub async fn model_analytics(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
) -> ApiResult<ModelAnalyticsResponse> {
    Ok(Json(state.source.load_model_analytics(&model_id).await?))
}

pub async fn positions(
    State(state): State<AppState>,
    query: Result<Query<PositionsQuery>, QueryRejection>,
) -> ApiResult<PositionsResponse> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    Ok(Json(state.source.load_positions(query.limit).await?))
}

pub async fn conversations(State(state): State<AppState>) -> ApiResult<ConversationsResponse> {
    Ok(Json(state.source.load_conversations().await?))
}
