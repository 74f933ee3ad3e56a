//! HTTP surface over a [`DataSource`].

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};
use shared::DataSource;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/crypto-prices", get(routes::crypto_prices))
        .route("/account-totals", get(routes::account_totals))
        .route("/trades", get(routes::trades))
        .route("/since-inception-values", get(routes::since_inception))
        .route("/leaderboard", get(routes::leaderboard))
        .route("/analytics", get(routes::analytics))
        .route("/analytics/:model_id", get(routes::model_analytics))
        .route("/positions", get(routes::positions))
        .route("/conversations", get(routes::conversations));

    Router::new()
        .route("/health", get(routes::health_check))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
