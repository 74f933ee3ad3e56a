//! Response and record types mirroring the snapshot documents.
//!
//! Record fields default when absent so partially populated snapshots decode.
//! Envelope keys are camelCase, record fields snake_case.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::time::deserialize_millis;

// ---------------------------------------------------------------------------
// Crypto prices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoPrice {
    pub symbol: String,
    pub price: f64,
    /// Milliseconds since epoch
    #[serde(deserialize_with = "deserialize_millis")]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoPricesResponse {
    pub prices: BTreeMap<String, CryptoPrice>,
    #[serde(default)]
    pub server_time: i64,
}

/// Row read from the latest-price view.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PriceRow {
    pub symbol: String,
    pub price: f64,
    pub ts_ms: i64,
}

impl From<PriceRow> for CryptoPrice {
    fn from(row: PriceRow) -> Self {
        CryptoPrice {
            symbol: row.symbol,
            price: row.price,
            timestamp: row.ts_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Positions and account totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitPlan {
    pub profit_target: f64,
    pub stop_loss: f64,
    pub invalidation_condition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub entry_oid: i64,
    pub risk_usd: f64,
    pub confidence: f64,
    pub exit_plan: ExitPlan,
    /// Raw epoch as published (usually seconds)
    pub entry_time: f64,
    pub symbol: String,
    pub entry_price: f64,
    pub margin: f64,
    pub leverage: f64,
    /// Positive for long, negative for short
    pub quantity: f64,
    pub current_price: f64,
    pub unrealized_pnl: f64,
    pub closed_pnl: f64,
    pub liquidation_price: f64,
    pub commission: f64,
}

impl Position {
    /// Mark-to-market PnL from the snapshot prices.
    pub fn computed_unrealized_pnl(&self) -> f64 {
        (self.current_price - self.entry_price) * self.quantity
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountTotal {
    pub id: String,
    pub model_id: String,
    pub timestamp: f64,
    pub dollar_equity: f64,
    pub realized_pnl: f64,
    pub total_unrealized_pnl: f64,
    pub cum_pnl_pct: f64,
    pub sharpe: f64,
    pub since_inception_hourly_marker: i64,
    pub since_inception_minute_marker: i64,
    pub positions: BTreeMap<String, Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountTotalsResponse {
    pub account_totals: Vec<AccountTotal>,
    pub last_hourly_marker_read: i64,
    pub server_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionsByModel {
    #[serde(alias = "id")]
    pub model_id: String,
    pub positions: BTreeMap<String, Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PositionsResponse {
    pub account_totals: Vec<PositionsByModel>,
    pub server_time: i64,
}

// ---------------------------------------------------------------------------
// Trades
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trade {
    pub id: String,
    pub model_id: String,
    pub symbol: String,
    pub side: String,
    pub trade_type: String,
    pub quantity: f64,
    pub leverage: f64,
    pub confidence: f64,
    pub entry_price: f64,
    pub entry_time: f64,
    pub entry_human_time: String,
    pub exit_price: f64,
    pub exit_time: f64,
    pub exit_human_time: String,
    pub realized_gross_pnl: f64,
    pub realized_net_pnl: f64,
    pub total_commission_dollars: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TradesResponse {
    pub trades: Vec<Trade>,
    pub server_time: i64,
}

// ---------------------------------------------------------------------------
// Since inception / leaderboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinceInceptionValue {
    pub id: String,
    pub model_id: String,
    pub nav_since_inception: f64,
    pub inception_date: f64,
    pub num_invocations: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SinceInceptionResponse {
    pub since_inception_values: Vec<SinceInceptionValue>,
    pub server_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardEntry {
    pub id: String,
    pub num_trades: i64,
    pub sharpe: f64,
    pub num_wins: i64,
    pub num_losses: i64,
    pub return_pct: f64,
    pub equity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub server_time: i64,
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// Per-model analytics. The breakdown tables are opaque and kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelAnalytics {
    pub model_id: String,
    pub updated_at: f64,
    pub last_trade_exit_time: f64,
    #[serde(flatten)]
    pub tables: Map<String, Value>,
}

impl ModelAnalytics {
    /// Zero-valued record for a model with no published analytics.
    pub fn empty(model_id: &str) -> Self {
        ModelAnalytics {
            model_id: model_id.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub analytics: Vec<ModelAnalytics>,
    pub server_time: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelAnalyticsResponse {
    pub analytics: ModelAnalytics,
    pub server_time: i64,
}

// ---------------------------------------------------------------------------
// Conversations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
    /// Number (seconds or ms) or date string, as published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversation {
    pub model_id: String,
    pub messages: Vec<ConversationMessage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConversationsResponse {
    pub conversations: Vec<Conversation>,
    pub server_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_timestamp_normalized_on_decode() {
        let price: CryptoPrice =
            serde_json::from_value(json!({"price": 65000, "timestamp": 1700000000})).unwrap();
        assert_eq!(price.price, 65000.0);
        assert_eq!(price.timestamp, 1_700_000_000_000);
        assert_eq!(price.symbol, "");
    }

    #[test]
    fn test_positions_by_model_accepts_id_alias() {
        let pm: PositionsByModel = serde_json::from_value(json!({
            "id": "gpt-5",
            "positions": {"BTC": {"symbol": "BTC", "quantity": 0.5}}
        }))
        .unwrap();
        assert_eq!(pm.model_id, "gpt-5");
        assert_eq!(pm.positions["BTC"].quantity, 0.5);
    }

    #[test]
    fn test_computed_unrealized_pnl() {
        let long = Position {
            entry_price: 100.0,
            current_price: 110.0,
            quantity: 2.0,
            ..Default::default()
        };
        assert_eq!(long.computed_unrealized_pnl(), 20.0);

        let short = Position {
            quantity: -2.0,
            ..long
        };
        assert_eq!(short.computed_unrealized_pnl(), -20.0);
    }

    #[test]
    fn test_analytics_tables_survive_round_trip() {
        let raw = json!({
            "model_id": "grok-4",
            "updated_at": 1700000000.0,
            "signals_breakdown_table": {"avg_confidence": 0.7}
        });
        let analytics: ModelAnalytics = serde_json::from_value(raw).unwrap();
        assert_eq!(analytics.tables["signals_breakdown_table"]["avg_confidence"], 0.7);

        let out = serde_json::to_value(&analytics).unwrap();
        assert_eq!(out["signals_breakdown_table"]["avg_confidence"], 0.7);
    }

    #[test]
    fn test_envelope_keys_are_camel_case() {
        let resp = TradesResponse {
            trades: vec![],
            server_time: 42,
        };
        let out = serde_json::to_value(&resp).unwrap();
        assert_eq!(out["serverTime"], 42);
    }
}
