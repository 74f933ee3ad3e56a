//! Idempotent writes for each snapshot table.
//!
//! Dimension rows and keyed records use insert-or-update / insert-ignore on
//! their primary key so a re-run over unchanged snapshots changes nothing.
//! Insert-ignore is `do_nothing_on` so MySQL gets a no-op
//! `ON DUPLICATE KEY UPDATE` instead of an unsupported `IGNORE` clause.
//! Conversations and their messages are insert-only.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue, ConnectionTrait, DbBackend, DbErr, EntityTrait, Insert};
use serde_json::Value;
use shared::entity::{
    account_equity_snapshots, conversation_messages, conversations, model_analytics, models,
    positions, price_latest, symbols, trades,
};

/// 0 is how the snapshots spell "not set".
fn null_if_zero(value: f64) -> Option<f64> {
    (value != 0.0).then_some(value)
}

fn null_if_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub async fn upsert_model<C: ConnectionTrait>(db: &C, id: &str, display_name: &str) -> Result<(), DbErr> {
    let model = models::ActiveModel {
        id: ActiveValue::Set(id.trim().to_string()),
        display_name: ActiveValue::Set(display_name.to_string()),
    };
    models::Entity::insert(model)
        .on_conflict(
            OnConflict::column(models::Column::Id)
                .update_column(models::Column::DisplayName)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

fn symbol_insert(symbol: &str) -> Insert<symbols::ActiveModel> {
    let row = symbols::ActiveModel {
        symbol: ActiveValue::Set(symbol.trim().to_string()),
    };
    symbols::Entity::insert(row).on_conflict(
        OnConflict::column(symbols::Column::Symbol)
            .do_nothing_on([symbols::Column::Symbol])
            .to_owned(),
    )
}

pub async fn upsert_symbol<C: ConnectionTrait>(db: &C, symbol: &str) -> Result<(), DbErr> {
    symbol_insert(symbol).exec_without_returning(db).await?;
    Ok(())
}

pub async fn upsert_price_latest<C: ConnectionTrait>(
    db: &C,
    symbol: &str,
    price: f64,
    ts_ms: i64,
) -> Result<(), DbErr> {
    let row = price_latest::ActiveModel {
        symbol: ActiveValue::Set(symbol.trim().to_string()),
        price: ActiveValue::Set(price),
        ts_ms: ActiveValue::Set(ts_ms),
    };
    price_latest::Entity::insert(row)
        .on_conflict(
            OnConflict::column(price_latest::Column::Symbol)
                .update_columns([price_latest::Column::Price, price_latest::Column::TsMs])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

fn trade_insert(trade: &shared::Trade, entry_ms: i64, exit_ms: i64) -> Insert<trades::ActiveModel> {
    let row = trades::ActiveModel {
        id: ActiveValue::Set(trade.id.clone()),
        model_id: ActiveValue::Set(trade.model_id.clone()),
        symbol: ActiveValue::Set(trade.symbol.clone()),
        side: ActiveValue::Set(trade.side.clone()),
        trade_type: ActiveValue::Set(null_if_blank(&trade.trade_type)),
        quantity: ActiveValue::Set(null_if_zero(trade.quantity)),
        leverage: ActiveValue::Set(null_if_zero(trade.leverage)),
        confidence: ActiveValue::Set(null_if_zero(trade.confidence)),
        entry_price: ActiveValue::Set(trade.entry_price),
        entry_ts_ms: ActiveValue::Set(entry_ms),
        exit_price: ActiveValue::Set(trade.exit_price),
        exit_ts_ms: ActiveValue::Set(exit_ms),
        realized_gross_pnl: ActiveValue::Set(trade.realized_gross_pnl),
        realized_net_pnl: ActiveValue::Set(trade.realized_net_pnl),
        total_commission_dollars: ActiveValue::Set(trade.total_commission_dollars),
    };
    trades::Entity::insert(row).on_conflict(
        OnConflict::column(trades::Column::Id)
            .do_nothing_on([trades::Column::Id])
            .to_owned(),
    )
}

pub async fn insert_trade<C: ConnectionTrait>(
    db: &C,
    trade: &shared::Trade,
    entry_ms: i64,
    exit_ms: i64,
) -> Result<(), DbErr> {
    trade_insert(trade, entry_ms, exit_ms)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Synthetic key for an open position slot.
pub fn position_id(model_id: &str, symbol: &str, entry_ms: i64) -> String {
    format!("{model_id}:{symbol}:{entry_ms}")
}

/// The snapshots do not say which way a position faces, so every imported
/// position is recorded as long.
pub const IMPORTED_POSITION_SIDE: &str = "long";

fn position_insert(
    model_id: &str,
    symbol: &str,
    position: &shared::Position,
    entry_ms: i64,
) -> Insert<positions::ActiveModel> {
    let row = positions::ActiveModel {
        id: ActiveValue::Set(position_id(model_id, symbol, entry_ms)),
        model_id: ActiveValue::Set(model_id.to_string()),
        symbol: ActiveValue::Set(symbol.to_string()),
        side: ActiveValue::Set(IMPORTED_POSITION_SIDE.to_string()),
        entry_price: ActiveValue::Set(position.entry_price),
        quantity: ActiveValue::Set(position.quantity),
        leverage: ActiveValue::Set(null_if_zero(position.leverage)),
        confidence: ActiveValue::Set(null_if_zero(position.confidence)),
        entry_ts_ms: ActiveValue::Set(entry_ms),
        status: ActiveValue::Set("open".to_string()),
    };
    positions::Entity::insert(row).on_conflict(
        OnConflict::column(positions::Column::Id)
            .do_nothing_on([positions::Column::Id])
            .to_owned(),
    )
}

pub async fn insert_open_position<C: ConnectionTrait>(
    db: &C,
    model_id: &str,
    symbol: &str,
    position: &shared::Position,
    entry_ms: i64,
) -> Result<(), DbErr> {
    position_insert(model_id, symbol, position, entry_ms)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

const EQUITY_SNAPSHOT_KEY: [account_equity_snapshots::Column; 2] = [
    account_equity_snapshots::Column::ModelId,
    account_equity_snapshots::Column::TsMs,
];

fn equity_snapshot_insert(
    model_id: &str,
    ts_ms: i64,
    equity_usd: f64,
) -> Insert<account_equity_snapshots::ActiveModel> {
    let row = account_equity_snapshots::ActiveModel {
        model_id: ActiveValue::Set(model_id.to_string()),
        ts_ms: ActiveValue::Set(ts_ms),
        equity_usd: ActiveValue::Set(equity_usd),
    };
    account_equity_snapshots::Entity::insert(row).on_conflict(
        OnConflict::columns(EQUITY_SNAPSHOT_KEY)
            .do_nothing_on(EQUITY_SNAPSHOT_KEY)
            .to_owned(),
    )
}

pub async fn insert_equity_snapshot<C: ConnectionTrait>(
    db: &C,
    model_id: &str,
    ts_ms: i64,
    equity_usd: f64,
) -> Result<(), DbErr> {
    equity_snapshot_insert(model_id, ts_ms, equity_usd)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn upsert_model_analytics<C: ConnectionTrait>(
    db: &C,
    model_id: &str,
    payload: Value,
) -> Result<(), DbErr> {
    let row = model_analytics::ActiveModel {
        model_id: ActiveValue::Set(model_id.to_string()),
        payload: ActiveValue::Set(payload),
        updated_at: ActiveValue::Set(Utc::now()),
    };
    model_analytics::Entity::insert(row)
        .on_conflict(
            OnConflict::column(model_analytics::Column::ModelId)
                .update_columns([
                    model_analytics::Column::Payload,
                    model_analytics::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn insert_conversation<C: ConnectionTrait>(db: &C, model_id: &str) -> Result<i64, DbErr> {
    let row = conversations::ActiveModel {
        model_id: ActiveValue::Set(model_id.to_string()),
        ..Default::default()
    };
    let result = conversations::Entity::insert(row).exec(db).await?;
    Ok(result.last_insert_id)
}

pub async fn insert_conversation_message<C: ConnectionTrait>(
    db: &C,
    conversation_id: i64,
    role: &str,
    content: &str,
    ts_ms: i64,
) -> Result<(), DbErr> {
    let role = if role.is_empty() { "assistant" } else { role };
    let row = conversation_messages::ActiveModel {
        conversation_id: ActiveValue::Set(conversation_id),
        role: ActiveValue::Set(role.to_string()),
        content: ActiveValue::Set(content.to_string()),
        ts_ms: ActiveValue::Set(ts_ms),
        ..Default::default()
    };
    conversation_messages::Entity::insert(row).exec(db).await?;
    Ok(())
}

/// Empty every snapshot table, children first.
pub async fn truncate_all<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    conversation_messages::Entity::delete_many().exec(db).await?;
    conversations::Entity::delete_many().exec(db).await?;
    model_analytics::Entity::delete_many().exec(db).await?;
    trades::Entity::delete_many().exec(db).await?;
    positions::Entity::delete_many().exec(db).await?;
    account_equity_snapshots::Entity::delete_many().exec(db).await?;
    price_latest::Entity::delete_many().exec(db).await?;
    symbols::Entity::delete_many().exec(db).await?;
    models::Entity::delete_many().exec(db).await?;

    if db.get_database_backend() == DbBackend::MySql {
        db.execute_unprepared("ALTER TABLE conversations AUTO_INCREMENT = 1").await?;
        db.execute_unprepared("ALTER TABLE conversation_messages AUTO_INCREMENT = 1").await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    fn mysql(sql: impl QueryTrait) -> String {
        sql.build(DbBackend::MySql).to_string()
    }

    #[test]
    fn test_keyed_inserts_render_valid_mysql() {
        let trade = shared::Trade {
            id: "t-1".to_string(),
            model_id: "gpt-5".to_string(),
            symbol: "BTC".to_string(),
            ..Default::default()
        };
        let position = shared::Position::default();
        let statements = [
            mysql(symbol_insert("BTC")),
            mysql(trade_insert(&trade, 0, 0)),
            mysql(position_insert("gpt-5", "BTC", &position, 0)),
            mysql(equity_snapshot_insert("gpt-5", 1_700_000_000_000, 10_000.0)),
        ];
        for sql in &statements {
            assert!(sql.contains("ON DUPLICATE KEY UPDATE"), "{sql}");
            assert!(!sql.contains("IGNORE"), "{sql}");
        }
        assert!(statements[0].contains("`symbol` = `symbol`"), "{}", statements[0]);
        assert!(statements[1].contains("`id` = `id`"), "{}", statements[1]);
    }

    #[test]
    fn test_position_id() {
        assert_eq!(position_id("gpt-5", "BTC", 1_700_000_000_000), "gpt-5:BTC:1700000000000");
    }

    #[test]
    fn test_nullable_helpers() {
        assert_eq!(null_if_zero(0.0), None);
        assert_eq!(null_if_zero(2.5), Some(2.5));
        assert_eq!(null_if_blank("  "), None);
        assert_eq!(null_if_blank(" isolated "), Some("isolated".to_string()));
    }
}
