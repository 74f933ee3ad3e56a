//! One-shot copy of the JSON snapshots into the relational tables.
//!
//! A missing or unreadable snapshot skips that resource. Any failed statement
//! aborts the run; re-running is safe because every keyed write is an upsert
//! or insert-ignore.

pub mod store;

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sea_orm::ConnectionTrait;
use serde::Deserialize;
use serde_json::Value;
use shared::data::ANALYTICS_FILE;
use shared::time::{to_millis, value_to_millis};
use shared::{DataSource, SnapshotLoader};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub data_path: PathBuf,
    pub truncate: bool,
}

/// Counts of what one run wrote (or re-asserted).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub prices: usize,
    pub trades: usize,
    pub positions: usize,
    pub equity_snapshots: usize,
    pub analytics: usize,
    pub conversations: usize,
    pub messages: usize,
    pub models: usize,
    pub symbols: usize,
}

/// First pass over `analytics.json`: keep each entry verbatim.
#[derive(Deserialize)]
struct AnalyticsEnvelope {
    #[serde(default)]
    analytics: Vec<Value>,
}

/// Second pass: the only field needed to route a payload.
#[derive(Deserialize)]
struct RoutingKey {
    #[serde(default)]
    model_id: String,
}

pub struct Importer<'a, C> {
    db: &'a C,
    loader: SnapshotLoader,
    models: BTreeSet<String>,
    symbols: BTreeSet<String>,
    summary: ImportSummary,
}

impl<'a, C: ConnectionTrait> Importer<'a, C> {
    pub fn new(db: &'a C, data_path: impl Into<PathBuf>) -> Self {
        Self {
            db,
            loader: SnapshotLoader::new(data_path),
            models: BTreeSet::new(),
            symbols: BTreeSet::new(),
            summary: ImportSummary::default(),
        }
    }

    pub async fn run(mut self, truncate: bool) -> Result<ImportSummary> {
        if truncate {
            info!("truncating destination tables");
            store::truncate_all(self.db).await.context("truncate")?;
        }

        self.import_prices().await?;
        self.skip_since_inception().await;
        self.import_trades().await?;
        self.import_positions().await?;
        self.import_account_totals().await?;
        self.import_analytics().await?;
        self.import_conversations().await?;

        self.summary.models = self.models.len();
        self.summary.symbols = self.symbols.len();
        info!(
            models = self.summary.models,
            symbols = self.summary.symbols,
            "import done"
        );
        Ok(self.summary)
    }

    async fn touch_model(&mut self, model_id: &str) -> Result<()> {
        store::upsert_model(self.db, model_id, model_id)
            .await
            .with_context(|| format!("upsert model {model_id}"))?;
        self.models.insert(model_id.to_string());
        Ok(())
    }

    async fn touch_symbol(&mut self, symbol: &str) -> Result<()> {
        store::upsert_symbol(self.db, symbol)
            .await
            .with_context(|| format!("upsert symbol {symbol}"))?;
        self.symbols.insert(symbol.to_string());
        Ok(())
    }

    async fn import_prices(&mut self) -> Result<()> {
        let resp = match self.loader.load_crypto_prices().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "skip crypto prices");
                return Ok(());
            }
        };
        for (symbol, price) in &resp.prices {
            self.touch_symbol(symbol).await?;
            store::upsert_price_latest(self.db, symbol, price.price, price.timestamp)
                .await
                .with_context(|| format!("upsert price {symbol}"))?;
            self.summary.prices += 1;
        }
        info!(symbols = resp.prices.len(), "imported crypto prices");
        Ok(())
    }

    async fn skip_since_inception(&self) {
        if self.loader.load_since_inception().await.is_ok() {
            info!("skip since-inception: snapshot holds a summary, not a time series");
        }
    }

    async fn import_trades(&mut self) -> Result<()> {
        let resp = match self.loader.load_trades().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "skip trades");
                return Ok(());
            }
        };
        for trade in &resp.trades {
            if trade.model_id.is_empty() || trade.symbol.is_empty() {
                warn!(trade_id = %trade.id, "skip trade without model or symbol");
                continue;
            }
            self.touch_model(&trade.model_id).await?;
            self.touch_symbol(&trade.symbol).await?;
            let entry_ms = to_millis(trade.entry_time);
            let exit_ms = to_millis(trade.exit_time);
            store::insert_trade(self.db, trade, entry_ms, exit_ms)
                .await
                .with_context(|| format!("insert trade {}", trade.id))?;
            self.summary.trades += 1;
        }
        info!(trades = resp.trades.len(), "imported trades");
        Ok(())
    }

    async fn import_positions(&mut self) -> Result<()> {
        let resp = match self.loader.load_positions(None).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "skip positions");
                return Ok(());
            }
        };
        for by_model in &resp.account_totals {
            if by_model.model_id.is_empty() {
                warn!("skip positions without model id");
                continue;
            }
            self.touch_model(&by_model.model_id).await?;
            for (symbol, position) in &by_model.positions {
                self.touch_symbol(symbol).await?;
                let entry_ms = to_millis(position.entry_time);
                store::insert_open_position(self.db, &by_model.model_id, symbol, position, entry_ms)
                    .await
                    .with_context(|| format!("insert position {}:{symbol}", by_model.model_id))?;
                self.summary.positions += 1;
            }
        }
        if self.summary.positions > 0 {
            warn!(
                side = store::IMPORTED_POSITION_SIDE,
                "position direction is not in the snapshot; all positions recorded with a fixed side"
            );
        }
        info!(models = resp.account_totals.len(), "imported positions");
        Ok(())
    }

    async fn import_account_totals(&mut self) -> Result<()> {
        let resp = match self.loader.load_account_totals().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "skip account totals");
                return Ok(());
            }
        };
        for total in &resp.account_totals {
            if total.model_id.is_empty() || total.timestamp == 0.0 {
                continue;
            }
            self.touch_model(&total.model_id).await?;
            store::insert_equity_snapshot(
                self.db,
                &total.model_id,
                to_millis(total.timestamp),
                total.dollar_equity,
            )
            .await
            .with_context(|| format!("insert equity snapshot {}", total.model_id))?;
            self.summary.equity_snapshots += 1;
        }
        info!(rows = resp.account_totals.len(), "imported account equity snapshots");
        Ok(())
    }

    async fn import_analytics(&mut self) -> Result<()> {
        let loaded = self.loader.load_json::<AnalyticsEnvelope>(ANALYTICS_FILE).await;
        let envelope = match loaded {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "skip analytics");
                return Ok(());
            }
        };
        for item in envelope.analytics {
            let key = match serde_json::from_value::<RoutingKey>(item.clone()) {
                Ok(key) if !key.model_id.is_empty() => key,
                _ => {
                    warn!("skip analytics entry without model_id");
                    continue;
                }
            };
            self.touch_model(&key.model_id).await?;
            store::upsert_model_analytics(self.db, &key.model_id, item)
                .await
                .with_context(|| format!("upsert analytics {}", key.model_id))?;
            self.summary.analytics += 1;
        }
        info!(payloads = self.summary.analytics, "imported analytics payloads");
        Ok(())
    }

    async fn import_conversations(&mut self) -> Result<()> {
        let resp = match self.loader.load_conversations().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "skip conversations");
                return Ok(());
            }
        };
        for conversation in &resp.conversations {
            if conversation.model_id.is_empty() {
                warn!("skip conversation without model id");
                continue;
            }
            self.touch_model(&conversation.model_id).await?;
            let conversation_id = store::insert_conversation(self.db, &conversation.model_id)
                .await
                .with_context(|| format!("insert conversation {}", conversation.model_id))?;
            for message in &conversation.messages {
                let ts_ms = message.timestamp.as_ref().map(value_to_millis).unwrap_or(0);
                store::insert_conversation_message(
                    self.db,
                    conversation_id,
                    &message.role,
                    &message.content,
                    ts_ms,
                )
                .await
                .with_context(|| format!("insert message for conversation {conversation_id}"))?;
                self.summary.messages += 1;
            }
            self.summary.conversations += 1;
        }
        info!(conversations = self.summary.conversations, "imported conversations");
        Ok(())
    }
}

/// Run a full import against `db`.
pub async fn run<C: ConnectionTrait>(db: &C, options: &ImportOptions) -> Result<ImportSummary> {
    Importer::new(db, options.data_path.clone())
        .run(options.truncate)
        .await
}
