//! `SeaORM` entities for the relational mirror of the snapshots.

pub mod account_equity_snapshots;
pub mod conversation_messages;
pub mod conversations;
pub mod model_analytics;
pub mod models;
pub mod positions;
pub mod price_latest;
pub mod symbols;
pub mod trades;
