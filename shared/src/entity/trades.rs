//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

/// Closed position record. Append-only, keyed by the published trade id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trades")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub model_id: String,
    pub symbol: String,
    pub side: String,
    #[sea_orm(nullable)]
    pub trade_type: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub quantity: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub leverage: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub confidence: Option<f64>,
    #[sea_orm(column_type = "Double")]
    pub entry_price: f64,
    pub entry_ts_ms: i64,
    #[sea_orm(column_type = "Double")]
    pub exit_price: f64,
    pub exit_ts_ms: i64,
    #[sea_orm(column_type = "Double")]
    pub realized_gross_pnl: f64,
    #[sea_orm(column_type = "Double")]
    pub realized_net_pnl: f64,
    #[sea_orm(column_type = "Double")]
    pub total_commission_dollars: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::models::Entity",
        from = "Column::ModelId",
        to = "super::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Models,
}

impl Related<super::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Models.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
