//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

/// Open position slot per (model, symbol).
/// `id` is `"<model_id>:<symbol>:<entry_ts_ms>"`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "positions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub model_id: String,
    pub symbol: String,
    pub side: String, // "long" or "short"
    #[sea_orm(column_type = "Double")]
    pub entry_price: f64,
    #[sea_orm(column_type = "Double")]
    pub quantity: f64,
    #[sea_orm(column_type = "Double", nullable)]
    pub leverage: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub confidence: Option<f64>,
    pub entry_ts_ms: i64,
    pub status: String, // "open", "closed"
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
