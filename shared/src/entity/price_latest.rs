//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

/// Most recent observed price; one row per symbol, overwritten on update.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "price_latest")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub symbol: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub ts_ms: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::symbols::Entity",
        from = "Column::Symbol",
        to = "super::symbols::Column::Symbol",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Symbols,
}

impl Related<super::symbols::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Symbols.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
