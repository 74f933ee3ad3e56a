//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "symbols")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub symbol: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::price_latest::Entity")]
    PriceLatest,
}

impl Related<super::price_latest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceLatest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
