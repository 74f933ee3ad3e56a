use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // price_latest already holds one row per symbol; the view is the read contract
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE OR REPLACE VIEW v_crypto_prices_latest AS \
                 SELECT symbol, price, ts_ms FROM price_latest",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP VIEW IF EXISTS v_crypto_prices_latest")
            .await?;
        Ok(())
    }
}
