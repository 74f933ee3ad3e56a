use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dimension tables first
        manager
            .create_table(
                Table::create()
                    .table(Models::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Models::Id).string_len(128).not_null().primary_key())
                    .col(ColumnDef::new(Models::DisplayName).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Symbols::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Symbols::Symbol).string_len(32).not_null().primary_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PriceLatest::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PriceLatest::Symbol).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(PriceLatest::Price).double().not_null())
                    .col(ColumnDef::new(PriceLatest::TsMs).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_latest_symbol")
                            .from(PriceLatest::Table, PriceLatest::Symbol)
                            .to(Symbols::Table, Symbols::Symbol)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trades::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trades::Id).string_len(128).not_null().primary_key())
                    .col(ColumnDef::new(Trades::ModelId).string_len(128).not_null())
                    .col(ColumnDef::new(Trades::Symbol).string_len(32).not_null())
                    .col(ColumnDef::new(Trades::Side).string_len(16).not_null())
                    .col(ColumnDef::new(Trades::TradeType).string_len(32).null())
                    .col(ColumnDef::new(Trades::Quantity).double().null())
                    .col(ColumnDef::new(Trades::Leverage).double().null())
                    .col(ColumnDef::new(Trades::Confidence).double().null())
                    .col(ColumnDef::new(Trades::EntryPrice).double().not_null())
                    .col(ColumnDef::new(Trades::EntryTsMs).big_integer().not_null())
                    .col(ColumnDef::new(Trades::ExitPrice).double().not_null())
                    .col(ColumnDef::new(Trades::ExitTsMs).big_integer().not_null())
                    .col(ColumnDef::new(Trades::RealizedGrossPnl).double().not_null())
                    .col(ColumnDef::new(Trades::RealizedNetPnl).double().not_null())
                    .col(ColumnDef::new(Trades::TotalCommissionDollars).double().not_null())
                    .index(
                        Index::create()
                            .name("idx_trades_model_exit")
                            .table(Trades::Table)
                            .col(Trades::ModelId)
                            .col(Trades::ExitTsMs),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trades_model")
                            .from(Trades::Table, Trades::ModelId)
                            .to(Models::Table, Models::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trades_symbol")
                            .from(Trades::Table, Trades::Symbol)
                            .to(Symbols::Table, Symbols::Symbol),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Positions::Id).string_len(255).not_null().primary_key())
                    .col(ColumnDef::new(Positions::ModelId).string_len(128).not_null())
                    .col(ColumnDef::new(Positions::Symbol).string_len(32).not_null())
                    .col(ColumnDef::new(Positions::Side).string_len(16).not_null()) // "long" or "short"
                    .col(ColumnDef::new(Positions::EntryPrice).double().not_null())
                    .col(ColumnDef::new(Positions::Quantity).double().not_null())
                    .col(ColumnDef::new(Positions::Leverage).double().null())
                    .col(ColumnDef::new(Positions::Confidence).double().null())
                    .col(ColumnDef::new(Positions::EntryTsMs).big_integer().not_null())
                    .col(ColumnDef::new(Positions::Status).string_len(16).not_null().default("open"))
                    .index(
                        Index::create()
                            .name("idx_positions_model_symbol")
                            .table(Positions::Table)
                            .col(Positions::ModelId)
                            .col(Positions::Symbol),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_positions_model")
                            .from(Positions::Table, Positions::ModelId)
                            .to(Models::Table, Models::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_positions_symbol")
                            .from(Positions::Table, Positions::Symbol)
                            .to(Symbols::Table, Symbols::Symbol),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ModelAnalytics::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ModelAnalytics::ModelId).string_len(128).not_null().primary_key())
                    .col(ColumnDef::new(ModelAnalytics::Payload).json().not_null())
                    .col(ColumnDef::new(ModelAnalytics::UpdatedAt).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_model_analytics_model")
                            .from(ModelAnalytics::Table, ModelAnalytics::ModelId)
                            .to(Models::Table, Models::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Conversations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Conversations::Id).big_integer().auto_increment().primary_key())
                    .col(ColumnDef::new(Conversations::ModelId).string_len(128).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversations_model")
                            .from(Conversations::Table, Conversations::ModelId)
                            .to(Models::Table, Models::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConversationMessages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ConversationMessages::Id).big_integer().auto_increment().primary_key())
                    .col(ColumnDef::new(ConversationMessages::ConversationId).big_integer().not_null())
                    .col(ColumnDef::new(ConversationMessages::Role).string_len(16).not_null())
                    .col(ColumnDef::new(ConversationMessages::Content).text().not_null())
                    .col(ColumnDef::new(ConversationMessages::TsMs).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conversation_messages_conversation")
                            .from(ConversationMessages::Table, ConversationMessages::ConversationId)
                            .to(Conversations::Table, Conversations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountEquitySnapshots::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccountEquitySnapshots::ModelId).string_len(128).not_null())
                    .col(ColumnDef::new(AccountEquitySnapshots::TsMs).big_integer().not_null())
                    .col(ColumnDef::new(AccountEquitySnapshots::EquityUsd).double().not_null())
                    .primary_key(
                        Index::create()
                            .col(AccountEquitySnapshots::ModelId)
                            .col(AccountEquitySnapshots::TsMs),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_equity_snapshots_model")
                            .from(AccountEquitySnapshots::Table, AccountEquitySnapshots::ModelId)
                            .to(Models::Table, Models::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before parents
        for table in [
            AccountEquitySnapshots::Table.into_iden(),
            ConversationMessages::Table.into_iden(),
            Conversations::Table.into_iden(),
            ModelAnalytics::Table.into_iden(),
            Positions::Table.into_iden(),
            Trades::Table.into_iden(),
            PriceLatest::Table.into_iden(),
            Symbols::Table.into_iden(),
            Models::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Models {
    Table,
    Id,
    DisplayName,
}

#[derive(DeriveIden)]
enum Symbols {
    Table,
    Symbol,
}

#[derive(DeriveIden)]
enum PriceLatest {
    Table,
    Symbol,
    Price,
    TsMs,
}

#[derive(DeriveIden)]
enum Trades {
    Table,
    Id,
    ModelId,
    Symbol,
    Side,
    TradeType,
    Quantity,
    Leverage,
    Confidence,
    EntryPrice,
    EntryTsMs,
    ExitPrice,
    ExitTsMs,
    RealizedGrossPnl,
    RealizedNetPnl,
    TotalCommissionDollars,
}

#[derive(DeriveIden)]
enum Positions {
    Table,
    Id,
    ModelId,
    Symbol,
    Side,
    EntryPrice,
    Quantity,
    Leverage,
    Confidence,
    EntryTsMs,
    Status,
}

#[derive(DeriveIden)]
enum ModelAnalytics {
    Table,
    ModelId,
    Payload,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Conversations {
    Table,
    Id,
    ModelId,
}

#[derive(DeriveIden)]
enum ConversationMessages {
    Table,
    Id,
    ConversationId,
    Role,
    Content,
    TsMs,
}

#[derive(DeriveIden)]
enum AccountEquitySnapshots {
    Table,
    ModelId,
    TsMs,
    EquityUsd,
}
