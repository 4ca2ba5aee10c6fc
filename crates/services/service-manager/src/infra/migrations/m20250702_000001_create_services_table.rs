//! Migration: Create the services table.

use sea_orm_migration::prelude::*;

use domain::{MAX_TEXT_LENGTH, STATUS_PENDING, VALID_STATUSES};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Services::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Services::CustomerName)
                            .string_len(MAX_TEXT_LENGTH as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::ServiceType)
                            .string_len(MAX_TEXT_LENGTH as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::Price)
                            .decimal_len(10, 2)
                            .not_null()
                            .check(Expr::col(Services::Price).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Services::Status)
                            .string_len(MAX_TEXT_LENGTH as u32)
                            .not_null()
                            .default(STATUS_PENDING)
                            .check(Expr::col(Services::Status).is_in(VALID_STATUSES.iter().copied())),
                    )
                    .to_owned(),
            )
            .await?;

        // list() orders by schedule
        manager
            .create_index(
                Index::create()
                    .name("idx_services_scheduled_at")
                    .table(Services::Table)
                    .col(Services::ScheduledAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Services {
    Table,
    Id,
    CustomerName,
    ServiceType,
    ScheduledAt,
    Price,
    Status,
}
