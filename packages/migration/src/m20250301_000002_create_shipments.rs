use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};

use crate::m20250301_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Shipments {
    Table,
    Id,
    TrackingNumber,
    Origin,
    Destination,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shipments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shipments::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(Shipments::TrackingNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Shipments::Origin).string().not_null())
                    .col(ColumnDef::new(Shipments::Destination).string().not_null())
                    .col(
                        ColumnDef::new(Shipments::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Shipments::CreatedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Shipments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Shipments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shipments_created_by")
                            .from(Shipments::Table, Shipments::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shipments_status")
                    .table(Shipments::Table)
                    .col(Shipments::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_shipments_status")
                    .table(Shipments::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Shipments::Table).to_owned())
            .await?;

        Ok(())
    }
}
