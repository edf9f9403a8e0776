//! Create black_list and ticket tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlackList::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlackList::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlackList::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(BlackList::AdminId).string_len(32).null())
                    .col(ColumnDef::new(BlackList::UpdatedById).string_len(32).null())
                    .col(ColumnDef::new(BlackList::Reason).text().not_null())
                    .col(ColumnDef::new(BlackList::Time).big_integer().null())
                    .col(
                        ColumnDef::new(BlackList::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BlackList::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_black_list_user")
                            .from(BlackList::Table, BlackList::UserId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_black_list_admin")
                            .from(BlackList::Table, BlackList::AdminId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_black_list_updated_by")
                            .from(BlackList::Table, BlackList::UpdatedById)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_black_list_user_id")
                    .table(BlackList::Table)
                    .col(BlackList::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_black_list_admin_id")
                    .table(BlackList::Table)
                    .col(BlackList::AdminId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_black_list_updated_by_id")
                    .table(BlackList::Table)
                    .col(BlackList::UpdatedById)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Ticket::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Ticket::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Ticket::UserId).string_len(32).null())
                    .col(ColumnDef::new(Ticket::Header).string_len(256).not_null())
                    .col(ColumnDef::new(Ticket::Body).text().not_null())
                    .col(
                        ColumnDef::new(Ticket::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_user")
                            .from(Ticket::Table, Ticket::UserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ticket_user_id")
                    .table(Ticket::Table)
                    .col(Ticket::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ticket::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(BlackList::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum BlackList {
    Table,
    Id,
    UserId,
    AdminId,
    UpdatedById,
    Reason,
    Time,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Ticket {
    Table,
    Id,
    UserId,
    Header,
    Body,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
