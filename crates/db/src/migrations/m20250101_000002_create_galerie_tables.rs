//! Create galerie, galerie_user and invitation tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Galerie::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Galerie::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Galerie::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Galerie::Description).text().null())
                    .col(
                        ColumnDef::new(Galerie::Archived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Galerie::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Galerie::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Membership rows are removed explicitly by the deletion cascade,
        // so foreign keys carry no ON DELETE action.
        manager
            .create_table(
                Table::create()
                    .table(GalerieUser::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GalerieUser::GalerieId).string_len(32).not_null())
                    .col(ColumnDef::new(GalerieUser::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(GalerieUser::Role).string_len(20).not_null())
                    .col(
                        ColumnDef::new(GalerieUser::HasNewFrames)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GalerieUser::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(GalerieUser::GalerieId)
                            .col(GalerieUser::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_galerie_user_galerie")
                            .from(GalerieUser::Table, GalerieUser::GalerieId)
                            .to(Galerie::Table, Galerie::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_galerie_user_user")
                            .from(GalerieUser::Table, GalerieUser::UserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_galerie_user_user_id")
                    .table(GalerieUser::Table)
                    .col(GalerieUser::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invitation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invitation::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invitation::GalerieId).string_len(32).not_null())
                    .col(ColumnDef::new(Invitation::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Invitation::Code).string_len(64).not_null())
                    .col(ColumnDef::new(Invitation::Time).big_integer().null())
                    .col(ColumnDef::new(Invitation::NumOfInvits).integer().null())
                    .col(
                        ColumnDef::new(Invitation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invitation_galerie")
                            .from(Invitation::Table, Invitation::GalerieId)
                            .to(Galerie::Table, Galerie::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invitation_user")
                            .from(Invitation::Table, Invitation::UserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invitation_code")
                    .table(Invitation::Table)
                    .col(Invitation::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invitation_galerie_id")
                    .table(Invitation::Table)
                    .col(Invitation::GalerieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invitation_user_id")
                    .table(Invitation::Table)
                    .col(Invitation::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invitation::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GalerieUser::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Galerie::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Galerie {
    Table,
    Id,
    Name,
    Description,
    Archived,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum GalerieUser {
    Table,
    GalerieId,
    UserId,
    Role,
    HasNewFrames,
    CreatedAt,
}

#[derive(Iden)]
enum Invitation {
    Table,
    Id,
    GalerieId,
    UserId,
    Code,
    Time,
    NumOfInvits,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
