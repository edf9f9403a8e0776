//! Create profile_picture table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProfilePicture::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProfilePicture::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProfilePicture::UserId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ProfilePicture::OriginalImageId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfilePicture::CroppedImageId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfilePicture::PendingImageId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProfilePicture::Current)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProfilePicture::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_picture_user")
                            .from(ProfilePicture::Table, ProfilePicture::UserId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_picture_original_image")
                            .from(ProfilePicture::Table, ProfilePicture::OriginalImageId)
                            .to(Image::Table, Image::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_picture_cropped_image")
                            .from(ProfilePicture::Table, ProfilePicture::CroppedImageId)
                            .to(Image::Table, Image::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_picture_pending_image")
                            .from(ProfilePicture::Table, ProfilePicture::PendingImageId)
                            .to(Image::Table, Image::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profile_picture_user_id")
                    .table(ProfilePicture::Table)
                    .col(ProfilePicture::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfilePicture::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProfilePicture {
    Table,
    Id,
    UserId,
    OriginalImageId,
    CroppedImageId,
    PendingImageId,
    Current,
    CreatedAt,
}

#[derive(Iden)]
enum Image {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
