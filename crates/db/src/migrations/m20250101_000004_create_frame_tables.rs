//! Create frame, galerie_picture and like tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Frame::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Frame::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Frame::GalerieId).string_len(32).not_null())
                    .col(ColumnDef::new(Frame::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Frame::Description).text().null())
                    .col(
                        ColumnDef::new(Frame::NumOfLikes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Frame::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_frame_galerie")
                            .from(Frame::Table, Frame::GalerieId)
                            .to(Galerie::Table, Galerie::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_frame_user")
                            .from(Frame::Table, Frame::UserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_frame_galerie_id")
                    .table(Frame::Table)
                    .col(Frame::GalerieId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_frame_user_id")
                    .table(Frame::Table)
                    .col(Frame::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GaleriePicture::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GaleriePicture::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GaleriePicture::FrameId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(GaleriePicture::OriginalImageId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GaleriePicture::CroppedImageId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GaleriePicture::PendingImageId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GaleriePicture::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GaleriePicture::Current)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GaleriePicture::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_galerie_picture_frame")
                            .from(GaleriePicture::Table, GaleriePicture::FrameId)
                            .to(Frame::Table, Frame::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_galerie_picture_original_image")
                            .from(GaleriePicture::Table, GaleriePicture::OriginalImageId)
                            .to(Image::Table, Image::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_galerie_picture_cropped_image")
                            .from(GaleriePicture::Table, GaleriePicture::CroppedImageId)
                            .to(Image::Table, Image::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_galerie_picture_pending_image")
                            .from(GaleriePicture::Table, GaleriePicture::PendingImageId)
                            .to(Image::Table, Image::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_galerie_picture_frame_id")
                    .table(GaleriePicture::Table)
                    .col(GaleriePicture::FrameId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Like::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Like::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Like::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Like::FrameId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Like::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_user")
                            .from(Like::Table, Like::UserId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_frame")
                            .from(Like::Table, Like::FrameId)
                            .to(Frame::Table, Frame::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_like_frame_id")
                    .table(Like::Table)
                    .col(Like::FrameId)
                    .to_owned(),
            )
            .await?;

        // One like per user and frame
        manager
            .create_index(
                Index::create()
                    .name("idx_like_unique")
                    .table(Like::Table)
                    .col(Like::UserId)
                    .col(Like::FrameId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Like::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GaleriePicture::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Frame::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Frame {
    Table,
    Id,
    GalerieId,
    UserId,
    Description,
    NumOfLikes,
    CreatedAt,
}

#[derive(Iden)]
enum GaleriePicture {
    Table,
    Id,
    FrameId,
    OriginalImageId,
    CroppedImageId,
    PendingImageId,
    Position,
    Current,
    CreatedAt,
}

#[derive(Iden)]
enum Like {
    Table,
    Id,
    UserId,
    FrameId,
    CreatedAt,
}

#[derive(Iden)]
enum Galerie {
    Table,
    Id,
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
