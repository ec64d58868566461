use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CachedVideos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CachedVideos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CachedVideos::OwnerId).integer().not_null())
                    .col(ColumnDef::new(CachedVideos::VideoId).string().not_null())
                    .col(ColumnDef::new(CachedVideos::Title).string().not_null())
                    .col(
                        ColumnDef::new(CachedVideos::ThumbnailUrl)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CachedVideos::PublishedAt)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CachedVideos::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CachedVideos::LikeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CachedVideos::CommentCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CachedVideos::Duration)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(CachedVideos::HasCaptions)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CachedVideos::CachedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cached_videos_owner_id")
                            .from(CachedVideos::Table, CachedVideos::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cached_videos_owner_video")
                    .table(CachedVideos::Table)
                    .col(CachedVideos::OwnerId)
                    .col(CachedVideos::VideoId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cached_videos_cached_at")
                    .table(CachedVideos::Table)
                    .col(CachedVideos::CachedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CachedVideos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum CachedVideos {
    Table,
    Id,
    OwnerId,
    VideoId,
    Title,
    ThumbnailUrl,
    PublishedAt,
    ViewCount,
    LikeCount,
    CommentCount,
    Duration,
    HasCaptions,
    CachedAt,
}
