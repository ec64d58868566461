use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Analyses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Analyses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Analyses::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Analyses::AnalysisType).string().not_null())
                    .col(ColumnDef::new(Analyses::VideoId).string().null())
                    .col(ColumnDef::new(Analyses::Discriminator).string().null())
                    .col(ColumnDef::new(Analyses::VideoUrl).string().null())
                    .col(ColumnDef::new(Analyses::Title).string().null())
                    .col(ColumnDef::new(Analyses::PayloadJson).text().not_null())
                    .col(
                        ColumnDef::new(Analyses::MetadataJson)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(ColumnDef::new(Analyses::CachedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_analyses_owner_id")
                            .from(Analyses::Table, Analyses::OwnerId)
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
                    .name("idx_analyses_lookup")
                    .table(Analyses::Table)
                    .col(Analyses::OwnerId)
                    .col(Analyses::AnalysisType)
                    .col(Analyses::VideoId)
                    .col(Analyses::CachedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Analyses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Analyses {
    Table,
    Id,
    OwnerId,
    AnalysisType,
    VideoId,
    Discriminator,
    VideoUrl,
    Title,
    PayloadJson,
    MetadataJson,
    CachedAt,
}
