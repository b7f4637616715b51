use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(uuid(Books::Id).primary_key())
                    .col(string(Books::Title))
                    .col(string(Books::Author))
                    .col(text_null(Books::Description))
                    .col(string_null(Books::CoverUrl))
                    .col(string_null(Books::FileUrl))
                    .col(string(Books::FileType))
                    .col(string_null(Books::SpineColor))
                    .col(big_integer(Books::ViewCount).default(0))
                    .col(timestamp_with_time_zone(Books::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Books {
    Table,
    Id,
    Title,
    Author,
    Description,
    CoverUrl,
    FileUrl,
    FileType,
    SpineColor,
    ViewCount,
    CreatedAt,
}
