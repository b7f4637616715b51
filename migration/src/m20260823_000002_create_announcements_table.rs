use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Announcements::Table)
                    .if_not_exists()
                    .col(uuid(Announcements::Id).primary_key())
                    .col(string(Announcements::Message))
                    .col(string_null(Announcements::LinkUrl))
                    .col(boolean(Announcements::IsActive).default(true))
                    .col(timestamp_with_time_zone_null(Announcements::StartAt))
                    .col(timestamp_with_time_zone_null(Announcements::EndAt))
                    .col(timestamp_with_time_zone(Announcements::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Announcements::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Announcements {
    Table,
    Id,
    Message,
    LinkUrl,
    IsActive,
    StartAt,
    EndAt,
    CreatedAt,
}
