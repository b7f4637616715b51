use chrono::Utc;
use poem_openapi::payload::Json;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use entities::announcement;

use crate::library_api::models::{AnnouncementDto, AnnouncementListResponseDto, ErrorDto};

pub struct AnnouncementService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> AnnouncementService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Announcements that are flagged active and whose optional start/end
    /// window contains the current time, newest first.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list_active(&self) -> AnnouncementListResponseDto {
        let now = Utc::now();
        let result = announcement::Entity::find()
            .filter(announcement::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(announcement::Column::StartAt.is_null())
                    .add(announcement::Column::StartAt.lte(now)),
            )
            .filter(
                Condition::any()
                    .add(announcement::Column::EndAt.is_null())
                    .add(announcement::Column::EndAt.gte(now)),
            )
            .order_by_desc(announcement::Column::CreatedAt)
            .all(self.db)
            .await;

        match result {
            Ok(rows) => AnnouncementListResponseDto::Ok(Json(
                rows.into_iter().map(AnnouncementDto::from).collect(),
            )),
            Err(e) => {
                tracing::error!(error = %e, "failed to list announcements");
                AnnouncementListResponseDto::InternalError(Json(ErrorDto {
                    message: format!("database error: {}", e),
                }))
            }
        }
    }
}
