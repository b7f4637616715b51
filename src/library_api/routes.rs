use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::{Header, Path},
    payload::{Json, PlainText},
};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::models::{
    AnnouncementListResponseDto, BookCreateRequestDto, BookCreateResponseDto, BookListResponseDto,
    BookResponseDto, ErrorDto, LoginRequestDto, LoginResponseDto, UploadPayloadDto,
    UploadResponseDto,
};
use super::services::{
    announcements::AnnouncementService, auth::AuthService, auth::SessionStore,
    catalog::CatalogService, health::HealthService, uploads::UploadService,
};
use crate::accent::AccentColorExtractor;
use crate::config::Config;
use crate::storage::ObjectStorage;

pub struct LibraryApi {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<Config>,
    pub storage: Arc<dyn ObjectStorage>,
    pub sessions: Arc<SessionStore>,
    pub extractor: Arc<AccentColorExtractor>,
}

impl LibraryApi {
    fn authorized(&self, token: &Option<String>) -> bool {
        token
            .as_deref()
            .is_some_and(|t| self.sessions.is_valid(t))
    }
}

#[OpenApi]
impl LibraryApi {
    /// Plain-text health check
    #[oai(path = "/status", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn status(&self) -> PlainText<String> {
        tracing::debug!("handling /status");
        HealthService::new(&self.db).status_text().await
    }

    /// Exchange the admin credential pair for a session token
    #[oai(path = "/v1/auth/login", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn login(&self, body: Json<LoginRequestDto>) -> LoginResponseDto {
        AuthService::new(&self.config, &self.sessions).login(&body.0.email, &body.0.password)
    }

    /// All books, newest first
    #[oai(path = "/v1/books", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_books(&self) -> BookListResponseDto {
        CatalogService::new(&self.db).list_books().await
    }

    /// One book by id; counts the view
    #[oai(path = "/v1/books/:book_id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, book_id))]
    async fn get_book(&self, book_id: Path<Uuid>) -> BookResponseDto {
        CatalogService::new(&self.db).get_book(book_id.0).await
    }

    /// Create a book record (admin). The accent color is sampled from the
    /// cover URL server-side.
    #[oai(path = "/v1/books", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, token, body))]
    async fn create_book(
        &self,
        #[oai(name = "X-Session-Token")] token: Header<Option<String>>,
        body: Json<BookCreateRequestDto>,
    ) -> BookCreateResponseDto {
        if !self.authorized(&token.0) {
            return BookCreateResponseDto::Unauthorized(Json(ErrorDto {
                message: "admin session required".into(),
            }));
        }
        CatalogService::new(&self.db)
            .create_book(body.0, &self.extractor)
            .await
    }

    /// Upload a cover image or book file into the named bucket (admin)
    #[oai(path = "/v1/admin/uploads/:bucket", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, token, bucket, payload))]
    async fn upload(
        &self,
        #[oai(name = "X-Session-Token")] token: Header<Option<String>>,
        bucket: Path<String>,
        payload: UploadPayloadDto,
    ) -> UploadResponseDto {
        if !self.authorized(&token.0) {
            return UploadResponseDto::Unauthorized(Json(ErrorDto {
                message: "admin session required".into(),
            }));
        }
        let file_name = payload
            .file
            .file_name()
            .map(|name| name.to_string())
            .unwrap_or_default();
        let bytes = match payload.file.into_vec().await {
            Ok(bytes) => bytes,
            Err(e) => {
                return UploadResponseDto::BadRequest(Json(ErrorDto {
                    message: format!("unreadable upload: {}", e),
                }));
            }
        };
        UploadService::new(self.storage.as_ref())
            .store(&bucket.0, &file_name, &bytes)
            .await
    }

    /// Active announcements for the library shell
    #[oai(path = "/v1/announcements", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn list_announcements(&self) -> AnnouncementListResponseDto {
        AnnouncementService::new(&self.db).list_active().await
    }
}
