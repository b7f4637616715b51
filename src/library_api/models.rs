use chrono::{DateTime, Utc};
use poem_openapi::{ApiResponse, Multipart, Object, payload::Json, types::multipart::Upload};
use uuid::Uuid;

#[derive(Debug, Clone, Object)]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,
    /// "pdf" or "text"
    pub file_type: String,
    /// Accent color sampled from the cover, `#rrggbb`
    pub spine_color: Option<String>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<entities::book::Model> for BookDto {
    fn from(m: entities::book::Model) -> Self {
        BookDto {
            id: m.id,
            title: m.title,
            author: m.author,
            description: m.description,
            cover_url: m.cover_url,
            file_url: m.file_url,
            file_type: m.file_type,
            spine_color: m.spine_color,
            view_count: m.view_count,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct BookCreateRequestDto {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,
    /// "pdf" or "text"
    pub file_type: String,
}

#[derive(Debug, Clone, Object)]
pub struct AnnouncementDto {
    pub id: Uuid,
    pub message: String,
    pub link_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entities::announcement::Model> for AnnouncementDto {
    fn from(m: entities::announcement::Model) -> Self {
        AnnouncementDto {
            id: m.id,
            message: m.message,
            link_url: m.link_url,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct LoginRequestDto {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Object)]
pub struct SessionDto {
    /// Pass back in the `X-Session-Token` header on admin calls
    pub token: Uuid,
}

#[derive(Debug, Clone, Object)]
pub struct UploadedObjectDto {
    /// Public URL of the stored object
    pub url: String,
    /// Inferred kind ("pdf" | "text") for the books bucket, absent for covers
    pub file_kind: Option<String>,
}

#[derive(Debug, Multipart)]
pub struct UploadPayloadDto {
    pub file: Upload,
}

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

impl From<String> for ErrorDto {
    fn from(message: String) -> Self {
        ErrorDto { message }
    }
}

#[derive(ApiResponse)]
pub enum BookListResponseDto {
    /// Books, newest first
    #[oai(status = 200)]
    Ok(Json<Vec<BookDto>>),

    /// Database error
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum BookResponseDto {
    /// The requested book
    #[oai(status = 200)]
    Ok(Json<BookDto>),

    /// No book with that id
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    /// Database error
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum BookCreateResponseDto {
    /// Book record created
    #[oai(status = 201)]
    Created(Json<BookDto>),

    /// Invalid payload
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    /// Missing or expired session
    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    /// Database error
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum LoginResponseDto {
    /// Session established
    #[oai(status = 200)]
    Ok(Json<SessionDto>),

    /// Wrong credentials
    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum UploadResponseDto {
    /// Object stored
    #[oai(status = 201)]
    Created(Json<UploadedObjectDto>),

    /// Unknown bucket or unusable file name
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    /// Missing or expired session
    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    /// Storage error
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum AnnouncementListResponseDto {
    /// Currently active announcements, newest first
    #[oai(status = 200)]
    Ok(Json<Vec<AnnouncementDto>>),

    /// Database error
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}
