use chrono::Utc;
use poem_openapi::payload::Json;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use entities::book;

use crate::accent::{AccentColorExtractor, ImageSource};
use crate::domain::models::FileKind;
use crate::library_api::models::{
    BookCreateRequestDto, BookCreateResponseDto, BookDto, BookListResponseDto, BookResponseDto,
    ErrorDto,
};

pub struct CatalogService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> CatalogService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list_books(&self) -> BookListResponseDto {
        match book::Entity::find()
            .order_by_desc(book::Column::CreatedAt)
            .all(self.db)
            .await
        {
            Ok(books) => {
                BookListResponseDto::Ok(Json(books.into_iter().map(BookDto::from).collect()))
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to list books");
                BookListResponseDto::InternalError(Json(ErrorDto {
                    message: format!("database error: {}", e),
                }))
            }
        }
    }

    /// Fetch one book and count the view. The bump is a single in-database
    /// `view_count + 1` expression, so concurrent views never lose an
    /// increment.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get_book(&self, id: Uuid) -> BookResponseDto {
        let bumped = book::Entity::update_many()
            .col_expr(
                book::Column::ViewCount,
                Expr::col(book::Column::ViewCount).add(1),
            )
            .filter(book::Column::Id.eq(id))
            .exec(self.db)
            .await;
        if let Err(e) = bumped {
            tracing::error!(error = %e, %id, "failed to bump view count");
            return BookResponseDto::InternalError(Json(ErrorDto {
                message: format!("database error: {}", e),
            }));
        }

        match book::Entity::find_by_id(id).one(self.db).await {
            Ok(Some(model)) => BookResponseDto::Ok(Json(BookDto::from(model))),
            Ok(None) => BookResponseDto::NotFound(Json(ErrorDto {
                message: format!("no book with id {}", id),
            })),
            Err(e) => {
                tracing::error!(error = %e, %id, "failed to fetch book");
                BookResponseDto::InternalError(Json(ErrorDto {
                    message: format!("database error: {}", e),
                }))
            }
        }
    }

    /// Create a catalog record. When a cover URL is present the accent color
    /// is sampled server-side; sampling cannot fail the request, only degrade
    /// to the fallback color.
    #[tracing::instrument(level = "debug", skip(self, req, extractor))]
    pub async fn create_book(
        &self,
        req: BookCreateRequestDto,
        extractor: &AccentColorExtractor,
    ) -> BookCreateResponseDto {
        if req.title.trim().is_empty() || req.author.trim().is_empty() {
            return BookCreateResponseDto::BadRequest(Json(ErrorDto {
                message: "title and author are required".into(),
            }));
        }
        let Some(file_kind) = FileKind::parse(&req.file_type) else {
            return BookCreateResponseDto::BadRequest(Json(ErrorDto {
                message: format!("unknown file_type {:?}", req.file_type),
            }));
        };

        let spine_color = match &req.cover_url {
            Some(url) => Some(
                extractor
                    .extract_color(ImageSource::Url(url.clone()))
                    .await
                    .to_hex(),
            ),
            None => None,
        };

        let record = book::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(req.title),
            author: Set(req.author),
            description: Set(req.description),
            cover_url: Set(req.cover_url),
            file_url: Set(req.file_url),
            file_type: Set(file_kind.as_str().to_string()),
            spine_color: Set(spine_color),
            view_count: Set(0),
            created_at: Set(Utc::now()),
        };
        match record.insert(self.db).await {
            Ok(created) => {
                tracing::info!(id = %created.id, title = %created.title, "book created");
                BookCreateResponseDto::Created(Json(BookDto::from(created)))
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to insert book");
                BookCreateResponseDto::InternalError(Json(ErrorDto {
                    message: format!("database error: {}", e),
                }))
            }
        }
    }
}
