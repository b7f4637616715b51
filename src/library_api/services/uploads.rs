use chrono::Utc;
use poem_openapi::payload::Json;

use crate::domain::mapping::{file_extension, infer_file_kind_from_name};
use crate::library_api::models::{ErrorDto, UploadResponseDto, UploadedObjectDto};
use crate::storage::ObjectStorage;

pub const COVERS_BUCKET: &str = "covers";
pub const BOOKS_BUCKET: &str = "books";

pub struct UploadService<'a> {
    pub storage: &'a dyn ObjectStorage,
}

impl<'a> UploadService<'a> {
    pub fn new(storage: &'a dyn ObjectStorage) -> Self {
        Self { storage }
    }

    /// Store an uploaded file and answer with its public URL. The object key
    /// combines the current epoch millis with the original extension, which
    /// keeps names collision-resistant without any coordination.
    #[tracing::instrument(level = "debug", skip(self, bytes), fields(size = bytes.len()))]
    pub async fn store(
        &self,
        bucket: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> UploadResponseDto {
        let label = match bucket {
            COVERS_BUCKET => "cover",
            BOOKS_BUCKET => "book",
            other => {
                return UploadResponseDto::BadRequest(Json(ErrorDto {
                    message: format!("unknown bucket {:?}", other),
                }));
            }
        };
        let Some(ext) = file_extension(original_name) else {
            return UploadResponseDto::BadRequest(Json(ErrorDto {
                message: format!("file name {:?} has no extension", original_name),
            }));
        };

        let key = format!("{}_{}.{}", Utc::now().timestamp_millis(), label, ext);
        match self.storage.put(bucket, &key, bytes).await {
            Ok(url) => {
                let file_kind = (bucket == BOOKS_BUCKET)
                    .then(|| infer_file_kind_from_name(original_name).to_string());
                tracing::info!(%bucket, %key, "upload stored");
                UploadResponseDto::Created(Json(UploadedObjectDto { url, file_kind }))
            }
            Err(e) => {
                tracing::error!(error = %e, %bucket, %key, "failed to store upload");
                UploadResponseDto::InternalError(Json(ErrorDto {
                    message: format!("storage error: {}", e),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FsObjectStorage;

    fn temp_storage() -> (std::path::PathBuf, FsObjectStorage) {
        let root = std::env::temp_dir().join(format!("libris-uploads-{}", uuid::Uuid::new_v4()));
        let storage = FsObjectStorage::new(&root, "http://localhost:3000");
        (root, storage)
    }

    #[tokio::test]
    async fn book_upload_reports_file_kind() {
        let (root, storage) = temp_storage();
        let svc = UploadService::new(&storage);
        match svc.store(BOOKS_BUCKET, "My Story.PDF", b"%PDF-").await {
            UploadResponseDto::Created(Json(obj)) => {
                assert_eq!(obj.file_kind.as_deref(), Some("pdf"));
                assert!(obj.url.starts_with("http://localhost:3000/files/books/"));
                assert!(obj.url.ends_with("_book.pdf"));
            }
            _ => panic!("expected Created"),
        }
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn cover_upload_has_no_file_kind() {
        let (root, storage) = temp_storage();
        let svc = UploadService::new(&storage);
        match svc.store(COVERS_BUCKET, "cover.png", b"png").await {
            UploadResponseDto::Created(Json(obj)) => {
                assert_eq!(obj.file_kind, None);
                assert!(obj.url.ends_with("_cover.png"));
            }
            _ => panic!("expected Created"),
        }
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn unknown_bucket_is_rejected() {
        let (_, storage) = temp_storage();
        let svc = UploadService::new(&storage);
        assert!(matches!(
            svc.store("music", "a.mp3", b"").await,
            UploadResponseDto::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn extensionless_name_is_rejected() {
        let (_, storage) = temp_storage();
        let svc = UploadService::new(&storage);
        assert!(matches!(
            svc.store(BOOKS_BUCKET, "noext", b"").await,
            UploadResponseDto::BadRequest(_)
        ));
    }
}
