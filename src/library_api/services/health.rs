use poem_openapi::payload::PlainText;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use entities::book;

pub struct HealthService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> HealthService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn status_text(&self) -> PlainText<String> {
        let version = env!("CARGO_PKG_VERSION");
        match book::Entity::find().count(self.db).await {
            Ok(count) => PlainText(format!("libris version={} books={}", version, count)),
            Err(e) => PlainText(format!("libris version={} db error: {}", version, e)),
        }
    }
}
