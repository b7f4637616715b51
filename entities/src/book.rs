use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A catalog entry. `file_type` is the tag of the stored book file ("pdf" or
/// "text"); `spine_color` is the accent color sampled from the cover at create
/// time, as a `#rrggbb` string.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,
    pub file_type: String,
    pub spine_color: Option<String>,
    pub view_count: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
