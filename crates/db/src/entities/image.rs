//! Image entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata of one stored blob. The bytes live in object storage under
/// `bucket_name`/`file_name`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub bucket_name: String,

    pub file_name: String,

    /// File extension, e.g. `jpeg`.
    pub format: String,

    pub width: i32,

    pub height: i32,

    /// Size in bytes.
    pub size: i64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
