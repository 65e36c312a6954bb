use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One uploaded document in the processing registry.
///
/// `status` moves `processing -> completed | error`; both end states are
/// terminal. `entities_json` and `extracted_text` are only populated once
/// the document reaches `completed`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub filename: String,
    pub mime_type: String,
    pub language: String,
    pub status: String,
    pub progress: i32,
    pub page_count: i32,
    pub file_size: i64,
    pub storage_key: String,
    #[sea_orm(default_value = false)]
    pub is_selected: bool,
    pub extracted_text: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub entities_json: Option<Json>,
    pub error_message: Option<String>,
    pub uploaded_at: DateTimeUtc,
    pub processed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub const STATUS_PROCESSING: &str = "processing";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_ERROR: &str = "error";
