use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "allotments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub allotment_number: String,
    pub holder_name: String,
    pub village: String,
    pub district: String,
    pub state: String,
    pub survey_number: String,
    pub area_hectares: f64,
    pub status: String,
    pub allotted_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_DISPUTED: &str = "disputed";

pub fn is_valid_status(status: &str) -> bool {
    matches!(status, STATUS_ACTIVE | STATUS_DISPUTED)
}
