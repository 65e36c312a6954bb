use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "claims")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub claim_number: String,
    pub claimant_name: String,
    pub father_name: Option<String>,
    pub village: String,
    pub district: String,
    pub state: String,
    pub area_hectares: f64,
    pub claim_type: String,
    pub status: String,
    pub submitted_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_UNDER_REVIEW: &str = "under_review";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

pub const TYPE_INDIVIDUAL: &str = "individual";
pub const TYPE_COMMUNITY: &str = "community";

pub fn is_valid_status(status: &str) -> bool {
    matches!(
        status,
        STATUS_PENDING | STATUS_UNDER_REVIEW | STATUS_APPROVED | STATUS_REJECTED
    )
}

pub fn is_valid_claim_type(claim_type: &str) -> bool {
    matches!(claim_type, TYPE_INDIVIDUAL | TYPE_COMMUNITY)
}
