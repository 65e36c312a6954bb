use crate::api::error::AppError;
use crate::entities::{claims, documents, prelude::*};
use axum::{Json, extract::State};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_claims: u64,
    pub pending_claims: u64,
    pub under_review_claims: u64,
    pub approved_claims: u64,
    pub rejected_claims: u64,
    pub total_allotments: u64,
    pub approved_area_hectares: f64,
    pub documents_total: u64,
    pub documents_processing: u64,
    pub documents_completed: u64,
    pub documents_failed: u64,
}

#[utoipa::path(
    get,
    path = "/dashboard/stats",
    responses(
        (status = 200, description = "Portal-wide aggregates", body = DashboardStats),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "dashboard"
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let db = &state.db;

    let claim_count = |status: &'static str| {
        Claims::find()
            .filter(claims::Column::Status.eq(status))
            .count(db)
    };

    let document_count = |status: &'static str| {
        Documents::find()
            .filter(documents::Column::Status.eq(status))
            .count(db)
    };

    let approved_area_hectares = Claims::find()
        .filter(claims::Column::Status.eq(claims::STATUS_APPROVED))
        .all(db)
        .await?
        .iter()
        .map(|c| c.area_hectares)
        .sum();

    Ok(Json(DashboardStats {
        total_claims: Claims::find().count(db).await?,
        pending_claims: claim_count(claims::STATUS_PENDING).await?,
        under_review_claims: claim_count(claims::STATUS_UNDER_REVIEW).await?,
        approved_claims: claim_count(claims::STATUS_APPROVED).await?,
        rejected_claims: claim_count(claims::STATUS_REJECTED).await?,
        total_allotments: Allotments::find().count(db).await?,
        approved_area_hectares,
        documents_total: Documents::find().count(db).await?,
        documents_processing: document_count(documents::STATUS_PROCESSING).await?,
        documents_completed: document_count(documents::STATUS_COMPLETED).await?,
        documents_failed: document_count(documents::STATUS_ERROR).await?,
    }))
}
