use crate::api::error::AppError;
use crate::entities::{claims, prelude::*};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, ToSchema)]
pub struct ListClaimsQuery {
    /// Substring match on claimant name or village
    pub search: Option<String>,
    pub status: Option<String>,
    pub district: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateClaimRequest {
    #[validate(length(min = 1, message = "Claimant name is required"))]
    pub claimant_name: String,
    pub father_name: Option<String>,
    #[validate(length(min = 1, message = "Village is required"))]
    pub village: String,
    #[validate(length(min = 1, message = "District is required"))]
    pub district: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(range(min = 0.01, message = "Claimed area must be positive"))]
    pub area_hectares: f64,
    pub claim_type: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateClaimStatusRequest {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct ClaimResponse {
    pub id: String,
    pub claim_number: String,
    pub claimant_name: String,
    pub father_name: Option<String>,
    pub village: String,
    pub district: String,
    pub state: String,
    pub area_hectares: f64,
    pub claim_type: String,
    pub status: String,
    pub submitted_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl From<claims::Model> for ClaimResponse {
    fn from(claim: claims::Model) -> Self {
        Self {
            id: claim.id,
            claim_number: claim.claim_number,
            claimant_name: claim.claimant_name,
            father_name: claim.father_name,
            village: claim.village,
            district: claim.district,
            state: claim.state,
            area_hectares: claim.area_hectares,
            claim_type: claim.claim_type,
            status: claim.status,
            submitted_at: claim.submitted_at,
            updated_at: claim.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/claims",
    params(
        ("search" = Option<String>, Query, description = "Substring match on claimant or village"),
        ("status" = Option<String>, Query, description = "Status filter"),
        ("district" = Option<String>, Query, description = "District filter")
    ),
    responses(
        (status = 200, description = "List of claims", body = Vec<ClaimResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "claims"
)]
pub async fn list_claims(
    State(state): State<crate::AppState>,
    Query(query): Query<ListClaimsQuery>,
) -> Result<Json<Vec<ClaimResponse>>, AppError> {
    let mut cond = Condition::all();

    if let Some(status) = query.status {
        cond = cond.add(claims::Column::Status.eq(status));
    }

    if let Some(district) = query.district {
        cond = cond.add(claims::Column::District.eq(district));
    }

    if let Some(ref search) = query.search {
        let pattern = format!("%{}%", search.to_lowercase());
        cond = cond.add(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(claims::Column::ClaimantName)))
                        .like(pattern.clone()),
                )
                .add(Expr::expr(Func::lower(Expr::col(claims::Column::Village))).like(pattern)),
        );
    }

    let mut select = Claims::find()
        .filter(cond)
        .order_by_desc(claims::Column::SubmittedAt);

    if let Some(limit) = query.limit {
        select = select.limit(limit);
    }
    if let Some(offset) = query.offset {
        select = select.offset(offset);
    }

    let items = select.all(&state.db).await?;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/claims/{id}",
    params(("id" = String, Path, description = "Claim ID")),
    responses(
        (status = 200, description = "Claim detail", body = ClaimResponse),
        (status = 404, description = "Claim not found")
    ),
    security(("jwt" = [])),
    tag = "claims"
)]
pub async fn get_claim(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimResponse>, AppError> {
    let claim = Claims::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Claim not found".to_string()))?;

    Ok(Json(claim.into()))
}

#[utoipa::path(
    post,
    path = "/claims",
    request_body = CreateClaimRequest,
    responses(
        (status = 201, description = "Claim registered", body = ClaimResponse),
        (status = 400, description = "Validation failed")
    ),
    security(("jwt" = [])),
    tag = "claims"
)]
pub async fn create_claim(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ClaimResponse>), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if !claims::is_valid_claim_type(&payload.claim_type) {
        return Err(AppError::BadRequest(format!(
            "Unknown claim type '{}'",
            payload.claim_type
        )));
    }

    let now = Utc::now();
    let model = claims::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        claim_number: Set(next_claim_number(&payload.state, now.format("%Y").to_string())),
        claimant_name: Set(payload.claimant_name),
        father_name: Set(payload.father_name),
        village: Set(payload.village),
        district: Set(payload.district),
        state: Set(payload.state),
        area_hectares: Set(payload.area_hectares),
        claim_type: Set(payload.claim_type),
        status: Set(claims::STATUS_PENDING.to_string()),
        submitted_at: Set(now),
        updated_at: Set(now),
    };

    let claim = model.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(claim.into())))
}

#[utoipa::path(
    put,
    path = "/claims/{id}/status",
    params(("id" = String, Path, description = "Claim ID")),
    request_body = UpdateClaimStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ClaimResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Claim not found")
    ),
    security(("jwt" = [])),
    tag = "claims"
)]
pub async fn update_claim_status(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateClaimStatusRequest>,
) -> Result<Json<ClaimResponse>, AppError> {
    if !claims::is_valid_status(&payload.status) {
        return Err(AppError::BadRequest(format!(
            "Unknown claim status '{}'",
            payload.status
        )));
    }

    let claim = Claims::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Claim not found".to_string()))?;

    let mut active: claims::ActiveModel = claim.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now());

    let updated = active.update(&state.db).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/claims/{id}",
    params(("id" = String, Path, description = "Claim ID")),
    responses(
        (status = 204, description = "Claim deleted"),
        (status = 404, description = "Claim not found")
    ),
    security(("jwt" = [])),
    tag = "claims"
)]
pub async fn delete_claim(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let res = Claims::delete_by_id(id).exec(&state.db).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Claim not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Claim numbers follow the state-scoped pattern seen on paper forms,
/// e.g. FRA/2026/MP/1a2b3c. Uniqueness comes from the random suffix.
fn next_claim_number(state_name: &str, year: String) -> String {
    let code: String = state_name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .to_uppercase();
    let code = if code.is_empty() { "XX".to_string() } else { code };
    let raw = Uuid::new_v4().simple().to_string();
    format!("FRA/{}/{}/{}", year, code, &raw[..6])
}
