use crate::api::error::AppError;
use crate::entities::{allotments, prelude::*};
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
pub struct ListAllotmentsQuery {
    /// Substring match on holder, village or survey number
    pub search: Option<String>,
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateAllotmentRequest {
    #[validate(length(min = 1, message = "Holder name is required"))]
    pub holder_name: String,
    #[validate(length(min = 1, message = "Village is required"))]
    pub village: String,
    #[validate(length(min = 1, message = "District is required"))]
    pub district: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "Survey number is required"))]
    pub survey_number: String,
    #[validate(range(min = 0.01, message = "Allotted area must be positive"))]
    pub area_hectares: f64,
}

#[derive(Serialize, ToSchema)]
pub struct AllotmentResponse {
    pub id: String,
    pub allotment_number: String,
    pub holder_name: String,
    pub village: String,
    pub district: String,
    pub state: String,
    pub survey_number: String,
    pub area_hectares: f64,
    pub status: String,
    pub allotted_at: chrono::DateTime<Utc>,
}

impl From<allotments::Model> for AllotmentResponse {
    fn from(allotment: allotments::Model) -> Self {
        Self {
            id: allotment.id,
            allotment_number: allotment.allotment_number,
            holder_name: allotment.holder_name,
            village: allotment.village,
            district: allotment.district,
            state: allotment.state,
            survey_number: allotment.survey_number,
            area_hectares: allotment.area_hectares,
            status: allotment.status,
            allotted_at: allotment.allotted_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/allotments",
    params(
        ("search" = Option<String>, Query, description = "Substring match on holder, village or survey number"),
        ("status" = Option<String>, Query, description = "Status filter")
    ),
    responses(
        (status = 200, description = "List of allotments", body = Vec<AllotmentResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "allotments"
)]
pub async fn list_allotments(
    State(state): State<crate::AppState>,
    Query(query): Query<ListAllotmentsQuery>,
) -> Result<Json<Vec<AllotmentResponse>>, AppError> {
    let mut cond = Condition::all();

    if let Some(status) = query.status {
        cond = cond.add(allotments::Column::Status.eq(status));
    }

    if let Some(ref search) = query.search {
        let pattern = format!("%{}%", search.to_lowercase());
        cond = cond.add(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(allotments::Column::HolderName)))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(allotments::Column::Village)))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(allotments::Column::SurveyNumber)))
                        .like(pattern),
                ),
        );
    }

    let mut select = Allotments::find()
        .filter(cond)
        .order_by_desc(allotments::Column::AllottedAt);

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
    path = "/allotments/{id}",
    params(("id" = String, Path, description = "Allotment ID")),
    responses(
        (status = 200, description = "Allotment detail", body = AllotmentResponse),
        (status = 404, description = "Allotment not found")
    ),
    security(("jwt" = [])),
    tag = "allotments"
)]
pub async fn get_allotment(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<Json<AllotmentResponse>, AppError> {
    let allotment = Allotments::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Allotment not found".to_string()))?;

    Ok(Json(allotment.into()))
}

#[utoipa::path(
    post,
    path = "/allotments",
    request_body = CreateAllotmentRequest,
    responses(
        (status = 201, description = "Allotment recorded", body = AllotmentResponse),
        (status = 400, description = "Validation failed")
    ),
    security(("jwt" = [])),
    tag = "allotments"
)]
pub async fn create_allotment(
    State(state): State<crate::AppState>,
    Json(payload): Json<CreateAllotmentRequest>,
) -> Result<(StatusCode, Json<AllotmentResponse>), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let now = Utc::now();
    let raw = Uuid::new_v4().simple().to_string();
    let model = allotments::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        allotment_number: Set(format!("ALT/{}/{}", now.format("%Y"), &raw[..6])),
        holder_name: Set(payload.holder_name),
        village: Set(payload.village),
        district: Set(payload.district),
        state: Set(payload.state),
        survey_number: Set(payload.survey_number),
        area_hectares: Set(payload.area_hectares),
        status: Set(allotments::STATUS_ACTIVE.to_string()),
        allotted_at: Set(now),
    };

    let allotment = model.insert(&state.db).await?;
    Ok((StatusCode::CREATED, Json(allotment.into())))
}

#[utoipa::path(
    delete,
    path = "/allotments/{id}",
    params(("id" = String, Path, description = "Allotment ID")),
    responses(
        (status = 204, description = "Allotment deleted"),
        (status = 404, description = "Allotment not found")
    ),
    security(("jwt" = [])),
    tag = "allotments"
)]
pub async fn delete_allotment(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let res = Allotments::delete_by_id(id).exec(&state.db).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound("Allotment not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
