pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::PortalConfig;
use crate::services::processing::ProcessingService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use axum::http::HeaderValue;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::users::get_profile,
        api::handlers::documents::upload::upload_document,
        api::handlers::documents::list::list_documents,
        api::handlers::documents::list::get_document,
        api::handlers::documents::result::get_result,
        api::handlers::documents::manage::select_document,
        api::handlers::documents::manage::get_selected,
        api::handlers::documents::manage::delete_document,
        api::handlers::documents::manage::download_document,
        api::handlers::claims::list_claims,
        api::handlers::claims::get_claim,
        api::handlers::claims::create_claim,
        api::handlers::claims::update_claim_status,
        api::handlers::claims::delete_claim,
        api::handlers::allotments::list_allotments,
        api::handlers::allotments::get_allotment,
        api::handlers::allotments::create_allotment,
        api::handlers::allotments::delete_allotment,
        api::handlers::dashboard::get_stats,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::auth::SignupRequest,
            api::handlers::auth::LoginRequest,
            api::handlers::auth::AuthResponse,
            api::handlers::auth::UserProfile,
            api::handlers::documents::DocumentResponse,
            api::handlers::documents::DocumentMetadata,
            api::handlers::documents::result::DocumentResultResponse,
            api::handlers::documents::result::EntityView,
            services::extraction::EntityLabel,
            api::handlers::claims::ClaimResponse,
            api::handlers::claims::CreateClaimRequest,
            api::handlers::claims::UpdateClaimStatusRequest,
            api::handlers::allotments::AllotmentResponse,
            api::handlers::allotments::CreateAllotmentRequest,
            api::handlers::dashboard::DashboardStats,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "documents", description = "Document upload and analysis endpoints"),
        (name = "claims", description = "Forest rights claim records"),
        (name = "allotments", description = "Land allotment records"),
        (name = "dashboard", description = "Portal aggregates"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub processing: Arc<ProcessingService>,
    pub config: PortalConfig,
}

pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    let authed = |router: Router<AppState>| {
        router.layer(from_fn_with_state(
            state.clone(),
            api::middleware::auth::auth_middleware,
        ))
    };

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/register", post(api::handlers::auth::register))
        .route("/login", post(api::handlers::auth::login))
        .merge(authed(
            Router::new()
                .route("/users/me", get(api::handlers::users::get_profile))
                .route(
                    "/documents",
                    post(api::handlers::documents::upload_document)
                        .get(api::handlers::documents::list_documents),
                )
                .route(
                    "/documents/selected",
                    get(api::handlers::documents::get_selected),
                )
                .route(
                    "/documents/:id",
                    get(api::handlers::documents::get_document)
                        .delete(api::handlers::documents::delete_document),
                )
                .route(
                    "/documents/:id/result",
                    get(api::handlers::documents::get_result),
                )
                .route(
                    "/documents/:id/select",
                    put(api::handlers::documents::select_document),
                )
                .route(
                    "/documents/:id/download",
                    get(api::handlers::documents::download_document),
                )
                .route(
                    "/claims",
                    get(api::handlers::claims::list_claims).post(api::handlers::claims::create_claim),
                )
                .route(
                    "/claims/:id",
                    get(api::handlers::claims::get_claim)
                        .delete(api::handlers::claims::delete_claim),
                )
                .route(
                    "/claims/:id/status",
                    put(api::handlers::claims::update_claim_status),
                )
                .route(
                    "/allotments",
                    get(api::handlers::allotments::list_allotments)
                        .post(api::handlers::allotments::create_allotment),
                )
                .route(
                    "/allotments/:id",
                    get(api::handlers::allotments::get_allotment)
                        .delete(api::handlers::allotments::delete_allotment),
                )
                .route("/dashboard/stats", get(api::handlers::dashboard::get_stats)),
        ))
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors)
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_file_size + 10 * 1024 * 1024, // Multipart overhead buffer
        ))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}
