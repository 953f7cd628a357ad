// src/lib.rs

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc};

/// Monta todas as rotas da API (+ Swagger em /swagger-ui).
pub fn build_router(app_state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route("/overview", get(handlers::dashboard::get_overview))
        .route("/monthly-trend", get(handlers::dashboard::get_monthly_trend));

    let finance_routes = Router::new()
        .route("/summary", get(handlers::finance::get_finance_summary))
        .route("/projects-report", get(handlers::finance::get_project_finance_report))
        .route("/details", get(handlers::finance::get_financial_details))
        .route("/records"
               ,post(handlers::finance::create_finance_record)
               .get(handlers::finance::list_finance_records)
        )
        .route("/records/{record_id}", delete(handlers::finance::delete_finance_record));

    let project_routes = Router::new()
        .route("/", post(handlers::projects::create_project))
        .route("/{project_id}/assignments", post(handlers::projects::assign_staff))
        .route("/{project_id}/stages/{stage}", patch(handlers::projects::set_stage_completion));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/clients", post(handlers::projects::create_client))
        .route(
            "/api/assignments/{assignment_id}/payments",
            post(handlers::projects::record_assignment_payment),
        )
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/finance", finance_routes)
        .nest("/api/projects", project_routes)
        .with_state(app_state)
}
