// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::dashboard::{DashboardOverview, MonthlyTrendEntry},
};

// GET /api/dashboard/overview
#[utoipa::path(
    get,
    path = "/api/dashboard/overview",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo do mês corrente e contagem de projetos por status", body = DashboardOverview)
    )
)]
pub async fn get_overview(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {

    let overview = app_state.dashboard_service
        .get_overview()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(overview)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendQuery {
    /// Quantidade de meses, de 1 a 120 (padrão configurável, 6).
    /// O histórico é limitado a 10 anos.
    pub months: Option<u32>,
}

// GET /api/dashboard/monthly-trend?months=6
#[utoipa::path(
    get,
    path = "/api/dashboard/monthly-trend",
    tag = "Dashboard",
    params(TrendQuery),
    responses(
        (status = 200, description = "Série mensal (mais antigo primeiro), sem meses faltando", body = Vec<MonthlyTrendEntry>),
        (status = 400, description = "Quantidade de meses fora de 1..=120 (limite de 10 anos de histórico)")
    )
)]
pub async fn get_monthly_trend(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<TrendQuery>,
) -> Result<impl IntoResponse, ApiError> {

    let trend = app_state.dashboard_service
        .get_monthly_trend(query.months)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(trend)))
}
