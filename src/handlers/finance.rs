// src/handlers/finance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        period::{Period, ReportPeriod},
        validation::validate_positive,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::finance::{
        FinanceRecord, FinanceSummary, FinancialDetails, ProjectFinanceReport, ProjectReportFilter, RecordType,
    },
    services::finance_service::NewFinanceRecord,
};

// Período opcional: os dois extremos ou nenhum
fn optional_period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Option<Period>, AppError> {
    match (start, end) {
        (Some(start), Some(end)) => Period::new(start, end).map(Some),
        (None, None) => Ok(None),
        (Some(_), None) => Err(AppError::invalid("endDate", "endDate is required when startDate is given")),
        (None, Some(_)) => Err(AppError::invalid("startDate", "startDate is required when endDate is given")),
    }
}

// =============================================================================
//  1. RELATÓRIOS
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// "month" (padrão) ou "year"
    pub period: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

// GET /api/finance/summary?period=month&year=2024&month=3
#[utoipa::path(
    get,
    path = "/api/finance/summary",
    tag = "Finance",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Resumo do período com categorias e receita por projeto", body = FinanceSummary),
        (status = 400, description = "Período inválido")
    )
)]
pub async fn get_finance_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {

    let period: ReportPeriod = query.period.as_deref().unwrap_or("month")
        .parse()
        .map_err(|e: AppError| e.to_api_error(&locale))?;

    let summary = app_state.finance_service
        .get_finance_summary(period, query.year, query.month)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(summary)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProjectReportQuery {
    #[param(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub client_id: Option<Uuid>,
}

// GET /api/finance/projects-report
#[utoipa::path(
    get,
    path = "/api/finance/projects-report",
    tag = "Finance",
    params(ProjectReportQuery),
    responses(
        (status = 200, description = "Receita, despesa e lucro por projeto concluído", body = ProjectFinanceReport),
        (status = 400, description = "Intervalo de datas inválido")
    )
)]
pub async fn get_project_finance_report(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ProjectReportQuery>,
) -> Result<impl IntoResponse, ApiError> {

    let filter = ProjectReportFilter {
        period: optional_period(query.start_date, query.end_date)
            .map_err(|e| e.to_api_error(&locale))?,
        client_id: query.client_id,
    };

    let report = app_state.finance_service
        .get_project_finance_report(&filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    #[param(value_type = String, format = Date, example = "2024-03-01")]
    pub start_date: NaiveDate,
    #[param(value_type = String, format = Date, example = "2024-03-31")]
    pub end_date: NaiveDate,
}

// GET /api/finance/details?startDate=2024-03-01&endDate=2024-03-31
#[utoipa::path(
    get,
    path = "/api/finance/details",
    tag = "Finance",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Extrato detalhado de entradas e saídas", body = FinancialDetails),
        (status = 400, description = "Intervalo de datas inválido")
    )
)]
pub async fn get_financial_details(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {

    let details = app_state.finance_service
        .get_financial_details(query.start_date, query.end_date)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(details)))
}

// =============================================================================
//  2. LANÇAMENTOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFinanceRecordPayload {
    #[schema(example = "expense")]
    pub record_type: String,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    #[schema(example = "fuel")]
    pub category: String,

    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = String, example = "150.00")]
    pub amount: Decimal,

    #[schema(example = "Abastecimento da van")]
    pub description: Option<String>,

    #[schema(value_type = String, format = Date, example = "2024-03-20")]
    pub record_date: NaiveDate,
}

// POST /api/finance/records
#[utoipa::path(
    post,
    path = "/api/finance/records",
    tag = "Finance",
    request_body = CreateFinanceRecordPayload,
    responses(
        (status = 201, description = "Lançamento criado", body = FinanceRecord),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_finance_record(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateFinanceRecordPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let record_type: RecordType = payload.record_type
        .parse()
        .map_err(|e: AppError| e.to_api_error(&locale))?;

    let record = app_state.finance_record_service
        .create_finance_record(
            &app_state.db_pool,
            NewFinanceRecord {
                record_type,
                category: payload.category,
                amount: payload.amount,
                description: payload.description,
                record_date: payload.record_date,
            },
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListRecordsQuery {
    #[param(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    /// "income" ou "expense"
    pub record_type: Option<String>,
}

// GET /api/finance/records
#[utoipa::path(
    get,
    path = "/api/finance/records",
    tag = "Finance",
    params(ListRecordsQuery),
    responses(
        (status = 200, description = "Lançamentos do período (padrão: mês atual)", body = Vec<FinanceRecord>)
    )
)]
pub async fn list_finance_records(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ListRecordsQuery>,
) -> Result<impl IntoResponse, ApiError> {

    let period = optional_period(query.start_date, query.end_date)
        .map_err(|e| e.to_api_error(&locale))?
        .unwrap_or_else(|| Period::month_of(Local::now().date_naive()));

    let record_type = query.record_type
        .as_deref()
        .map(str::parse::<RecordType>)
        .transpose()
        .map_err(|e| e.to_api_error(&locale))?;

    let records = app_state.finance_record_service
        .list_finance_records(&app_state.db_pool, &period, record_type)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(records)))
}

// DELETE /api/finance/records/{record_id}
#[utoipa::path(
    delete,
    path = "/api/finance/records/{record_id}",
    tag = "Finance",
    params(
        ("record_id" = Uuid, Path, description = "ID do lançamento")
    ),
    responses(
        (status = 204, description = "Lançamento removido"),
        (status = 404, description = "Lançamento não encontrado")
    )
)]
pub async fn delete_finance_record(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(record_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {

    app_state.finance_record_service
        .delete_finance_record(&app_state.db_pool, record_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn optional_period_requires_both_bounds() {
        assert_matches!(optional_period(None, None), Ok(None));
        assert_matches!(optional_period(Some(date(1)), Some(date(31))), Ok(Some(_)));
        assert_matches!(
            optional_period(Some(date(1)), None),
            Err(AppError::InvalidInput { field: "endDate", .. })
        );
        assert_matches!(
            optional_period(Some(date(31)), Some(date(1))),
            Err(AppError::InvalidInput { field: "endDate", .. })
        );
    }

    #[test]
    fn record_payload_rejects_non_positive_amount() {
        let payload = CreateFinanceRecordPayload {
            record_type: "expense".into(),
            category: "fuel".into(),
            amount: Decimal::ZERO,
            description: None,
            record_date: date(20),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("amount"));
    }
}
