// src/handlers/projects.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::validate_positive,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        client::{Client, PriceModel},
        project::{ProgressStage, ProgressUpdate, ProjectDetail, ProjectType},
        staff::ProjectAssignment,
    },
    services::project_service::{NewClient, NewInverter, NewProject},
};

// =============================================================================
//  1. CLIENTES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Construtora Sol Nascente")]
    pub name: String,

    /// "per_watt" ou "per_panel"
    #[schema(example = "per_watt")]
    pub price_model: String,

    #[schema(value_type = Option<String>, example = "0.35")]
    pub rate_per_watt: Option<Decimal>,

    #[schema(value_type = Option<String>, example = "120.00")]
    pub rate_per_panel: Option<Decimal>,
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Projects",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let price_model: PriceModel = payload.price_model
        .parse()
        .map_err(|e: AppError| e.to_api_error(&locale))?;

    let client = app_state.project_service
        .create_client(
            &app_state.db_pool,
            NewClient {
                name: payload.name,
                price_model,
                rate_per_watt: payload.rate_per_watt,
                rate_per_panel: payload.rate_per_panel,
            },
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(client)))
}

// =============================================================================
//  2. PROJETOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InverterPayload {
    #[validate(length(min = 1, message = "O modelo é obrigatório."))]
    #[schema(example = "Growatt MIN 5000TL-X")]
    pub model: String,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 1)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    #[schema(example = "Rua das Palmeiras, 120")]
    pub address: String,

    pub client_id: Option<Uuid>,

    /// Padrão: standard
    #[serde(default)]
    pub project_type: Option<ProjectType>,

    #[validate(range(min = 1, max = 1000, message = "A potência do painel deve estar entre 1 e 1000 W."))]
    #[schema(example = 400)]
    pub panel_watt: i32,

    #[validate(range(min = 1, max = 10000, message = "A quantidade de painéis deve estar entre 1 e 10000."))]
    #[schema(example = 10)]
    pub panel_quantity: i32,

    #[serde(default)]
    #[validate(nested)]
    pub inverters: Vec<InverterPayload>,
}

// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = CreateProjectPayload,
    responses(
        (status = 201, description = "Projeto criado com inversores e etapas", body = ProjectDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let input = NewProject {
        address: payload.address,
        client_id: payload.client_id,
        project_type: payload.project_type.unwrap_or(ProjectType::Standard),
        panel_watt: payload.panel_watt,
        panel_quantity: payload.panel_quantity,
        inverters: payload
            .inverters
            .into_iter()
            .map(|inv| NewInverter { model: inv.model, quantity: inv.quantity })
            .collect(),
    };

    let detail = app_state.project_service
        .create_project(&app_state.db_pool, input)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignStaffPayload {
    pub staff_id: Uuid,
}

// POST /api/projects/{project_id}/assignments
#[utoipa::path(
    post,
    path = "/api/projects/{project_id}/assignments",
    tag = "Projects",
    params(
        ("project_id" = Uuid, Path, description = "ID do projeto")
    ),
    request_body = AssignStaffPayload,
    responses(
        (status = 201, description = "Funcionário alocado", body = ProjectAssignment),
        (status = 404, description = "Projeto ou funcionário não encontrado")
    )
)]
pub async fn assign_staff(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<AssignStaffPayload>,
) -> Result<impl IntoResponse, ApiError> {

    let assignment = app_state.project_service
        .assign_staff(&app_state.db_pool, project_id, payload.staff_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageCompletionPayload {
    pub completed: bool,
}

// PATCH /api/projects/{project_id}/stages/{stage}
#[utoipa::path(
    patch,
    path = "/api/projects/{project_id}/stages/{stage}",
    tag = "Projects",
    params(
        ("project_id" = Uuid, Path, description = "ID do projeto"),
        ("stage" = String, Path, description = "Etapa (ex: installation, grid_connection)")
    ),
    request_body = StageCompletionPayload,
    responses(
        (status = 200, description = "Etapa atualizada; pode concluir o projeto", body = ProgressUpdate),
        (status = 400, description = "Etapa inválida para o projeto"),
        (status = 404, description = "Projeto não encontrado")
    )
)]
pub async fn set_stage_completion(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((project_id, stage)): Path<(Uuid, String)>,
    Json(payload): Json<StageCompletionPayload>,
) -> Result<impl IntoResponse, ApiError> {

    let stage: ProgressStage = stage
        .parse()
        .map_err(|e: AppError| e.to_api_error(&locale))?;

    let update = app_state.project_service
        .set_stage_completion(&app_state.db_pool, project_id, stage, payload.completed)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(update)))
}

// =============================================================================
//  3. PAGAMENTOS DA EQUIPE
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPaymentPayload {
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = String, example = "200.00")]
    pub amount: Decimal,
}

// POST /api/assignments/{assignment_id}/payments
#[utoipa::path(
    post,
    path = "/api/assignments/{assignment_id}/payments",
    tag = "Projects",
    params(
        ("assignment_id" = Uuid, Path, description = "ID da alocação")
    ),
    request_body = AssignmentPaymentPayload,
    responses(
        (status = 200, description = "Pagamento registrado", body = ProjectAssignment),
        (status = 400, description = "Valor inválido ou acima do devido"),
        (status = 404, description = "Alocação não encontrada")
    )
)]
pub async fn record_assignment_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(assignment_id): Path<Uuid>,
    Json(payload): Json<AssignmentPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let assignment = app_state.project_service
        .record_assignment_payment(&app_state.db_pool, assignment_id, payload.amount)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(assignment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_payload_validates_nested_inverters() {
        let payload: CreateProjectPayload = serde_json::from_value(serde_json::json!({
            "address": "Rua A, 1",
            "panelWatt": 400,
            "panelQuantity": 10,
            "inverters": [{ "model": "X", "quantity": 0 }]
        }))
        .unwrap();

        assert!(payload.project_type.is_none());
        assert!(payload.validate().is_err());
    }

    #[test]
    fn project_payload_rejects_oversized_panels() {
        let payload: CreateProjectPayload = serde_json::from_value(serde_json::json!({
            "address": "Rua C, 3",
            "panelWatt": i32::MAX,
            "panelQuantity": 10001
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("panel_watt"));
        assert!(fields.contains_key("panel_quantity"));
    }

    #[test]
    fn project_payload_accepts_insurance_type() {
        let payload: CreateProjectPayload = serde_json::from_value(serde_json::json!({
            "address": "Rua B, 2",
            "projectType": "insurance",
            "panelWatt": 550,
            "panelQuantity": 8
        }))
        .unwrap();

        assert_eq!(payload.project_type, Some(ProjectType::Insurance));
        assert!(payload.inverters.is_empty());
        assert!(payload.validate().is_ok());
    }
}
