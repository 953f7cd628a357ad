// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_overview,
        handlers::dashboard::get_monthly_trend,

        // --- Finance ---
        handlers::finance::get_finance_summary,
        handlers::finance::get_project_finance_report,
        handlers::finance::get_financial_details,
        handlers::finance::create_finance_record,
        handlers::finance::list_finance_records,
        handlers::finance::delete_finance_record,

        // --- Projects ---
        handlers::projects::create_client,
        handlers::projects::create_project,
        handlers::projects::assign_staff,
        handlers::projects::set_stage_completion,
        handlers::projects::record_assignment_payment,
    ),
    components(
        schemas(
            // --- DASHBOARD ---
            models::dashboard::DashboardOverview,
            models::dashboard::MonthlyTrendEntry,

            // --- FINANCE ---
            models::finance::RecordType,
            models::finance::FinanceRecord,
            models::finance::PeriodSummary,
            models::finance::CategoryTotal,
            models::finance::ProjectRevenueDetail,
            models::finance::FinanceSummary,
            models::finance::ProjectFinanceTotals,
            models::finance::ProjectFinanceReport,
            models::finance::LedgerSource,
            models::finance::LedgerEntry,
            models::finance::FinancialDetails,

            // --- Projects ---
            models::client::PriceModel,
            models::client::Client,
            models::project::ProjectStatus,
            models::project::ProjectType,
            models::project::ProgressStage,
            models::project::Project,
            models::project::ProjectInverter,
            models::project::ProjectProgress,
            models::project::ProjectDetail,
            models::project::ProgressUpdate,
            models::project::ProjectStatusCounts,
            models::staff::PayType,
            models::staff::Staff,
            models::staff::ProjectAssignment,

            // --- Payloads ---
            handlers::finance::CreateFinanceRecordPayload,
            handlers::projects::CreateClientPayload,
            handlers::projects::InverterPayload,
            handlers::projects::CreateProjectPayload,
            handlers::projects::AssignStaffPayload,
            handlers::projects::StageCompletionPayload,
            handlers::projects::AssignmentPaymentPayload,
        )
    ),
    tags(
        (name = "Dashboard", description = "Indicadores do mês e tendência mensal"),
        (name = "Finance", description = "Resumos, relatórios por projeto, extrato e lançamentos"),
        (name = "Projects", description = "Clientes, projetos, equipe e etapas")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/dashboard/overview",
            "/api/dashboard/monthly-trend",
            "/api/finance/summary",
            "/api/finance/projects-report",
            "/api/finance/details",
            "/api/finance/records",
            "/api/finance/records/{record_id}",
            "/api/clients",
            "/api/projects",
            "/api/projects/{project_id}/assignments",
            "/api/projects/{project_id}/stages/{stage}",
            "/api/assignments/{assignment_id}/payments",
        ] {
            assert!(doc.paths.paths.contains_key(path), "rota ausente: {}", path);
        }
    }
}
