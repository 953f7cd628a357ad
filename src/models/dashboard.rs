// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::money;
use crate::models::{finance::PeriodSummary, project::ProjectStatusCounts};

// 1. Visão Geral (cards do topo)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub current_month: PeriodSummary,
    // Contagens de toda a base, não só do mês
    pub project_counts: ProjectStatusCounts,
    pub total_projects: i64,
}

// 2. Gráfico mensal
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrendEntry {
    #[schema(example = "2024-03")]
    pub month: String,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub income: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub expense: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub profit: Decimal,
    pub projects_completed: i64,
}
