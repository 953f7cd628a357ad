// src/models/finance.rs

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{error::AppError, money, period::Period};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "finance_record_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Income,  // Entrada
    Expense, // Saída
}

impl FromStr for RecordType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(RecordType::Income),
            "expense" => Ok(RecordType::Expense),
            other => Err(AppError::invalid(
                "recordType",
                format!("unknown record type '{}', expected 'income' or 'expense'", other),
            )),
        }
    }
}

// --- Lançamentos avulsos ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceRecord {
    pub id: Uuid,

    pub record_type: RecordType,

    #[schema(example = "fuel")]
    pub category: String,

    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String, example = "150.00")]
    pub amount: Decimal,

    pub description: Option<String>,

    // Data usada para o período (independente de created_at)
    #[schema(value_type = String, format = Date, example = "2024-03-20")]
    pub record_date: NaiveDate,

    pub created_at: DateTime<Utc>,
}

// =========================================================================
//  RESUMO DE PERÍODO
// =========================================================================

/// Totais de um período. Os valores guardam precisão total e só são
/// arredondados na serialização.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub period: Period,

    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String, example = "400.00")]
    pub project_revenue: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub other_income: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub total_income: Decimal,

    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String, example = "600.00")]
    pub labor_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub other_expense: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub vehicle_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub total_expense: Decimal,

    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String, example = "-200.00")]
    pub net_profit: Decimal,

    // Percentual; zero quando não há receita
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String, example = "-50.00")]
    pub profit_margin: Decimal,

    pub total_watt: i64,
    pub projects_completed: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRevenueDetail {
    pub project_id: Uuid,
    pub address: String,
    pub client_name: Option<String>,
    #[schema(value_type = String)]
    pub completed_at: NaiveDateTime,
    pub total_watt: i64,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub revenue: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub labor_cost: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    #[serde(flatten)]
    pub summary: PeriodSummary,
    pub income_by_category: Vec<CategoryTotal>,
    pub expense_by_category: Vec<CategoryTotal>,
    pub projects: Vec<ProjectRevenueDetail>,
}

// =========================================================================
//  RELATÓRIO POR PROJETO
// =========================================================================

#[derive(Debug, Clone, Default)]
pub struct ProjectReportFilter {
    pub period: Option<Period>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFinanceTotals {
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub revenue: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub expense: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub profit: Decimal,
    pub project_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFinanceReport {
    pub rows: Vec<ProjectRevenueDetail>,
    pub totals: ProjectFinanceTotals,
}

// =========================================================================
//  EXTRATO DETALHADO
// =========================================================================

/// Origem de cada linha do extrato, para o front mostrar a procedência.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LedgerSource {
    ProjectRevenue,
    Labor,
    FinanceRecord,
    VehicleMaintenance,
    VehicleMaintenanceLog,
}

impl LedgerSource {
    pub fn prefix(self) -> &'static str {
        match self {
            LedgerSource::ProjectRevenue => "project",
            LedgerSource::Labor => "labor",
            LedgerSource::FinanceRecord => "finance",
            LedgerSource::VehicleMaintenance => "vehicle",
            LedgerSource::VehicleMaintenanceLog => "vehicle-log",
        }
    }

    pub fn entry_id(self, id: Uuid) -> String {
        format!("{}-{}", self.prefix(), id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    #[schema(example = "finance-550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    pub source: LedgerSource,
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDetails {
    pub period: Period,
    pub income: Vec<LedgerEntry>,
    pub expense: Vec<LedgerEntry>,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub total_income: Decimal,
    #[serde(serialize_with = "money::serialize")]
    #[schema(value_type = String)]
    pub total_expense: Decimal,
}
