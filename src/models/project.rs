// src/models/project.rs

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::client::ClientPricing;
use crate::models::staff::ProjectAssignment;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Pending,    // Criado, sem equipe
    InProgress, // Primeira equipe alocada
    Completed,  // Todas as etapas concluídas
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "project_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Standard,
    Insurance, // Projetos de seguro começam pela remoção
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "progress_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    InsuranceRemoval,
    Installation,
    Wiring,
    Inspection,
    GridConnection,
}

const STANDARD_STAGES: [ProgressStage; 4] = [
    ProgressStage::Installation,
    ProgressStage::Wiring,
    ProgressStage::Inspection,
    ProgressStage::GridConnection,
];

const INSURANCE_STAGES: [ProgressStage; 5] = [
    ProgressStage::InsuranceRemoval,
    ProgressStage::Installation,
    ProgressStage::Wiring,
    ProgressStage::Inspection,
    ProgressStage::GridConnection,
];

impl ProjectType {
    /// Etapas do checklist, na ordem.
    pub fn stages(self) -> &'static [ProgressStage] {
        match self {
            ProjectType::Standard => &STANDARD_STAGES,
            ProjectType::Insurance => &INSURANCE_STAGES,
        }
    }
}

impl FromStr for ProgressStage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insurance_removal" => Ok(ProgressStage::InsuranceRemoval),
            "installation" => Ok(ProgressStage::Installation),
            "wiring" => Ok(ProgressStage::Wiring),
            "inspection" => Ok(ProgressStage::Inspection),
            "grid_connection" => Ok(ProgressStage::GridConnection),
            other => Err(AppError::invalid("stage", format!("unknown stage '{}'", other))),
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,

    #[schema(example = "Rua das Acácias, 120 - Campinas/SP")]
    pub address: String,

    pub client_id: Option<Uuid>,
    pub project_type: ProjectType,

    #[schema(example = 400)]
    pub panel_watt: i32,
    #[schema(example = 20)]
    pub panel_quantity: i32,

    pub status: ProjectStatus,

    // Data oficial de reconhecimento da receita
    #[schema(value_type = Option<String>, example = "2024-03-15T14:30:00")]
    pub completed_at: Option<NaiveDateTime>,

    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn total_watt(&self) -> i64 {
        total_watt(self.panel_watt, self.panel_quantity)
    }
}

// Limites físicos aceitos na entrada (mesmos CHECKs da migração)
pub const MAX_PANEL_WATT: i32 = 1_000;
pub const MAX_PANEL_QUANTITY: i32 = 10_000;

// Nunca gravado no banco; sempre derivado.
pub fn total_watt(panel_watt: i32, panel_quantity: i32) -> i64 {
    i64::from(panel_watt) * i64::from(panel_quantity)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInverter {
    pub id: Uuid,
    pub project_id: Uuid,
    #[schema(example = "Growatt MIN 5000TL-X")]
    pub model: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub id: Uuid,
    pub project_id: Uuid,
    pub stage: ProgressStage,
    pub position: i32,
    pub is_completed: bool,
    #[schema(value_type = Option<String>)]
    pub completed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub inverters: Vec<ProjectInverter>,
    pub progress: Vec<ProjectProgress>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub project_id: Uuid,
    pub status: ProjectStatus,
    #[schema(value_type = Option<String>)]
    pub completed_at: Option<NaiveDateTime>,
    pub progress: Vec<ProjectProgress>,
}

/// Projeto concluído já com o preço do cliente e as alocações da equipe,
/// pronto para o cálculo de receita e custo de mão de obra.
#[derive(Debug, Clone)]
pub struct CompletedProject {
    pub id: Uuid,
    pub address: String,
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub panel_watt: i32,
    pub panel_quantity: i32,
    pub completed_at: NaiveDateTime,
    pub pricing: Option<ClientPricing>,
    pub assignments: Vec<ProjectAssignment>,
}

impl CompletedProject {
    pub fn total_watt(&self) -> i64 {
        total_watt(self.panel_watt, self.panel_quantity)
    }
}

/// Contagem global por status (não depende de período).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatusCounts {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
}

impl ProjectStatusCounts {
    pub fn total(&self) -> i64 {
        self.pending + self.in_progress + self.completed
    }
}
