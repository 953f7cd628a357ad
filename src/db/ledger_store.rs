// src/db/ledger_store.rs

use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::Period},
    models::{
        finance::FinanceRecord,
        project::{CompletedProject, ProjectStatusCounts},
        vehicle::VehicleCost,
    },
};

/// Filtro de projetos concluídos. Limites de `completed_at` são inclusivos.
#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
    pub completed_from: Option<NaiveDateTime>,
    pub completed_to: Option<NaiveDateTime>,
    pub client_id: Option<Uuid>,
}

impl ProjectQuery {
    pub fn within(period: &Period) -> Self {
        Self {
            completed_from: Some(period.start_at()),
            completed_to: Some(period.end_at()),
            client_id: None,
        }
    }

    pub fn for_client(mut self, client_id: Option<Uuid>) -> Self {
        self.client_id = client_id;
        self
    }
}

/// Leitura do razão usada pelos relatórios. Somente leitura: cada chamada
/// recalcula a partir do banco, sem cache.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Projetos com status `completed`, com preço do cliente e alocações.
    async fn completed_projects(&self, query: &ProjectQuery) -> Result<Vec<CompletedProject>, AppError>;

    /// Lançamentos avulsos cuja `record_date` cai no período.
    async fn finance_records(&self, period: &Period) -> Result<Vec<FinanceRecord>, AppError>;

    /// Custos de manutenção (tabela principal + logs) dentro do período.
    async fn vehicle_costs(&self, period: &Period) -> Result<Vec<VehicleCost>, AppError>;

    async fn project_status_counts(&self) -> Result<ProjectStatusCounts, AppError>;
}
