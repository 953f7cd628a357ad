//! In-memory ledger shared by the report integration tests.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use solar_backend::common::{error::AppError, period::Period};
use solar_backend::db::ledger_store::{LedgerStore, ProjectQuery};
use solar_backend::models::{
    client::{ClientPricing, PriceModel},
    finance::{FinanceRecord, RecordType},
    project::{CompletedProject, ProjectStatusCounts},
    staff::ProjectAssignment,
    vehicle::{VehicleCost, VehicleCostSource},
};
use solar_backend::services::{
    aggregator::PeriodAggregator, dashboard_service::DashboardService, finance_service::FinanceService,
};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, s).unwrap()
}

pub fn per_watt(rate: &str) -> ClientPricing {
    ClientPricing {
        price_model: PriceModel::PerWatt,
        rate_per_watt: Some(dec(rate)),
        rate_per_panel: None,
    }
}

pub fn per_panel(rate: &str) -> ClientPricing {
    ClientPricing {
        price_model: PriceModel::PerPanel,
        rate_per_watt: None,
        rate_per_panel: Some(dec(rate)),
    }
}

pub fn assignment(project_id: Uuid, pay: &str) -> ProjectAssignment {
    ProjectAssignment {
        id: Uuid::new_v4(),
        project_id,
        staff_id: Uuid::new_v4(),
        calculated_pay: Some(dec(pay)),
        paid_amount: Decimal::ZERO,
        created_at: Utc::now(),
    }
}

pub fn completed_project(
    client: Option<(Uuid, &str, ClientPricing)>,
    panel_watt: i32,
    panel_quantity: i32,
    completed_at: NaiveDateTime,
    pays: &[&str],
) -> CompletedProject {
    let id = Uuid::new_v4();
    CompletedProject {
        id,
        address: format!("Rua {}", &id.to_string()[..8]),
        client_id: client.map(|(cid, _, _)| cid),
        client_name: client.map(|(_, name, _)| name.to_string()),
        panel_watt,
        panel_quantity,
        completed_at,
        pricing: client.map(|(_, _, pricing)| pricing),
        assignments: pays.iter().map(|p| assignment(id, p)).collect(),
    }
}

pub fn record(record_type: RecordType, category: &str, amount: &str, record_date: NaiveDate) -> FinanceRecord {
    FinanceRecord {
        id: Uuid::new_v4(),
        record_type,
        category: category.to_string(),
        amount: dec(amount),
        description: None,
        record_date,
        created_at: Utc::now(),
    }
}

pub fn vehicle_cost(source: VehicleCostSource, cost: &str, maintenance_date: NaiveDate) -> VehicleCost {
    VehicleCost {
        id: Uuid::new_v4(),
        source,
        vehicle_id: Uuid::new_v4(),
        plate_number: Some("ABC1D23".to_string()),
        description: Some("Troca de óleo".to_string()),
        cost: dec(cost),
        maintenance_date,
    }
}

/// Razão em memória com a mesma semântica de filtro do Postgres.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    pub projects: Vec<CompletedProject>,
    pub records: Vec<FinanceRecord>,
    pub vehicle_costs: Vec<VehicleCost>,
    pub counts: ProjectStatusCounts,
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn completed_projects(&self, query: &ProjectQuery) -> Result<Vec<CompletedProject>, AppError> {
        let mut projects: Vec<CompletedProject> = self
            .projects
            .iter()
            .filter(|p| query.completed_from.is_none_or(|from| p.completed_at >= from))
            .filter(|p| query.completed_to.is_none_or(|to| p.completed_at <= to))
            .filter(|p| query.client_id.is_none_or(|cid| p.client_id == Some(cid)))
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(projects)
    }

    async fn finance_records(&self, period: &Period) -> Result<Vec<FinanceRecord>, AppError> {
        Ok(self
            .records
            .iter()
            .filter(|r| period.contains_date(r.record_date))
            .cloned()
            .collect())
    }

    async fn vehicle_costs(&self, period: &Period) -> Result<Vec<VehicleCost>, AppError> {
        Ok(self
            .vehicle_costs
            .iter()
            .filter(|v| period.contains_date(v.maintenance_date))
            .cloned()
            .collect())
    }

    async fn project_status_counts(&self) -> Result<ProjectStatusCounts, AppError> {
        Ok(self.counts)
    }
}

pub fn aggregator(ledger: MemoryLedger) -> PeriodAggregator {
    PeriodAggregator::new(Arc::new(ledger))
}

pub fn finance_service(ledger: MemoryLedger) -> FinanceService {
    FinanceService::new(aggregator(ledger))
}

pub fn dashboard_service(ledger: MemoryLedger) -> DashboardService {
    DashboardService::new(aggregator(ledger), 6)
}
