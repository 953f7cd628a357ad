// src/db/ledger_repo.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::Period},
    db::ledger_store::{LedgerStore, ProjectQuery},
    models::{
        client::{ClientPricing, PriceModel},
        finance::FinanceRecord,
        project::{CompletedProject, ProjectStatus, ProjectStatusCounts},
        staff::ProjectAssignment,
        vehicle::{VehicleCost, VehicleCostRow, VehicleCostSource},
    },
};

// Linha do JOIN projeto + cliente
#[derive(Debug, FromRow)]
struct CompletedProjectRow {
    id: Uuid,
    address: String,
    client_id: Option<Uuid>,
    client_name: Option<String>,
    panel_watt: i32,
    panel_quantity: i32,
    completed_at: NaiveDateTime,
    price_model: Option<PriceModel>,
    rate_per_watt: Option<Decimal>,
    rate_per_panel: Option<Decimal>,
}

impl CompletedProjectRow {
    fn into_project(self, assignments: Vec<ProjectAssignment>) -> CompletedProject {
        // Sem cliente (LEFT JOIN vazio) => sem preço => receita zero
        let pricing = self.price_model.map(|price_model| ClientPricing {
            price_model,
            rate_per_watt: self.rate_per_watt,
            rate_per_panel: self.rate_per_panel,
        });

        CompletedProject {
            id: self.id,
            address: self.address,
            client_id: self.client_id,
            client_name: self.client_name,
            panel_watt: self.panel_watt,
            panel_quantity: self.panel_quantity,
            completed_at: self.completed_at,
            pricing,
            assignments,
        }
    }
}

#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn completed_projects(&self, query: &ProjectQuery) -> Result<Vec<CompletedProject>, AppError> {
        let rows = sqlx::query_as::<_, CompletedProjectRow>(
            r#"
            SELECT
                p.id, p.address, p.client_id, c.name AS client_name,
                p.panel_watt, p.panel_quantity, p.completed_at,
                c.price_model, c.rate_per_watt, c.rate_per_panel
            FROM projects p
            LEFT JOIN clients c ON c.id = p.client_id
            WHERE p.status = 'completed'
              AND p.completed_at IS NOT NULL
              AND ($1::timestamp IS NULL OR p.completed_at >= $1)
              AND ($2::timestamp IS NULL OR p.completed_at <= $2)
              AND ($3::uuid IS NULL OR p.client_id = $3)
            ORDER BY p.completed_at DESC, p.id
            "#,
        )
            .bind(query.completed_from)
            .bind(query.completed_to)
            .bind(query.client_id)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // Uma só consulta para as alocações de todos os projetos
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let assignments = sqlx::query_as::<_, ProjectAssignment>(
            r#"
            SELECT id, project_id, staff_id, calculated_pay, paid_amount, created_at
            FROM project_assignments
            WHERE project_id = ANY($1)
            "#,
        )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        let mut by_project: HashMap<Uuid, Vec<ProjectAssignment>> = HashMap::new();
        for assignment in assignments {
            by_project.entry(assignment.project_id).or_default().push(assignment);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let assignments = by_project.remove(&row.id).unwrap_or_default();
                row.into_project(assignments)
            })
            .collect())
    }

    async fn finance_records(&self, period: &Period) -> Result<Vec<FinanceRecord>, AppError> {
        let records = sqlx::query_as::<_, FinanceRecord>(
            r#"
            SELECT id, record_type, category, amount, description, record_date, created_at
            FROM finance_records
            WHERE record_date BETWEEN $1 AND $2
            ORDER BY record_date DESC, id
            "#,
        )
            .bind(period.start)
            .bind(period.end)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn vehicle_costs(&self, period: &Period) -> Result<Vec<VehicleCost>, AppError> {
        let maintenance = sqlx::query_as::<_, VehicleCostRow>(
            r#"
            SELECT m.id, m.vehicle_id, v.plate_number, m.description, m.cost, m.maintenance_date
            FROM vehicle_maintenance m
            LEFT JOIN vehicles v ON v.id = m.vehicle_id
            WHERE m.maintenance_date BETWEEN $1 AND $2
            "#,
        )
            .bind(period.start)
            .bind(period.end)
            .fetch_all(&self.pool)
            .await?;

        let logs = sqlx::query_as::<_, VehicleCostRow>(
            r#"
            SELECT l.id, l.vehicle_id, v.plate_number, l.description, l.cost, l.maintenance_date
            FROM vehicle_maintenance_logs l
            LEFT JOIN vehicles v ON v.id = l.vehicle_id
            WHERE l.maintenance_date BETWEEN $1 AND $2
            "#,
        )
            .bind(period.start)
            .bind(period.end)
            .fetch_all(&self.pool)
            .await?;

        Ok(maintenance
            .into_iter()
            .map(|row| row.tagged(VehicleCostSource::Maintenance))
            .chain(logs.into_iter().map(|row| row.tagged(VehicleCostSource::MaintenanceLog)))
            .collect())
    }

    async fn project_status_counts(&self) -> Result<ProjectStatusCounts, AppError> {
        let rows = sqlx::query_as::<_, (ProjectStatus, i64)>(
            "SELECT status, COUNT(*) FROM projects GROUP BY status",
        )
            .fetch_all(&self.pool)
            .await?;

        let mut counts = ProjectStatusCounts::default();
        for (status, count) in rows {
            match status {
                ProjectStatus::Pending => counts.pending = count,
                ProjectStatus::InProgress => counts.in_progress = count,
                ProjectStatus::Completed => counts.completed = count,
            }
        }
        Ok(counts)
    }
}
