// src/db/project_repo.rs

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        client::{Client, PriceModel},
        project::{ProgressStage, Project, ProjectInverter, ProjectProgress, ProjectStatus, ProjectType},
        staff::{ProjectAssignment, Staff},
    },
};

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        name: &str,
        price_model: PriceModel,
        rate_per_watt: Option<Decimal>,
        rate_per_panel: Option<Decimal>,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (name, price_model, rate_per_watt, rate_per_panel)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price_model, rate_per_watt, rate_per_panel, created_at
            "#,
        )
            .bind(name)
            .bind(price_model)
            .bind(rate_per_watt)
            .bind(rate_per_panel)
            .fetch_one(executor)
            .await?;

        Ok(client)
    }

    pub async fn find_client<'e, E>(&self, executor: E, client_id: Uuid) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, price_model, rate_per_watt, rate_per_panel, created_at FROM clients WHERE id = $1",
        )
            .bind(client_id)
            .fetch_optional(executor)
            .await?;

        Ok(client)
    }

    pub async fn find_staff<'e, E>(&self, executor: E, staff_id: Uuid) -> Result<Option<Staff>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT id, full_name, pay_type, pay_rate, created_at FROM staff WHERE id = $1",
        )
            .bind(staff_id)
            .fetch_optional(executor)
            .await?;

        Ok(staff)
    }

    // =========================================================================
    //  PROJETOS
    // =========================================================================

    pub async fn insert_project<'e, E>(
        &self,
        executor: E,
        address: &str,
        client_id: Option<Uuid>,
        project_type: ProjectType,
        panel_watt: i32,
        panel_quantity: i32,
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Todo projeto nasce 'pending'
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (address, client_id, project_type, panel_watt, panel_quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, address, client_id, project_type, panel_watt, panel_quantity,
                      status, completed_at, created_at
            "#,
        )
            .bind(address)
            .bind(client_id)
            .bind(project_type)
            .bind(panel_watt)
            .bind(panel_quantity)
            .fetch_one(executor)
            .await?;

        Ok(project)
    }

    /// Busca com `FOR UPDATE` para serializar mudanças de status concorrentes.
    pub async fn lock_project<'e, E>(&self, executor: E, project_id: Uuid) -> Result<Option<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, address, client_id, project_type, panel_watt, panel_quantity,
                   status, completed_at, created_at
            FROM projects
            WHERE id = $1
            FOR UPDATE
            "#,
        )
            .bind(project_id)
            .fetch_optional(executor)
            .await?;

        Ok(project)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        status: ProjectStatus,
        completed_at: Option<NaiveDateTime>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // COALESCE: completed_at nunca é apagado
        sqlx::query(
            r#"
            UPDATE projects
            SET status = $1, completed_at = COALESCE($2, completed_at)
            WHERE id = $3
            "#,
        )
            .bind(status)
            .bind(completed_at)
            .bind(project_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn insert_inverter<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        model: &str,
        quantity: i32,
    ) -> Result<ProjectInverter, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inverter = sqlx::query_as::<_, ProjectInverter>(
            r#"
            INSERT INTO project_inverters (project_id, model, quantity)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, model, quantity
            "#,
        )
            .bind(project_id)
            .bind(model)
            .bind(quantity)
            .fetch_one(executor)
            .await?;

        Ok(inverter)
    }

    pub async fn insert_log<'e, E>(&self, executor: E, project_id: Uuid, message: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO project_logs (project_id, message) VALUES ($1, $2)")
            .bind(project_id)
            .bind(message)
            .execute(executor)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  PROGRESSO (CHECKLIST)
    // =========================================================================

    pub async fn insert_stage<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        stage: ProgressStage,
        position: i32,
    ) -> Result<ProjectProgress, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let progress = sqlx::query_as::<_, ProjectProgress>(
            r#"
            INSERT INTO project_progress (project_id, stage, position)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, stage, position, is_completed, completed_at
            "#,
        )
            .bind(project_id)
            .bind(stage)
            .bind(position)
            .fetch_one(executor)
            .await?;

        Ok(progress)
    }

    pub async fn list_stages<'e, E>(&self, executor: E, project_id: Uuid) -> Result<Vec<ProjectProgress>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stages = sqlx::query_as::<_, ProjectProgress>(
            r#"
            SELECT id, project_id, stage, position, is_completed, completed_at
            FROM project_progress
            WHERE project_id = $1
            ORDER BY position ASC
            "#,
        )
            .bind(project_id)
            .fetch_all(executor)
            .await?;

        Ok(stages)
    }

    pub async fn set_stage<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        stage: ProgressStage,
        is_completed: bool,
        completed_at: Option<NaiveDateTime>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE project_progress
            SET is_completed = $1, completed_at = $2
            WHERE project_id = $3 AND stage = $4
            "#,
        )
            .bind(is_completed)
            .bind(completed_at)
            .bind(project_id)
            .bind(stage)
            .execute(executor)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  ALOCAÇÕES DE EQUIPE
    // =========================================================================

    pub async fn insert_assignment<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        staff_id: Uuid,
        calculated_pay: Decimal,
    ) -> Result<ProjectAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, ProjectAssignment>(
            r#"
            INSERT INTO project_assignments (project_id, staff_id, calculated_pay)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, staff_id, calculated_pay, paid_amount, created_at
            "#,
        )
            .bind(project_id)
            .bind(staff_id)
            .bind(calculated_pay)
            .fetch_one(executor)
            .await?;

        Ok(assignment)
    }

    pub async fn lock_assignment<'e, E>(
        &self,
        executor: E,
        assignment_id: Uuid,
    ) -> Result<Option<ProjectAssignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, ProjectAssignment>(
            r#"
            SELECT id, project_id, staff_id, calculated_pay, paid_amount, created_at
            FROM project_assignments
            WHERE id = $1
            FOR UPDATE
            "#,
        )
            .bind(assignment_id)
            .fetch_optional(executor)
            .await?;

        Ok(assignment)
    }

    pub async fn set_paid_amount<'e, E>(
        &self,
        executor: E,
        assignment_id: Uuid,
        paid_amount: Decimal,
    ) -> Result<ProjectAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, ProjectAssignment>(
            r#"
            UPDATE project_assignments
            SET paid_amount = $1
            WHERE id = $2
            RETURNING id, project_id, staff_id, calculated_pay, paid_amount, created_at
            "#,
        )
            .bind(paid_amount)
            .bind(assignment_id)
            .fetch_one(executor)
            .await?;

        Ok(assignment)
    }
}
