// src/services/project_service.rs

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProjectRepository,
    models::{
        client::{Client, PriceModel, MAX_RATE_PER_PANEL, MAX_RATE_PER_WATT},
        project::{
            ProgressStage, ProgressUpdate, ProjectDetail, ProjectStatus, ProjectType, MAX_PANEL_QUANTITY,
            MAX_PANEL_WATT,
        },
        staff::ProjectAssignment,
    },
    services::progress::{self, StageTransition},
};

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub price_model: PriceModel,
    pub rate_per_watt: Option<Decimal>,
    pub rate_per_panel: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewInverter {
    pub model: String,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub address: String,
    pub client_id: Option<Uuid>,
    pub project_type: ProjectType,
    pub panel_watt: i32,
    pub panel_quantity: i32,
    pub inverters: Vec<NewInverter>,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[derive(Clone)]
pub struct ProjectService {
    repo: ProjectRepository,
}

impl ProjectService {
    pub fn new(repo: ProjectRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_client<'e, E>(&self, executor: E, input: NewClient) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        validate_rates(&input)?;

        let client = self
            .repo
            .create_client(
                executor,
                input.name.trim(),
                input.price_model,
                input.rate_per_watt,
                input.rate_per_panel,
            )
            .await?;

        tracing::info!("Cliente {} criado ({:?})", client.id, client.price_model);
        Ok(client)
    }

    // =========================================================================
    //  CRIAÇÃO DE PROJETO (tudo ou nada)
    // =========================================================================

    /// Projeto + inversores + etapas + log inicial numa única transação.
    pub async fn create_project<'e, E>(&self, executor: E, input: NewProject) -> Result<ProjectDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        validate_panels(&input)?;

        let mut tx = executor.begin().await?;

        // Se qualquer etapa falhar, o drop da transação desfaz tudo
        let detail = self
            .create_project_steps(&mut tx, &input)
            .await
            .map_err(AppError::into_transaction_failure)?;

        tx.commit()
            .await
            .map_err(|e| AppError::from(e).into_transaction_failure())?;

        tracing::info!(
            "Projeto {} criado com {} etapas e {} inversores",
            detail.project.id,
            detail.progress.len(),
            detail.inverters.len()
        );
        Ok(detail)
    }

    async fn create_project_steps(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        input: &NewProject,
    ) -> Result<ProjectDetail, AppError> {
        // Primeira instrução da transação: NotFound aqui não deixa nada gravado
        if let Some(client_id) = input.client_id {
            self.repo
                .find_client(&mut **tx, client_id)
                .await?
                .ok_or(AppError::NotFound { entity: "client", id: client_id })?;
        }

        let project = self
            .repo
            .insert_project(
                &mut **tx,
                input.address.trim(),
                input.client_id,
                input.project_type,
                input.panel_watt,
                input.panel_quantity,
            )
            .await?;

        let mut inverters = Vec::with_capacity(input.inverters.len());
        for inverter in &input.inverters {
            inverters.push(
                self.repo
                    .insert_inverter(&mut **tx, project.id, inverter.model.trim(), inverter.quantity)
                    .await?,
            );
        }

        let mut progress = Vec::new();
        for (position, stage) in project.project_type.stages().iter().enumerate() {
            progress.push(
                self.repo
                    .insert_stage(&mut **tx, project.id, *stage, position as i32)
                    .await?,
            );
        }

        self.repo
            .insert_log(&mut **tx, project.id, "Projeto criado")
            .await?;

        Ok(ProjectDetail { project, inverters, progress })
    }

    // =========================================================================
    //  ALOCAÇÃO DE EQUIPE
    // =========================================================================

    /// Aloca um funcionário e, se o projeto ainda estiver pendente, move para `in_progress`.
    pub async fn assign_staff<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        staff_id: Uuid,
    ) -> Result<ProjectAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let assignment = self
            .assign_staff_steps(&mut tx, project_id, staff_id)
            .await
            .map_err(AppError::into_transaction_failure)?;

        tx.commit()
            .await
            .map_err(|e| AppError::from(e).into_transaction_failure())?;

        Ok(assignment)
    }

    async fn assign_staff_steps(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project_id: Uuid,
        staff_id: Uuid,
    ) -> Result<ProjectAssignment, AppError> {
        let project = self
            .repo
            .lock_project(&mut **tx, project_id)
            .await?
            .ok_or(AppError::NotFound { entity: "project", id: project_id })?;

        let staff = self
            .repo
            .find_staff(&mut **tx, staff_id)
            .await?
            .ok_or(AppError::NotFound { entity: "staff", id: staff_id })?;

        let pay = staff.pay_for(project.panel_quantity);
        let assignment = self
            .repo
            .insert_assignment(&mut **tx, project_id, staff_id, pay)
            .await?;

        if project.status == ProjectStatus::Pending {
            self.repo
                .update_status(&mut **tx, project_id, ProjectStatus::InProgress, None)
                .await?;
            tracing::info!("Projeto {} em andamento", project_id);
        }

        self.repo
            .insert_log(&mut **tx, project_id, &format!("{} alocado na obra", staff.full_name))
            .await?;

        tracing::info!("Alocação {} criada (pagamento calculado {})", assignment.id, pay);
        Ok(assignment)
    }

    /// Registra um pagamento parcial. `paid_amount` nunca passa de `calculated_pay`.
    pub async fn record_assignment_payment<'e, E>(
        &self,
        executor: E,
        assignment_id: Uuid,
        amount: Decimal,
    ) -> Result<ProjectAssignment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if amount <= Decimal::ZERO {
            return Err(AppError::invalid("amount", "payment must be greater than zero"));
        }

        let mut tx = executor.begin().await?;

        let assignment = self
            .repo
            .lock_assignment(&mut *tx, assignment_id)
            .await?
            .ok_or(AppError::NotFound { entity: "assignment", id: assignment_id })?;

        let new_paid = next_paid_amount(&assignment, amount)?;
        let updated = self
            .repo
            .set_paid_amount(&mut *tx, assignment_id, new_paid)
            .await
            .map_err(AppError::into_transaction_failure)?;

        tx.commit().await?;

        tracing::info!("Pagamento de {} registrado na alocação {}", amount, assignment_id);
        Ok(updated)
    }

    // =========================================================================
    //  PROGRESSO
    // =========================================================================

    /// Marca/desmarca uma etapa. Concluir a última etapa pendente conclui o
    /// projeto (status + completed_at); desmarcar depois não reverte.
    pub async fn set_stage_completion<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        stage: ProgressStage,
        completed: bool,
    ) -> Result<ProgressUpdate, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let update = self
            .set_stage_steps(&mut tx, project_id, stage, completed)
            .await
            .map_err(AppError::into_transaction_failure)?;

        tx.commit()
            .await
            .map_err(|e| AppError::from(e).into_transaction_failure())?;

        Ok(update)
    }

    async fn set_stage_steps(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        project_id: Uuid,
        stage: ProgressStage,
        completed: bool,
    ) -> Result<ProgressUpdate, AppError> {
        let project = self
            .repo
            .lock_project(&mut **tx, project_id)
            .await?
            .ok_or(AppError::NotFound { entity: "project", id: project_id })?;

        let mut stages = self.repo.list_stages(&mut **tx, project_id).await?;
        let transition = progress::apply(&mut stages, stage, completed, project.status)
            .ok_or_else(|| AppError::invalid("stage", format!("{:?} is not a stage of this project", stage)))?;

        let at = now();
        let stage_completed_at = completed.then_some(at);
        self.repo
            .set_stage(&mut **tx, project_id, stage, completed, stage_completed_at)
            .await?;
        if let Some(s) = stages.iter_mut().find(|s| s.stage == stage) {
            s.completed_at = stage_completed_at;
        }

        let (status, completed_at) = match transition {
            StageTransition::CompletesProject => {
                self.repo
                    .update_status(&mut **tx, project_id, ProjectStatus::Completed, Some(at))
                    .await?;
                self.repo
                    .insert_log(&mut **tx, project_id, "Todas as etapas concluídas")
                    .await?;
                tracing::info!("Projeto {} concluído em {}", project_id, at);
                (ProjectStatus::Completed, Some(at))
            }
            StageTransition::StageOnly => (project.status, project.completed_at),
        };

        tracing::info!("Etapa {:?} do projeto {} -> {}", stage, project_id, completed);
        Ok(ProgressUpdate {
            project_id,
            status,
            completed_at,
            progress: stages,
        })
    }
}

fn validate_rates(input: &NewClient) -> Result<(), AppError> {
    let rates = [
        ("ratePerWatt", input.rate_per_watt, MAX_RATE_PER_WATT),
        ("ratePerPanel", input.rate_per_panel, MAX_RATE_PER_PANEL),
    ];
    for (field, rate, max) in rates {
        match rate {
            Some(r) if r.is_sign_negative() => {
                return Err(AppError::invalid(field, "rate must not be negative"));
            }
            Some(r) if r > max => {
                return Err(AppError::invalid(field, format!("rate must not exceed {}", max)));
            }
            _ => {}
        }
    }
    Ok(())
}

// Mantém receita e watts por projeto dentro de uma faixa realista
fn validate_panels(input: &NewProject) -> Result<(), AppError> {
    if !(1..=MAX_PANEL_WATT).contains(&input.panel_watt) {
        return Err(AppError::invalid(
            "panelWatt",
            format!("panelWatt must be between 1 and {}", MAX_PANEL_WATT),
        ));
    }
    if !(1..=MAX_PANEL_QUANTITY).contains(&input.panel_quantity) {
        return Err(AppError::invalid(
            "panelQuantity",
            format!("panelQuantity must be between 1 and {}", MAX_PANEL_QUANTITY),
        ));
    }
    Ok(())
}

fn next_paid_amount(assignment: &ProjectAssignment, amount: Decimal) -> Result<Decimal, AppError> {
    let limit = assignment.calculated_pay.unwrap_or(Decimal::ZERO);
    let new_paid = assignment.paid_amount + amount;
    if new_paid > limit {
        return Err(AppError::invalid(
            "amount",
            format!("payment would exceed calculated pay ({} of {})", new_paid, limit),
        ));
    }
    Ok(new_paid)
}
