// src/services/finance_service.rs

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        period::{Period, ReportPeriod},
    },
    db::{ledger_store::ProjectQuery, FinanceRepository},
    models::finance::{
        FinanceRecord, FinanceSummary, FinancialDetails, ProjectFinanceReport, ProjectReportFilter, RecordType,
    },
    services::{aggregator::PeriodAggregator, report},
};

#[derive(Debug, Clone)]
pub struct NewFinanceRecord {
    pub record_type: RecordType,
    pub category: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub record_date: NaiveDate,
}

// Relatórios: só leitura, sempre recalculados a partir do razão.
#[derive(Clone)]
pub struct FinanceService {
    aggregator: PeriodAggregator,
}

impl FinanceService {
    pub fn new(aggregator: PeriodAggregator) -> Self {
        Self { aggregator }
    }

    /// Resumo do mês/ano com quebra por categoria e receita por projeto.
    pub async fn get_finance_summary(
        &self,
        period: ReportPeriod,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<FinanceSummary, AppError> {
        let today = Local::now().date_naive();
        let period = period.resolve(today, year, month)?;
        self.summary_for(&period).await
    }

    pub async fn summary_for(&self, period: &Period) -> Result<FinanceSummary, AppError> {
        let inputs = self.aggregator.load(period).await?;
        Ok(report::finance_summary(&inputs))
    }

    /// Receita, despesa e lucro por projeto concluído, com totais.
    pub async fn get_project_finance_report(&self, filter: &ProjectReportFilter) -> Result<ProjectFinanceReport, AppError> {
        let query = match &filter.period {
            Some(period) => ProjectQuery::within(period),
            None => ProjectQuery::default(),
        }
        .for_client(filter.client_id);

        let projects = self.aggregator.store().completed_projects(&query).await?;
        Ok(report::project_report(&projects))
    }

    /// Extrato item a item (entradas e saídas) do intervalo.
    pub async fn get_financial_details(&self, start: NaiveDate, end: NaiveDate) -> Result<FinancialDetails, AppError> {
        let period = Period::new(start, end)?;
        let inputs = self.aggregator.load(&period).await?;
        Ok(report::ledger_details(&inputs))
    }
}

// Lançamentos avulsos (receitas e despesas fora dos projetos)
#[derive(Clone)]
pub struct FinanceRecordService {
    repo: FinanceRepository,
}

impl FinanceRecordService {
    pub fn new(repo: FinanceRepository) -> Self {
        Self { repo }
    }

    pub async fn create_finance_record<'e, E>(&self, executor: E, input: NewFinanceRecord) -> Result<FinanceRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = input.category.trim();
        if category.is_empty() {
            return Err(AppError::invalid("category", "category is required"));
        }
        if input.amount <= Decimal::ZERO {
            return Err(AppError::invalid("amount", "amount must be greater than zero"));
        }

        let record = self
            .repo
            .create_record(
                executor,
                input.record_type,
                category,
                input.amount,
                input.description.as_deref(),
                input.record_date,
            )
            .await?;

        tracing::info!(
            "Lançamento {} criado: {:?} {} em {}",
            record.id,
            record.record_type,
            record.amount,
            record.record_date
        );
        Ok(record)
    }

    pub async fn list_finance_records<'e, E>(
        &self,
        executor: E,
        period: &Period,
        record_type: Option<RecordType>,
    ) -> Result<Vec<FinanceRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_records(executor, period, record_type).await
    }

    pub async fn delete_finance_record<'e, E>(&self, executor: E, record_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.repo.delete_record(executor, record_id).await? {
            return Err(AppError::NotFound { entity: "finance_record", id: record_id });
        }
        tracing::info!("Lançamento {} removido", record_id);
        Ok(())
    }
}
