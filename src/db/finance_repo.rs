// src/db/finance_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::Period},
    models::finance::{FinanceRecord, RecordType},
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: PgPool,
}

impl FinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LANÇAMENTOS (Receitas / Despesas avulsas)
    // =========================================================================

    pub async fn create_record<'e, E>(
        &self,
        executor: E,
        record_type: RecordType,
        category: &str,
        amount: Decimal,
        description: Option<&str>,
        record_date: NaiveDate,
    ) -> Result<FinanceRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, FinanceRecord>(
            r#"
            INSERT INTO finance_records (record_type, category, amount, description, record_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, record_type, category, amount, description, record_date, created_at
            "#,
        )
            .bind(record_type)
            .bind(category)
            .bind(amount)
            .bind(description)
            .bind(record_date)
            .fetch_one(executor)
            .await?;

        Ok(record)
    }

    pub async fn list_records<'e, E>(
        &self,
        executor: E,
        period: &Period,
        record_type: Option<RecordType>,
    ) -> Result<Vec<FinanceRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, FinanceRecord>(
            r#"
            SELECT id, record_type, category, amount, description, record_date, created_at
            FROM finance_records
            WHERE record_date BETWEEN $1 AND $2
              AND ($3::finance_record_type IS NULL OR record_type = $3)
            ORDER BY record_date DESC, created_at DESC
            "#,
        )
            .bind(period.start)
            .bind(period.end)
            .bind(record_type)
            .fetch_all(executor)
            .await?;

        Ok(records)
    }

    /// Retorna `false` quando o lançamento não existe.
    pub async fn delete_record<'e, E>(&self, executor: E, record_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM finance_records WHERE id = $1")
            .bind(record_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
