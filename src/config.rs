// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{FinanceRepository, PgLedgerStore, ProjectRepository},
    services::{
        aggregator::PeriodAggregator,
        dashboard_service::{DashboardService, MAX_TREND_MONTHS},
        finance_service::{FinanceRecordService, FinanceService},
        project_service::ProjectService,
    },
};

/// Configuração lida do ambiente (com `.env` opcional).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub trend_months: u32,
}

fn var_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} inválida: '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let trend_months: u32 = var_or("TREND_MONTHS", 6)?;
        if trend_months == 0 || trend_months > MAX_TREND_MONTHS {
            anyhow::bail!("TREND_MONTHS deve estar entre 1 e {}", MAX_TREND_MONTHS);
        }

        Ok(Self {
            database_url,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000".to_string())?,
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout: Duration::from_secs(var_or("DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            trend_months,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub dashboard_service: DashboardService,
    pub finance_service: FinanceService,
    pub finance_record_service: FinanceRecordService,
    pub project_service: ProjectService,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(settings.db_acquire_timeout)
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, settings))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, settings: Settings) -> Self {
        let ledger = Arc::new(PgLedgerStore::new(db_pool.clone()));
        let aggregator = PeriodAggregator::new(ledger);

        Self {
            dashboard_service: DashboardService::new(aggregator.clone(), settings.trend_months),
            finance_service: FinanceService::new(aggregator),
            finance_record_service: FinanceRecordService::new(FinanceRepository::new(db_pool.clone())),
            project_service: ProjectService::new(ProjectRepository::new(db_pool.clone())),
            db_pool,
            settings,
        }
    }
}
