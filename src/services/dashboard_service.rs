// src/services/dashboard_service.rs

use chrono::{Local, NaiveDate};

use crate::{
    common::{error::AppError, period::Period},
    models::dashboard::{DashboardOverview, MonthlyTrendEntry},
    services::{aggregator::PeriodAggregator, report},
};

// Dez anos de histórico; acima disso o gráfico perde sentido
pub const MAX_TREND_MONTHS: u32 = 120;

#[derive(Clone)]
pub struct DashboardService {
    aggregator: PeriodAggregator,
    default_trend_months: u32,
}

impl DashboardService {
    pub fn new(aggregator: PeriodAggregator, default_trend_months: u32) -> Self {
        Self {
            aggregator,
            default_trend_months,
        }
    }

    pub fn default_trend_months(&self) -> u32 {
        self.default_trend_months
    }

    pub async fn get_overview(&self) -> Result<DashboardOverview, AppError> {
        self.overview_on(Local::now().date_naive()).await
    }

    /// Mês corrente de `today` + contagens globais por status.
    pub async fn overview_on(&self, today: NaiveDate) -> Result<DashboardOverview, AppError> {
        let current_month = self.aggregator.aggregate(&Period::month_of(today)).await?;
        let counts = self.aggregator.store().project_status_counts().await?;
        Ok(report::overview(current_month, counts))
    }

    pub async fn get_monthly_trend(&self, months: Option<u32>) -> Result<Vec<MonthlyTrendEntry>, AppError> {
        let months = months.unwrap_or(self.default_trend_months);
        self.trend_until(Local::now().date_naive(), months).await
    }

    /// Uma entrada por mês, do mais antigo ao mais recente, sem buracos:
    /// meses sem movimento aparecem zerados.
    pub async fn trend_until(&self, today: NaiveDate, months: u32) -> Result<Vec<MonthlyTrendEntry>, AppError> {
        if months == 0 || months > MAX_TREND_MONTHS {
            return Err(AppError::invalid(
                "months",
                format!(
                    "months must be between 1 and {} (trend history is limited to {} years)",
                    MAX_TREND_MONTHS,
                    MAX_TREND_MONTHS / 12
                ),
            ));
        }

        let mut entries = Vec::with_capacity(months as usize);
        for period in Period::trailing_months(today, months) {
            let summary = self.aggregator.aggregate(&period).await?;
            entries.push(report::trend_entry(&summary));
        }
        Ok(entries)
    }
}
