// src/services/aggregator.rs

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, period::Period},
    db::ledger_store::{LedgerStore, ProjectQuery},
    models::{
        finance::{FinanceRecord, PeriodSummary, RecordType},
        project::CompletedProject,
        vehicle::VehicleCost,
    },
    services::calculators,
};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Tudo o que foi lido do razão para um período.
#[derive(Debug, Clone)]
pub struct PeriodInputs {
    pub period: Period,
    pub projects: Vec<CompletedProject>,
    pub finance_records: Vec<FinanceRecord>,
    pub vehicle_costs: Vec<VehicleCost>,
}

impl PeriodInputs {
    /// Consolida receitas, despesas e lucro do período.
    pub fn summarize(&self) -> PeriodSummary {
        let mut project_revenue = Decimal::ZERO;
        let mut labor_cost = Decimal::ZERO;
        let mut total_watt: i64 = 0;

        // Projeto sem cliente soma zero de receita, mas a mão de obra conta
        for project in &self.projects {
            project_revenue += calculators::revenue(
                project.panel_watt,
                project.panel_quantity,
                project.pricing.as_ref(),
            );
            labor_cost += calculators::labor_cost(&project.assignments);
            total_watt += project.total_watt();
        }

        let mut other_income = Decimal::ZERO;
        let mut other_expense = Decimal::ZERO;
        for record in &self.finance_records {
            match record.record_type {
                RecordType::Income => other_income += record.amount,
                RecordType::Expense => other_expense += record.amount,
            }
        }

        let vehicle_cost: Decimal = self.vehicle_costs.iter().map(|v| v.cost).sum();

        let total_income = project_revenue + other_income;
        let total_expense = labor_cost + other_expense + vehicle_cost;
        let net_profit = total_income - total_expense;

        PeriodSummary {
            period: self.period,
            project_revenue,
            other_income,
            total_income,
            labor_cost,
            other_expense,
            vehicle_cost,
            total_expense,
            net_profit,
            profit_margin: profit_margin(net_profit, total_income),
            total_watt,
            projects_completed: self.projects.len() as i64,
        }
    }
}

/// net / income × 100; zero quando não houve receita.
pub fn profit_margin(net_profit: Decimal, total_income: Decimal) -> Decimal {
    if total_income.is_zero() {
        return Decimal::ZERO;
    }
    net_profit / total_income * HUNDRED
}

/// Agregador sem estado: cada chamada relê o razão.
#[derive(Clone)]
pub struct PeriodAggregator {
    store: Arc<dyn LedgerStore>,
}

impl PeriodAggregator {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    pub async fn load(&self, period: &Period) -> Result<PeriodInputs, AppError> {
        tracing::debug!("Agregando período {} .. {}", period.start, period.end);

        let projects = self.store.completed_projects(&ProjectQuery::within(period)).await?;
        let finance_records = self.store.finance_records(period).await?;
        let vehicle_costs = self.store.vehicle_costs(period).await?;

        Ok(PeriodInputs {
            period: *period,
            projects,
            finance_records,
            vehicle_costs,
        })
    }

    pub async fn aggregate(&self, period: &Period) -> Result<PeriodSummary, AppError> {
        Ok(self.load(period).await?.summarize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        client::{ClientPricing, PriceModel},
        staff::ProjectAssignment,
        vehicle::VehicleCostSource,
    };
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;
    use uuid::Uuid;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn march() -> Period {
        Period::month(2024, 3).unwrap()
    }

    fn project(pricing: Option<ClientPricing>, watt: i32, qty: i32, pay: &[&str]) -> CompletedProject {
        let id = Uuid::new_v4();
        CompletedProject {
            id,
            address: "Rua A, 1".into(),
            client_id: pricing.map(|_| Uuid::new_v4()),
            client_name: pricing.map(|_| "Cliente".to_string()),
            panel_watt: watt,
            panel_quantity: qty,
            completed_at: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(10, 0, 0).unwrap(),
            pricing,
            assignments: pay
                .iter()
                .map(|p| ProjectAssignment {
                    id: Uuid::new_v4(),
                    project_id: id,
                    staff_id: Uuid::new_v4(),
                    calculated_pay: Some(d(p)),
                    paid_amount: Decimal::ZERO,
                    created_at: Utc::now(),
                })
                .collect(),
        }
    }

    fn record(record_type: RecordType, category: &str, amount: &str) -> FinanceRecord {
        FinanceRecord {
            id: Uuid::new_v4(),
            record_type,
            category: category.into(),
            amount: d(amount),
            description: None,
            record_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn vehicle(cost: &str) -> VehicleCost {
        VehicleCost {
            id: Uuid::new_v4(),
            source: VehicleCostSource::Maintenance,
            vehicle_id: Uuid::new_v4(),
            plate_number: Some("ABC1D23".into()),
            description: None,
            cost: d(cost),
            maintenance_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        }
    }

    fn per_watt(rate: &str) -> Option<ClientPricing> {
        Some(ClientPricing {
            price_model: PriceModel::PerWatt,
            rate_per_watt: Some(d(rate)),
            rate_per_panel: None,
        })
    }

    #[test]
    fn largest_accepted_projects_sum_without_overflow() {
        use crate::models::{
            client::MAX_RATE_PER_WATT,
            project::{MAX_PANEL_QUANTITY, MAX_PANEL_WATT},
        };

        let pricing = Some(ClientPricing {
            price_model: PriceModel::PerWatt,
            rate_per_watt: Some(MAX_RATE_PER_WATT),
            rate_per_panel: None,
        });
        let inputs = PeriodInputs {
            period: march(),
            projects: (0..1_000)
                .map(|_| project(pricing, MAX_PANEL_WATT, MAX_PANEL_QUANTITY, &[]))
                .collect(),
            finance_records: vec![],
            vehicle_costs: vec![],
        };

        let summary = inputs.summarize();
        // 1000 W × 10000 painéis × 100/W = 1e9 por projeto
        assert_eq!(summary.project_revenue, d("1000000000000"));
        assert_eq!(summary.total_watt, 10_000_000_000);
    }

    #[test]
    fn single_project_contribution() {
        let inputs = PeriodInputs {
            period: march(),
            projects: vec![project(per_watt("0.05"), 400, 20, &["350", "250"])],
            finance_records: vec![],
            vehicle_costs: vec![],
        };

        let s = inputs.summarize();
        assert_eq!(s.project_revenue, d("400"));
        assert_eq!(s.labor_cost, d("600"));
        assert_eq!(s.net_profit, d("-200"));
        assert_eq!(s.total_watt, 8000);
        assert_eq!(s.projects_completed, 1);
        assert_eq!(s.profit_margin, d("-50"));
    }

    #[test]
    fn project_without_client_is_pure_expense() {
        let inputs = PeriodInputs {
            period: march(),
            projects: vec![project(None, 400, 10, &["300"])],
            finance_records: vec![],
            vehicle_costs: vec![],
        };

        let s = inputs.summarize();
        assert_eq!(s.total_income, Decimal::ZERO);
        assert_eq!(s.total_expense, d("300"));
        assert_eq!(s.net_profit, d("-300"));
        assert_eq!(s.profit_margin, Decimal::ZERO);
    }

    #[test]
    fn empty_period_is_all_zero() {
        let inputs = PeriodInputs {
            period: march(),
            projects: vec![],
            finance_records: vec![],
            vehicle_costs: vec![],
        };

        let s = inputs.summarize();
        assert_eq!(s.total_income, Decimal::ZERO);
        assert_eq!(s.total_expense, Decimal::ZERO);
        assert_eq!(s.net_profit, Decimal::ZERO);
        assert_eq!(s.profit_margin, Decimal::ZERO);
        assert_eq!(s.projects_completed, 0);
    }

    #[test]
    fn composes_all_sources() {
        let inputs = PeriodInputs {
            period: march(),
            projects: vec![
                project(per_watt("0.05"), 400, 20, &["600"]),
                project(per_watt("0.04"), 550, 10, &["150.25"]),
            ],
            finance_records: vec![
                record(RecordType::Income, "consulting", "99.99"),
                record(RecordType::Expense, "fuel", "150"),
                record(RecordType::Expense, "tools", "0.01"),
            ],
            vehicle_costs: vec![vehicle("80.50"), vehicle("19.50")],
        };

        let s = inputs.summarize();
        assert_eq!(s.project_revenue, d("620"));
        assert_eq!(s.other_income, d("99.99"));
        assert_eq!(s.total_income, d("719.99"));
        assert_eq!(s.labor_cost, d("750.25"));
        assert_eq!(s.other_expense, d("150.01"));
        assert_eq!(s.vehicle_cost, d("100"));
        assert_eq!(s.total_expense, d("1000.26"));
        assert_eq!(s.total_income - s.total_expense, s.net_profit);
    }

    #[test]
    fn many_small_amounts_do_not_drift() {
        let records: Vec<FinanceRecord> = (0..1000)
            .map(|_| record(RecordType::Income, "tips", "0.10"))
            .collect();
        let inputs = PeriodInputs {
            period: march(),
            projects: vec![],
            finance_records: records,
            vehicle_costs: vec![],
        };

        let s = inputs.summarize();
        assert_eq!(s.other_income, d("100"));
        assert_eq!(s.profit_margin, d("100"));
    }

    #[test]
    fn margin_is_zero_without_income() {
        assert_eq!(profit_margin(d("-10"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(profit_margin(d("25"), d("100")), d("25"));
    }
}
