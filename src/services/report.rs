// src/services/report.rs

//! Formatação dos resultados do agregador para o dashboard e o financeiro.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
    models::{
        dashboard::{DashboardOverview, MonthlyTrendEntry},
        finance::{
            CategoryTotal, FinanceRecord, FinanceSummary, FinancialDetails, LedgerEntry, LedgerSource,
            PeriodSummary, ProjectFinanceReport, ProjectFinanceTotals, ProjectRevenueDetail, RecordType,
        },
        project::{CompletedProject, ProjectStatusCounts},
        vehicle::VehicleCostSource,
    },
    services::{aggregator::PeriodInputs, calculators},
};

pub fn overview(current_month: PeriodSummary, project_counts: ProjectStatusCounts) -> DashboardOverview {
    DashboardOverview {
        current_month,
        total_projects: project_counts.total(),
        project_counts,
    }
}

pub fn trend_entry(summary: &PeriodSummary) -> MonthlyTrendEntry {
    MonthlyTrendEntry {
        month: summary.period.month_label(),
        income: summary.total_income,
        expense: summary.total_expense,
        profit: summary.net_profit,
        projects_completed: summary.projects_completed,
    }
}

/// Lançamentos de um tipo agrupados por categoria, do maior para o menor.
pub fn category_breakdown(records: &[FinanceRecord], record_type: RecordType) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<&str, (Decimal, i64)> = BTreeMap::new();
    for record in records.iter().filter(|r| r.record_type == record_type) {
        let entry = groups.entry(record.category.as_str()).or_insert((Decimal::ZERO, 0));
        entry.0 += record.amount;
        entry.1 += 1;
    }

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect();

    // BTreeMap já deixa em ordem alfabética; o sort estável preserva isso nos empates
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

pub fn project_detail(project: &CompletedProject) -> ProjectRevenueDetail {
    let revenue = calculators::revenue(project.panel_watt, project.panel_quantity, project.pricing.as_ref());
    let labor_cost = calculators::labor_cost(&project.assignments);

    ProjectRevenueDetail {
        project_id: project.id,
        address: project.address.clone(),
        client_name: project.client_name.clone(),
        completed_at: project.completed_at,
        total_watt: project.total_watt(),
        revenue,
        labor_cost,
        profit: revenue - labor_cost,
    }
}

// Mais recentes primeiro
fn project_details(projects: &[CompletedProject]) -> Vec<ProjectRevenueDetail> {
    let mut rows: Vec<ProjectRevenueDetail> = projects.iter().map(project_detail).collect();
    rows.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(a.project_id.cmp(&b.project_id)));
    rows
}

pub fn finance_summary(inputs: &PeriodInputs) -> FinanceSummary {
    FinanceSummary {
        summary: inputs.summarize(),
        income_by_category: category_breakdown(&inputs.finance_records, RecordType::Income),
        expense_by_category: category_breakdown(&inputs.finance_records, RecordType::Expense),
        projects: project_details(&inputs.projects),
    }
}

pub fn project_report(projects: &[CompletedProject]) -> ProjectFinanceReport {
    let rows = project_details(projects);

    let revenue: Decimal = rows.iter().map(|r| r.revenue).sum();
    let expense: Decimal = rows.iter().map(|r| r.labor_cost).sum();

    ProjectFinanceReport {
        totals: ProjectFinanceTotals {
            revenue,
            expense,
            profit: revenue - expense,
            project_count: rows.len() as i64,
        },
        rows,
    }
}

/// Extrato detalhado: cada origem vira uma linha com id sintético
/// (`project-`, `labor-`, `finance-`, `vehicle-`, `vehicle-log-`).
pub fn ledger_details(inputs: &PeriodInputs) -> FinancialDetails {
    let mut income = Vec::new();
    let mut expense = Vec::new();

    for project in &inputs.projects {
        let date = project.completed_at.date();
        let client = project.client_name.as_deref().unwrap_or("-");

        let revenue = calculators::revenue(project.panel_watt, project.panel_quantity, project.pricing.as_ref());
        if !revenue.is_zero() {
            income.push(LedgerEntry {
                id: LedgerSource::ProjectRevenue.entry_id(project.id),
                source: LedgerSource::ProjectRevenue,
                date,
                description: format!("{} ({})", project.address, client),
                category: "project_revenue".to_string(),
                amount: revenue,
            });
        }

        let labor = calculators::labor_cost(&project.assignments);
        if !labor.is_zero() {
            expense.push(LedgerEntry {
                id: LedgerSource::Labor.entry_id(project.id),
                source: LedgerSource::Labor,
                date,
                description: project.address.clone(),
                category: "labor".to_string(),
                amount: labor,
            });
        }
    }

    for record in &inputs.finance_records {
        let entry = LedgerEntry {
            id: LedgerSource::FinanceRecord.entry_id(record.id),
            source: LedgerSource::FinanceRecord,
            date: record.record_date,
            description: record.description.clone().unwrap_or_else(|| record.category.clone()),
            category: record.category.clone(),
            amount: record.amount,
        };
        match record.record_type {
            RecordType::Income => income.push(entry),
            RecordType::Expense => expense.push(entry),
        }
    }

    for cost in &inputs.vehicle_costs {
        let source = match cost.source {
            VehicleCostSource::Maintenance => LedgerSource::VehicleMaintenance,
            VehicleCostSource::MaintenanceLog => LedgerSource::VehicleMaintenanceLog,
        };
        let vehicle = cost.plate_number.as_deref().unwrap_or("-");
        expense.push(LedgerEntry {
            id: source.entry_id(cost.id),
            source,
            date: cost.maintenance_date,
            description: match &cost.description {
                Some(desc) => format!("{} - {}", vehicle, desc),
                None => vehicle.to_string(),
            },
            category: "vehicle_maintenance".to_string(),
            amount: cost.cost,
        });
    }

    sort_newest_first(&mut income);
    sort_newest_first(&mut expense);

    FinancialDetails {
        period: inputs.period,
        total_income: income.iter().map(|e| e.amount).sum(),
        total_expense: expense.iter().map(|e| e.amount).sum(),
        income,
        expense,
    }
}

fn sort_newest_first(entries: &mut [LedgerEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::period::Period;
    use crate::models::{
        client::{ClientPricing, PriceModel},
        staff::ProjectAssignment,
        vehicle::VehicleCost,
    };
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;
    use uuid::Uuid;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, n).unwrap()
    }

    fn record(record_type: RecordType, category: &str, amount: &str, date: NaiveDate) -> FinanceRecord {
        FinanceRecord {
            id: Uuid::new_v4(),
            record_type,
            category: category.into(),
            amount: d(amount),
            description: None,
            record_date: date,
            created_at: Utc::now(),
        }
    }

    fn project(with_client: bool, pay: &str, completed: NaiveDate) -> CompletedProject {
        let id = Uuid::new_v4();
        CompletedProject {
            id,
            address: "Av. Brasil, 500".into(),
            client_id: None,
            client_name: with_client.then(|| "Sol Nascente".to_string()),
            panel_watt: 400,
            panel_quantity: 20,
            completed_at: completed.and_hms_opt(9, 0, 0).unwrap(),
            pricing: with_client.then_some(ClientPricing {
                price_model: PriceModel::PerWatt,
                rate_per_watt: Some(d("0.05")),
                rate_per_panel: None,
            }),
            assignments: vec![ProjectAssignment {
                id: Uuid::new_v4(),
                project_id: id,
                staff_id: Uuid::new_v4(),
                calculated_pay: Some(d(pay)),
                paid_amount: Decimal::ZERO,
                created_at: Utc::now(),
            }],
        }
    }

    #[test]
    fn breakdown_groups_by_category_largest_first() {
        let records = vec![
            record(RecordType::Expense, "fuel", "150", day(20)),
            record(RecordType::Expense, "tools", "40", day(2)),
            record(RecordType::Expense, "fuel", "60", day(21)),
            record(RecordType::Income, "fuel", "999", day(21)),
        ];

        let expense = category_breakdown(&records, RecordType::Expense);
        assert_eq!(expense.len(), 2);
        assert_eq!(expense[0].category, "fuel");
        assert_eq!(expense[0].total, d("210"));
        assert_eq!(expense[0].count, 2);
        assert_eq!(expense[1].category, "tools");
    }

    #[test]
    fn trend_entry_uses_month_label() {
        let inputs = PeriodInputs {
            period: Period::month(2024, 3).unwrap(),
            projects: vec![project(true, "600", day(15))],
            finance_records: vec![],
            vehicle_costs: vec![],
        };
        let entry = trend_entry(&inputs.summarize());
        assert_eq!(entry.month, "2024-03");
        assert_eq!(entry.income, d("400"));
        assert_eq!(entry.expense, d("600"));
        assert_eq!(entry.profit, d("-200"));
        assert_eq!(entry.projects_completed, 1);
    }

    #[test]
    fn ledger_entries_carry_provenance_and_sort_by_date() {
        let with_client = project(true, "600", day(15));
        let no_client = project(false, "300", day(10));
        let vehicle = VehicleCost {
            id: Uuid::new_v4(),
            source: VehicleCostSource::MaintenanceLog,
            vehicle_id: Uuid::new_v4(),
            plate_number: Some("ABC1D23".into()),
            description: Some("Troca de óleo".into()),
            cost: d("120"),
            maintenance_date: day(28),
        };
        let inputs = PeriodInputs {
            period: Period::month(2024, 3).unwrap(),
            projects: vec![with_client.clone(), no_client.clone()],
            finance_records: vec![
                record(RecordType::Expense, "fuel", "150", day(20)),
                record(RecordType::Income, "consulting", "50", day(1)),
            ],
            vehicle_costs: vec![vehicle.clone()],
        };

        let details = ledger_details(&inputs);

        // Projeto sem cliente não gera linha de receita
        assert_eq!(details.income.len(), 2);
        assert_eq!(details.income[0].id, format!("project-{}", with_client.id));
        assert_eq!(details.income[1].source, LedgerSource::FinanceRecord);

        let dates: Vec<NaiveDate> = details.expense.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![day(28), day(20), day(15), day(10)]);
        assert_eq!(details.expense[0].id, format!("vehicle-log-{}", vehicle.id));
        assert_eq!(details.expense[3].id, format!("labor-{}", no_client.id));

        assert_eq!(details.total_income, d("450"));
        assert_eq!(details.total_expense, d("1170"));
    }

    #[test]
    fn project_report_totals_match_rows() {
        let projects = vec![project(true, "600", day(15)), project(false, "300", day(20))];
        let report = project_report(&projects);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].completed_at.date(), day(20));
        assert_eq!(report.totals.revenue, d("400"));
        assert_eq!(report.totals.expense, d("900"));
        assert_eq!(report.totals.profit, d("-500"));
        assert_eq!(report.totals.project_count, 2);
    }

    #[test]
    fn overview_counts_every_project() {
        let summary = PeriodInputs {
            period: Period::month(2024, 3).unwrap(),
            projects: vec![],
            finance_records: vec![],
            vehicle_costs: vec![],
        }
        .summarize();
        let counts = ProjectStatusCounts { pending: 2, in_progress: 3, completed: 5 };

        let view = overview(summary, counts);
        assert_eq!(view.total_projects, 10);
        assert_eq!(view.project_counts, counts);
    }
}
