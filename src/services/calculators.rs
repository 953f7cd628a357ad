// src/services/calculators.rs

//! Receita de projeto e custo de mão de obra.

use rust_decimal::Decimal;

use crate::models::{
    client::{ClientPricing, PriceModel},
    project::total_watt,
    staff::ProjectAssignment,
};

/// Receita faturável de um projeto.
///
/// `per_panel`: panel_quantity × rate_per_panel.
/// `per_watt`: (panel_watt × panel_quantity) × rate_per_watt.
/// Projeto sem cliente rende zero; taxa ausente conta como zero.
pub fn revenue(panel_watt: i32, panel_quantity: i32, pricing: Option<&ClientPricing>) -> Decimal {
    let Some(pricing) = pricing else {
        return Decimal::ZERO;
    };

    match pricing.price_model {
        PriceModel::PerPanel => {
            Decimal::from(panel_quantity) * pricing.rate_per_panel.unwrap_or(Decimal::ZERO)
        }
        PriceModel::PerWatt => {
            Decimal::from(total_watt(panel_watt, panel_quantity)) * pricing.rate_per_watt.unwrap_or(Decimal::ZERO)
        }
    }
}

/// Soma de `calculated_pay` (obrigação assumida), não do que já foi pago.
pub fn labor_cost<'a, I>(assignments: I) -> Decimal
where
    I: IntoIterator<Item = &'a ProjectAssignment>,
{
    assignments
        .into_iter()
        .filter_map(|a| a.calculated_pay)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn per_watt(rate: &str) -> ClientPricing {
        ClientPricing {
            price_model: PriceModel::PerWatt,
            rate_per_watt: Some(d(rate)),
            rate_per_panel: None,
        }
    }

    fn assignment(pay: Option<&str>, paid: &str) -> ProjectAssignment {
        ProjectAssignment {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            staff_id: Uuid::new_v4(),
            calculated_pay: pay.map(d),
            paid_amount: d(paid),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn per_watt_revenue_uses_total_watt() {
        // 400 W × 20 painéis × 0.05
        assert_eq!(revenue(400, 20, Some(&per_watt("0.05"))), d("400"));
    }

    #[test]
    fn per_watt_revenue_keeps_full_precision() {
        let r = revenue(410, 33, Some(&per_watt("0.0375")));
        assert_eq!(r, d("507.3750"));
    }

    #[test]
    fn per_panel_revenue_ignores_wattage() {
        let pricing = ClientPricing {
            price_model: PriceModel::PerPanel,
            rate_per_watt: Some(d("9.99")),
            rate_per_panel: Some(d("25")),
        };
        assert_eq!(revenue(550, 30, Some(&pricing)), d("750"));
        assert_eq!(revenue(1, 30, Some(&pricing)), d("750"));
    }

    #[test]
    fn missing_rate_counts_as_zero() {
        let pricing = ClientPricing {
            price_model: PriceModel::PerPanel,
            rate_per_watt: Some(d("0.05")),
            rate_per_panel: None,
        };
        assert_eq!(revenue(400, 20, Some(&pricing)), Decimal::ZERO);
    }

    #[test]
    fn project_without_client_has_no_revenue() {
        assert_eq!(revenue(400, 20, None), Decimal::ZERO);
    }

    #[test]
    fn labor_cost_sums_committed_pay_not_paid_amount() {
        let assignments = vec![
            assignment(Some("350"), "350"),
            assignment(Some("250"), "0"),
            assignment(None, "0"),
        ];
        assert_eq!(labor_cost(&assignments), d("600"));
    }

    #[test]
    fn labor_cost_of_nothing_is_zero() {
        assert_eq!(labor_cost(&Vec::<ProjectAssignment>::new()), Decimal::ZERO);
    }
}
