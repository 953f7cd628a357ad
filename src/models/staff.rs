// src/models/staff.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pay_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    PerProject, // Valor fixo por obra
    PerPanel,   // Valor por painel instalado
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: Uuid,
    #[schema(example = "João Pereira")]
    pub full_name: String,
    pub pay_type: PayType,
    #[schema(value_type = String, example = "15.00")]
    pub pay_rate: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Staff {
    /// Valor comprometido com o funcionário, fixado no momento da alocação.
    pub fn pay_for(&self, panel_quantity: i32) -> Decimal {
        match self.pay_type {
            PayType::PerProject => self.pay_rate,
            PayType::PerPanel => self.pay_rate * Decimal::from(panel_quantity),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAssignment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub staff_id: Uuid,

    // Obrigação assumida (base do custo de mão de obra)
    #[schema(value_type = Option<String>, example = "600.00")]
    pub calculated_pay: Option<Decimal>,

    // Quanto já foi pago de fato: 0 <= paid_amount <= calculated_pay
    #[schema(value_type = String, example = "0.00")]
    pub paid_amount: Decimal,

    pub created_at: DateTime<Utc>,
}
