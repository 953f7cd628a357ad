// src/models/client.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "price_model", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PriceModel {
    PerWatt,  // Cobra por watt instalado
    PerPanel, // Cobra por painel
}

impl FromStr for PriceModel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "per_watt" => Ok(PriceModel::PerWatt),
            "per_panel" => Ok(PriceModel::PerPanel),
            other => Err(AppError::invalid(
                "priceModel",
                format!("unknown price model '{}', expected 'per_watt' or 'per_panel'", other),
            )),
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,

    #[schema(example = "Condomínio Solar das Palmeiras")]
    pub name: String,

    pub price_model: PriceModel,

    // Só a taxa do price_model atual tem significado; a outra é ignorada.
    #[schema(value_type = Option<String>, example = "0.05")]
    pub rate_per_watt: Option<Decimal>,
    #[schema(value_type = Option<String>, example = "25.00")]
    pub rate_per_panel: Option<Decimal>,

    pub created_at: DateTime<Utc>,
}

// Tetos das taxas (mesmos CHECKs da migração)
pub const MAX_RATE_PER_WATT: Decimal = Decimal::ONE_HUNDRED;
pub const MAX_RATE_PER_PANEL: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

impl Client {
    pub fn pricing(&self) -> ClientPricing {
        ClientPricing {
            price_model: self.price_model,
            rate_per_watt: self.rate_per_watt,
            rate_per_panel: self.rate_per_panel,
        }
    }
}

/// O que o cálculo de receita precisa saber de um cliente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientPricing {
    pub price_model: PriceModel,
    pub rate_per_watt: Option<Decimal>,
    pub rate_per_panel: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_price_models() {
        assert_eq!("per_watt".parse::<PriceModel>().unwrap(), PriceModel::PerWatt);
        assert_eq!(" per_panel ".parse::<PriceModel>().unwrap(), PriceModel::PerPanel);
    }

    #[test]
    fn unknown_price_model_names_the_field() {
        match "per_kwh".parse::<PriceModel>() {
            Err(AppError::InvalidInput { field, .. }) => assert_eq!(field, "priceModel"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
