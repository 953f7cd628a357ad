// src/models/vehicle.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Tabela de onde veio o custo de frota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCostSource {
    Maintenance,    // vehicle_maintenance
    MaintenanceLog, // vehicle_maintenance_logs
}

#[derive(Debug, Clone, FromRow)]
pub struct VehicleCostRow {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub plate_number: Option<String>,
    pub description: Option<String>,
    pub cost: Decimal,
    pub maintenance_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct VehicleCost {
    pub id: Uuid,
    pub source: VehicleCostSource,
    pub vehicle_id: Uuid,
    pub plate_number: Option<String>,
    pub description: Option<String>,
    pub cost: Decimal,
    pub maintenance_date: NaiveDate,
}

impl VehicleCostRow {
    pub fn tagged(self, source: VehicleCostSource) -> VehicleCost {
        VehicleCost {
            id: self.id,
            source,
            vehicle_id: self.vehicle_id,
            plate_number: self.plate_number,
            description: self.description,
            cost: self.cost,
            maintenance_date: self.maintenance_date,
        }
    }
}
