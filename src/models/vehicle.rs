//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y el borrador validado que se
//! escribe en el backend al crear o editar un vehículo.
//! Mapea a la tabla `vehicles` con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipos de vehículo que ofrece el formulario
pub const VEHICLE_TYPES: [&str; 7] = [
    "Sedan",
    "SUV",
    "Hatchback",
    "Convertible",
    "Truck",
    "Van",
    "Luxury",
];

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub seats: i32,
    #[serde(rename = "type", alias = "vehicle_type")]
    pub vehicle_type: Option<String>,
    #[serde(alias = "pricePerDay")]
    pub price_per_day: Decimal,
    #[serde(default)]
    pub mileage: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    pub available: bool,
    #[serde(default, alias = "availableQuantity")]
    pub available_quantity: i32,
    #[serde(default, alias = "totalQuantity")]
    pub total_quantity: i32,
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Datos ya validados de un vehículo, listos para escribir.
///
/// Se construye únicamente a partir de `VehicleForm::into_parts`, por lo
/// que cualquier instancia cumple las reglas del formulario.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDraft {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub seats: i32,
    pub vehicle_type: Option<String>,
    pub price_per_day: Decimal,
    pub mileage: Option<i32>,
    pub description: Option<String>,
    pub available: bool,
    pub available_quantity: i32,
    pub total_quantity: i32,
    pub image_url: Option<String>,
}

impl VehicleDraft {
    /// Materializa el borrador como fila nueva
    pub fn into_vehicle(self, id: Uuid, now: DateTime<Utc>) -> Vehicle {
        Vehicle {
            id,
            make: self.make,
            model: self.model,
            year: self.year,
            seats: self.seats,
            vehicle_type: self.vehicle_type,
            price_per_day: self.price_per_day,
            mileage: self.mileage,
            description: self.description,
            available: self.available,
            available_quantity: self.available_quantity,
            total_quantity: self.total_quantity,
            image_url: self.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Aplica el borrador sobre una fila existente, conservando id y created_at
    pub fn apply_to(self, current: &Vehicle, now: DateTime<Utc>) -> Vehicle {
        let mut updated = self.into_vehicle(current.id, now);
        updated.created_at = current.created_at;
        updated
    }
}

/// Response de vehículo para listados
#[derive(Debug, Serialize)]
pub struct VehicleListResponse {
    pub total: usize,
    pub available: usize,
    pub vehicles: Vec<Vehicle>,
}

impl From<Vec<Vehicle>> for VehicleListResponse {
    fn from(vehicles: Vec<Vehicle>) -> Self {
        Self {
            total: vehicles.len(),
            available: vehicles.iter().filter(|v| v.available).count(),
            vehicles,
        }
    }
}
