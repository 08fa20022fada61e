//! Modelo de Booking
//!
//! Las reservas se crean fuera de este servicio; aquí sólo se leen para
//! alimentar el calendario, el dashboard y los reportes.
//! Mapea a la tabla `bookings` y acepta también los nombres camelCase
//! que usan los documentos de la variante Firestore.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::validation::validate_date;

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

/// Reserva principal - mapea a la tabla bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    #[serde(alias = "customerName")]
    pub customer_name: String,
    #[serde(default, alias = "customerPhone")]
    pub customer_phone: Option<String>,
    #[serde(default, alias = "vehicleMake")]
    pub vehicle_make: String,
    #[serde(default, alias = "vehicleModel")]
    pub vehicle_model: String,
    #[serde(alias = "rentalDate", deserialize_with = "calendar_date")]
    pub rental_date: NaiveDate,
    #[serde(alias = "returnDate", deserialize_with = "calendar_date")]
    pub return_date: NaiveDate,
    pub status: BookingStatus,
    #[serde(default, alias = "totalAmount")]
    pub total_amount: Option<Decimal>,
}

impl Booking {
    /// Importe usado en sumas; una reserva sin importe cuenta como cero
    pub fn amount(&self) -> Decimal {
        self.total_amount.unwrap_or(Decimal::ZERO)
    }

    pub fn vehicle_label(&self) -> String {
        format!("{} {}", self.vehicle_make, self.vehicle_model)
            .trim()
            .to_string()
    }
}

/// Acepta `2024-08-01` o `2024-08-01T10:00:00Z`; se queda con la fecha
fn calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    validate_date(&raw).map_err(|_| {
        serde::de::Error::custom(format!("invalid calendar date '{}'", raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_snake_case_row() {
        let booking: Booking = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "customer_name": "Juan Dela Cruz",
            "customer_phone": "09171234567",
            "vehicle_make": "Toyota",
            "vehicle_model": "Vios",
            "rental_date": "2024-08-01T09:00:00Z",
            "return_date": "2024-08-03",
            "status": "confirmed",
            "total_amount": 4500
        }))
        .unwrap();

        assert_eq!(booking.rental_date, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        assert_eq!(booking.return_date, NaiveDate::from_ymd_opt(2024, 8, 3).unwrap());
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.amount(), Decimal::from(4500));
        assert_eq!(booking.vehicle_label(), "Toyota Vios");
    }

    #[test]
    fn test_deserialize_camel_case_document() {
        let booking: Booking = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "customerName": "Ana",
            "vehicleMake": "Honda",
            "vehicleModel": "City",
            "rentalDate": "2024-09-10",
            "returnDate": "2024-09-12",
            "status": "completed"
        }))
        .unwrap();

        assert_eq!(booking.customer_name, "Ana");
        assert_eq!(booking.total_amount, None);
        assert_eq!(booking.amount(), Decimal::ZERO);
    }

    #[test]
    fn test_rejects_unknown_status_and_bad_dates() {
        let unknown_status = serde_json::from_value::<Booking>(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "customer_name": "Ana",
            "rental_date": "2024-09-10",
            "return_date": "2024-09-12",
            "status": "cancelled"
        }));
        assert!(unknown_status.is_err());

        let bad_date = serde_json::from_value::<Booking>(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "customer_name": "Ana",
            "rental_date": "10/09/2024",
            "return_date": "2024-09-12",
            "status": "pending"
        }));
        assert!(bad_date.is_err());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(BookingStatus::parse("Confirmed"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::parse("unknown"), None);
        assert_eq!(BookingStatus::Completed.as_str(), "completed");
    }
}
