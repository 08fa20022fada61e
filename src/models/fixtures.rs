//! Datos de prueba compartidos por los tests unitarios

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::backend::FleetStore;
use crate::models::auth::UserProfile;
use crate::models::booking::{Booking, BookingStatus};
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppResult;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn booking(start: NaiveDate, end: NaiveDate) -> Booking {
    Booking {
        id: Uuid::new_v4(),
        customer_name: "Juan Dela Cruz".to_string(),
        customer_phone: Some("09171234567".to_string()),
        vehicle_make: "Toyota".to_string(),
        vehicle_model: "Vios".to_string(),
        rental_date: start,
        return_date: end,
        status: BookingStatus::Confirmed,
        total_amount: None,
    }
}

pub fn booking_with(
    start: NaiveDate,
    end: NaiveDate,
    status: BookingStatus,
    amount: Option<i64>,
) -> Booking {
    Booking {
        status,
        total_amount: amount.map(Decimal::from),
        ..booking(start, end)
    }
}

pub fn vehicle(make: &str, model: &str, available: bool) -> Vehicle {
    let now = Utc::now();
    Vehicle {
        id: Uuid::new_v4(),
        make: make.to_string(),
        model: model.to_string(),
        year: 2022,
        seats: 5,
        vehicle_type: Some("Sedan".to_string()),
        price_per_day: Decimal::from(1500),
        mileage: Some(12000),
        description: None,
        available,
        available_quantity: if available { 1 } else { 0 },
        total_quantity: 1,
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// Store cuya primera lectura tarda y devuelve datos viejos; las
/// siguientes responden al momento con los nuevos
pub struct StagedStore {
    delay: Duration,
    old_vehicles: Vec<Vehicle>,
    new_vehicles: Vec<Vehicle>,
    old_bookings: Vec<Booking>,
    new_bookings: Vec<Booking>,
    vehicle_reads: AtomicUsize,
    booking_reads: AtomicUsize,
}

impl StagedStore {
    pub fn bookings(old: Vec<Booking>, new: Vec<Booking>) -> Self {
        Self::new(Vec::new(), Vec::new(), old, new)
    }

    pub fn new(
        old_vehicles: Vec<Vehicle>,
        new_vehicles: Vec<Vehicle>,
        old_bookings: Vec<Booking>,
        new_bookings: Vec<Booking>,
    ) -> Self {
        Self {
            delay: Duration::from_millis(100),
            old_vehicles,
            new_vehicles,
            old_bookings,
            new_bookings,
            vehicle_reads: AtomicUsize::new(0),
            booking_reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FleetStore for StagedStore {
    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        if self.vehicle_reads.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(self.delay).await;
            return Ok(self.old_vehicles.clone());
        }
        Ok(self.new_vehicles.clone())
    }

    async fn get_vehicle(&self, _id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(None)
    }

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        Ok(vehicle.clone())
    }

    async fn update_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        Ok(vehicle.clone())
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        if self.booking_reads.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(self.delay).await;
            return Ok(self.old_bookings.clone());
        }
        Ok(self.new_bookings.clone())
    }

    async fn upsert_profile(&self, _profile: &UserProfile) -> AppResult<()> {
        Ok(())
    }
}
