//! Filas en la base Postgres del proyecto Supabase

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::FleetStore;
use crate::models::auth::UserProfile;
use crate::models::booking::Booking;
use crate::models::vehicle::Vehicle;
use crate::repositories::{
    booking_repository::BookingRepository, profile_repository::ProfileRepository,
    vehicle_repository::VehicleRepository,
};
use crate::utils::errors::AppResult;

pub struct PostgresStore {
    vehicles: VehicleRepository,
    bookings: BookingRepository,
    profiles: ProfileRepository,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool),
        }
    }
}

#[async_trait]
impl FleetStore for PostgresStore {
    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        self.vehicles.find_all().await
    }

    async fn get_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        self.vehicles.find_by_id(id).await
    }

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        self.vehicles.create(vehicle).await
    }

    async fn update_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        self.vehicles.update(vehicle).await
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        self.bookings.find_all().await
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()> {
        self.profiles.upsert(profile).await
    }
}
