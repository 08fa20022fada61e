use crate::models::vehicle::Vehicle;
use crate::utils::errors::{not_found_error, AppError};
use sqlx::PgPool;
use uuid::Uuid;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, make, model, year, seats, vehicle_type, price_per_day, mileage,
                description, available, available_quantity, total_quantity, image_url,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.seats)
        .bind(&vehicle.vehicle_type)
        .bind(vehicle.price_per_day)
        .bind(vehicle.mileage)
        .bind(&vehicle.description)
        .bind(vehicle.available)
        .bind(vehicle.available_quantity)
        .bind(vehicle.total_quantity)
        .bind(&vehicle.image_url)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    pub async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError> {
        let updated = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET make = $2, model = $3, year = $4, seats = $5, vehicle_type = $6,
                price_per_day = $7, mileage = $8, description = $9, available = $10,
                available_quantity = $11, total_quantity = $12, image_url = $13,
                updated_at = $14
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.seats)
        .bind(&vehicle.vehicle_type)
        .bind(vehicle.price_per_day)
        .bind(vehicle.mileage)
        .bind(&vehicle.description)
        .bind(vehicle.available)
        .bind(vehicle.available_quantity)
        .bind(vehicle.total_quantity)
        .bind(&vehicle.image_url)
        .bind(vehicle.updated_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("Vehicle", &vehicle.id.to_string()))?;

        Ok(updated)
    }
}
