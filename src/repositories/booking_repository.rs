use crate::models::booking::Booking;
use crate::utils::errors::AppError;
use sqlx::PgPool;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Todas las reservas por fecha de inicio; el orden lo usa el calendario
    pub async fn find_all(&self) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, customer_name, customer_phone, vehicle_make, vehicle_model,
                   rental_date, return_date, status, total_amount
            FROM bookings
            ORDER BY rental_date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }
}
