use crate::models::auth::UserProfile;
use crate::utils::errors::AppError;
use sqlx::PgPool;

pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, profile: &UserProfile) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, full_name, email, role, created_at, last_login)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                email = EXCLUDED.email,
                last_login = EXCLUDED.last_login
            "#,
        )
        .bind(profile.id)
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.role)
        .bind(profile.created_at)
        .bind(profile.last_login)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
