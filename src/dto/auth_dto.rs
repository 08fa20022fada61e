use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::auth::{AuthGate, AuthUser, Session};
use crate::utils::validation::{validate_email, validate_not_empty, validate_password};

// Sign-up request
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[serde(default, alias = "fullName")]
    #[validate(custom(function = "validate_not_empty", message = "Please enter your full name"))]
    pub full_name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_email", message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom = "validate_password")]
    pub password: String,
    #[serde(default, alias = "confirmPassword")]
    pub confirm_password: String,
}

// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Login response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: AuthUser,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_at: session.expires_at,
            user: session.user,
        }
    }
}

// Respuesta de GET /api/auth/session
#[derive(Debug, Serialize)]
pub struct GateResponse {
    pub gate: AuthGate,
    pub user: Option<AuthUser>,
}
