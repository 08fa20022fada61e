//! Modelos de autenticación
//!
//! Sesiones, usuarios autenticados, perfiles y la traducción de los
//! códigos de error del proveedor de auth a mensajes legibles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Usuario autenticado tal como lo devuelve el proveedor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

/// Sesión emitida tras un login correcto
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

/// Perfil guardado en la tabla profiles al registrarse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

/// Navegador que corresponde a quien hace la petición
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthGate {
    /// Sesión válida: dashboard, reservas, vehículos, reportes, calendario
    Main,
    /// Sin sesión: login y registro
    Auth,
}

/// Fallos de autenticación con mensaje fijo para la UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    EmailInUse,
    InvalidEmail,
    WeakPassword,
    Network,
    InvalidCredentials,
    Unknown,
}

impl AuthFailure {
    /// Traduce un código de error del backend.
    ///
    /// Reconoce tanto el vocabulario de Supabase (`user_already_exists`)
    /// como el de Firebase (`auth/email-already-in-use`).
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "auth/email-already-in-use" | "user_already_exists" | "email_exists" => {
                AuthFailure::EmailInUse
            }
            "auth/invalid-email" | "email_address_invalid" | "validation_failed" => {
                AuthFailure::InvalidEmail
            }
            "auth/weak-password" | "weak_password" => AuthFailure::WeakPassword,
            "auth/network-request-failed" | "request_timeout" => AuthFailure::Network,
            "auth/wrong-password"
            | "auth/user-not-found"
            | "auth/invalid-credential"
            | "invalid_credentials"
            | "invalid_grant" => AuthFailure::InvalidCredentials,
            _ => AuthFailure::Unknown,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::EmailInUse => "An account with this email already exists.",
            AuthFailure::InvalidEmail => "Please enter a valid email address.",
            AuthFailure::WeakPassword => {
                "Password is too weak. Please choose a stronger password."
            }
            AuthFailure::Network => "Network error. Please check your connection.",
            AuthFailure::InvalidCredentials => "Invalid email or password.",
            AuthFailure::Unknown => "Authentication failed. Please try again.",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::EmailInUse => "EMAIL_IN_USE",
            AuthFailure::InvalidEmail => "INVALID_EMAIL",
            AuthFailure::WeakPassword => "WEAK_PASSWORD",
            AuthFailure::Network => "NETWORK_ERROR",
            AuthFailure::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthFailure::Unknown => "AUTH_FAILED",
        }
    }
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Claims del JWT de sesión emitido por el proveedor
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub user_metadata: Option<serde_json::Value>,
}
