//! Servicio de autenticación
//!
//! Registro, login y logout contra el proveedor de auth del backend, más
//! la comprobación de sesión que decide qué navegador ve el usuario.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use crate::backend::{AuthProvider, FleetStore};
use crate::dto::auth_dto::{LoginRequest, SignUpRequest};
use crate::models::auth::{AuthGate, AuthUser, Session, UserProfile};
use crate::services::jwt_service::JwtService;
use crate::utils::errors::{validation_error, AppResult};

/// Rol asignado a las cuentas creadas desde la app de gestión
pub const DEFAULT_ROLE: &str = "admin";

/// Servicio de autenticación
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    store: Arc<dyn FleetStore>,
    jwt: Option<JwtService>,
}

impl AuthService {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        store: Arc<dyn FleetStore>,
        jwt_secret: Option<&str>,
    ) -> Self {
        Self {
            provider,
            store,
            jwt: jwt_secret.map(JwtService::new),
        }
    }

    /// Valida el formulario de registro sin tocar el backend
    pub fn validate_sign_up(request: &SignUpRequest) -> AppResult<()> {
        if request.full_name.trim().is_empty() {
            return Err(validation_error("full_name", "Please enter your full name"));
        }
        if request.email.trim().is_empty() {
            return Err(validation_error("email", "Please enter your email address"));
        }
        request.validate()?;
        if request.password != request.confirm_password {
            return Err(validation_error("confirm_password", "Passwords do not match"));
        }
        Ok(())
    }

    /// Crea la cuenta y después el perfil con rol `admin`
    pub async fn sign_up(&self, request: SignUpRequest) -> AppResult<AuthUser> {
        Self::validate_sign_up(&request)?;

        let email = request.email.trim();
        let full_name = request.full_name.trim();
        let user = self
            .provider
            .sign_up(email, &request.password, full_name)
            .await?;

        let now = Utc::now();
        let profile = UserProfile {
            id: user.id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            role: DEFAULT_ROLE.to_string(),
            created_at: now,
            last_login: now,
        };
        self.store.upsert_profile(&profile).await?;

        info!("👤 Cuenta creada: {}", user.id);
        Ok(user)
    }

    pub async fn sign_in(&self, request: LoginRequest) -> AppResult<Session> {
        let email = request.email.trim();
        if email.is_empty() || request.password.is_empty() {
            return Err(validation_error("form", "Please fill in all fields"));
        }

        let session = self.provider.sign_in(email, &request.password).await?;
        info!("🔐 Login correcto: {}", session.user.id);
        Ok(session)
    }

    pub async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.provider.sign_out(access_token).await?;
        info!("👋 Sesión cerrada");
        Ok(())
    }

    /// Usuario de la sesión, o `None` si el token no es válido
    pub async fn current_user(&self, access_token: &str) -> AppResult<Option<AuthUser>> {
        match &self.jwt {
            Some(jwt) => Ok(jwt.user_from_token(access_token)),
            None => self.provider.user_for_token(access_token).await,
        }
    }

    /// `main` con sesión válida, `auth` en cualquier otro caso. Un fallo
    /// del backend al comprobar la sesión cuenta como sin sesión.
    pub async fn gate(&self, access_token: Option<&str>) -> (AuthGate, Option<AuthUser>) {
        let Some(token) = access_token else {
            return (AuthGate::Auth, None);
        };

        match self.current_user(token).await {
            Ok(Some(user)) => (AuthGate::Main, Some(user)),
            Ok(None) => (AuthGate::Auth, None),
            Err(e) => {
                warn!("⚠️ No se pudo comprobar la sesión: {}", e);
                (AuthGate::Auth, None)
            }
        }
    }
}
