//! Cliente HTTP para Supabase Auth (GoTrue)
//!
//! Registro, login con contraseña, logout y consulta del usuario de un
//! token. Los errores del servicio se traducen a `AuthFailure`.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::backend::AuthProvider;
use crate::models::auth::{AuthFailure, AuthUser, Session};
use crate::utils::errors::{AppError, AppResult};

/// Cliente HTTP para la API de auth de Supabase
pub struct SupabaseAuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<Value>,
}

impl From<GoTrueUser> for AuthUser {
    fn from(user: GoTrueUser) -> Self {
        let full_name = user
            .user_metadata
            .as_ref()
            .and_then(|meta| meta.get("full_name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        AuthUser {
            id: user.id,
            email: user.email.unwrap_or_default(),
            full_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
    user: GoTrueUser,
}

/// Cuerpo de error de GoTrue; las versiones antiguas usan `error`
#[derive(Debug, Default, Deserialize)]
struct GoTrueError {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl GoTrueError {
    fn failure(&self) -> AuthFailure {
        self.error_code
            .as_deref()
            .or(self.error.as_deref())
            .map(AuthFailure::from_code)
            .unwrap_or(AuthFailure::Unknown)
    }
}

fn network_failure(e: reqwest::Error) -> AppError {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        AppError::Auth(AuthFailure::Network)
    } else {
        AppError::from(e)
    }
}

impl SupabaseAuthClient {
    pub fn new(base_url: String, anon_key: String) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    async fn failure_from(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body: GoTrueError = response.json().await.unwrap_or_default();
        let failure = body.failure();
        log::warn!("⚠️ Supabase auth respondió {}: {:?}", status, failure);
        AppError::Auth(failure)
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthClient {
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> AppResult<AuthUser> {
        let response = self
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name }
            }))
            .send()
            .await
            .map_err(network_failure)?;

        if !response.status().is_success() {
            return Err(Self::failure_from(response).await);
        }

        // Con confirmación automática llega una sesión con `user`;
        // si no, llega el usuario directamente
        let body: Value = response.json().await?;
        let user_value = body.get("user").cloned().unwrap_or(body);
        let user: GoTrueUser = serde_json::from_value(user_value)
            .map_err(|e| AppError::ExternalApi(format!("unexpected signup response: {}", e)))?;

        Ok(user.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let response = self
            .client
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(network_failure)?;

        if !response.status().is_success() {
            return Err(Self::failure_from(response).await);
        }

        let token: TokenResponse = response.json().await?;
        Ok(Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
            user: token.user.into(),
        })
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_failure)?;

        // Un token ya caducado también deja la sesión cerrada
        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        Err(Self::failure_from(response).await)
    }

    async fn user_for_token(&self, access_token: &str) -> AppResult<Option<AuthUser>> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(network_failure)?;

        match response.status() {
            status if status.is_success() => {
                let user: GoTrueUser = response.json().await?;
                Ok(Some(user.into()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => Err(Self::failure_from(response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client =
            SupabaseAuthClient::new("https://abc.supabase.co/".into(), "anon".into()).unwrap();
        assert_eq!(client.endpoint("signup"), "https://abc.supabase.co/auth/v1/signup");
    }

    #[test]
    fn test_error_body_mapping() {
        let modern: GoTrueError =
            serde_json::from_str(r#"{"code":422,"error_code":"weak_password","msg":"weak"}"#)
                .unwrap();
        assert_eq!(modern.failure(), AuthFailure::WeakPassword);

        let legacy: GoTrueError = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(legacy.failure(), AuthFailure::InvalidCredentials);

        assert_eq!(GoTrueError::default().failure(), AuthFailure::Unknown);
    }

    #[test]
    fn test_user_metadata_full_name() {
        let user: GoTrueUser = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "email": "ops@fleet.ph",
            "user_metadata": { "full_name": "Fleet Ops" }
        }))
        .unwrap();
        let auth_user: AuthUser = user.into();
        assert_eq!(auth_user.full_name.as_deref(), Some("Fleet Ops"));
        assert_eq!(auth_user.email, "ops@fleet.ph");
    }
}
