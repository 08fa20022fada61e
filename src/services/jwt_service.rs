//! Verificación local de los JWT de sesión
//!
//! Supabase firma los access tokens con HS256 y el secreto JWT del
//! proyecto. Con el secreto configurado la sesión se valida sin ir al
//! backend.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::debug;
use uuid::Uuid;

use crate::models::auth::{AuthUser, Claims};

/// Servicio JWT
pub struct JwtService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Supabase emite aud = "authenticated"; la firma ya identifica al proyecto
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Valida y decodifica un token
    pub fn validate_token(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| format!("Invalid token: {}", e))
    }

    /// Usuario del token, o `None` si la firma, la expiración o el `sub`
    /// no son válidos
    pub fn user_from_token(&self, token: &str) -> Option<AuthUser> {
        let claims = match self.validate_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("🔑 {}", e);
                return None;
            }
        };

        let id = Uuid::parse_str(&claims.sub).ok()?;
        let full_name = claims
            .user_metadata
            .as_ref()
            .and_then(|meta| meta.get("full_name"))
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Some(AuthUser {
            id,
            email: claims.email.unwrap_or_default(),
            full_name,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    pub(crate) fn sign(secret: &str, sub: &str, expires_in: Duration) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            email: Some("admin@fleet.test".to_string()),
            exp: (Utc::now() + expires_in).timestamp() as usize,
            user_metadata: Some(json!({ "full_name": "Fleet Admin" })),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token() {
        let service = JwtService::new("secret");
        let id = Uuid::new_v4();
        let token = sign("secret", &id.to_string(), Duration::hours(1));

        let user = service.user_from_token(&token).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "admin@fleet.test");
        assert_eq!(user.full_name.as_deref(), Some("Fleet Admin"));
    }

    #[test]
    fn test_rejects_bad_tokens() {
        let service = JwtService::new("secret");
        let id = Uuid::new_v4().to_string();

        assert!(service
            .user_from_token(&sign("other-secret", &id, Duration::hours(1)))
            .is_none());
        assert!(service
            .user_from_token(&sign("secret", &id, Duration::hours(-2)))
            .is_none());
        assert!(service
            .user_from_token(&sign("secret", "not-a-uuid", Duration::hours(1)))
            .is_none());
        assert!(service.user_from_token("garbage").is_none());
    }
}
