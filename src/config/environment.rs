//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

use anyhow::{anyhow, Context, Result};
use chrono::{FixedOffset, Offset, Utc};

use crate::config::database::DatabaseConfig;
use crate::utils::time::parse_utc_offset;

/// Backend con el que arranca el servicio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Postgres + Auth + Storage de un proyecto Supabase
    Supabase,
    /// Todo en memoria, para desarrollo local
    Memory,
}

/// Credenciales del proyecto Supabase
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub database: DatabaseConfig,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub backend: BackendKind,
    pub supabase: Option<SupabaseConfig>,
    pub jwt_secret: Option<String>,
    pub storage_bucket: String,
    pub reporting_offset: FixedOffset,
    pub cors_origins: Vec<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            backend: BackendKind::Memory,
            supabase: None,
            jwt_secret: None,
            storage_bucket: "vehicle-images".to_string(),
            reporting_offset: Utc.fix(),
            cors_origins: Vec::new(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Leer la configuración desde cualquier fuente clave → valor
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a valid number, got '{}'", raw))?,
            None => defaults.port,
        };

        let backend = match get("BACKEND").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("supabase") => BackendKind::Supabase,
            Some("memory") => BackendKind::Memory,
            Some(other) => return Err(anyhow!("BACKEND must be 'supabase' or 'memory', got '{}'", other)),
        };

        let supabase = match backend {
            BackendKind::Memory => None,
            BackendKind::Supabase => Some(SupabaseConfig {
                url: get("SUPABASE_URL").context("SUPABASE_URL must be set")?,
                anon_key: get("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY must be set")?,
                database: DatabaseConfig::from_lookup(&get)?,
            }),
        };

        let reporting_offset = match get("REPORTING_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw).ok_or_else(|| {
                anyhow!("REPORTING_UTC_OFFSET must look like '+08:00', got '{}'", raw)
            })?,
            None => defaults.reporting_offset,
        };

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            host: get("HOST").unwrap_or(defaults.host),
            backend,
            supabase,
            jwt_secret: get("SUPABASE_JWT_SECRET"),
            storage_bucket: get("STORAGE_BUCKET").unwrap_or(defaults.storage_bucket),
            reporting_offset,
            cors_origins: get("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
