//! Middleware del sistema
//!
//! Este módulo contiene el middleware de autenticación y CORS.

pub mod auth_middleware;
pub mod cors;

pub use auth_middleware::auth_middleware;
pub use cors::cors_layer;
