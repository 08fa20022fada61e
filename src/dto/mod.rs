//! DTOs - Data Transfer Objects
//!
//! Este módulo contiene los objetos de transferencia de datos de la API:
//! bodies de entrada, queries y el envoltorio común de respuesta.

pub mod api_response;
pub mod auth_dto;
pub mod booking_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
