//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y fechas de reporte.

pub mod errors;
pub mod time;
pub mod validation;
