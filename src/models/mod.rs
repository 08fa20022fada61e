//! Modelos de datos del sistema
//!
//! Este módulo contiene todos los modelos que representan las entidades
//! del negocio y mapean a las tablas de la base de datos.

pub mod auth;
pub mod booking;
pub mod calendar;
pub mod dashboard;
pub mod vehicle;

#[cfg(test)]
pub mod fixtures;
