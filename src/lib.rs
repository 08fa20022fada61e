//! Backend de gestión de flota para alquiler de coches
//!
//! Inventario de vehículos, listado de reservas, calendario de ocupación,
//! dashboard y reportes sobre un backend gestionado (Supabase) o en
//! memoria.

pub mod backend;
pub mod clients;
pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
