//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::backend::Backend;
use crate::config::environment::EnvironmentConfig;
use crate::services::{
    AuthService, BookingService, CalendarService, DashboardService, ReportService, VehicleService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub backend: Backend,
    pub auth: Arc<AuthService>,
    pub vehicles: Arc<VehicleService>,
    pub bookings: Arc<BookingService>,
    pub reports: Arc<ReportService>,
    pub calendar: Arc<CalendarService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    /// Construye todos los servicios sobre el mismo backend
    pub fn new(config: EnvironmentConfig, backend: Backend) -> Self {
        let offset = config.reporting_offset;
        let bookings = Arc::new(BookingService::new(backend.store.clone(), offset));

        Self {
            auth: Arc::new(AuthService::new(
                backend.auth.clone(),
                backend.store.clone(),
                config.jwt_secret.as_deref(),
            )),
            vehicles: Arc::new(VehicleService::new(
                backend.store.clone(),
                backend.storage.clone(),
            )),
            reports: Arc::new(ReportService::new(bookings.clone())),
            bookings,
            calendar: Arc::new(CalendarService::new(backend.store.clone())),
            dashboard: Arc::new(DashboardService::new(backend.store.clone(), offset)),
            backend,
            config,
        }
    }
}
