//! Servicio de reservas
//!
//! Listado de sólo lectura con filtros por estado y periodo.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};
use tracing::debug;

use crate::backend::FleetStore;
use crate::models::booking::{Booking, BookingStatus};
use crate::models::dashboard::ReportPeriod;
use crate::utils::errors::AppResult;
use crate::utils::time::today_in;

/// Filtros del listado; `None` no filtra
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub period: Option<ReportPeriod>,
}

/// Aplica los filtros y ordena de la más nueva a la más antigua por fecha
/// de inicio
pub fn filter_bookings(bookings: Vec<Booking>, filter: BookingFilter, today: NaiveDate) -> Vec<Booking> {
    let mut selected: Vec<Booking> = bookings
        .into_iter()
        .filter(|b| filter.status.map_or(true, |status| b.status == status))
        .filter(|b| {
            filter
                .period
                .map_or(true, |period| period.contains(today, b.rental_date))
        })
        .collect();

    selected.sort_by(|a, b| b.rental_date.cmp(&a.rental_date));
    selected
}

pub struct BookingService {
    store: Arc<dyn FleetStore>,
    offset: FixedOffset,
}

impl BookingService {
    pub fn new(store: Arc<dyn FleetStore>, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    pub async fn list(&self, filter: BookingFilter) -> AppResult<Vec<Booking>> {
        let bookings = self.store.list_bookings().await?;
        let total = bookings.len();
        let selected = filter_bookings(bookings, filter, today_in(self.offset));
        debug!("📋 {} de {} reservas tras filtrar", selected.len(), total);
        Ok(selected)
    }

    /// Todas las reservas, en el orden del backend
    pub async fn all(&self) -> AppResult<Vec<Booking>> {
        self.store.list_bookings().await
    }

    pub fn today(&self) -> NaiveDate {
        today_in(self.offset)
    }
}
