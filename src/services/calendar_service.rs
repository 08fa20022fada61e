//! Servicio de calendario de reservas
//!
//! Expande cada reserva a todos los días que ocupa (ambos extremos
//! incluidos) y mantiene el índice resultante para el calendario y el
//! detalle por día. El índice se reconstruye entero en cada refresco.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::backend::FleetStore;
use crate::models::booking::Booking;
use crate::models::calendar::DayIndex;
use crate::realtime::Refreshable;
use crate::utils::errors::AppResult;

/// Construye el índice de días a partir de todas las reservas.
///
/// Cada reserva aparece en cada fecha de `rental_date..=return_date`. Las
/// reservas se procesan en el orden recibido, así que dentro de un día
/// conservan ese orden relativo. Un rango invertido no aporta ningún día.
pub fn build_day_index(bookings: &[Booking]) -> DayIndex {
    let mut index = DayIndex::new();

    for booking in bookings {
        if booking.rental_date > booking.return_date {
            warn!(
                "⚠️ Reserva {} con rango invertido ({} > {}), se omite del calendario",
                booking.id, booking.rental_date, booking.return_date
            );
            continue;
        }

        let mut day = booking.rental_date;
        loop {
            index.push(day, booking.clone());
            if day >= booking.return_date {
                break;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
    }

    index
}

/// Estado publicado del calendario
#[derive(Debug, Clone, Default, Serialize)]
pub struct CalendarSnapshot {
    pub days: DayIndex,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Detalle de un día seleccionado.
///
/// Con `last_error` presente el día sale de un índice anterior al último
/// refresco fallido.
#[derive(Debug, Clone, Serialize)]
pub struct DayDetail {
    pub date: NaiveDate,
    pub marked: bool,
    pub bookings: Vec<Booking>,
    pub last_error: Option<String>,
}

pub struct CalendarService {
    store: Arc<dyn FleetStore>,
    state: RwLock<CalendarSnapshot>,
    // Lectura y sustitución van juntas: una recarga lenta no pisa a una
    // posterior
    reloading: Mutex<()>,
}

impl CalendarService {
    pub fn new(store: Arc<dyn FleetStore>) -> Self {
        Self {
            store,
            state: RwLock::new(CalendarSnapshot::default()),
            reloading: Mutex::new(()),
        }
    }

    /// Relee todas las reservas y sustituye el índice.
    ///
    /// Si la lectura falla se conserva el índice anterior y se guarda el
    /// error para mostrarlo.
    pub async fn reload(&self) -> AppResult<()> {
        let _guard = self.reloading.lock().await;
        match self.store.list_bookings().await {
            Ok(bookings) => {
                let days = build_day_index(&bookings);
                info!(
                    "📅 Calendario reconstruido: {} reservas, {} días marcados",
                    bookings.len(),
                    days.len()
                );
                let mut state = self.state.write().await;
                state.days = days;
                state.refreshed_at = Some(Utc::now());
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ No se pudieron leer las reservas: {}", e);
                self.state.write().await.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn snapshot(&self) -> CalendarSnapshot {
        self.state.read().await.clone()
    }

    /// Reservas del día; un día sin actividad devuelve lista vacía
    pub async fn day(&self, date: NaiveDate) -> DayDetail {
        let state = self.state.read().await;
        debug!("Consultando día {}", date);
        DayDetail {
            date,
            marked: state.days.is_marked(date),
            bookings: state.days.bookings_on(date).to_vec(),
            last_error: state.last_error.clone(),
        }
    }
}

#[async_trait]
impl Refreshable for CalendarService {
    fn name(&self) -> &'static str {
        "calendar"
    }

    async fn refresh(&self) -> AppResult<()> {
        self.reload().await
    }
}
