//! Servicio de dashboard
//!
//! Calcula los contadores del panel principal a partir de las colecciones
//! completas de vehículos y reservas.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::backend::FleetStore;
use crate::models::booking::{Booking, BookingStatus};
use crate::models::dashboard::{month_start, DashboardSummary};
use crate::models::vehicle::Vehicle;
use crate::realtime::Refreshable;
use crate::utils::errors::AppResult;
use crate::utils::time::today_in;

/// Reservas mostradas en "recientes"
pub const RECENT_BOOKINGS: usize = 5;

/// Calcula el resumen. Función pura de las dos colecciones y de `today`.
pub fn compute_dashboard(
    vehicles: &[Vehicle],
    bookings: &[Booking],
    today: NaiveDate,
) -> DashboardSummary {
    let first_of_month = month_start(today);

    let monthly_revenue = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Completed)
        .filter(|b| b.rental_date >= first_of_month && b.rental_date <= today)
        .map(Booking::amount)
        .fold(Decimal::ZERO, |acc, amount| acc + amount);

    let mut recent_bookings = bookings.to_vec();
    recent_bookings.sort_by(|a, b| b.rental_date.cmp(&a.rental_date));
    recent_bookings.truncate(RECENT_BOOKINGS);

    DashboardSummary {
        date: today,
        total_vehicles: vehicles.len(),
        available_vehicles: vehicles.iter().filter(|v| v.available).count(),
        active_bookings: bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .count(),
        today_bookings: bookings.iter().filter(|b| b.rental_date == today).count(),
        monthly_revenue,
        recent_bookings,
    }
}

/// Estado publicado del dashboard
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    pub summary: Option<DashboardSummary>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

pub struct DashboardService {
    store: Arc<dyn FleetStore>,
    offset: FixedOffset,
    state: RwLock<DashboardSnapshot>,
    reloading: Mutex<()>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn FleetStore>, offset: FixedOffset) -> Self {
        Self {
            store,
            offset,
            state: RwLock::new(DashboardSnapshot::default()),
            reloading: Mutex::new(()),
        }
    }

    /// Lee vehículos y reservas en paralelo y recalcula el resumen.
    /// Las recargas concurrentes se aplican en orden de llegada.
    pub async fn reload(&self) -> AppResult<DashboardSummary> {
        let _guard = self.reloading.lock().await;
        let fetched = futures::try_join!(self.store.list_vehicles(), self.store.list_bookings());

        match fetched {
            Ok((vehicles, bookings)) => {
                let summary = compute_dashboard(&vehicles, &bookings, today_in(self.offset));
                info!(
                    "📊 Dashboard: {} vehículos ({} disponibles), {} reservas activas",
                    summary.total_vehicles, summary.available_vehicles, summary.active_bookings
                );
                let mut state = self.state.write().await;
                state.summary = Some(summary.clone());
                state.refreshed_at = Some(Utc::now());
                state.last_error = None;
                Ok(summary)
            }
            Err(e) => {
                warn!("⚠️ No se pudo recalcular el dashboard: {}", e);
                self.state.write().await.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl Refreshable for DashboardService {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    async fn refresh(&self) -> AppResult<()> {
        self.reload().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::models::fixtures::{booking, booking_with, date, vehicle, StagedStore};
    use chrono::Offset;
    use std::time::Duration;

    #[test]
    fn test_counts_vehicles_and_today_bookings() {
        let today = date(2024, 8, 15);
        let vehicles = vec![
            vehicle("Toyota", "Vios", true),
            vehicle("Honda", "City", false),
        ];
        let bookings = vec![booking_with(today, date(2024, 8, 17), BookingStatus::Confirmed, None)];

        let summary = compute_dashboard(&vehicles, &bookings, today);
        assert_eq!(summary.total_vehicles, 2);
        assert_eq!(summary.available_vehicles, 1);
        assert_eq!(summary.active_bookings, 1);
        assert_eq!(summary.today_bookings, 1);
        assert_eq!(summary.monthly_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_empty_collections() {
        let summary = compute_dashboard(&[], &[], date(2024, 8, 15));
        assert_eq!(summary.total_vehicles, 0);
        assert_eq!(summary.available_vehicles, 0);
        assert_eq!(summary.active_bookings, 0);
        assert_eq!(summary.today_bookings, 0);
        assert_eq!(summary.monthly_revenue, Decimal::ZERO);
        assert!(summary.recent_bookings.is_empty());
    }

    #[test]
    fn test_monthly_revenue_only_completed_this_month() {
        let today = date(2024, 8, 15);
        let bookings = vec![
            booking_with(date(2024, 8, 1), date(2024, 8, 2), BookingStatus::Completed, Some(3000)),
            booking_with(date(2024, 8, 10), date(2024, 8, 12), BookingStatus::Completed, Some(4500)),
            // Sin importe: cuenta como cero
            booking_with(date(2024, 8, 11), date(2024, 8, 12), BookingStatus::Completed, None),
            // Mes anterior
            booking_with(date(2024, 7, 31), date(2024, 8, 2), BookingStatus::Completed, Some(9999)),
            // Todavía no empieza
            booking_with(date(2024, 8, 20), date(2024, 8, 22), BookingStatus::Completed, Some(9999)),
            // No completada
            booking_with(date(2024, 8, 5), date(2024, 8, 6), BookingStatus::Confirmed, Some(9999)),
        ];

        let summary = compute_dashboard(&[], &bookings, today);
        assert_eq!(summary.monthly_revenue, Decimal::from(7500));
        assert_eq!(summary.active_bookings, 1);
    }

    #[test]
    fn test_recent_bookings_newest_first_capped() {
        let bookings: Vec<_> = (1..=7)
            .map(|d| booking(date(2024, 8, d), date(2024, 8, d)))
            .collect();

        let summary = compute_dashboard(&[], &bookings, date(2024, 8, 15));
        let starts: Vec<_> = summary.recent_bookings.iter().map(|b| b.rental_date).collect();
        assert_eq!(
            starts,
            vec![
                date(2024, 8, 7),
                date(2024, 8, 6),
                date(2024, 8, 5),
                date(2024, 8, 4),
                date(2024, 8, 3)
            ]
        );
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let today = date(2024, 8, 15);
        let vehicles = vec![vehicle("Toyota", "Vios", true)];
        let bookings = vec![
            booking_with(date(2024, 8, 3), date(2024, 8, 4), BookingStatus::Completed, Some(1200)),
            booking(today, today),
        ];

        let first = compute_dashboard(&vehicles, &bookings, today);
        let second = compute_dashboard(&vehicles, &bookings, today);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_last_summary() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.seed_vehicle(vehicle("Toyota", "Vios", true)).await;

        let service = DashboardService::new(backend.clone(), Utc.fix());
        let summary = service.reload().await.unwrap();
        assert_eq!(summary.total_vehicles, 1);

        backend.set_unavailable(true);
        assert!(service.reload().await.is_err());

        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.summary.unwrap().total_vehicles, 1);
        assert!(snapshot.last_error.is_some());
    }

    #[tokio::test]
    async fn test_overlapping_reloads_apply_latest_fetch() {
        let store = Arc::new(StagedStore::new(
            vec![vehicle("Toyota", "Vios", true)],
            vec![
                vehicle("Toyota", "Vios", true),
                vehicle("Honda", "City", true),
                vehicle("Ford", "Ranger", false),
            ],
            Vec::new(),
            Vec::new(),
        ));
        let service = Arc::new(DashboardService::new(store, Utc.fix()));

        let slow = tokio::spawn({
            let service = service.clone();
            async move { service.reload().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        service.reload().await.unwrap();
        slow.await.unwrap().unwrap();

        let summary = service.snapshot().await.summary.unwrap();
        assert_eq!(summary.total_vehicles, 3);
        assert_eq!(summary.available_vehicles, 2);
    }
}
