//! Servicio de reportes
//!
//! Métricas de rendimiento de un periodo: volumen, ingresos de reservas
//! completadas, recuento por estado y vehículos más reservados.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::models::booking::{Booking, BookingStatus};
use crate::models::dashboard::{BookingReport, ReportPeriod, StatusBreakdown, VehicleTrend};
use crate::services::booking_service::BookingService;
use crate::utils::errors::AppResult;

/// Vehículos incluidos en "trending"
pub const TRENDING_LIMIT: usize = 5;

/// Construye el reporte sobre las reservas cuyo inicio cae en el periodo
pub fn build_report(bookings: &[Booking], period: ReportPeriod, today: NaiveDate) -> BookingReport {
    let (from, to) = period.range(today);
    let in_period: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.rental_date >= from && b.rental_date <= to)
        .collect();

    let mut by_status = StatusBreakdown::default();
    let mut completed_revenue = Decimal::ZERO;
    let mut trends: HashMap<String, VehicleTrend> = HashMap::new();

    for booking in &in_period {
        by_status.record(booking.status);

        let label = booking.vehicle_label();
        let trend = trends.entry(label.clone()).or_insert_with(|| VehicleTrend {
            vehicle: label,
            bookings: 0,
            revenue: Decimal::ZERO,
        });
        trend.bookings += 1;

        if booking.status == BookingStatus::Completed {
            completed_revenue += booking.amount();
            trend.revenue += booking.amount();
        }
    }

    let average_booking_value = if by_status.completed == 0 {
        Decimal::ZERO
    } else {
        (completed_revenue / Decimal::from(by_status.completed)).round_dp(2)
    };

    let mut trending_vehicles: Vec<VehicleTrend> = trends.into_values().collect();
    trending_vehicles.sort_by(|a, b| {
        b.bookings
            .cmp(&a.bookings)
            .then_with(|| b.revenue.cmp(&a.revenue))
            .then_with(|| a.vehicle.cmp(&b.vehicle))
    });
    trending_vehicles.truncate(TRENDING_LIMIT);

    BookingReport {
        period,
        from,
        to,
        total_bookings: in_period.len(),
        completed_revenue,
        average_booking_value,
        by_status,
        trending_vehicles,
    }
}

pub struct ReportService {
    bookings: Arc<BookingService>,
}

impl ReportService {
    pub fn new(bookings: Arc<BookingService>) -> Self {
        Self { bookings }
    }

    pub async fn report(&self, period: ReportPeriod) -> AppResult<BookingReport> {
        let bookings = self.bookings.all().await?;
        let report = build_report(&bookings, period, self.bookings.today());
        info!(
            "📈 Reporte {:?} {}..{}: {} reservas, ingresos {}",
            period, report.from, report.to, report.total_bookings, report.completed_revenue
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{booking_with, date};

    fn with_vehicle(mut booking: Booking, make: &str, model: &str) -> Booking {
        booking.vehicle_make = make.to_string();
        booking.vehicle_model = model.to_string();
        booking
    }

    #[test]
    fn test_monthly_report() {
        let today = date(2024, 8, 15);
        let bookings = vec![
            with_vehicle(
                booking_with(date(2024, 8, 2), date(2024, 8, 3), BookingStatus::Completed, Some(3000)),
                "Toyota",
                "Vios",
            ),
            with_vehicle(
                booking_with(date(2024, 8, 5), date(2024, 8, 6), BookingStatus::Completed, Some(1000)),
                "Toyota",
                "Vios",
            ),
            with_vehicle(
                booking_with(date(2024, 8, 9), date(2024, 8, 9), BookingStatus::Completed, Some(2000)),
                "Honda",
                "City",
            ),
            with_vehicle(
                booking_with(date(2024, 8, 12), date(2024, 8, 14), BookingStatus::Pending, Some(5000)),
                "Mitsubishi",
                "Xpander",
            ),
            // Fuera del periodo
            with_vehicle(
                booking_with(date(2024, 7, 30), date(2024, 8, 1), BookingStatus::Completed, Some(7000)),
                "Honda",
                "City",
            ),
        ];

        let report = build_report(&bookings, ReportPeriod::Monthly, today);
        assert_eq!(report.from, date(2024, 8, 1));
        assert_eq!(report.to, today);
        assert_eq!(report.total_bookings, 4);
        assert_eq!(report.completed_revenue, Decimal::from(6000));
        assert_eq!(report.average_booking_value, Decimal::from(2000));
        assert_eq!(report.by_status.completed, 3);
        assert_eq!(report.by_status.pending, 1);
        assert_eq!(report.by_status.confirmed, 0);

        assert_eq!(report.trending_vehicles[0].vehicle, "Toyota Vios");
        assert_eq!(report.trending_vehicles[0].bookings, 2);
        assert_eq!(report.trending_vehicles[0].revenue, Decimal::from(4000));
        assert_eq!(report.trending_vehicles[1].vehicle, "Honda City");
        assert_eq!(report.trending_vehicles[2].revenue, Decimal::ZERO);
    }

    #[test]
    fn test_empty_period() {
        let report = build_report(&[], ReportPeriod::Today, date(2024, 8, 15));
        assert_eq!(report.total_bookings, 0);
        assert_eq!(report.average_booking_value, Decimal::ZERO);
        assert!(report.trending_vehicles.is_empty());
    }
}
