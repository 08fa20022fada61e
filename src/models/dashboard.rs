//! Modelos de Dashboard y reportes
//!
//! Contadores derivados de las colecciones de vehículos y reservas.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::booking::{Booking, BookingStatus};

/// Resumen para dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub total_vehicles: usize,
    pub available_vehicles: usize,
    pub active_bookings: usize,
    pub today_bookings: usize,
    pub monthly_revenue: Decimal,
    pub recent_bookings: Vec<Booking>,
}

/// Periodo de los filtros "Today / Weekly / Monthly"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Today,
    Weekly,
    #[default]
    Monthly,
}

impl ReportPeriod {
    /// Rango inclusivo de fechas que cubre el periodo, terminando hoy
    pub fn range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            ReportPeriod::Today => today,
            ReportPeriod::Weekly => today - chrono::Duration::days(6),
            ReportPeriod::Monthly => month_start(today),
        };
        (start, today)
    }

    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        let (start, end) = self.range(today);
        date >= start && date <= end
    }
}

/// Primer día del mes de `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day0(0).unwrap_or(date)
}

/// Recuento por estado
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusBreakdown {
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
}

impl StatusBreakdown {
    pub fn record(&mut self, status: BookingStatus) {
        match status {
            BookingStatus::Pending => self.pending += 1,
            BookingStatus::Confirmed => self.confirmed += 1,
            BookingStatus::Completed => self.completed += 1,
        }
    }
}

/// Vehículo con más reservas en el periodo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleTrend {
    pub vehicle: String,
    pub bookings: usize,
    pub revenue: Decimal,
}

/// Reporte de rendimiento para un periodo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingReport {
    pub period: ReportPeriod,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_bookings: usize,
    pub completed_revenue: Decimal,
    pub average_booking_value: Decimal,
    pub by_status: StatusBreakdown,
    pub trending_vehicles: Vec<VehicleTrend>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_ranges() {
        let today = date(2024, 8, 15);
        assert_eq!(ReportPeriod::Today.range(today), (today, today));
        assert_eq!(ReportPeriod::Weekly.range(today), (date(2024, 8, 9), today));
        assert_eq!(ReportPeriod::Monthly.range(today), (date(2024, 8, 1), today));
        assert!(ReportPeriod::Weekly.contains(today, date(2024, 8, 9)));
        assert!(!ReportPeriod::Weekly.contains(today, date(2024, 8, 8)));
        assert!(!ReportPeriod::Monthly.contains(today, date(2024, 8, 16)));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2024, 2, 29)), date(2024, 2, 1));
        assert_eq!(month_start(date(2024, 3, 1)), date(2024, 3, 1));
    }
}
