use serde::Deserialize;

use crate::models::booking::BookingStatus;
use crate::models::dashboard::ReportPeriod;
use crate::services::booking_service::BookingFilter;
use crate::utils::errors::{bad_request_error, AppResult};

// Query de GET /api/bookings
#[derive(Debug, Default, Deserialize)]
pub struct BookingQuery {
    pub status: Option<String>,
    pub period: Option<ReportPeriod>,
}

impl BookingQuery {
    pub fn into_filter(self) -> AppResult<BookingFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(
                BookingStatus::parse(raw)
                    .ok_or_else(|| bad_request_error(&format!("Unknown booking status '{}'", raw)))?,
            ),
        };

        Ok(BookingFilter {
            status,
            period: self.period,
        })
    }
}

// Query de GET /api/reports
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub period: ReportPeriod,
}
