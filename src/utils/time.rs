//! Fechas de calendario en la zona de reporte
//!
//! Los conteos de "hoy" y el rango del mes se calculan sobre la fecha
//! local del negocio, no sobre UTC.

use chrono::{FixedOffset, NaiveDate, Utc};

/// Ninguna zona horaria real se aleja más de 14 horas de UTC
const MAX_OFFSET_SECS: i32 = 14 * 3600;

/// Parsea un desplazamiento como `+08:00`, `-0530`, `Z` o `UTC`
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let offset = raw.parse::<FixedOffset>().ok()?;
    (offset.local_minus_utc().abs() <= MAX_OFFSET_SECS).then_some(offset)
}

/// Fecha de hoy en la zona indicada
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}
