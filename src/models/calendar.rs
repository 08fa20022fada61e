//! Modelo del índice de días del calendario
//!
//! Estructura derivada que sólo vive en memoria: se reconstruye en cada
//! lectura de reservas y nunca se persiste.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::booking::Booking;

/// Entrada de un día con actividad
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEntry {
    pub marked: bool,
    pub bookings: Vec<Booking>,
}

impl DayEntry {
    fn new() -> Self {
        Self {
            marked: true,
            bookings: Vec::new(),
        }
    }
}

/// Fecha → reservas que ocupan ese día
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DayIndex {
    days: BTreeMap<NaiveDate, DayEntry>,
}

impl DayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Añade una reserva al día, creando la entrada en el primer toque
    pub fn push(&mut self, date: NaiveDate, booking: Booking) {
        self.days
            .entry(date)
            .or_insert_with(DayEntry::new)
            .bookings
            .push(booking);
    }

    /// Reservas del día; vacío si no hay actividad
    pub fn bookings_on(&self, date: NaiveDate) -> &[Booking] {
        self.days
            .get(&date)
            .map(|entry| entry.bookings.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_marked(&self, date: NaiveDate) -> bool {
        self.days.get(&date).map(|e| e.marked).unwrap_or(false)
    }

    pub fn marked_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
