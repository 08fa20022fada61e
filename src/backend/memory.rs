//! Backend en memoria
//!
//! Implementa todas las capacidades del backend sobre estructuras en
//! memoria. Lo usan los tests y el modo `BACKEND=memory` de desarrollo.
//! Cada escritura emite la notificación de cambio correspondiente, igual
//! que hacen los triggers en Postgres.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::{broadcast, mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

use super::{
    any_matches, AuthProvider, ChangeEvent, ChangeFeed, ChangeFilter, ChangeKind, ChangeStream,
    FleetStore, ObjectStorage, Table,
};
use crate::models::auth::{AuthFailure, AuthUser, Session, UserProfile};
use crate::models::booking::Booking;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::{not_found_error, AppError, AppResult};

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone)]
struct Account {
    user: AuthUser,
    password: String,
}

pub struct InMemoryBackend {
    vehicles: RwLock<Vec<Vehicle>>,
    bookings: RwLock<Vec<Booking>>,
    profiles: RwLock<HashMap<Uuid, UserProfile>>,
    objects: RwLock<HashMap<String, Vec<u8>>>,
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, AuthUser>>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
    events: broadcast::Sender<ChangeEvent>,
    public_url_base: String,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            vehicles: RwLock::new(Vec::new()),
            bookings: RwLock::new(Vec::new()),
            profiles: RwLock::new(HashMap::new()),
            objects: RwLock::new(HashMap::new()),
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
            events,
            public_url_base: "memory://objects".to_string(),
        }
    }

    /// Simula una caída del backend: todas las operaciones fallan
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Número de escrituras de filas y objetos aceptadas
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(path).cloned()
    }

    pub async fn profile(&self, id: Uuid) -> Option<UserProfile> {
        self.profiles.read().await.get(&id).cloned()
    }

    /// Inserta una reserva como lo haría un sistema externo
    pub async fn insert_booking(&self, booking: Booking) {
        let id = booking.id;
        self.bookings.write().await.push(booking);
        self.emit(Table::Bookings, ChangeKind::Insert, Some(id));
    }

    pub async fn delete_booking(&self, id: Uuid) {
        self.bookings.write().await.retain(|b| b.id != id);
        self.emit(Table::Bookings, ChangeKind::Delete, Some(id));
    }

    /// Carga un vehículo sin pasar por el formulario
    pub async fn seed_vehicle(&self, vehicle: Vehicle) {
        let id = vehicle.id;
        self.vehicles.write().await.push(vehicle);
        self.emit(Table::Vehicles, ChangeKind::Insert, Some(id));
    }

    fn emit(&self, table: Table, kind: ChangeKind, id: Option<Uuid>) {
        // Sin suscriptores el envío falla; no es un error
        let _ = self.events.send(ChangeEvent::new(table, kind, id));
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::ServiceUnavailable(
                "in-memory backend is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_auth_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AuthFailure::Network.into());
        }
        Ok(())
    }
}

#[async_trait]
impl FleetStore for InMemoryBackend {
    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        self.ensure_available()?;
        Ok(self.vehicles.read().await.clone())
    }

    async fn get_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        self.ensure_available()?;
        Ok(self.vehicles.read().await.iter().find(|v| v.id == id).cloned())
    }

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        self.ensure_available()?;
        self.vehicles.write().await.push(vehicle.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.emit(Table::Vehicles, ChangeKind::Insert, Some(vehicle.id));
        Ok(vehicle.clone())
    }

    async fn update_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        self.ensure_available()?;
        {
            let mut vehicles = self.vehicles.write().await;
            let slot = vehicles
                .iter_mut()
                .find(|v| v.id == vehicle.id)
                .ok_or_else(|| not_found_error("Vehicle", &vehicle.id.to_string()))?;
            *slot = vehicle.clone();
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.emit(Table::Vehicles, ChangeKind::Update, Some(vehicle.id));
        Ok(vehicle.clone())
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        self.ensure_available()?;
        let mut bookings = self.bookings.read().await.clone();
        bookings.sort_by_key(|b| b.rental_date);
        Ok(bookings)
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()> {
        self.ensure_available()?;
        self.profiles.write().await.insert(profile.id, profile.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.emit(Table::Profiles, ChangeKind::Insert, Some(profile.id));
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for InMemoryBackend {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> AppResult<String> {
        self.ensure_available()?;
        self.objects.write().await.insert(path.to_string(), bytes);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}/{}", self.public_url_base, path))
    }
}

#[async_trait]
impl AuthProvider for InMemoryBackend {
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> AppResult<AuthUser> {
        self.ensure_auth_available()?;
        let key = email.to_lowercase();
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(AuthFailure::EmailInUse.into());
        }
        if password.chars().count() < 6 {
            return Err(AuthFailure::WeakPassword.into());
        }

        let user = AuthUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: Some(full_name.to_string()),
        };
        accounts.insert(
            key,
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        self.ensure_auth_available()?;
        let account = self
            .accounts
            .read()
            .await
            .get(&email.to_lowercase())
            .cloned()
            .filter(|account| account.password == password)
            .ok_or(AuthFailure::InvalidCredentials)?;

        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(token.clone(), account.user.clone());

        Ok(Session {
            access_token: token,
            refresh_token: None,
            expires_at: Utc::now() + Duration::hours(1),
            user: account.user,
        })
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.ensure_auth_available()?;
        self.sessions.write().await.remove(access_token);
        Ok(())
    }

    async fn user_for_token(&self, access_token: &str) -> AppResult<Option<AuthUser>> {
        self.ensure_auth_available()?;
        Ok(self.sessions.read().await.get(access_token).cloned())
    }
}

#[async_trait]
impl ChangeFeed for InMemoryBackend {
    async fn subscribe(&self, filters: Vec<ChangeFilter>) -> AppResult<ChangeStream> {
        let mut events = self.events.subscribe();
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    received = events.recv() => match received {
                        Ok(event) => {
                            if any_matches(&filters, &event) && tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!("Suscripción en memoria perdió {} eventos", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::BookingStatus;
    use chrono::NaiveDate;

    fn booking(start: (i32, u32, u32), end: (i32, u32, u32)) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            customer_name: "Test".to_string(),
            customer_phone: None,
            vehicle_make: "Toyota".to_string(),
            vehicle_model: "Vios".to_string(),
            rental_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            return_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            status: BookingStatus::Pending,
            total_amount: None,
        }
    }

    #[tokio::test]
    async fn test_bookings_listed_by_start_date() {
        let backend = InMemoryBackend::new();
        backend.insert_booking(booking((2024, 8, 5), (2024, 8, 6))).await;
        backend.insert_booking(booking((2024, 8, 1), (2024, 8, 2))).await;

        let listed = backend.list_bookings().await.unwrap();
        assert_eq!(listed[0].rental_date, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        assert_eq!(listed[1].rental_date, NaiveDate::from_ymd_opt(2024, 8, 5).unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_backend_fails_reads() {
        let backend = InMemoryBackend::new();
        backend.set_unavailable(true);
        assert!(backend.list_bookings().await.is_err());
        assert!(matches!(
            backend.sign_in("a@b.co", "secret").await,
            Err(AppError::Auth(AuthFailure::Network))
        ));
    }

    #[tokio::test]
    async fn test_subscription_filters_events() {
        let backend = InMemoryBackend::new();
        let mut stream = backend
            .subscribe(vec![ChangeFilter::only(Table::Bookings, ChangeKind::Delete)])
            .await
            .unwrap();

        let b = booking((2024, 8, 1), (2024, 8, 2));
        let id = b.id;
        backend.insert_booking(b).await;
        backend.delete_booking(id).await;

        let event = stream.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Delete);
        assert_eq!(event.id, Some(id));
    }

    #[tokio::test]
    async fn test_auth_round_trip() {
        let backend = InMemoryBackend::new();
        let user = backend.sign_up("ops@fleet.ph", "secret1", "Ops").await.unwrap();
        assert!(matches!(
            backend.sign_up("OPS@fleet.ph", "secret1", "Ops").await,
            Err(AppError::Auth(AuthFailure::EmailInUse))
        ));

        let session = backend.sign_in("ops@fleet.ph", "secret1").await.unwrap();
        assert_eq!(session.user, user);
        assert_eq!(
            backend.user_for_token(&session.access_token).await.unwrap(),
            Some(user)
        );

        backend.sign_out(&session.access_token).await.unwrap();
        assert_eq!(backend.user_for_token(&session.access_token).await.unwrap(), None);
    }
}
