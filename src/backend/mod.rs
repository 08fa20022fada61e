//! Backend del producto
//!
//! Capacidades que el servicio necesita del backend gestionado, cada una
//! detrás de un trait: filas (vehículos, reservas, perfiles), subida de
//! objetos, sesiones de email/contraseña y notificaciones de cambios por
//! tabla. `Backend` agrupa las implementaciones y se construye una sola vez
//! en el arranque para inyectarse en los servicios.

pub mod memory;
pub mod pg_changes;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::auth::{AuthUser, Session, UserProfile};
use crate::models::booking::Booking;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppResult;

pub use memory::InMemoryBackend;

/// Tablas que emiten notificaciones de cambio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Vehicles,
    Bookings,
    Profiles,
}

/// Tipo de evento de una notificación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Notificación de cambio de una fila
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: Table,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(default)]
    pub id: Option<Uuid>,
}

impl ChangeEvent {
    pub fn new(table: Table, kind: ChangeKind, id: Option<Uuid>) -> Self {
        Self { table, kind, id }
    }
}

/// Filtro de suscripción: una tabla y, opcionalmente, un tipo de evento.
/// Sin tipo equivale a `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeFilter {
    pub table: Table,
    pub kind: Option<ChangeKind>,
}

impl ChangeFilter {
    pub fn all(table: Table) -> Self {
        Self { table, kind: None }
    }

    pub fn only(table: Table, kind: ChangeKind) -> Self {
        Self {
            table,
            kind: Some(kind),
        }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        self.table == event.table && self.kind.map_or(true, |kind| kind == event.kind)
    }
}

/// `true` si algún filtro acepta el evento
pub fn any_matches(filters: &[ChangeFilter], event: &ChangeEvent) -> bool {
    filters.iter().any(|f| f.matches(event))
}

/// Flujo de eventos de una suscripción. Soltar el receptor cancela la
/// suscripción en el backend.
pub type ChangeStream = mpsc::Receiver<ChangeEvent>;

/// CRUD de filas
#[async_trait]
pub trait FleetStore: Send + Sync {
    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>>;

    async fn get_vehicle(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    async fn insert_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;

    async fn update_vehicle(&self, vehicle: &Vehicle) -> AppResult<Vehicle>;

    /// Todas las reservas, ordenadas por fecha de inicio ascendente
    async fn list_bookings(&self) -> AppResult<Vec<Booking>>;

    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()>;
}

/// Almacenamiento de objetos binarios
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Sube el objeto y devuelve una URL pública para recuperarlo
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String>;
}

/// Sesiones de email y contraseña
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> AppResult<AuthUser>;

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session>;

    async fn sign_out(&self, access_token: &str) -> AppResult<()>;

    /// Usuario dueño del token, o `None` si la sesión no es válida
    async fn user_for_token(&self, access_token: &str) -> AppResult<Option<AuthUser>>;
}

/// Notificaciones de cambios por tabla
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    async fn subscribe(&self, filters: Vec<ChangeFilter>) -> AppResult<ChangeStream>;
}

/// Handle del backend que se pasa a cada servicio al construirlo
#[derive(Clone)]
pub struct Backend {
    pub store: Arc<dyn FleetStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub auth: Arc<dyn AuthProvider>,
    pub changes: Arc<dyn ChangeFeed>,
}

impl Backend {
    /// Backend completamente en memoria (tests y desarrollo local)
    pub fn in_memory(memory: Arc<InMemoryBackend>) -> Self {
        Self {
            store: memory.clone(),
            storage: memory.clone(),
            auth: memory.clone(),
            changes: memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matching() {
        let insert = ChangeEvent::new(Table::Bookings, ChangeKind::Insert, None);
        let vehicle_update = ChangeEvent::new(Table::Vehicles, ChangeKind::Update, None);

        assert!(ChangeFilter::all(Table::Bookings).matches(&insert));
        assert!(!ChangeFilter::all(Table::Bookings).matches(&vehicle_update));
        assert!(ChangeFilter::only(Table::Bookings, ChangeKind::Insert).matches(&insert));
        assert!(!ChangeFilter::only(Table::Bookings, ChangeKind::Delete).matches(&insert));

        let filters = [ChangeFilter::all(Table::Vehicles), ChangeFilter::all(Table::Bookings)];
        assert!(any_matches(&filters, &insert));
        assert!(any_matches(&filters, &vehicle_update));
    }

    #[test]
    fn test_event_payload_from_trigger() {
        let event: ChangeEvent = serde_json::from_str(
            r#"{"table":"bookings","type":"DELETE","id":"550e8400-e29b-41d4-a716-446655440000"}"#,
        )
        .unwrap();
        assert_eq!(event.table, Table::Bookings);
        assert_eq!(event.kind, ChangeKind::Delete);
        assert!(event.id.is_some());
    }
}
