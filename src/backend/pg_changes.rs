//! Notificaciones de cambios vía LISTEN/NOTIFY
//!
//! El trigger `notify_fleet_change` (ver `migrations/`) publica en el canal
//! `fleet_changes` un JSON `{table, type, id}` por cada fila modificada.
//! Cada suscripción abre su propio `PgListener`; se cierra cuando el
//! receptor del `ChangeStream` se suelta.
//!
//! Las notificaciones enviadas mientras la conexión está caída se pierden.
//! Al detectar la caída se emite un evento sintético por tabla suscrita
//! para que el destino relea todo.

use async_trait::async_trait;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{any_matches, ChangeEvent, ChangeFeed, ChangeFilter, ChangeKind, ChangeStream, Table};
use crate::utils::errors::AppResult;

pub const CHANGES_CHANNEL: &str = "fleet_changes";

const EVENT_BUFFER: usize = 64;

pub struct PgChangeFeed {
    pool: PgPool,
}

impl PgChangeFeed {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Un evento por tabla suscrita, aceptado por los filtros
fn resync_events(filters: &[ChangeFilter]) -> Vec<ChangeEvent> {
    let mut tables: Vec<Table> = Vec::new();
    let mut events = Vec::new();
    for filter in filters {
        if tables.contains(&filter.table) {
            continue;
        }
        tables.push(filter.table);
        let kind = filter.kind.unwrap_or(ChangeKind::Update);
        events.push(ChangeEvent::new(filter.table, kind, None));
    }
    events
}

#[async_trait]
impl ChangeFeed for PgChangeFeed {
    async fn subscribe(&self, filters: Vec<ChangeFilter>) -> AppResult<ChangeStream> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(CHANGES_CHANNEL).await?;
        info!("📡 Escuchando cambios en '{}' ({} filtros)", CHANGES_CHANNEL, filters.len());

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        tokio::spawn(async move {
            'listen: loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    received = listener.try_recv() => match received {
                        Ok(Some(notification)) => {
                            let event = match serde_json::from_str::<ChangeEvent>(notification.payload()) {
                                Ok(event) => event,
                                Err(e) => {
                                    warn!("⚠️ Payload de cambio inválido '{}': {}", notification.payload(), e);
                                    continue;
                                }
                            };
                            if any_matches(&filters, &event) && tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Ok(None) => {
                            // La siguiente llamada reconecta; lo ocurrido entre medias se relee
                            warn!("⚠️ Conexión de '{}' perdida, forzando relectura", CHANGES_CHANNEL);
                            for event in resync_events(&filters) {
                                if tx.send(event).await.is_err() {
                                    break 'listen;
                                }
                            }
                        }
                        Err(e) => {
                            warn!("⚠️ Error recibiendo notificación: {}", e);
                            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                        }
                    },
                }
            }
            debug!("Suscripción a '{}' cerrada", CHANGES_CHANNEL);
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resync_events_one_per_table() {
        let filters = vec![
            ChangeFilter::all(Table::Vehicles),
            ChangeFilter::only(Table::Bookings, ChangeKind::Insert),
            ChangeFilter::only(Table::Bookings, ChangeKind::Delete),
        ];

        let events = resync_events(&filters);
        assert_eq!(
            events,
            vec![
                ChangeEvent::new(Table::Vehicles, ChangeKind::Update, None),
                ChangeEvent::new(Table::Bookings, ChangeKind::Insert, None),
            ]
        );
        assert!(events.iter().all(|e| any_matches(&filters, e)));
    }

    #[test]
    fn test_resync_events_without_filters() {
        assert!(resync_events(&[]).is_empty());
    }

    #[test]
    fn test_notification_payload_shape() {
        let event: ChangeEvent = serde_json::from_str(
            r#"{"table":"bookings","type":"DELETE","id":"6f1c2b1e-8d1a-4f0e-9b7a-0c2d3e4f5a6b"}"#,
        )
        .unwrap();
        assert_eq!(event.table, Table::Bookings);
        assert_eq!(event.kind, ChangeKind::Delete);
        assert!(event.id.is_some());
    }
}
