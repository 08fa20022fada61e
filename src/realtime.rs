//! Suscripciones en tiempo real
//!
//! Una `Subscription` escucha el feed de cambios del backend y, por cada
//! evento que pasa sus filtros, vuelve a leer la colección completa del
//! servicio destino. No aplica parches incrementales.
//!
//! Ciclo de vida: `start` abre la suscripción y hace una primera carga;
//! `stop` la cierra y espera a que la tarea termine. Tras `stop` ningún
//! evento vuelve a tocar el estado del servicio.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::backend::{ChangeFeed, ChangeFilter};
use crate::utils::errors::AppResult;

/// Servicio cuyo estado derivado se reconstruye desde el backend
#[async_trait]
pub trait Refreshable: Send + Sync {
    fn name(&self) -> &'static str;

    async fn refresh(&self) -> AppResult<()>;
}

pub struct Subscription {
    feed: Arc<dyn ChangeFeed>,
    filters: Vec<ChangeFilter>,
    target: Arc<dyn Refreshable>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(
        feed: Arc<dyn ChangeFeed>,
        filters: Vec<ChangeFilter>,
        target: Arc<dyn Refreshable>,
    ) -> Self {
        Self {
            feed,
            filters,
            target,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |task| !task.is_finished())
    }

    /// Abre la suscripción y carga el estado inicial.
    ///
    /// Un fallo de la carga inicial no impide escuchar: el servicio queda
    /// con su `last_error` y se recupera con el siguiente evento.
    pub async fn start(&mut self) -> AppResult<()> {
        if self.task.is_some() {
            return Ok(());
        }

        let mut stream = self.feed.subscribe(self.filters.clone()).await?;
        let target = self.target.clone();
        let name = target.name();

        if let Err(e) = target.refresh().await {
            warn!("⚠️ Carga inicial de '{}' falló: {}", name, e);
        }

        self.task = Some(tokio::spawn(async move {
            while let Some(event) = stream.recv().await {
                debug!("🔔 {:?} {:?} → refrescando '{}'", event.table, event.kind, name);
                match target.refresh().await {
                    Ok(()) => {}
                    // Caída transitoria: el siguiente evento vuelve a intentarlo
                    Err(e) if e.is_backend_failure() => {
                        warn!("⚠️ Backend no disponible refrescando '{}': {}", name, e)
                    }
                    Err(e) => error!("❌ Error refrescando '{}': {}", name, e),
                }
            }
            debug!("Feed de '{}' cerrado", name);
        }));

        info!("📡 Suscripción '{}' activa", name);
        Ok(())
    }

    /// Cierra la suscripción. Idempotente.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // Cancelled es el resultado esperado
            let _ = task.await;
            info!("🛑 Suscripción '{}' detenida", self.target.name());
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
