use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use fleet_rental::backend::pg_changes::PgChangeFeed;
use fleet_rental::backend::postgres::PostgresStore;
use fleet_rental::backend::{Backend, ChangeFilter, InMemoryBackend, Table};
use fleet_rental::clients::{SupabaseAuthClient, SupabaseStorageClient};
use fleet_rental::config::database::mask_database_url;
use fleet_rental::config::{BackendKind, EnvironmentConfig};
use fleet_rental::realtime::Subscription;
use fleet_rental::routes::create_router;
use fleet_rental::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("invalid configuration")?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(if config.is_development() {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    info!("🚗 Fleet Rental - API de gestión de flota");
    info!("==========================================");

    let backend = build_backend(&config).await?;
    let state = AppState::new(config.clone(), backend.clone());

    // Suscripciones: el calendario sólo depende de reservas, el dashboard
    // de reservas y vehículos
    let mut calendar_sub = Subscription::new(
        backend.changes.clone(),
        vec![ChangeFilter::all(Table::Bookings)],
        state.calendar.clone(),
    );
    let mut dashboard_sub = Subscription::new(
        backend.changes.clone(),
        vec![
            ChangeFilter::all(Table::Vehicles),
            ChangeFilter::all(Table::Bookings),
        ],
        state.dashboard.clone(),
    );
    calendar_sub.start().await?;
    dashboard_sub.start().await?;

    let app = create_router(state);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("invalid HOST/PORT '{}'", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   POST /api/auth/signup | /api/auth/login | /api/auth/logout");
    info!("   GET  /api/auth/session");
    info!("   GET|POST /api/vehicles  GET|PUT /api/vehicles/:id");
    info!("   GET  /api/bookings?status=&period=");
    info!("   GET  /api/calendar  GET /api/calendar/:date  POST /api/calendar/refresh");
    info!("   GET  /api/dashboard  POST /api/dashboard/refresh");
    info!("   GET  /api/reports?period=today|weekly|monthly");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    calendar_sub.stop().await;
    dashboard_sub.stop().await;

    info!("👋 Servidor terminado");
    Ok(())
}

async fn build_backend(config: &EnvironmentConfig) -> Result<Backend> {
    match config.backend {
        BackendKind::Memory => {
            info!("🧪 Backend en memoria (los datos no persisten)");
            Ok(Backend::in_memory(Arc::new(InMemoryBackend::new())))
        }
        BackendKind::Supabase => {
            let supabase = config
                .supabase
                .as_ref()
                .ok_or_else(|| anyhow!("missing Supabase configuration"))?;

            info!(
                "🗄️ Conectando a {}",
                mask_database_url(&supabase.database.url)
            );
            let pool = supabase
                .database
                .create_pool()
                .await
                .context("error conectando a la base de datos")?;
            info!("✅ Base de datos conectada");

            let auth = SupabaseAuthClient::new(supabase.url.clone(), supabase.anon_key.clone())?;
            let storage = SupabaseStorageClient::new(
                supabase.url.clone(),
                supabase.anon_key.clone(),
                config.storage_bucket.clone(),
            )?;

            Ok(Backend {
                store: Arc::new(PostgresStore::new(pool.clone())),
                storage: Arc::new(storage),
                auth: Arc::new(auth),
                changes: Arc::new(PgChangeFeed::new(pool)),
            })
        }
    }
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
