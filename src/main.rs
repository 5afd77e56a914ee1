use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use transport_logistics::config::database::DatabaseConfig;
use transport_logistics::config::environment::EnvironmentConfig;
use transport_logistics::routes;
use transport_logistics::state::AppState;

/// Intervalo del latido SSE
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 Transport Logistics - Portal de contratos y flota");
    info!("====================================================");

    // Inicializar base de datos
    let db_config = DatabaseConfig::default();
    let pool = match db_config.create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let env_config = EnvironmentConfig::from_env();
    let app_state = AppState::new(pool, env_config.clone());

    // Latido SSE: empuja heartbeat a todos los clientes y poda
    // conexiones muertas en la misma pasada
    let stream = app_state.stream.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        interval.tick().await;
        loop {
            interval.tick().await;
            stream.heartbeat();
        }
    });

    let app = routes::create_router(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", env_config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Auth:");
    info!("   POST /api/auth/login - Login");
    info!("📝 Contratos:");
    info!("   POST /api/contracts - Registrar contrato con firma");
    info!("   GET  /api/contracts - Listar contratos (admin)");
    info!("   DELETE /api/contracts/:id - Eliminar contrato (admin)");
    info!("   GET  /api/contracts/check-lot/:lot - Chequeo de lote");
    info!("   GET  /api/contracts/check-phone/:phone - Chequeo de teléfono");
    info!("   GET  /api/contracts/by-phone/:phone - Historial por teléfono");
    info!("   GET  /api/contracts/stream - Stream SSE de contratos");
    info!("👥 Usuarios (admin):");
    info!("   POST /api/users - Crear usuario");
    info!("   GET  /api/users - Listar usuarios");
    info!("   GET  /api/users/:id - Obtener usuario");
    info!("   PUT  /api/users/:id - Actualizar usuario");
    info!("   DELETE /api/users/:id - Eliminar usuario");
    info!("🏢 Clientes (admin):");
    info!("   POST /api/clients - Crear cliente");
    info!("   GET  /api/clients - Listar clientes");
    info!("   GET  /api/clients/:id - Obtener cliente");
    info!("   PUT  /api/clients/:id - Actualizar cliente");
    info!("   DELETE /api/clients/:id - Eliminar cliente");
    info!("🧑‍✈️ Conductores (admin/partner):");
    info!("   POST /api/drivers - Crear conductor (User+Driver transaccional)");
    info!("   GET  /api/drivers - Listar conductores");
    info!("   GET  /api/drivers/:id - Obtener conductor");
    info!("   PUT  /api/drivers/:id - Actualizar conductor");
    info!("   DELETE /api/drivers/:id - Eliminar conductor");
    info!("🚗 Vehículos:");
    info!("   POST /api/vehicles - Registrar vehículo");
    info!("   GET  /api/vehicles - Listar vehículos (según rol)");
    info!("   GET  /api/vehicles/:id - Obtener vehículo");
    info!("   PUT  /api/vehicles/:id - Actualizar vehículo");
    info!("   PATCH /api/vehicles/:id/status - Transición de estado");
    info!("   POST /api/vehicles/:id/photos/:slot - Subir foto de carga (1-4)");
    info!("   POST /api/vehicles/:id/comments - Agregar comentario de viaje");
    info!("   GET  /api/vehicles/:id/comments - Listar comentarios de viaje");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo (admin)");
    info!("🔔 Notificaciones:");
    info!("   GET  /api/notifications - Bandeja del usuario");
    info!("   PATCH /api/notifications/:id/read - Marcar como leída");
    info!("📋 Estados:");
    info!("   GET  /api/states - Catálogo de estados del pipeline");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!("Error del servidor: {}", e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
