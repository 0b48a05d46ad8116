//! # lumend — lumen daemon
//!
//! Composition root that wires the engine and adapters together and starts
//! the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Load the scene snapshot from disk
//! - Construct the virtual lights and the event bus
//! - Construct the scene engine, injecting adapters via port traits
//! - Pump light read-backs into the engine and tick it periodically
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod scenes;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use lumen_adapter_http_axum::router;
use lumen_adapter_http_axum::state::AppState;
use lumen_adapter_virtual::VirtualLights;
use lumen_app::engine::SceneEngine;
use lumen_app::event_bus::InProcessEventBus;
use lumen_app::ports::SystemClock;
use lumen_domain::command::LightReading;
use lumen_domain::id::EntityId;

use config::Config;

type Engine = SceneEngine<Arc<VirtualLights>, Arc<InProcessEventBus>, SystemClock>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Scene snapshot; the managed entities are the ones the scenes reference
    let definitions = scenes::load(&config.scenes.path)?;
    let entity_ids: Vec<EntityId> = definitions
        .iter()
        .flat_map(|definition| definition.entities.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(256));

    // Lights
    let simulated = if config.integrations.virtual_enabled {
        entity_ids.clone()
    } else {
        Vec::new()
    };
    let lights = Arc::new(VirtualLights::new(simulated, 64));

    // Engine
    let engine = Arc::new(SceneEngine::new(
        Arc::clone(&lights),
        Arc::clone(&event_bus),
        SystemClock,
    ));
    engine.register_entities(entity_ids).await;
    engine.replace_scenes(definitions).await?;

    // Background work: read-back pump and periodic evaluation
    tokio::spawn(pump_readings(
        Arc::clone(&engine),
        lights.subscribe_readings(),
    ));
    tokio::spawn(run_ticker(Arc::clone(&engine), config.engine.tick_seconds));

    // HTTP
    let state = AppState::from_arcs(Arc::clone(&engine), Arc::clone(&event_bus));
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, "lumend listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Forward read-backs from the lights into the engine.
async fn pump_readings(engine: Arc<Engine>, mut rx: broadcast::Receiver<LightReading>) {
    loop {
        match rx.recv().await {
            Ok(reading) => engine.observe_reading(reading).await,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "reading pump lagged, some readings were dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Evaluate every managed entity on a fixed cadence.
async fn run_ticker(engine: Arc<Engine>, tick_seconds: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(tick_seconds));
    loop {
        interval.tick().await;
        engine.tick().await;
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
