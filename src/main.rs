// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::ChartService;
use crate::application::replay_service::ReplayService;
use crate::application::resolver::Resolver;
use crate::application::session::{SessionRegistry, SessionSettings, SinkFactory};
use crate::application::source_repository::SourceRepository;
use crate::infrastructure::config::{SourceKind, load_replay_config};
use crate::infrastructure::file_repository::FileSourceRepository;
use crate::infrastructure::http_repository::HttpSourceRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    chart, create_session, delete_session, frame, health_check, overview, session_command,
    session_key, session_stream, weather,
};
use crate::presentation::sinks::{SinkSettings, build_sinks};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_replay_config().context("Failed to load replay configuration")?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn SourceRepository> = match config.sources.kind {
        SourceKind::File => Arc::new(FileSourceRepository::new(&config.sources)),
        SourceKind::Http => Arc::new(HttpSourceRepository::new(&config.sources)),
    };
    tracing::info!("Loading recording from {:?} source {}", config.sources.kind, config.sources.base);

    // Load the recording once; every session shares the same resolver
    let resolver = Arc::new(ReplayService::load_dataset(repository.as_ref()).await?);

    // Create services (application layer)
    let replay_service = ReplayService::new(Arc::clone(&resolver), config.playback.speed_options.clone());
    let chart_service = ChartService::new(
        Arc::clone(&resolver),
        config.chart.max_radius,
        config.chart.range_padding,
    );

    let sink_settings = SinkSettings::from_config(&config);
    let sink_factory: SinkFactory =
        Arc::new(move |resolver: &Arc<Resolver>| build_sinks(&sink_settings, resolver));
    let sessions = SessionRegistry::new(
        resolver,
        sink_factory,
        SessionSettings {
            frame_interval: config.playback.frame_interval(),
            default_speed: config.playback.default_speed,
            selection: config.chart.selection(),
            max_radius: config.chart.max_radius,
            idle_timeout: config.playback.session_idle_timeout(),
        },
    );
    let sessions = Arc::new(sessions);
    sessions.spawn_reaper();

    // Create application state
    let state = Arc::new(AppState {
        replay_service,
        chart_service,
        sessions,
        default_selection: config.chart.selection(),
    });

    // Build router (presentation layer)
    // Responses are compressed by hand, so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/overview", get(overview))
        .route("/frame", get(frame))
        .route("/chart", get(chart))
        .route("/weather", get(weather))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", axum::routing::delete(delete_session))
        .route("/sessions/:id/commands", post(session_command))
        .route("/sessions/:id/keys", post(session_key))
        .route("/sessions/:id/stream", get(session_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!("Starting flight-replay service on {}", config.server.bind);

    axum::serve(listener, router).await?;

    Ok(())
}
