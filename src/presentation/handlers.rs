// HTTP request handlers
use crate::application::controls::{Command, KeyInput, map_key};
use crate::application::session::PlaybackSession;
use crate::domain::dashboard::DashboardFrame;
use crate::domain::telemetry::{Channel, ChartSelection};
use crate::infrastructure::chunked_json::stream_from_watch;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct FrameQuery {
    pub t: i64,
}

#[derive(Deserialize)]
pub struct ChartQuery {
    pub left: Option<Channel>,
    pub right: Option<Channel>,
    pub radius: Option<usize>,
    /// Inclusive time window in seconds of day
    pub from: Option<i64>,
    pub to: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub id: u64,
    pub frame: Arc<DashboardFrame>,
}

async fn respond<T: Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn find_session(state: &AppState, id: u64) -> Result<Arc<PlaybackSession>, Response> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown session {}", id)).into_response())
}

async fn run_command(session: &Arc<PlaybackSession>, command: Command, headers: &HeaderMap) -> Response {
    match session.apply(command).await {
        Ok(frame) => respond(&frame, headers).await,
        Err(e) => {
            tracing::warn!("Rejected command for session {}: {}", session.id(), e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Time axis, scrub-bar markers, path and gauge units
pub async fn overview(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    respond(&state.replay_service.overview(), &headers).await
}

/// Tower weather observations; empty when no brief was loaded
pub async fn weather(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    respond(&state.replay_service.weather(), &headers).await
}

/// Stateless resolution of one second
pub async fn frame(
    Query(query): Query<FrameQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    respond(&state.replay_service.snapshot_at(query.t), &headers).await
}

/// Raw and smoothed series for the selected channels
pub async fn chart(
    Query(query): Query<ChartQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let defaults = state.default_selection;
    let selection = ChartSelection {
        left: query.left.unwrap_or(defaults.left),
        right: query.right.unwrap_or(defaults.right),
        radius: query.radius.unwrap_or(defaults.radius),
    };
    respond(&state.chart_service.build(selection, query.from, query.to), &headers).await
}

pub async fn create_session(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.sessions.create().await;
    let created = SessionCreated {
        id: session.id(),
        frame: session.current_frame(),
    };
    respond(&created, &headers).await
}

pub async fn session_command(
    Path(id): Path<u64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(command): Json<Command>,
) -> impl IntoResponse {
    match find_session(&state, id).await {
        Ok(session) => run_command(&session, command, &headers).await,
        Err(response) => response,
    }
}

/// Keyboard shortcut; keys without a binding return the current frame unchanged
pub async fn session_key(
    Path(id): Path<u64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(input): Json<KeyInput>,
) -> impl IntoResponse {
    let session = match find_session(&state, id).await {
        Ok(session) => session,
        Err(response) => return response,
    };
    match map_key(&input) {
        Some(command) => run_command(&session, command, &headers).await,
        None => respond(&session.current_frame(), &headers).await,
    }
}

/// Stream every frame the session renders (progressive, length-prefixed chunks)
pub async fn session_stream(
    Path(id): Path<u64>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match find_session(&state, id).await {
        Ok(session) => stream_from_watch(session.subscribe(), accepts_brotli(&headers)).into_response(),
        Err(response) => response,
    }
}

pub async fn delete_session(Path(id): Path<u64>, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.sessions.remove(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::chart_service::ChartService;
    use crate::application::replay_service::ReplayService;
    use crate::application::resolver::Resolver;
    use crate::application::resolver::tests::sample_resolver;
    use crate::application::session::{SessionRegistry, SessionSettings, SinkFactory};
    use crate::presentation::sinks::{SinkSettings, build_sinks};
    use std::time::Duration;

    fn state() -> Arc<AppState> {
        let resolver = Arc::new(sample_resolver());
        let sink_settings = SinkSettings::default();
        let factory: SinkFactory =
            Arc::new(move |resolver: &Arc<Resolver>| build_sinks(&sink_settings, resolver));
        let sessions = SessionRegistry::new(
            Arc::clone(&resolver),
            factory,
            SessionSettings {
                frame_interval: Duration::from_millis(16),
                default_speed: 1.0,
                selection: ChartSelection::default(),
                max_radius: 10,
                idle_timeout: Duration::from_secs(300),
            },
        );
        Arc::new(AppState {
            replay_service: ReplayService::new(Arc::clone(&resolver), vec![1.0, 2.0]),
            chart_service: ChartService::new(resolver, 10, 0.1),
            sessions: Arc::new(sessions),
            default_selection: ChartSelection::default(),
        })
    }

    #[tokio::test]
    async fn test_stateless_routes() {
        let state = state();
        assert_eq!(health_check().await, "ok");

        let response = overview(HeaderMap::new(), State(Arc::clone(&state))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = weather(HeaderMap::new(), State(Arc::clone(&state))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = frame(Query(FrameQuery { t: 120 }), HeaderMap::new(), State(Arc::clone(&state)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let query = ChartQuery {
            left: Some(Channel::Airspeed),
            right: None,
            radius: Some(50),
            from: Some(101),
            to: Some(111),
        };
        let response = chart(Query(query), HeaderMap::new(), State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let state = state();
        let response = create_session(HeaderMap::new(), State(Arc::clone(&state)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let id = 1;

        let response = session_command(
            Path(id),
            HeaderMap::new(),
            State(Arc::clone(&state)),
            Json(Command::Seek { second: 130 }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = session_command(
            Path(id),
            HeaderMap::new(),
            State(Arc::clone(&state)),
            Json(Command::SetSpeed { multiplier: 0.0 }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = session_key(
            Path(id),
            HeaderMap::new(),
            State(Arc::clone(&state)),
            Json(KeyInput::new("ArrowLeft", true, Default::default())),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let session = state.sessions.get(id).await.unwrap();
        assert_eq!(session.current_frame().state.current_second, 120);

        let response = delete_session(Path(id), State(Arc::clone(&state))).await.into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = session_stream(Path(id), HeaderMap::new(), State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
