// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::application::replay_service::ReplayService;
use crate::application::session::SessionRegistry;
use crate::domain::telemetry::ChartSelection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub replay_service: ReplayService,
    pub chart_service: ChartService,
    pub sessions: Arc<SessionRegistry>,
    pub default_selection: ChartSelection,
}
