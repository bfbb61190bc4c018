// Playback sessions - one controller per viewer, driven by a tokio frame loop
use crate::application::controls::Command;
use crate::application::playback_controller::{ControlError, FrameOutcome, PlaybackController};
use crate::application::resolver::Resolver;
use crate::application::sink::Sink;
use crate::domain::dashboard::DashboardFrame;
use crate::domain::playback::PlaybackPhase;
use crate::domain::telemetry::ChartSelection;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Builds the sinks a new session renders into
pub type SinkFactory = Arc<dyn Fn(&Arc<Resolver>) -> Vec<Box<dyn Sink>> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub frame_interval: Duration,
    pub default_speed: f64,
    pub selection: ChartSelection,
    pub max_radius: usize,
    /// Sessions without a stream and without requests for this long are dropped
    pub idle_timeout: Duration,
}

/// Running frame loop plus a generation so a finished loop only clears itself
#[derive(Default)]
struct FrameLoopSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

pub struct PlaybackSession {
    id: u64,
    controller: Mutex<PlaybackController>,
    frames: watch::Sender<Arc<DashboardFrame>>,
    frame_loop: std::sync::Mutex<FrameLoopSlot>,
    last_active: std::sync::Mutex<Instant>,
    frame_interval: Duration,
    max_radius: usize,
}

fn lock_or_recover<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl PlaybackSession {
    fn new(id: u64, controller: PlaybackController, settings: &SessionSettings) -> Self {
        let (frames, _) = watch::channel(Arc::new(controller.frame()));
        Self {
            id,
            controller: Mutex::new(controller),
            frames,
            frame_loop: std::sync::Mutex::new(FrameLoopSlot::default()),
            last_active: std::sync::Mutex::new(Instant::now()),
            frame_interval: settings.frame_interval,
            max_radius: settings.max_radius,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardFrame>> {
        self.touch();
        self.frames.subscribe()
    }

    pub fn current_frame(&self) -> Arc<DashboardFrame> {
        self.frames.borrow().clone()
    }

    fn touch(&self) {
        *lock_or_recover(&self.last_active) = Instant::now();
    }

    /// No open stream and no request within `timeout` of `now`
    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        self.frames.receiver_count() == 0
            && now.saturating_duration_since(*lock_or_recover(&self.last_active)) >= timeout
    }

    /// Apply a viewer command, publish the resulting frame and start or
    /// cancel the frame loop to match the new phase.
    pub async fn apply(self: &Arc<Self>, command: Command) -> Result<Arc<DashboardFrame>, ControlError> {
        self.touch();
        let command = match command {
            Command::SetSmoothing { radius } => Command::SetSmoothing {
                radius: radius.min(self.max_radius),
            },
            other => other,
        };

        // The loop slot is only changed while the controller is locked, so the
        // phase and the running loop cannot disagree between two commands.
        let mut controller = self.controller.lock().await;
        controller.apply(command)?;
        let frame = Arc::new(controller.frame());
        self.frames.send_replace(Arc::clone(&frame));

        if controller.phase() == PlaybackPhase::Playing {
            self.ensure_frame_loop();
        } else {
            self.cancel_frame_loop();
        }
        Ok(frame)
    }

    fn ensure_frame_loop(self: &Arc<Self>) {
        let mut slot = lock_or_recover(&self.frame_loop);
        let running = slot.handle.as_ref().is_some_and(|handle| !handle.is_finished());
        if !running {
            slot.generation += 1;
            tracing::debug!("Starting frame loop {} for session {}", slot.generation, self.id);
            slot.handle = Some(tokio::spawn(run_frame_loop(Arc::clone(self), slot.generation)));
        }
    }

    fn cancel_frame_loop(&self) {
        let mut slot = lock_or_recover(&self.frame_loop);
        if let Some(handle) = slot.handle.take() {
            if !handle.is_finished() {
                tracing::debug!("Cancelling frame loop for session {}", self.id);
            }
            handle.abort();
        }
    }

    /// Called by an exiting loop with the controller still locked
    fn release_frame_loop(&self, generation: u64) {
        let mut slot = lock_or_recover(&self.frame_loop);
        if slot.generation == generation {
            slot.handle = None;
        }
    }

    #[cfg(test)]
    fn frame_loop_running(&self) -> bool {
        lock_or_recover(&self.frame_loop)
            .handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// Feed measured frame time to the controller until it stops playing
async fn run_frame_loop(session: Arc<PlaybackSession>, generation: u64) {
    let mut ticker = tokio::time::interval(session.frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;
    let mut last_tick = Instant::now();

    loop {
        ticker.tick().await;
        let now = Instant::now();
        let elapsed = now.duration_since(last_tick);
        last_tick = now;

        let mut controller = session.controller.lock().await;
        match controller.advance(elapsed) {
            FrameOutcome::Idle => {
                session.release_frame_loop(generation);
                break;
            }
            FrameOutcome::Continued { rendered } => {
                if rendered {
                    session.frames.send_replace(Arc::new(controller.frame()));
                }
            }
            FrameOutcome::Finished => {
                session.frames.send_replace(Arc::new(controller.frame()));
                session.release_frame_loop(generation);
                break;
            }
        }
    }
    tracing::debug!("Frame loop {} for session {} exited", generation, session.id);
}

pub struct SessionRegistry {
    resolver: Arc<Resolver>,
    sink_factory: SinkFactory,
    settings: SessionSettings,
    sessions: RwLock<HashMap<u64, Arc<PlaybackSession>>>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new(resolver: Arc<Resolver>, sink_factory: SinkFactory, settings: SessionSettings) -> Self {
        Self {
            resolver,
            sink_factory,
            settings,
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub async fn create(&self) -> Arc<PlaybackSession> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let sinks = (self.sink_factory)(&self.resolver);
        let mut controller =
            PlaybackController::new(Arc::clone(&self.resolver), sinks, self.settings.default_speed);
        let mut selection = self.settings.selection;
        selection.radius = selection.radius.min(self.settings.max_radius);
        controller.select_chart(selection);

        let session = Arc::new(PlaybackSession::new(id, controller, &self.settings));
        self.sessions.write().await.insert(id, Arc::clone(&session));
        tracing::info!("Created playback session {}", id);
        session
    }

    pub async fn get(&self, id: u64) -> Option<Arc<PlaybackSession>> {
        let session = self.sessions.read().await.get(&id).cloned();
        if let Some(session) = &session {
            session.touch();
        }
        session
    }

    pub async fn remove(&self, id: u64) -> bool {
        match self.sessions.write().await.remove(&id) {
            Some(session) => {
                session.cancel_frame_loop();
                tracing::info!("Closed playback session {}", id);
                true
            }
            None => false,
        }
    }

    /// Drop every session idle at `now`; returns how many were dropped
    pub async fn reap_idle(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<u64> = sessions
            .iter()
            .filter(|(_, session)| session.is_idle(now, self.settings.idle_timeout))
            .map(|(id, _)| *id)
            .collect();
        for id in &idle {
            if let Some(session) = sessions.remove(id) {
                session.cancel_frame_loop();
            }
        }
        if !idle.is_empty() {
            tracing::info!("Dropped {} idle playback sessions: {:?}", idle.len(), idle);
        }
        idle.len()
    }

    /// Periodically drop sessions whose viewer went away
    pub fn spawn_reaper(self: &Arc<Self>) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        let period = (self.settings.idle_timeout / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                registry.reap_idle(Instant::now()).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::resolver::tests::sample_resolver;
    use crate::presentation::sinks::{SinkSettings, build_sinks};

    fn registry() -> SessionRegistry {
        let sink_settings = SinkSettings::default();
        let factory: SinkFactory =
            Arc::new(move |resolver: &Arc<Resolver>| build_sinks(&sink_settings, resolver));
        SessionRegistry::new(
            Arc::new(sample_resolver()),
            factory,
            SessionSettings {
                frame_interval: Duration::from_millis(5),
                default_speed: 1.0,
                selection: ChartSelection::default(),
                max_radius: 3,
                idle_timeout: Duration::from_secs(60),
            },
        )
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = registry();
        let a = registry.create().await;
        let b = registry.create().await;
        assert_ne!(a.id(), b.id());

        a.apply(Command::Seek { second: 120 }).await.unwrap();
        assert_eq!(a.current_frame().state.current_second, 120);
        assert_eq!(b.current_frame().state.current_second, 100);

        assert!(registry.remove(a.id()).await);
        assert!(registry.get(a.id()).await.is_none());
        assert!(registry.get(b.id()).await.is_some());
    }

    #[tokio::test]
    async fn test_smoothing_radius_is_capped() {
        let registry = registry();
        let session = registry.create().await;
        session.apply(Command::SetSmoothing { radius: 40 }).await.unwrap();
        let controller = session.controller.lock().await;
        assert_eq!(controller.selection().radius, 3);
    }

    #[tokio::test]
    async fn test_frame_loop_plays_to_end() {
        let registry = registry();
        let session = registry.create().await;
        let mut frames = session.subscribe();
        session.apply(Command::SetSpeed { multiplier: 1_000.0 }).await.unwrap();
        session.apply(Command::Play).await.unwrap();

        let finished = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if frames.changed().await.is_err() {
                    return false;
                }
                let frame = frames.borrow_and_update().clone();
                if frame.state.phase == PlaybackPhase::Paused {
                    return frame.state.current_second == 140;
                }
            }
        })
        .await
        .unwrap();
        assert!(finished);
    }

    #[tokio::test]
    async fn test_pause_cancels_frame_loop() {
        let registry = registry();
        let session = registry.create().await;
        session.apply(Command::Play).await.unwrap();
        session.apply(Command::Pause).await.unwrap();
        let paused_at = session.current_frame().state.current_second;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.current_frame().state.current_second, paused_at);
        assert_eq!(session.current_frame().state.phase, PlaybackPhase::Paused);
    }

    #[tokio::test]
    async fn test_invalid_command_keeps_state() {
        let registry = registry();
        let session = registry.create().await;
        let result = session.apply(Command::SetSpeed { multiplier: -1.0 }).await;
        assert!(result.is_err());
        assert_eq!(session.current_frame().state.speed_multiplier, 1.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_frame_loop_follows_phase_under_concurrent_commands() {
        let registry = registry();
        let session = registry.create().await;

        for _ in 0..200 {
            let pausing = Arc::clone(&session);
            let playing = Arc::clone(&session);
            let pause = tokio::spawn(async move { pausing.apply(Command::Pause).await });
            let play = tokio::spawn(async move { playing.apply(Command::Play).await });
            pause.await.unwrap().unwrap();
            play.await.unwrap().unwrap();

            let controller = session.controller.lock().await;
            assert_eq!(
                controller.phase() == PlaybackPhase::Playing,
                session.frame_loop_running()
            );
        }
    }

    #[tokio::test]
    async fn test_play_again_after_reaching_end() {
        let registry = registry();
        let session = registry.create().await;
        session.apply(Command::SetSpeed { multiplier: 1_000.0 }).await.unwrap();

        for _ in 0..2 {
            session.apply(Command::Seek { second: 100 }).await.unwrap();
            let mut frames = session.subscribe();
            session.apply(Command::Play).await.unwrap();
            let ended = tokio::time::timeout(Duration::from_secs(5), async {
                loop {
                    frames.changed().await.unwrap();
                    let frame = frames.borrow_and_update().clone();
                    if frame.state.phase == PlaybackPhase::Paused {
                        return frame.state.current_second;
                    }
                }
            })
            .await
            .unwrap();
            assert_eq!(ended, 140);
            let _controller = session.controller.lock().await;
            assert!(!session.frame_loop_running());
        }
    }

    #[tokio::test]
    async fn test_idle_sessions_are_released() {
        let registry = registry();
        let watched = registry.create().await;
        let abandoned = registry.create().await;
        let stream = watched.subscribe();

        let now = Instant::now();
        assert_eq!(registry.reap_idle(now).await, 0);

        let later = now + Duration::from_secs(61);
        assert_eq!(registry.reap_idle(later).await, 1);
        assert!(registry.get(abandoned.id()).await.is_none());
        assert!(registry.get(watched.id()).await.is_some());

        drop(stream);
        assert_eq!(registry.reap_idle(later + Duration::from_secs(61)).await, 1);
        assert!(registry.get(watched.id()).await.is_none());
    }
}
