// Playback controller - Stopped / Paused / Playing state machine
use crate::application::controls::Command;
use crate::application::resolver::Resolver;
use crate::application::sink::{RenderContext, Sink, SinkGate};
use crate::domain::dashboard::DashboardFrame;
use crate::domain::playback::{PlaybackPhase, PlaybackState};
use crate::domain::telemetry::ChartSelection;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Smallest playhead advance per frame, in recorded seconds
const MIN_FRAME_ADVANCE_SECS: f64 = 1e-3;

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("playback speed must be a positive finite number, got {0}")]
    InvalidSpeed(f64),
}

/// Result of feeding one animation frame to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not playing; nothing happened
    Idle,
    /// Still playing; `rendered` is false when the playhead stayed on the same second
    Continued { rendered: bool },
    /// Reached the end of the axis and paused
    Finished,
}

/// Owns the playhead and the sinks. Every way of moving the playhead
/// (frame loop, scrub, step, stop) funnels through [`PlaybackController::update`].
pub struct PlaybackController {
    resolver: Arc<Resolver>,
    sinks: Vec<Box<dyn Sink>>,
    phase: PlaybackPhase,
    /// Fractional playhead; the current second is its floor
    position: f64,
    speed: f64,
    has_started: bool,
    last_processed: Option<i64>,
    selection: ChartSelection,
}

impl PlaybackController {
    pub fn new(resolver: Arc<Resolver>, sinks: Vec<Box<dyn Sink>>, speed: f64) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            tracing::warn!("Ignoring invalid default speed {}, using 1.0", speed);
            1.0
        };
        let t_min = resolver.axis().t_min;
        let mut controller = Self {
            resolver,
            sinks,
            phase: PlaybackPhase::Stopped,
            position: t_min as f64,
            speed,
            has_started: false,
            last_processed: None,
            selection: ChartSelection::default(),
        };
        controller.reset_sinks();
        controller.update(t_min, true);
        controller
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            phase: self.phase,
            current_second: self.current_second(),
            speed_multiplier: self.speed,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn current_second(&self) -> i64 {
        self.resolver.axis().clamp(self.position.floor() as i64)
    }

    pub fn selection(&self) -> ChartSelection {
        self.selection
    }

    pub fn apply(&mut self, command: Command) -> Result<(), ControlError> {
        match command {
            Command::TogglePlay => self.toggle(),
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Stop => self.stop(),
            Command::Seek { second } => {
                self.seek_to(second);
            }
            Command::Step { delta } => {
                self.step(delta);
            }
            Command::SetSpeed { multiplier } => self.set_speed(multiplier)?,
            Command::SetChannels { left, right } => {
                let selection = ChartSelection {
                    left,
                    right,
                    ..self.selection
                };
                self.select_chart(selection);
            }
            Command::SetSmoothing { radius } => {
                let selection = ChartSelection {
                    radius,
                    ..self.selection
                };
                self.select_chart(selection);
            }
        }
        Ok(())
    }

    pub fn toggle(&mut self) {
        if self.phase == PlaybackPhase::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn play(&mut self) {
        if self.phase == PlaybackPhase::Playing {
            return;
        }
        if !self.has_started {
            tracing::debug!("First play at {}", self.current_second());
        }
        self.phase = PlaybackPhase::Playing;
        self.has_started = true;
        self.update(self.current_second(), true);
    }

    pub fn pause(&mut self) {
        if self.phase != PlaybackPhase::Playing {
            return;
        }
        self.phase = PlaybackPhase::Paused;
        self.interrupt_sinks();
    }

    pub fn stop(&mut self) {
        let t_min = self.resolver.axis().t_min;
        self.phase = PlaybackPhase::Stopped;
        self.position = t_min as f64;
        self.has_started = false;
        self.interrupt_sinks();
        self.reset_sinks();
        self.last_processed = None;
    }

    /// Manual seek (slider, chart click, highlight click). Returns whether sinks re-rendered.
    pub fn seek_to(&mut self, second: i64) -> bool {
        let second = self.resolver.axis().clamp(second);
        self.position = second as f64;
        self.update(second, false)
    }

    pub fn step(&mut self, delta: i64) -> bool {
        self.seek_to(self.current_second().saturating_add(delta))
    }

    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), ControlError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            tracing::warn!("Rejected playback speed {}", multiplier);
            return Err(ControlError::InvalidSpeed(multiplier));
        }
        self.speed = multiplier;
        Ok(())
    }

    pub fn select_chart(&mut self, selection: ChartSelection) {
        self.selection = selection;
        for sink in &mut self.sinks {
            sink.select_chart(&selection);
        }
        self.update(self.current_second(), true);
    }

    /// Advance the playhead by `elapsed` wall time scaled by the speed multiplier
    pub fn advance(&mut self, elapsed: Duration) -> FrameOutcome {
        if self.phase != PlaybackPhase::Playing {
            return FrameOutcome::Idle;
        }
        let t_max = self.resolver.axis().t_max as f64;
        let step = (elapsed.as_secs_f64() * self.speed).max(MIN_FRAME_ADVANCE_SECS);
        self.position = (self.position + step).min(t_max);

        let rendered = self.update(self.current_second(), false);
        if self.position >= t_max {
            self.phase = PlaybackPhase::Paused;
            self.interrupt_sinks();
            tracing::info!("Playback reached end of recording at {}", self.current_second());
            return FrameOutcome::Finished;
        }
        FrameOutcome::Continued { rendered }
    }

    pub fn frame(&self) -> DashboardFrame {
        DashboardFrame::new(
            self.state(),
            self.has_started,
            self.sinks.iter().map(|s| s.view()).collect(),
        )
    }

    /// Resolve `second` once and hand the same snapshot to every eligible sink.
    /// Skipped when `second` was the last one processed, unless forced.
    fn update(&mut self, second: i64, force: bool) -> bool {
        if !force && self.last_processed == Some(second) {
            return false;
        }
        let resolver = Arc::clone(&self.resolver);
        let state = resolver.resolve(second);
        let ctx = RenderContext {
            state: &state,
            resolver: &resolver,
        };
        for sink in &mut self.sinks {
            if sink.gate() == SinkGate::AfterStart && !self.has_started {
                continue;
            }
            sink.render(&ctx);
        }
        self.last_processed = Some(second);
        true
    }

    fn interrupt_sinks(&mut self) {
        for sink in &mut self.sinks {
            sink.interrupt();
        }
    }

    fn reset_sinks(&mut self) {
        let axis = self.resolver.axis();
        for sink in &mut self.sinks {
            sink.reset(&axis);
        }
    }
}
