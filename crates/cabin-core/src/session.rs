//! The session orchestrator.
//!
//! Owns every piece of mutable session state and the single timer registry.
//! Sub-components only see the signals through read access and change
//! session state through the narrow helpers here (`lose_life`,
//! `start_countdown`, `finish_ambient`).

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ambient::{
    AmbientKind, AmbientScheduler, AmbientSlot, COOLDOWN_MS, DEBUG_RESUME_MS, GameEvent,
    SchedulingMode, draw_attempt_delay_ms,
};
use crate::clock::{Phase, SessionClock};
use crate::collision::is_looking_at_face;
use crate::config::SessionConfig;
use crate::countdown::{Countdown, DeathCountdownMachine, DeathReason, PRESENTATION_MS};
use crate::error::{SessionError, SessionResult};
use crate::event::{EventLog, EventOutcome, LoggedEvent, SessionEvent};
use crate::eyes::{EyeClosureAccumulator, EyeStep};
use crate::face::{
    FACE_RESOLVE_DELAY_MS, FaceEvent, FaceScheduler, FaceSlot, draw_face_attempt_delay_ms,
    roll_face_spawn,
};
use crate::lives::{LifeLossReason, LivesTracker};
use crate::look::LookDurationTimer;
use crate::noise::NoiseMonitor;
use crate::signal::{SignalState, Signals};
use crate::survival::{
    FootstepsEyeWatch, InsanityBreach, heavy_footsteps_survived, insanity_breach,
    insanity_countdown,
};
use crate::timer::{FiredTimer, TimerKey, TimerRegistry};

/// Cadence of the pulse that drives accumulators, monitors and the
/// countdown display.
pub const PULSE_MS: u64 = 100;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not started.
    Ready,
    /// Clock running.
    Running,
    /// The terminal jump scare is playing; the loss is sealed.
    Dying {
        /// Failure path that killed the player.
        reason: DeathReason,
    },
    /// Survived to the end.
    Won,
    /// Died.
    Lost {
        /// Failure path that killed the player.
        reason: DeathReason,
    },
    /// Stopped from outside.
    Shutdown,
}

impl SessionState {
    /// Whether the session has ended and no longer reacts to ticks.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost { .. } | Self::Shutdown)
    }

    /// Whether the clock is still being driven.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Running | Self::Dying { .. })
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Running => write!(f, "running"),
            Self::Dying { reason } => write!(f, "dying ({reason})"),
            Self::Won => write!(f, "won"),
            Self::Lost { reason } => write!(f, "lost ({reason})"),
            Self::Shutdown => write!(f, "shut down"),
        }
    }
}

/// An event that can be started by hand, bypassing the normal gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcedEvent {
    /// Light footsteps.
    Footsteps,
    /// Heavy footsteps.
    HeavyFootsteps,
    /// Insanity, including its warning.
    Insanity,
    /// A horror face.
    Face,
}

impl std::str::FromStr for ForcedEvent {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "footsteps" => Ok(Self::Footsteps),
            "heavy-footsteps" => Ok(Self::HeavyFootsteps),
            "insanity" => Ok(Self::Insanity),
            "face" => Ok(Self::Face),
            other => Err(SessionError::InvalidConfig(format!(
                "unknown event '{other}'"
            ))),
        }
    }
}

/// One play-through, driven by absolute millisecond timestamps.
pub struct Session {
    config: SessionConfig,
    clock: SessionClock,
    rng: StdRng,
    timers: TimerRegistry,
    signals: SignalState,
    ambient: AmbientScheduler,
    faces: FaceScheduler,
    look: LookDurationTimer,
    lives: LivesTracker,
    countdown: DeathCountdownMachine,
    eyes: EyeClosureAccumulator,
    footsteps_watch: FootstepsEyeWatch,
    noise: NoiseMonitor,
    log: EventLog,
    outbox: Vec<SessionEvent>,
    next_id: u64,
    phase: Phase,
    state: SessionState,
    mode: SchedulingMode,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("elapsed_ms", &self.clock.elapsed_ms())
            .field("lost_lives", &self.lives.lost_lives())
            .field("timers", &self.timers.len())
            .field("events", &self.log.len())
            .finish()
    }
}

impl Session {
    /// Create a session. Nothing runs until [`Session::start`].
    pub fn new(config: SessionConfig) -> SessionResult<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        let log = EventLog::new(config.max_events);
        Ok(Self {
            config,
            clock: SessionClock::new(0),
            rng,
            timers: TimerRegistry::new(),
            signals: SignalState::default(),
            ambient: AmbientScheduler::new(),
            faces: FaceScheduler::new(),
            look: LookDurationTimer::new(),
            lives: LivesTracker::new(),
            countdown: DeathCountdownMachine::new(),
            eyes: EyeClosureAccumulator::new(),
            footsteps_watch: FootstepsEyeWatch::new(),
            noise: NoiseMonitor::new(),
            log,
            outbox: Vec::new(),
            next_id: 1,
            phase: Phase::Intro,
            state: SessionState::Ready,
            mode: SchedulingMode::Normal,
        })
    }

    /// Begin a session at `at_ms`. A finished session is reset first.
    pub fn start(&mut self, at_ms: u64) -> SessionResult<()> {
        if self.state.is_live() {
            return Err(SessionError::AlreadyRunning);
        }
        self.clock = SessionClock::new(at_ms);
        self.timers.clear();
        self.signals = SignalState::default();
        self.ambient = AmbientScheduler::new();
        self.faces = FaceScheduler::new();
        self.look.reset();
        self.lives = LivesTracker::new();
        self.countdown.reset();
        self.eyes.reset();
        self.footsteps_watch.reset();
        self.noise.reset();
        self.log.clear();
        self.outbox.clear();
        self.next_id = 1;
        self.phase = Phase::Intro;
        self.mode = SchedulingMode::Normal;
        self.state = SessionState::Running;

        if let Some(boundary) = self.clock.next_boundary_ms() {
            self.timers.schedule(TimerKey::Phase, boundary, 0);
        }
        self.timers.schedule(TimerKey::Pulse, at_ms + PULSE_MS, 0);
        tracing::info!(at_ms, seed = self.config.seed, "session started");
        Ok(())
    }

    /// Replace the current signals. Ignored unless the session is running.
    pub fn ingest(&mut self, sample: Signals) {
        if self.state != SessionState::Running {
            return;
        }
        self.signals.apply(sample, self.config.center_x());
    }

    /// Advance to `now_ms`, firing every timer due on the way in deadline
    /// order. Earlier timestamps are ignored.
    pub fn tick(&mut self, now_ms: u64) {
        if !self.state.is_live() {
            return;
        }
        if now_ms < self.clock.now_ms() {
            tracing::warn!(
                now_ms,
                clock_ms = self.clock.now_ms(),
                "ignoring tick that goes back in time"
            );
            return;
        }
        while let Some(fired) = self.timers.pop_due(now_ms) {
            self.clock.advance_to(fired.deadline_ms);
            if let Err(error) = self.handle(fired) {
                tracing::warn!(timer = %fired.key, %error, "timer handler failed");
            }
            if !self.state.is_live() {
                return;
            }
        }
        self.clock.advance_to(now_ms);
    }

    /// Start an event immediately, bypassing phase and cooldown gates.
    /// Clears any running ambient or face event first; death countdowns
    /// are left alone.
    pub fn force_event(&mut self, event: ForcedEvent) -> SessionResult<()> {
        if self.state != SessionState::Running {
            return Err(SessionError::NotRunning);
        }
        tracing::info!(?event, "forcing event");
        self.clear_events();
        self.mode = SchedulingMode::DebugOverride;
        match event {
            ForcedEvent::Footsteps => self.begin_ambient(AmbientKind::Footsteps),
            ForcedEvent::HeavyFootsteps => self.begin_ambient(AmbientKind::HeavyFootsteps),
            ForcedEvent::Insanity => self.begin_ambient(AmbientKind::Insanity),
            ForcedEvent::Face => self.spawn_face(),
        }
        Ok(())
    }

    /// Drop every ambient and face event and go back to normal scheduling.
    pub fn clear_all_events(&mut self) -> SessionResult<()> {
        if self.state != SessionState::Running {
            return Err(SessionError::NotRunning);
        }
        tracing::info!("clearing all events");
        self.clear_events();
        self.mode = SchedulingMode::Normal;
        self.arm_ambient_attempt();
        self.arm_face_attempt();
        Ok(())
    }

    /// Stop the session. Later ticks do nothing.
    pub fn shutdown(&mut self) {
        if self.state == SessionState::Shutdown {
            return;
        }
        self.timers.clear();
        self.state = SessionState::Shutdown;
        tracing::info!(elapsed_ms = self.clock.elapsed_ms(), "session shut down");
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Every event emitted this session, with timestamps.
    pub fn events(&self) -> &EventLog {
        &self.log
    }

    /// Lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Last announced phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Scheduling mode.
    pub fn mode(&self) -> SchedulingMode {
        self.mode
    }

    /// The session clock.
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Milliseconds since session start.
    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    /// Lives lost so far.
    pub fn lost_lives(&self) -> u8 {
        self.lives.lost_lives()
    }

    /// The running death countdown, if any.
    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.running()
    }

    /// The running ambient event, if any.
    pub fn active_event(&self) -> Option<&GameEvent> {
        self.ambient.active()
    }

    /// The face on screen, if any.
    pub fn active_face(&self) -> Option<&FaceEvent> {
        self.faces.current()
    }

    /// Seconds of accumulated eye closure.
    pub fn eye_closure_seconds(&self) -> f64 {
        self.eyes.seconds()
    }

    /// Current signals.
    pub fn signals(&self) -> &SignalState {
        &self.signals
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn handle(&mut self, fired: FiredTimer) -> SessionResult<()> {
        match fired.key {
            TimerKey::Phase => self.on_phase_boundary()?,
            TimerKey::Pulse => self.on_pulse(),
            TimerKey::AmbientAttempt => self.on_ambient_attempt(),
            TimerKey::InsanityWarning => self.on_insanity_warning(fired.token),
            TimerKey::AmbientEnd => self.on_ambient_end(fired.token),
            TimerKey::Cooldown => self.on_cooldown_end(),
            TimerKey::DebugResume => self.on_debug_resume(),
            TimerKey::FaceAttempt => self.on_face_attempt(),
            TimerKey::FaceEnd => self.on_face_end(fired.token),
            TimerKey::FaceResolve => self.on_face_resolve(fired.token),
            TimerKey::CountdownEnd => self.on_countdown_end(fired.token),
            TimerKey::Presentation => self.on_presentation_end()?,
        }
        Ok(())
    }

    fn emit(&mut self, event: SessionEvent) {
        let elapsed_ms = self.clock.elapsed_ms();
        match &event {
            SessionEvent::DeathCountdownTick { .. } => tracing::trace!(elapsed_ms, %event),
            SessionEvent::EventWarning { .. } | SessionEvent::FaceEventStarted { .. } => {
                tracing::debug!(elapsed_ms, %event)
            }
            _ => tracing::info!(elapsed_ms, %event),
        }
        self.log.push(LoggedEvent {
            elapsed_ms,
            event: event.clone(),
        });
        self.outbox.push(event);
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn stale(&self, key: TimerKey, token: u64) {
        tracing::trace!(timer = %key, token, "stale timer discarded");
    }

    // --- phases ---

    fn on_phase_boundary(&mut self) -> SessionResult<()> {
        let from = self.phase;
        let to = self.clock.phase();
        if from == to {
            return Err(SessionError::Handler(format!(
                "phase timer fired inside {from}"
            )));
        }
        self.phase = to;
        self.emit(SessionEvent::PhaseChanged { from, to });
        if let Some(boundary) = self.clock.next_boundary_ms() {
            self.timers.schedule(TimerKey::Phase, boundary, 0);
        }

        match to {
            Phase::Intro => {}
            Phase::Active => {
                self.arm_ambient_attempt();
                self.arm_face_attempt();
            }
            Phase::FinalSafeZone => {
                self.clear_events();
                self.mode = SchedulingMode::Normal;
            }
            Phase::Won => {
                if let Some(countdown) = self.countdown.cancel() {
                    self.emit(SessionEvent::DeathCountdownCancelled {
                        reason: countdown.reason,
                    });
                }
                self.timers.clear();
                self.state = SessionState::Won;
                self.emit(SessionEvent::SessionWon);
            }
        }
        Ok(())
    }

    // --- pulse ---

    fn on_pulse(&mut self) {
        let now = self.clock.now_ms();
        self.timers.schedule(TimerKey::Pulse, now + PULSE_MS, 0);
        if self.state != SessionState::Running {
            return;
        }

        let running = self.ambient.active().copied();
        let insanity_active = running.is_some_and(|e| e.kind == AmbientKind::Insanity);
        let footsteps_active = running.is_some_and(|e| e.kind == AmbientKind::Footsteps);

        let insanity = running.filter(|e| e.kind == AmbientKind::Insanity);
        if let (Some(event), Some(breach)) = (insanity, insanity_breach(&self.signals)) {
            self.fail_insanity(event, breach);
        }

        if footsteps_active {
            if self.footsteps_watch.pulse(self.signals.eyes_closed()) {
                self.lose_life(LifeLossReason::FootstepsEyesClosed);
            }
        } else {
            self.footsteps_watch.reset();
        }

        let monitored = matches!(self.phase, Phase::Active | Phase::FinalSafeZone);
        if monitored && !footsteps_active {
            let closing = self.signals.eyes_closed() && !insanity_active;
            match self.eyes.pulse(closing) {
                EyeStep::Saturated => self.start_countdown(DeathReason::EyeClosureDeath),
                EyeStep::Recovering => {
                    if let Some(countdown) = self.countdown.cancel_if(DeathReason::EyeClosureDeath)
                    {
                        self.timers.cancel(TimerKey::CountdownEnd);
                        self.emit(SessionEvent::DeathCountdownCancelled {
                            reason: countdown.reason,
                        });
                    }
                }
                EyeStep::Closing => {}
            }
        }

        if monitored && self.noise.pulse(self.signals.noise()) {
            tracing::debug!(noise = self.signals.noise().raw(), "entered red zone");
            self.start_countdown(DeathReason::NoiseDeath);
        }

        if let Some(face) = self.faces.watchable().copied() {
            let center = face.center(self.config.screen_height);
            let looking = self
                .signals
                .pointer()
                .is_some_and(|p| is_looking_at_face(p, center));
            if self.look.observe(looking, now) {
                self.face_jump_scare(face.id);
            }
        }

        if let Some(countdown) = self.countdown.running().copied() {
            self.emit(SessionEvent::DeathCountdownTick {
                remaining_ms: countdown.remaining_ms(now),
                reason: countdown.reason,
            });
        }
    }

    // --- ambient events ---

    fn arm_ambient_attempt(&mut self) {
        if self.mode != SchedulingMode::Normal
            || self.phase != Phase::Active
            || !self.ambient.is_idle()
        {
            return;
        }
        let delay = draw_attempt_delay_ms(&mut self.rng);
        let at = self.clock.now_ms() + delay;
        tracing::debug!(delay_ms = delay, "ambient attempt armed");
        self.timers.schedule(TimerKey::AmbientAttempt, at, 0);
        self.ambient.mark_waiting();
    }

    fn on_ambient_attempt(&mut self) {
        if self.mode != SchedulingMode::Normal
            || self.phase != Phase::Active
            || self.ambient.slot() != AmbientSlot::Waiting
        {
            self.stale(TimerKey::AmbientAttempt, 0);
            return;
        }
        let kind = AmbientKind::draw(&mut self.rng);
        tracing::debug!(%kind, "ambient roll");
        self.begin_ambient(kind);
    }

    fn begin_ambient(&mut self, kind: AmbientKind) {
        let id = self.allocate_id();
        match kind.warning_ms() {
            Some(warning) => {
                self.ambient.warn(id);
                self.emit(SessionEvent::EventWarning { id, kind });
                let at = self.clock.now_ms() + warning;
                self.timers.schedule(TimerKey::InsanityWarning, at, id);
            }
            None => self.activate_ambient(id, kind),
        }
    }

    fn activate_ambient(&mut self, id: u64, kind: AmbientKind) {
        let event = GameEvent {
            id,
            kind,
            start_ms: self.clock.now_ms(),
            duration_ms: kind.draw_duration_ms(&mut self.rng),
        };
        self.ambient.activate(event);
        self.footsteps_watch.reset();
        self.emit(SessionEvent::EventStarted {
            id,
            kind,
            duration_ms: event.duration_ms,
        });
        self.timers.schedule(TimerKey::AmbientEnd, event.end_ms(), id);
    }

    fn on_insanity_warning(&mut self, id: u64) {
        if self.ambient.warning_id() != Some(id) {
            self.stale(TimerKey::InsanityWarning, id);
            return;
        }
        self.activate_ambient(id, AmbientKind::Insanity);
    }

    fn on_ambient_end(&mut self, id: u64) {
        let Some(event) = self.ambient.active().copied().filter(|e| e.id == id) else {
            self.stale(TimerKey::AmbientEnd, id);
            return;
        };
        match event.kind {
            AmbientKind::Footsteps => {
                self.finish_ambient(event, EventOutcome::Survived);
            }
            AmbientKind::HeavyFootsteps => {
                if heavy_footsteps_survived(&self.signals) {
                    self.finish_ambient(event, EventOutcome::Survived);
                } else {
                    self.finish_ambient(event, EventOutcome::Failed);
                    self.lose_life(LifeLossReason::HeavyFootstepsEyesOpen);
                }
            }
            AmbientKind::Insanity => match insanity_breach(&self.signals) {
                Some(breach) => self.fail_insanity(event, breach),
                None => self.finish_ambient(event, EventOutcome::Survived),
            },
        }
    }

    fn fail_insanity(&mut self, event: GameEvent, breach: InsanityBreach) {
        let reason = insanity_countdown(&self.signals);
        tracing::info!(id = event.id, %breach, %reason, "insanity failed");
        self.finish_ambient(event, EventOutcome::Failed);
        self.start_countdown(reason);
    }

    fn finish_ambient(&mut self, event: GameEvent, outcome: EventOutcome) {
        if self.ambient.resolve(event.id).is_none() {
            return;
        }
        self.timers.cancel(TimerKey::AmbientEnd);
        self.footsteps_watch.reset();
        self.emit(SessionEvent::EventResolved {
            id: event.id,
            kind: event.kind,
            outcome,
        });
        let at = self.clock.now_ms() + COOLDOWN_MS;
        self.timers.schedule(TimerKey::Cooldown, at, event.id);
    }

    fn on_cooldown_end(&mut self) {
        if !self.ambient.end_cooldown() {
            self.stale(TimerKey::Cooldown, 0);
            return;
        }
        match self.mode {
            SchedulingMode::Normal => self.arm_ambient_attempt(),
            SchedulingMode::DebugOverride => self.arm_debug_resume(),
        }
    }

    fn arm_debug_resume(&mut self) {
        let at = self.clock.now_ms() + DEBUG_RESUME_MS;
        self.timers.schedule(TimerKey::DebugResume, at, 0);
    }

    fn on_debug_resume(&mut self) {
        if self.mode != SchedulingMode::DebugOverride {
            self.stale(TimerKey::DebugResume, 0);
            return;
        }
        tracing::debug!("resuming normal scheduling");
        self.mode = SchedulingMode::Normal;
        self.arm_ambient_attempt();
        self.arm_face_attempt();
    }

    // --- faces ---

    fn arm_face_attempt(&mut self) {
        if self.mode != SchedulingMode::Normal
            || self.phase != Phase::Active
            || !self.faces.is_idle()
        {
            return;
        }
        self.schedule_face_attempt();
        self.faces.mark_waiting();
    }

    fn schedule_face_attempt(&mut self) {
        let delay = draw_face_attempt_delay_ms(&mut self.rng);
        let at = self.clock.now_ms() + delay;
        tracing::debug!(delay_ms = delay, "face attempt armed");
        self.timers.schedule(TimerKey::FaceAttempt, at, 0);
    }

    fn on_face_attempt(&mut self) {
        if self.mode != SchedulingMode::Normal
            || self.phase != Phase::Active
            || self.faces.slot() != FaceSlot::Waiting
        {
            self.stale(TimerKey::FaceAttempt, 0);
            return;
        }
        if roll_face_spawn(&mut self.rng) {
            self.spawn_face();
        } else {
            tracing::debug!("face attempt missed");
            self.schedule_face_attempt();
        }
    }

    fn spawn_face(&mut self) {
        let id = self.allocate_id();
        let face = FaceEvent::spawn(
            id,
            self.signals.gaze(),
            self.config.screen_width,
            self.clock.now_ms(),
            &mut self.rng,
        );
        self.faces.show(face);
        self.look.reset();
        self.emit(SessionEvent::FaceEventStarted {
            id,
            side: face.side,
            x: face.x,
            duration_ms: face.duration_ms,
        });
        self.timers.schedule(TimerKey::FaceEnd, face.end_ms(), id);
    }

    fn face_jump_scare(&mut self, id: u64) {
        if self.faces.trigger_jump_scare(id).is_none() {
            return;
        }
        self.timers.cancel(TimerKey::FaceEnd);
        self.emit(SessionEvent::FaceJumpScare { id });
        let at = self.clock.now_ms() + FACE_RESOLVE_DELAY_MS;
        self.timers.schedule(TimerKey::FaceResolve, at, id);
    }

    fn on_face_end(&mut self, id: u64) {
        if self.faces.expire(id).is_none() {
            self.stale(TimerKey::FaceEnd, id);
            return;
        }
        self.look.reset();
        self.emit(SessionEvent::FaceEventResolved {
            id,
            jump_scare_triggered: false,
        });
        self.after_face();
    }

    fn on_face_resolve(&mut self, id: u64) {
        if self.faces.finish_jump_scare(id).is_none() {
            self.stale(TimerKey::FaceResolve, id);
            return;
        }
        self.look.reset();
        self.lose_life(LifeLossReason::HorrorFaceJumpScare);
        self.emit(SessionEvent::FaceEventResolved {
            id,
            jump_scare_triggered: true,
        });
        self.after_face();
    }

    fn after_face(&mut self) {
        match self.mode {
            SchedulingMode::Normal => self.arm_face_attempt(),
            SchedulingMode::DebugOverride => self.arm_debug_resume(),
        }
    }

    /// Cut every ambient and face event short, with their timers.
    fn clear_events(&mut self) {
        for key in [
            TimerKey::AmbientAttempt,
            TimerKey::InsanityWarning,
            TimerKey::AmbientEnd,
            TimerKey::Cooldown,
            TimerKey::DebugResume,
            TimerKey::FaceAttempt,
            TimerKey::FaceEnd,
            TimerKey::FaceResolve,
        ] {
            self.timers.cancel(key);
        }
        if let Some((id, kind)) = self.ambient.clear() {
            self.emit(SessionEvent::EventResolved {
                id,
                kind,
                outcome: EventOutcome::Cancelled,
            });
        }
        if let Some(face) = self.faces.clear() {
            self.emit(SessionEvent::FaceEventResolved {
                id: face.id,
                jump_scare_triggered: face.jump_scare_triggered,
            });
        }
        self.footsteps_watch.reset();
        self.look.reset();
    }

    // --- lives and countdowns ---

    fn lose_life(&mut self, reason: LifeLossReason) {
        let loss = self.lives.lose_life();
        self.emit(SessionEvent::LifeLost {
            reason,
            lost_lives: loss.lost_lives,
        });
        if loss.exhausted {
            self.start_countdown(DeathReason::LivesDeath);
        }
    }

    fn start_countdown(&mut self, reason: DeathReason) {
        let now = self.clock.now_ms();
        let Some((countdown, replaced)) = self.countdown.start(reason, now, &mut self.rng) else {
            tracing::debug!(%reason, "countdown not started");
            return;
        };
        if let Some(old) = replaced {
            self.emit(SessionEvent::DeathCountdownCancelled { reason: old.reason });
        }
        let deadline = countdown.deadline_ms();
        self.timers.schedule(TimerKey::CountdownEnd, deadline, deadline);
        self.emit(SessionEvent::DeathCountdownStarted {
            reason,
            duration_ms: countdown.duration_ms,
        });
    }

    fn on_countdown_end(&mut self, deadline: u64) {
        let current = self.countdown.running().map(Countdown::deadline_ms);
        if current != Some(deadline) {
            self.stale(TimerKey::CountdownEnd, deadline);
            return;
        }
        let Some((reason, variant)) = self.countdown.expire(&mut self.rng) else {
            return;
        };
        self.timers.clear();
        self.state = SessionState::Dying { reason };
        self.emit(SessionEvent::JumpScareTriggered { variant, reason });
        let at = self.clock.now_ms() + PRESENTATION_MS;
        self.timers.schedule(TimerKey::Presentation, at, 0);
    }

    fn on_presentation_end(&mut self) -> SessionResult<()> {
        let SessionState::Dying { reason } = self.state else {
            return Err(SessionError::Handler(format!(
                "presentation ended while {}",
                self.state
            )));
        };
        self.state = SessionState::Lost { reason };
        self.emit(SessionEvent::SessionLost { reason });
        Ok(())
    }

    #[cfg(test)]
    fn count(&self, pred: impl Fn(&SessionEvent) -> bool) -> usize {
        self.log.count(pred)
    }
}
