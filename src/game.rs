use crate::clock::Clock;
use crate::display::{ActionKind, DisplayEvent, GameDisplay, HeaderView, Screen};
use crate::schedule::{take_due, Deferred};
use crate::score::ScoreStore;
use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Rounds in a fixed-mode game
pub const FIXED_MODE_TURN_COUNT: u32 = 5;
/// Life at or below this counts as empty
pub const LIFE_EPSILON: f64 = 1e-5;
pub const TARGET_MIN_MS: u32 = 3000;
pub const TARGET_MAX_MS: u32 = 8000;
/// Pause between the last round and the result screen
pub const RESULT_DELAY: Duration = Duration::from_millis(1000);
/// Below this share of the starting life the header turns red
pub const DANGER_RATIO: f64 = 0.3;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Fixed,
    Endless,
}

/// Starting life presets for fixed mode
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub fn initial_life(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Normal => 0.5,
            Difficulty::Hard => 0.3,
        }
    }

    /// Preset whose starting life matches `life`, if any
    pub fn from_life(life: f64) -> Option<Self> {
        [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]
            .into_iter()
            .find(|d| (d.initial_life() - life).abs() < f64::EPSILON)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    AwaitingStart,
    TimerRunning { started_at: Instant },
    RoundResolved,
    Ended,
}

/// Outcome of a single stopwatch attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundResult {
    pub elapsed: f64,
    /// Absolute timing error, which is also the life lost
    pub diff: f64,
}

/// Final results, captured by value when the game ends
#[derive(Debug, Clone, PartialEq)]
pub enum GameSummary {
    Cleared { remaining_life: f64 },
    Failed { turn: u32 },
    Endless { completed_turns: u32, new_record: bool },
}

/// State of the game currently being played
#[derive(Debug, Clone)]
pub struct GameSession {
    pub mode: GameMode,
    pub initial_life: f64,
    pub current_life: f64,
    pub turn_index: u32,
    pub completed_turns: u32,
    pub target_interval: f64,
    pub phase: Phase,
    pub last_round: Option<RoundResult>,
}

impl GameSession {
    pub fn new(mode: GameMode, initial_life: f64) -> Self {
        Self {
            mode,
            initial_life,
            current_life: initial_life,
            turn_index: 1,
            completed_turns: 0,
            target_interval: 0.0,
            phase: Phase::AwaitingStart,
            last_round: None,
        }
    }

    pub fn is_danger(&self) -> bool {
        self.current_life < self.initial_life * DANGER_RATIO
    }

    pub fn mode_label(&self) -> String {
        match self.mode {
            GameMode::Endless => "Endless".to_string(),
            GameMode::Fixed => Difficulty::from_life(self.initial_life)
                .map(|d| d.to_string())
                .unwrap_or_else(|| "Custom".to_string()),
        }
    }

    pub fn turn_text(&self) -> String {
        match self.mode {
            GameMode::Fixed => format!("{} / {}", self.turn_index, FIXED_MODE_TURN_COUNT),
            GameMode::Endless => format!("Turn {}", self.turn_index),
        }
    }

    pub fn header(&self, best: u32) -> HeaderView {
        HeaderView {
            mode_label: self.mode_label(),
            life: self.current_life.max(0.0),
            danger: self.is_danger(),
            turn_text: self.turn_text(),
            best: (self.mode == GameMode::Endless).then_some(best),
        }
    }

    /// Seconds since the stopwatch started, if it is running
    pub fn elapsed_at(&self, now: Instant) -> Option<f64> {
        match self.phase {
            Phase::TimerRunning { started_at } => {
                Some(now.saturating_duration_since(started_at).as_secs_f64())
            }
            _ => None,
        }
    }
}

/// Owns the live session and drives it through its phases.
///
/// Every operation is a single synchronous transition. Calls made in the
/// wrong phase are ignored.
pub struct GameController<D, S, C, R> {
    display: D,
    store: S,
    clock: C,
    rng: R,
    session: Option<GameSession>,
    best: u32,
    best_recorded_at: Option<DateTime<Local>>,
    pending_summary: Option<Deferred<GameSummary>>,
    result_delay: Duration,
}

impl<D, S, C, R> GameController<D, S, C, R>
where
    D: GameDisplay,
    S: ScoreStore,
    C: Clock,
    R: Rng,
{
    pub fn new(mut display: D, store: S, clock: C, rng: R) -> Self {
        let best = store.load();
        let best_recorded_at = store.recorded_at();
        log::debug!("loaded best endless score {best}");
        display.notify(DisplayEvent::Screen(Screen::Title));
        let mut controller = Self {
            display,
            store,
            clock,
            rng,
            session: None,
            best,
            best_recorded_at,
            pending_summary: None,
            result_delay: RESULT_DELAY,
        };
        controller.notify_best();
        controller
    }

    pub fn with_result_delay(mut self, delay: Duration) -> Self {
        self.result_delay = delay;
        self
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn best_score(&self) -> u32 {
        self.best
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn has_pending_summary(&self) -> bool {
        self.pending_summary.is_some()
    }

    /// What the action key does in the current phase
    pub fn action(&self) -> ActionKind {
        match self.session.as_ref().map(|s| s.phase) {
            Some(Phase::AwaitingStart) => ActionKind::StartMeasurement,
            Some(Phase::TimerRunning { .. }) => ActionKind::StopMeasurement,
            Some(Phase::RoundResolved) => ActionKind::NextRound,
            Some(Phase::Ended) | None => ActionKind::None,
        }
    }

    /// Run whatever the action key currently stands for
    pub fn press_action(&mut self) {
        match self.action() {
            ActionKind::StartMeasurement => self.start_timer(),
            ActionKind::StopMeasurement => self.stop_timer(),
            ActionKind::NextRound => self.advance(),
            ActionKind::None => {}
        }
    }

    pub fn start_game(&mut self, mode: GameMode, initial_life: f64) {
        debug_assert!(
            initial_life > 0.0 && initial_life.is_finite(),
            "initial life must be positive"
        );
        log::debug!("starting {mode} game with {initial_life:.3}s of life");
        if self.pending_summary.take().is_some() {
            log::debug!("dropping the undelivered result of the previous game");
        }

        let session = GameSession::new(mode, initial_life);
        self.display.notify(DisplayEvent::Screen(Screen::Game));
        self.display
            .notify(DisplayEvent::Header(session.header(self.best)));
        self.session = Some(session);
        self.begin_round();
    }

    pub fn begin_round(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !matches!(session.phase, Phase::AwaitingStart | Phase::RoundResolved) {
            log::debug!("begin_round ignored in {:?}", session.phase);
            return;
        }

        let ms = self.rng.gen_range(TARGET_MIN_MS..=TARGET_MAX_MS);
        session.target_interval = f64::from(ms) / 1000.0;
        session.phase = Phase::AwaitingStart;
        log::debug!(
            "turn {} target {:.3}s",
            session.turn_index,
            session.target_interval
        );

        self.display
            .notify(DisplayEvent::Target(session.target_interval));
        self.display.notify(DisplayEvent::Elapsed(0.0));
        self.display
            .notify(DisplayEvent::Action(ActionKind::StartMeasurement));
    }

    pub fn start_timer(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase != Phase::AwaitingStart {
            return;
        }

        session.phase = Phase::TimerRunning {
            started_at: self.clock.now(),
        };
        self.display
            .notify(DisplayEvent::Action(ActionKind::StopMeasurement));
    }

    pub fn stop_timer(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(elapsed) = session.elapsed_at(self.clock.now()) else {
            return;
        };

        let diff = (elapsed - session.target_interval).abs();
        session.current_life -= diff;
        session.phase = Phase::RoundResolved;
        let result = RoundResult { elapsed, diff };
        session.last_round = Some(result);
        log::debug!(
            "turn {} stopped at {:.3}s, off by {:.3}s, life {:.3}s",
            session.turn_index,
            elapsed,
            diff,
            session.current_life
        );

        self.display.notify(DisplayEvent::Elapsed(elapsed));
        self.display.notify(DisplayEvent::RoundResult(result));
        self.display
            .notify(DisplayEvent::Header(session.header(self.best)));

        self.evaluate_outcome();
    }

    fn evaluate_outcome(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase != Phase::RoundResolved {
            return;
        }

        if session.current_life <= LIFE_EPSILON {
            session.current_life = 0.0;
            self.display
                .notify(DisplayEvent::Header(session.header(self.best)));
            self.end_game(false);
            return;
        }

        if session.mode == GameMode::Fixed && session.turn_index >= FIXED_MODE_TURN_COUNT {
            session.completed_turns = FIXED_MODE_TURN_COUNT;
            self.end_game(true);
        } else {
            session.completed_turns = session.turn_index;
            self.display
                .notify(DisplayEvent::Action(ActionKind::NextRound));
        }
    }

    /// Move on to the next round once the current one is resolved
    pub fn advance(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.phase != Phase::RoundResolved {
            return;
        }

        session.turn_index += 1;
        self.display
            .notify(DisplayEvent::Header(session.header(self.best)));
        self.begin_round();
    }

    fn end_game(&mut self, cleared: bool) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.phase = Phase::Ended;
        let (mode, life, turn, completed) = (
            session.mode,
            session.current_life,
            session.turn_index,
            session.completed_turns,
        );

        let summary = match mode {
            GameMode::Fixed if cleared => GameSummary::Cleared {
                remaining_life: life,
            },
            GameMode::Fixed => GameSummary::Failed { turn },
            GameMode::Endless => {
                let new_record = completed > self.best;
                if new_record {
                    self.record_best(completed);
                }
                GameSummary::Endless {
                    completed_turns: completed,
                    new_record,
                }
            }
        };
        log::debug!("game over: {summary:?}");

        self.display.notify(DisplayEvent::Action(ActionKind::None));
        self.pending_summary = Some(Deferred::new(
            self.clock.now(),
            self.result_delay,
            summary,
        ));
    }

    fn record_best(&mut self, best: u32) {
        self.best = best;
        match self.store.save(best) {
            Ok(()) => {
                log::info!("new endless record: {best} turns");
                self.best_recorded_at = self.store.recorded_at();
            }
            Err(e) => {
                log::warn!("could not persist endless record {best}: {e}");
                self.best_recorded_at = None;
            }
        }
    }

    fn notify_best(&mut self) {
        self.display.notify(DisplayEvent::BestScore(self.best));
        if let Some(at) = self.best_recorded_at {
            self.display.notify(DisplayEvent::RecordDate(at));
        }
    }

    /// Drop the current game and show the title screen
    pub fn back_to_title(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!(
                "leaving {} game at turn {} ({:?})",
                session.mode,
                session.turn_index,
                session.phase
            );
        }
        self.display.notify(DisplayEvent::Screen(Screen::Title));
        self.notify_best();
        self.display.notify(DisplayEvent::Action(ActionKind::None));
    }

    /// Frame callback: refresh the running stopwatch and deliver the result
    /// screen once its delay has passed.
    pub fn on_tick(&mut self) {
        let now = self.clock.now();

        if let Some(elapsed) = self.session.as_ref().and_then(|s| s.elapsed_at(now)) {
            self.display.notify(DisplayEvent::Elapsed(elapsed));
        }

        if let Some(summary) = take_due(&mut self.pending_summary, now) {
            let new_record = matches!(
                summary,
                GameSummary::Endless {
                    new_record: true,
                    ..
                }
            );
            self.display.notify(DisplayEvent::Screen(Screen::Result));
            self.display.notify(DisplayEvent::Summary(summary));
            if new_record {
                self.notify_best();
            }
        }
    }
}
