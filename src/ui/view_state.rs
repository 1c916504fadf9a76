use crate::display::{ActionKind, DisplayEvent, GameDisplay, HeaderView, Screen};
use crate::game::{GameSummary, RoundResult};
use chrono::{DateTime, Local};

/// Everything the terminal UI needs to draw a frame, built up from the
/// controller's notifications
#[derive(Debug, Clone)]
pub struct ViewState {
    pub screen: Screen,
    pub header: Option<HeaderView>,
    pub target: f64,
    pub elapsed: f64,
    pub round_result: Option<RoundResult>,
    pub action: ActionKind,
    pub summary: Option<GameSummary>,
    pub best: u32,
    pub best_recorded_at: Option<DateTime<Local>>,
    /// Game the title screen's enter key replays, set by the app
    pub replay: Option<String>,
    /// "quit to title?" prompt is open; owned by the UI, not the controller
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            screen: Screen::Title,
            header: None,
            target: 0.0,
            elapsed: 0.0,
            round_result: None,
            action: ActionKind::None,
            summary: None,
            best: 0,
            best_recorded_at: None,
            replay: None,
            confirm_quit: false,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameDisplay for ViewState {
    fn notify(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::Screen(screen) => {
                if screen == Screen::Game {
                    self.summary = None;
                    self.round_result = None;
                }
                self.confirm_quit = false;
                self.screen = screen;
            }
            DisplayEvent::Header(header) => self.header = Some(header),
            DisplayEvent::Target(target) => {
                self.target = target;
                self.round_result = None;
            }
            DisplayEvent::Elapsed(elapsed) => self.elapsed = elapsed,
            DisplayEvent::RoundResult(result) => self.round_result = Some(result),
            DisplayEvent::Action(action) => self.action = action,
            DisplayEvent::Summary(summary) => self.summary = Some(summary),
            DisplayEvent::BestScore(best) => {
                self.best = best;
                self.best_recorded_at = None;
            }
            DisplayEvent::RecordDate(at) => self.best_recorded_at = Some(at),
        }
    }
}
