use crate::game::{GameSummary, RoundResult};
use chrono::{DateTime, Local};

/// Top-level screens the view can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Game,
    Result,
}

/// What the single action key does right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    StartMeasurement,
    StopMeasurement,
    NextRound,
    None,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::StartMeasurement => "start",
            ActionKind::StopMeasurement => "STOP!",
            ActionKind::NextRound => "next turn",
            ActionKind::None => "",
        }
    }
}

/// Header line shown above the round
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub mode_label: String,
    /// Remaining life in seconds, never negative
    pub life: f64,
    /// Life has dropped below 30% of the starting budget
    pub danger: bool,
    pub turn_text: String,
    /// Best endless score, only shown in endless mode
    pub best: Option<u32>,
}

/// Push notifications from the game controller to whatever renders it
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    Screen(Screen),
    Header(HeaderView),
    Target(f64),
    Elapsed(f64),
    RoundResult(RoundResult),
    Action(ActionKind),
    Summary(GameSummary),
    BestScore(u32),
    /// When the best endless score was set. Follows `BestScore` when known.
    RecordDate(DateTime<Local>),
}

pub trait GameDisplay {
    fn notify(&mut self, event: DisplayEvent);
}

/// Display that keeps every event it receives. Handy for headless runs and
/// tests.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub events: Vec<DisplayEvent>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn last_screen(&self) -> Option<Screen> {
        self.events.iter().rev().find_map(|e| match e {
            DisplayEvent::Screen(s) => Some(*s),
            _ => None,
        })
    }

    pub fn last_header(&self) -> Option<&HeaderView> {
        self.events.iter().rev().find_map(|e| match e {
            DisplayEvent::Header(h) => Some(h),
            _ => None,
        })
    }

    pub fn last_action(&self) -> Option<ActionKind> {
        self.events.iter().rev().find_map(|e| match e {
            DisplayEvent::Action(a) => Some(*a),
            _ => None,
        })
    }

    pub fn summaries(&self) -> Vec<&GameSummary> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Summary(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}

impl GameDisplay for RecordingDisplay {
    fn notify(&mut self, event: DisplayEvent) {
        self.events.push(event);
    }
}

/// Seconds rendered the way every timer in the game shows them
pub fn format_secs(secs: f64) -> String {
    format!("{:.3}", secs)
}
