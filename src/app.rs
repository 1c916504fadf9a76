use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;

use crate::clock::Clock;
use crate::config::Config;
use crate::display::Screen;
use crate::game::{Difficulty, GameController, GameMode};
use crate::runtime::GameEvent;
use crate::score::ScoreStore;
use crate::ui::ViewState;

/// Terminal front end: maps keys onto controller operations and keeps the
/// view state the renderer draws from
pub struct App<S, C, R> {
    pub controller: GameController<ViewState, S, C, R>,
    pub config: Config,
    /// Starting life forced from the command line, for every mode
    pub life_override: Option<f64>,
    pub should_quit: bool,
}

impl<S, C, R> App<S, C, R>
where
    S: ScoreStore,
    C: Clock,
    R: Rng,
{
    pub fn new(config: Config, store: S, clock: C, rng: R) -> Self {
        let controller = GameController::new(ViewState::new(), store, clock, rng)
            .with_result_delay(std::time::Duration::from_millis(config.result_delay_ms));
        let mut app = Self {
            controller,
            config,
            life_override: None,
            should_quit: false,
        };
        app.refresh_replay();
        app
    }

    pub fn view(&self) -> &ViewState {
        self.controller.display()
    }

    pub fn initial_life(&self, mode: GameMode, difficulty: Difficulty) -> f64 {
        if let Some(life) = self.life_override {
            return life;
        }
        match mode {
            GameMode::Fixed => difficulty.initial_life(),
            GameMode::Endless => self.config.endless_life,
        }
    }

    pub fn start(&mut self, mode: GameMode, difficulty: Difficulty) {
        let life = self.initial_life(mode, difficulty);
        self.config.last_mode = Some(mode);
        if mode == GameMode::Fixed {
            self.config.default_difficulty = difficulty;
        }
        self.refresh_replay();
        self.controller.start_game(mode, life);
    }

    /// Start another game of the last picked mode and difficulty
    pub fn replay(&mut self) {
        if let Some(mode) = self.config.last_mode {
            self.start(mode, self.config.default_difficulty);
        }
    }

    fn refresh_replay(&mut self) {
        let label = self.config.last_mode.map(|mode| match mode {
            GameMode::Fixed => format!("{mode} {}", self.config.default_difficulty),
            GameMode::Endless => mode.to_string(),
        });
        self.controller.display_mut().replay = label;
    }

    pub fn handle(&mut self, event: GameEvent) {
        match event {
            GameEvent::Tick => self.on_tick(),
            GameEvent::Resize => {}
            GameEvent::Key(key) => self.on_key(key),
        }
    }

    pub fn on_tick(&mut self) {
        self.controller.on_tick();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let screen = self.view().screen;
        match screen {
            Screen::Title => match key.code {
                KeyCode::Char('1') => self.start(GameMode::Fixed, Difficulty::Easy),
                KeyCode::Char('2') => self.start(GameMode::Fixed, Difficulty::Normal),
                KeyCode::Char('3') => self.start(GameMode::Fixed, Difficulty::Hard),
                KeyCode::Char('4') | KeyCode::Char('e') => {
                    self.start(GameMode::Endless, self.config.default_difficulty)
                }
                KeyCode::Enter => self.replay(),
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
            Screen::Game => {
                if self.view().confirm_quit {
                    match key.code {
                        KeyCode::Char('y') | KeyCode::Char('Y') => {
                            self.controller.back_to_title()
                        }
                        _ => self.controller.display_mut().confirm_quit = false,
                    }
                    return;
                }
                match key.code {
                    KeyCode::Char(' ') | KeyCode::Enter => self.controller.press_action(),
                    KeyCode::Esc => self.controller.display_mut().confirm_quit = true,
                    _ => {}
                }
            }
            Screen::Result => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => self.controller.back_to_title(),
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
        }
    }
}
