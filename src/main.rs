use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use justime::{
    app::App,
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{ConfigStore, FileConfigStore},
    game::{Difficulty, GameMode},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    score::{FileScoreStore, ScoreStore},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

/// stop the stopwatch right on target
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal timing game: a target between 3 and 8 seconds is shown, start the stopwatch and stop it as close to the target as you can. Every bit you are off is taken from your life."
)]
pub struct Cli {
    /// start straight into a game of this mode instead of the title screen
    #[clap(short = 'm', long, value_enum)]
    mode: Option<GameMode>,

    /// starting life preset for fixed mode
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// custom starting life in seconds, overrides the presets
    #[clap(short = 'l', long, value_parser = parse_life)]
    life: Option<f64>,

    /// where the endless best score is kept
    #[clap(long)]
    score_file: Option<PathBuf>,

    /// stopwatch refresh interval in milliseconds
    #[clap(long)]
    tick_rate_ms: Option<u64>,
}

fn parse_life(s: &str) -> Result<f64, String> {
    let life: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if life.is_finite() && life > 0.0 {
        Ok(life)
    } else {
        Err("life must be a positive number of seconds".to_string())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    logging::init(AppDirs::log_path().as_deref());

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    if let Some(ms) = cli.tick_rate_ms.filter(|ms| *ms > 0) {
        config.tick_rate_ms = ms;
    }
    if let Some(d) = cli.difficulty {
        config.default_difficulty = d;
    }

    let store = match &cli.score_file {
        Some(path) => FileScoreStore::with_path(path),
        None => FileScoreStore::new(),
    };
    log::info!(
        "starting with best score {} from {}",
        store.load(),
        store.path().display()
    );

    let tick = Duration::from_millis(config.tick_rate_ms);
    let mut app = App::new(config, store, SystemClock, rand::thread_rng());
    app.life_override = cli.life;
    if let Some(mode) = cli.mode {
        let difficulty = app.config.default_difficulty;
        app.start(mode, difficulty);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, tick);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = config_store.save(&app.config) {
        log::warn!("could not save config: {e}");
    }

    result
}

fn start_tui<B: Backend, S: ScoreStore, R: rand::Rng>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, SystemClock, R>,
    tick: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick));

    terminal.draw(|f| f.render_widget(app.view(), f.area()))?;

    while !app.should_quit {
        app.handle(runner.step());
        terminal.draw(|f| f.render_widget(app.view(), f.area()))?;
    }

    Ok(())
}
