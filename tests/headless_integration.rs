use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use justime::app::App;
use justime::clock::ManualClock;
use justime::config::Config;
use justime::display::{ActionKind, Screen};
use justime::game::{GameMode, GameSummary};
use justime::runtime::{FixedTicker, GameEvent, Runner, TestEventSource};
use justime::score::MemoryScoreStore;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn key(c: char) -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless integration using the internal runtime + App without a TTY.
// Drives an endless game through the Runner until the result screen shows.
#[test]
fn headless_endless_flow_reaches_result() {
    let mut app = App::new(
        Config::default(),
        MemoryScoreStore::new(1),
        ManualClock::new(),
        StdRng::seed_from_u64(3),
    );

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key('4')).unwrap();
    app.handle(runner.step());
    assert_eq!(app.view().screen, Screen::Game);
    assert_eq!(app.controller.session().unwrap().mode, GameMode::Endless);

    // two perfect rounds
    for _ in 0..2 {
        let target = app.controller.session().unwrap().target_interval;
        tx.send(key(' ')).unwrap();
        app.handle(runner.step());
        assert_eq!(app.view().action, ActionKind::StopMeasurement);

        app.controller.clock().advance_secs(target);
        app.handle(runner.step()); // tick
        tx.send(key(' ')).unwrap();
        app.handle(runner.step());
        assert_eq!(app.view().action, ActionKind::NextRound);

        tx.send(key(' ')).unwrap();
        app.handle(runner.step());
    }

    // third round blows the whole budget
    tx.send(key(' ')).unwrap();
    app.handle(runner.step());
    app.controller.clock().advance_secs(30.0);
    tx.send(key(' ')).unwrap();
    app.handle(runner.step());
    assert_eq!(app.view().action, ActionKind::None);
    assert_eq!(app.view().screen, Screen::Game);

    app.controller.clock().advance(Duration::from_millis(1000));
    for _ in 0..10u32 {
        app.handle(runner.step());
        if app.view().screen == Screen::Result {
            break;
        }
    }

    assert_eq!(app.view().screen, Screen::Result);
    assert_eq!(
        app.view().summary,
        Some(GameSummary::Endless {
            completed_turns: 2,
            new_record: true
        })
    );
    assert_eq!(app.view().best, 2);
    assert_eq!(app.controller.store().saves(), vec![2]);

    tx.send(key('r')).unwrap();
    app.handle(runner.step());
    assert_eq!(app.view().screen, Screen::Title);
}

#[test]
fn headless_real_clock_round_deducts_life() {
    // Real clock, so only bounds can be checked
    let mut app = App::new(
        Config::default(),
        MemoryScoreStore::new(0),
        justime::clock::SystemClock,
        StdRng::seed_from_u64(9),
    );
    app.start(GameMode::Fixed, justime::game::Difficulty::Easy);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(2)),
    );

    tx.send(key(' ')).unwrap();
    tx.send(key(' ')).unwrap();
    for _ in 0..2 {
        app.handle(runner.step());
    }

    let session = app.controller.session().unwrap();
    let result = session.last_round.expect("round should be resolved");
    assert!(result.elapsed >= 0.0 && result.elapsed < 1.0);
    assert!((result.diff - (session.target_interval - result.elapsed)).abs() < 1e-9);
    // stopping almost instantly misses a target of at least 3s
    assert_eq!(session.current_life, 0.0);
}
