use std::time::Duration;

use assert_matches::assert_matches;
use justime::clock::ManualClock;
use justime::display::{DisplayEvent, RecordingDisplay, Screen};
use justime::game::{GameController, GameMode, GameSummary, Phase, FIXED_MODE_TURN_COUNT};
use justime::score::{FileScoreStore, ScoreStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

type FileController = GameController<RecordingDisplay, FileScoreStore, ManualClock, StdRng>;

fn controller(store: FileScoreStore, seed: u64) -> FileController {
    GameController::new(
        RecordingDisplay::new(),
        store,
        ManualClock::new(),
        StdRng::seed_from_u64(seed),
    )
    .with_result_delay(Duration::from_millis(50))
}

/// Play one round, stopping `offset` seconds away from the target
fn play(c: &mut FileController, offset: f64) {
    let target = c.session().unwrap().target_interval;
    c.start_timer();
    c.clock().advance_secs(target + offset);
    c.stop_timer();
}

fn finish(c: &mut FileController) {
    c.clock().advance(Duration::from_millis(50));
    c.on_tick();
}

fn endless_run(c: &mut FileController, perfect_rounds: u32) {
    c.start_game(GameMode::Endless, 1.0);
    for _ in 0..perfect_rounds {
        play(c, 0.0);
        c.advance();
    }
    play(c, 10.0);
    finish(c);
}

#[test]
fn endless_record_persists_across_controllers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("score.json");

    let mut first = controller(FileScoreStore::with_path(&path), 1);
    assert_eq!(first.best_score(), 0);
    endless_run(&mut first, 3);
    assert_eq!(first.best_score(), 3);
    assert_eq!(FileScoreStore::with_path(&path).load(), 3);

    // a fresh process reads the record back
    let mut second = controller(FileScoreStore::with_path(&path), 2);
    assert_eq!(second.best_score(), 3);
    assert!(second
        .display()
        .events
        .contains(&DisplayEvent::BestScore(3)));
    let recorded_at = FileScoreStore::with_path(&path).recorded_at();
    assert!(recorded_at.is_some());
    assert!(second
        .display()
        .events
        .iter()
        .any(|e| matches!(e, DisplayEvent::RecordDate(at) if Some(*at) == recorded_at)));

    // tying the record does not count
    endless_run(&mut second, 3);
    assert_eq!(
        second.display().summaries(),
        vec![&GameSummary::Endless {
            completed_turns: 3,
            new_record: false
        }]
    );

    endless_run(&mut second, 5);
    assert_eq!(second.best_score(), 5);
    assert_eq!(FileScoreStore::with_path(&path).load(), 5);
}

#[test]
fn corrupt_score_file_starts_from_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.json");
    std::fs::write(&path, "{\"best_completed_turns\": \"lots\"}").unwrap();

    let mut c = controller(FileScoreStore::with_path(&path), 4);
    assert_eq!(c.best_score(), 0);

    endless_run(&mut c, 1);
    assert_eq!(FileScoreStore::with_path(&path).load(), 1);
}

#[test]
fn fixed_game_scenario_with_mixed_rounds() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(FileScoreStore::with_path(dir.path().join("score.json")), 5);
    c.start_game(GameMode::Fixed, 0.7);

    let offsets = [0.1, -0.05, 0.0, 0.2, -0.1];
    for (i, offset) in offsets.iter().enumerate() {
        play(&mut c, *offset);
        let turn = i as u32 + 1;
        if turn < FIXED_MODE_TURN_COUNT {
            assert_eq!(c.session().unwrap().phase, Phase::RoundResolved);
            assert_eq!(c.session().unwrap().completed_turns, turn);
            c.advance();
        }
    }

    let s = c.session().unwrap();
    assert_eq!(s.phase, Phase::Ended);
    assert!((s.current_life - 0.25).abs() < 1e-6);

    finish(&mut c);
    assert_eq!(c.display().last_screen(), Some(Screen::Result));
    let summaries = c.display().summaries();
    assert_matches!(
        summaries.as_slice(),
        [GameSummary::Cleared { remaining_life }] if (remaining_life - 0.25).abs() < 1e-6
    );
    assert!(!dir.path().join("score.json").exists());
}

#[test]
fn life_never_increases_within_a_game() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(FileScoreStore::with_path(dir.path().join("score.json")), 6);
    c.start_game(GameMode::Endless, 3.0);

    let mut previous = 3.0;
    for offset in [0.3, -0.2, 0.0, 0.4, -0.6, 1.0, 2.0] {
        if c.session().unwrap().phase == Phase::Ended {
            break;
        }
        play(&mut c, offset);
        let life = c.session().unwrap().current_life;
        assert!(life <= previous);
        assert!(life >= 0.0);
        previous = life;
        c.advance();
    }
    assert_eq!(c.session().unwrap().phase, Phase::Ended);
}
