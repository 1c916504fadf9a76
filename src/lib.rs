// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds CLI parsing and terminal setup.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod display;
pub mod game;
pub mod logging;
pub mod runtime;
pub mod schedule;
pub mod score;
pub mod ui;
