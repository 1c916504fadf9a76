use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Send log output to a file, since the terminal belongs to the UI.
/// Filtering follows `RUST_LOG` and defaults to `warn`.
///
/// Logging stays off if the file cannot be opened; the game does not depend
/// on it.
pub fn init(path: Option<&Path>) {
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
}
