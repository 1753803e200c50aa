//! Stderr logger for the `log` facade.
//!
//! Lines carry the time since [`init_logging`] so a long session can be
//! read back in order: `  12.034s WARN  discarding corrupt session`.

use std::env;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger {
    started: OnceLock<Instant>,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.started.get_or_init(Instant::now).elapsed();
        eprintln!(
            "{:>8.3}s {:<5} {}",
            elapsed.as_secs_f64(),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger {
    started: OnceLock::new(),
};

/// Install the stderr logger. The level comes from `BROADSIDE_LOG`
/// (`error`, `warn`, `info`, `debug`, `trace`, `off`) and is `warn` when
/// unset or unparseable.
pub fn init_logging() {
    let level = env::var("BROADSIDE_LOG")
        .ok()
        .and_then(|lvl| lvl.parse().ok())
        .unwrap_or(LevelFilter::Warn);
    LOGGER.started.get_or_init(Instant::now);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
