//! Minimal `log` backend that writes records to stderr.

use log::{LevelFilter, Log, Metadata, Record};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
	fn enabled(&self, metadata: &Metadata<'_>) -> bool {
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &Record<'_>) {
		if self.enabled(record.metadata()) {
			eprintln!("[{:>5}] {}: {}", record.level(), record.target(), record.args());
		}
	}

	fn flush(&self) {}
}

/// Parses a level name such as `debug` or `WARN`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
	name.trim().parse().ok()
}

/// Installs the logger.
///
/// `level` wins if given; otherwise the level comes from the environment
/// variable `env_var`, falling back to `warn`. Calling this twice is
/// harmless; the first logger stays installed.
pub fn init(level: Option<LevelFilter>, env_var: &str) {
	let level = level
		.or_else(|| std::env::var(env_var).ok().as_deref().and_then(parse_level))
		.unwrap_or(LevelFilter::Warn);
	if log::set_logger(&LOGGER).is_ok() {
		log::set_max_level(level);
	}
}
