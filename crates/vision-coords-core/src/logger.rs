//! Minimal stderr logger for the `log` facade.
//!
//! Records print as `[elapsed LEVEL target] message`. Install once with
//! [`init_with_level`], or [`init_from_env`] to read the level from
//! `VISION_COORDS_LOG`. With the `tracing` feature, [`init_tracing`] installs a
//! `tracing-subscriber` formatter instead.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read by [`init_from_env`].
pub const LOG_ENV: &str = "VISION_COORDS_LOG";

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger with the provided level filter.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Parse a level name (`off`, `error`, ..., `trace`), case-insensitive.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(name.trim()).ok()
}

/// Install the stderr logger at the level named by `VISION_COORDS_LOG`,
/// falling back to `default` when unset or unparsable.
pub fn init_from_env(default: LevelFilter) -> Result<(), log::SetLoggerError> {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(default);
    init_with_level(level)
}

#[cfg(feature = "tracing")]
fn tracing_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a `tracing-subscriber` formatter on stderr, filtered by
/// `VISION_COORDS_LOG` (default `warn`). Stdout is left for command output.
///
/// `json` selects one flattened JSON object per event, with span close
/// timings. Otherwise events print compactly with uptime and target, like
/// the stderr logger. Does nothing if a subscriber is already installed.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(tracing_filter())
        .with_writer(std::io::stderr)
        .with_target(true);
    let _ = if json {
        builder
            .json()
            .flatten_event(true)
            .with_span_events(FmtSpan::CLOSE)
            .finish()
            .try_init()
    } else {
        builder
            .compact()
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_init_tolerates_a_second_call() {
        init_tracing(false);
        init_tracing(true);
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_with_level(LevelFilter::Warn).unwrap();
        init_with_level(LevelFilter::Trace).unwrap();
        assert_eq!(log::max_level(), LevelFilter::Warn);
    }
}
