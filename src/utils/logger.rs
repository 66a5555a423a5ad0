// src/utils/logger.rs

//! Minimal stderr backend for the `log` facade.
//!
//! The library itself only emits records; applications that have no logger
//! of their own can install this one.

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

/// Installs the stderr logger with the given maximum level.
///
/// Fails if any logger (this one or another) is already installed.
pub fn init(max_level: LevelFilter) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(max_level))
}

fn tag(level: Level) -> &'static str {
  match level {
    Level::Error => "ERROR",
    Level::Warn => "WARN ",
    Level::Info => "INFO ",
    Level::Debug => "DEBUG",
    Level::Trace => "TRACE",
  }
}

impl log::Log for StderrLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      // Format: "[WARN ] crystal_cell::model::cell: singular unit cell matrix"
      let _ = writeln!(
        std::io::stderr().lock(),
        "[{}] {}: {}",
        tag(record.level()),
        record.target(),
        record.args()
      );
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
