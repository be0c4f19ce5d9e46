//! Rolling Logger
//!
//! A `log` backend that keeps the most recent records in a circular buffer.
//! Records are echoed to the browser console on wasm32 and to stderr elsewhere.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Logger settings
#[derive(Debug, Clone, Copy)]
pub struct LoggerConfig {
    /// Most verbose level that is recorded
    pub level: LevelFilter,
    /// Number of formatted lines kept in memory
    pub capacity: usize,
    /// Forward each record to the console / stderr
    pub echo: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            capacity: 500,
            echo: true,
        }
    }
}

pub struct RollingLogger {
    level: LevelFilter,
    capacity: usize,
    echo: bool,
    lines: Mutex<VecDeque<String>>,
}

impl RollingLogger {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            level: config.level,
            capacity: config.capacity,
            echo: config.echo,
            lines: Mutex::new(VecDeque::with_capacity(config.capacity)),
        }
    }

    /// Append a line, evicting the oldest once the buffer is full
    fn push(&self, line: String) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut lines) = self.lines.lock() else {
            return;
        };
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Buffered lines, oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }
}

fn format_record(record: &Record) -> String {
    format!(
        "{} {:<5} {}",
        chrono::Utc::now().format("%H:%M:%S%.3f"),
        record.level(),
        record.args()
    )
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record);
        if self.echo {
            emit(record.level(), &line);
        }
        self.push(line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Install the global logger. Only the first call takes effect.
pub fn init(config: LoggerConfig) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(config));
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

/// Recent lines recorded by the global logger (empty before `init`)
pub fn recent() -> Vec<String> {
    LOGGER.get().map(RollingLogger::snapshot).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(level: LevelFilter, capacity: usize) -> RollingLogger {
        RollingLogger::new(LoggerConfig { level, capacity, echo: false })
    }

    #[test]
    fn test_buffer_keeps_most_recent_lines() {
        let logger = quiet(LevelFilter::Trace, 3);
        for i in 0..5 {
            logger.push(format!("line {}", i));
        }
        assert_eq!(logger.snapshot(), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_records_below_level_are_dropped() {
        let logger = quiet(LevelFilter::Warn, 10);
        logger.log(&Record::builder().args(format_args!("noise")).level(Level::Info).build());
        logger.log(&Record::builder().args(format_args!("[API] boom")).level(Level::Error).build());

        let lines = logger.snapshot();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].ends_with("[API] boom"));
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let logger = quiet(LevelFilter::Trace, 0);
        logger.push("ignored".to_string());
        assert!(logger.snapshot().is_empty());
    }
}
