use chrono::{DateTime, Local};
use colored::*;
use log::{Level, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

static CONSOLE_LOGGER: Lazy<ConsoleLogger> = Lazy::new(ConsoleLogger::new);

/// Records logged with this target are completed steps and render as ✅.
pub const DONE_TARGET: &str = "seedream::done";

/// Logs a completed step at info level.
#[macro_export]
macro_rules! log_done {
    ($($arg:tt)*) => {
        ::log::info!(target: $crate::logger::DONE_TARGET, $($arg)*)
    };
}

pub fn init_with_config(config: LoggerConfig) -> Result<(), String> {
    let max_level = config.min_level.to_log_level_filter();
    CONSOLE_LOGGER.update_config(config);

    if let Err(e) = log::set_logger(&*CONSOLE_LOGGER) {
        return Err(format!("Failed to set logger: {:?}", e));
    }

    log::set_max_level(max_level);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        self.to_log_level().as_str()
    }

    pub fn to_log_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        self.to_log_level().to_level_filter()
    }

    pub fn from_log_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }

    /// Levels written to stderr.
    pub fn is_diagnostic(&self) -> bool {
        *self >= LogLevel::Warn
    }
}

/// Leading symbol of a console line, picked from level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Done,
    Note,
    Warning,
    Failure,
    Detail,
}

impl Marker {
    pub fn for_record(level: LogLevel, target: &str) -> Self {
        match level {
            LogLevel::Error => Marker::Failure,
            LogLevel::Warn => Marker::Warning,
            LogLevel::Info if target == DONE_TARGET => Marker::Done,
            LogLevel::Info => Marker::Note,
            LogLevel::Debug | LogLevel::Trace => Marker::Detail,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Marker::Done => "✅",
            Marker::Note => "•",
            Marker::Warning => "⚠️",
            Marker::Failure => "❌",
            Marker::Detail => "·",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Marker::Done => Color::Green,
            Marker::Note => Color::Cyan,
            Marker::Warning => Color::Yellow,
            Marker::Failure => Color::Red,
            Marker::Detail => Color::BrightBlack,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub marker: Marker,
    pub message: String,
    pub module: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, target: &str, message: String, module: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Local::now(),
            level,
            marker: Marker::for_record(level, target),
            message,
            module,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    /// Print the level name after the marker.
    pub show_level: bool,
    pub show_module: bool,
    /// `None` omits the timestamp.
    pub timestamp_format: Option<String>,
    pub output_json: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_level: false,
            show_module: false,
            timestamp_format: None,
            output_json: false,
        }
    }
}

impl LoggerConfig {
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// One JSON object per line, no colours.
    pub fn production() -> Self {
        Self {
            show_colors: false,
            output_json: true,
            ..Default::default()
        }
    }

    /// Debug level with timestamps, level names and module paths.
    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_level: true,
            show_module: true,
            timestamp_format: Some("%H:%M:%S%.3f".to_string()),
            ..Default::default()
        }
    }
}

pub struct ConsoleLogger {
    config: Mutex<LoggerConfig>,
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(LoggerConfig::default()),
        }
    }

    pub fn update_config(&self, new_config: LoggerConfig) {
        if let Ok(mut config) = self.config.lock() {
            *config = new_config;
        }
    }

    fn format_console_output(&self, entry: &LogEntry, config: &LoggerConfig) -> String {
        let paint = |text: &str, color: Color| -> String {
            if config.show_colors {
                text.color(color).to_string()
            } else {
                text.to_string()
            }
        };

        let mut parts = Vec::with_capacity(4);
        if let Some(format) = &config.timestamp_format {
            let timestamp = entry.timestamp.format(format).to_string();
            parts.push(paint(&timestamp, Color::BrightBlack));
        }
        parts.push(paint(entry.marker.symbol(), entry.marker.color()));
        if config.show_level {
            parts.push(paint(&format!("{:<5}", entry.level.as_str()), entry.marker.color()));
        }
        if config.show_module && !entry.module.is_empty() {
            parts.push(paint(&format!("{}:", entry.module), Color::Blue));
        }
        parts.push(entry.message.clone());

        parts.join(" ")
    }

    fn create_log_entry(&self, record: &Record) -> LogEntry {
        LogEntry::new(
            LogLevel::from_log_level(record.level()),
            record.target(),
            record.args().to_string(),
            record.module_path().unwrap_or("unknown").to_string(),
        )
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if let Ok(config) = self.config.lock() {
            metadata.level() <= config.min_level.to_log_level()
        } else {
            true
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = self.create_log_entry(record);
        if let Ok(config) = self.config.lock() {
            let line = if config.output_json {
                serde_json::to_string(&entry).unwrap_or_default()
            } else {
                self.format_console_output(&entry, &config)
            };

            if entry.level.is_diagnostic() {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }
}

/// Logs how long the wrapped operation took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!("{} took {:.1}s", self.name, self.elapsed().as_secs_f64());
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}
