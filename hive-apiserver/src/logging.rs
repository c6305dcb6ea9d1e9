//! Logging configuration module
//! Console output plus an optional rotated file, both through tracing-subscriber

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::io;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_NAME: &str = "hive-apiserver.log";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,                // trace, debug, info, warn, error
    pub file_path: Option<String>,    // log directory; console only when unset
    pub rotation: LogRotation,
    pub json_format: bool,            // JSON console output
    pub include_targets: Vec<String>, // extra `target=level` directives
}

/// Log rotation policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl FromStr for LogRotation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hourly" => Ok(LogRotation::Hourly),
            "daily" => Ok(LogRotation::Daily),
            "never" => Ok(LogRotation::Never),
            other => anyhow::bail!("unknown log rotation '{}'", other),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            rotation: LogRotation::Daily,
            json_format: false,
            include_targets: vec![],
        }
    }
}

impl LoggingConfig {
    /// Filter built from `RUST_LOG`, falling back to the configured level
    pub fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        let mut filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.level)
                .with_context(|| format!("invalid log level '{}'", self.level))?,
        };

        for target in &self.include_targets {
            let directive = target
                .parse()
                .with_context(|| format!("invalid log directive '{}'", target))?;
            filter = filter.add_directive(directive);
        }

        Ok(filter)
    }

    /// Initialize the global subscriber
    ///
    /// The returned guard flushes the file writer and must be held for the
    /// life of the process.
    pub fn init(&self) -> anyhow::Result<Option<WorkerGuard>> {
        let env_filter = self.env_filter()?;

        let console_layer = if self.json_format {
            fmt::layer()
                .with_target(true)
                .json()
                .with_writer(io::stdout)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_ansi(true)
                .with_writer(io::stdout)
                .boxed()
        };

        let guard = if let Some(ref path) = self.file_path {
            let file_appender = match self.rotation {
                LogRotation::Hourly => rolling::hourly(path, LOG_FILE_NAME),
                LogRotation::Daily => rolling::daily(path, LOG_FILE_NAME),
                LogRotation::Never => rolling::never(path, LOG_FILE_NAME),
            };

            let (non_blocking, guard) = non_blocking(file_appender);

            let file_layer = fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_writer(non_blocking);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .try_init()
                .context("failed to install tracing subscriber")?;

            Some(guard)
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .try_init()
                .context("failed to install tracing subscriber")?;

            None
        };

        tracing::info!(level = %self.level, file = ?self.file_path, "Logging initialized");

        Ok(guard)
    }

    /// Initialize from `RUST_LOG` and `HIVE_LOG_PATH`
    pub fn init_from_env() -> anyhow::Result<Option<WorkerGuard>> {
        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let file_path = std::env::var("HIVE_LOG_PATH").ok();

        Self {
            level,
            file_path,
            ..Default::default()
        }
        .init()
    }
}
