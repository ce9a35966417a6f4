//! Process configuration resolved from flags and environment.
//!
//! # Responsibility
//! - Locate the catalog database file.
//! - Pick the log level and log target for this process.

use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "books.db";
/// Level used when logging to stderr without an explicit `--log-level`.
const QUIET_STDERR_LEVEL: &str = "warn";

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// SQLite database file; created on first use
    #[arg(long, env = "BOOKSHELF_DB_PATH", default_value = DEFAULT_DB_PATH, global = true)]
    pub db: PathBuf,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "BOOKSHELF_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logs go to stderr when unset
    #[arg(long, env = "BOOKSHELF_LOG_DIR", global = true)]
    pub log_dir: Option<String>,
}

impl Config {
    /// Explicit level, else the build default for file logs, else `warn`.
    pub fn effective_log_level(&self) -> &str {
        match (self.log_level.as_deref(), self.log_dir.as_deref()) {
            (Some(level), _) => level,
            (None, Some(_)) => bookshelf_core::default_log_level(),
            (None, None) => QUIET_STDERR_LEVEL,
        }
    }
}
