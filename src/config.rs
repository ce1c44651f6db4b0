use crate::keywords::KeywordEntry;
use crate::language::Language;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Language
    pub ui_language: Language,

    // Timing (milliseconds)
    /// Wait after an unrequested engine end before restarting it
    pub restart_delay_ms: u64,
    /// Wait after a language switch before the new session is started
    pub language_settle_ms: u64,
    /// Wait after an unknown command before the help panel opens
    pub help_delay_ms: u64,
    pub status_hide_ms: u64,
    pub echo_hide_ms: u64,
    pub feedback_hide_ms: u64,

    // Terminal engine
    /// Seconds without input after which the terminal engine ends its capture
    pub silence_timeout_secs: u64,

    // Data
    /// Whole-table keyword replacements, per language
    pub keywords: HashMap<Language, Vec<KeywordEntry>>,
    pub locale_dir: Option<String>,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ui_language: Language::ZhTw,
            restart_delay_ms: 100,
            language_settle_ms: 500,
            help_delay_ms: 1000,
            status_hide_ms: 2000,
            echo_hide_ms: 2000,
            feedback_hide_ms: 2000,
            silence_timeout_secs: 8,
            keywords: HashMap::new(),
            locale_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default path, writing defaults there on first run
    pub fn load() -> Result<Self> {
        Self::load_or_init(&config_path())
    }

    /// Like [`Config::load_from`], but a missing file is created with defaults
    /// so there is something to edit. Failing to write it is not fatal.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        match config.save_to(path) {
            Ok(()) => tracing::info!("📝 Wrote default config to {}", path.display()),
            Err(e) => tracing::warn!("⚠️ Could not write default config: {}", e),
        }
        Ok(config)
    }

    /// Load config from `path`.
    ///
    /// A missing file yields defaults. A corrupt file is moved aside to
    /// `*.json.corrupt` and defaults are used.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn timings(&self) -> Timings {
        Timings {
            restart_delay: Duration::from_millis(self.restart_delay_ms),
            language_settle: Duration::from_millis(self.language_settle_ms),
            help_delay: Duration::from_millis(self.help_delay_ms),
            status_hide: Duration::from_millis(self.status_hide_ms),
            echo_hide: Duration::from_millis(self.echo_hide_ms),
            feedback_hide: Duration::from_millis(self.feedback_hide_ms),
        }
    }
}

/// Fixed delays used by the assistant state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub restart_delay: Duration,
    pub language_settle: Duration,
    pub help_delay: Duration,
    pub status_hide: Duration,
    pub echo_hide: Duration,
    pub feedback_hide: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Config::default().timings()
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voicenav")
        .join("config.json")
}
