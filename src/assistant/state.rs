//! State types for the voice assistant
//!
//! Everything the presenter needs, in one value.

use crate::i18n::{self, Catalog};
use crate::language::Language;

/// Text of the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// Persistent while listening; carries the interim transcript if any
    Listening { interim: Option<String> },
    Recognized(String),
    Navigating(String),
    LanguageChanged(String),
    UnknownCommand(String),
    /// Recoverable engine error; capture resumes after the engine ends
    Error,
}

impl StatusMessage {
    pub fn listening() -> Self {
        StatusMessage::Listening { interim: None }
    }

    /// Acknowledgements auto-hide; the listening indicator does not
    pub fn is_transient(&self) -> bool {
        !matches!(self, StatusMessage::Listening { .. })
    }

    pub fn render(&self, catalog: &Catalog, lang: Language) -> String {
        let labeled = |key: &str, detail: &str| format!("{}: {}", catalog.tr(lang, key), detail);
        match self {
            StatusMessage::Listening { interim: None } => catalog.tr(lang, i18n::KEY_LISTENING),
            StatusMessage::Listening {
                interim: Some(text),
            } => labeled(i18n::KEY_LISTENING, text),
            StatusMessage::Recognized(text) => labeled(i18n::KEY_RECOGNIZED, text),
            StatusMessage::Navigating(phrase) => labeled(i18n::KEY_NAVIGATING, phrase),
            StatusMessage::LanguageChanged(phrase) => labeled(i18n::KEY_LANGUAGE_CHANGED, phrase),
            StatusMessage::UnknownCommand(text) => labeled(i18n::KEY_UNKNOWN_COMMAND, text),
            StatusMessage::Error => catalog.tr(lang, i18n::KEY_ERROR),
        }
    }
}

/// Outcome emoji
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Success,
    Error,
    Unknown,
}

impl Feedback {
    pub fn emoji(&self) -> &'static str {
        match self {
            Feedback::Success => "✅",
            Feedback::Error => "❌",
            Feedback::Unknown => "❓",
        }
    }
}

/// Echo of the last command, shown apart from the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEcho {
    pub text: String,
    pub feedback: Feedback,
}

/// Help panel contents, frozen at the moment it opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpPanel {
    pub language: Language,
    /// Navigation phrases of the active table, in table order
    pub phrases: Vec<String>,
    pub languages: Vec<Language>,
}

/// Aggregate UI state of the assistant.
///
/// Optional fields are visible when `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceAssistantState {
    pub listening: bool,
    pub status: Option<StatusMessage>,
    pub command_echo: Option<CommandEcho>,
    pub feedback: Option<Feedback>,
    pub help: Option<HelpPanel>,
}

impl VoiceAssistantState {
    pub fn status_visible(&self) -> bool {
        self.status.is_some()
    }

    pub fn help_visible(&self) -> bool {
        self.help.is_some()
    }
}
