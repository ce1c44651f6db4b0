//! Feedback Presenter
//!
//! Pure mapping from [`VoiceAssistantState`] to what the page shows. No
//! decisions are made here.

use crate::assistant::VoiceAssistantState;
use crate::i18n::{self, Catalog};
use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAnimation {
    /// Idle bobbing
    Float,
    /// Listening pulse
    Pulse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleView {
    pub glyph: &'static str,
    pub title: String,
    pub animation: ToggleAnimation,
    /// False when the platform has no speech recognition
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpView {
    pub title: String,
    pub items: Vec<String>,
    pub languages_title: String,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub toggle: ToggleView,
    pub status_line: Option<String>,
    pub command_echo: Option<String>,
    pub feedback: Option<&'static str>,
    pub help: Option<HelpView>,
}

pub fn render(
    state: &VoiceAssistantState,
    catalog: &Catalog,
    lang: Language,
    available: bool,
) -> View {
    let toggle = if state.listening {
        ToggleView {
            glyph: "🛑",
            title: catalog.tr(lang, i18n::KEY_STOP_LISTENING),
            animation: ToggleAnimation::Pulse,
            enabled: available,
        }
    } else {
        ToggleView {
            glyph: "🤖",
            title: catalog.tr(lang, i18n::KEY_START_LISTENING),
            animation: ToggleAnimation::Float,
            enabled: available,
        }
    };

    let help = state.help.as_ref().map(|panel| HelpView {
        title: catalog.tr(lang, i18n::KEY_HELP_TITLE),
        items: panel
            .phrases
            .iter()
            .map(|phrase| format!("💬 \"{}\"", phrase))
            .collect(),
        languages_title: catalog.tr(lang, i18n::KEY_SUPPORTED_LANGUAGES),
        languages: panel
            .languages
            .iter()
            .map(|l| format!("{} {}", l.flag(), l.native_name()))
            .collect(),
    });

    View {
        toggle,
        status_line: state.status.as_ref().map(|s| s.render(catalog, lang)),
        command_echo: state
            .command_echo
            .as_ref()
            .map(|echo| format!("{} {}", echo.feedback.emoji(), echo.text)),
        feedback: state.feedback.map(|f| f.emoji()),
        help,
    }
}
