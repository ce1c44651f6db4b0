//! Page collaborators
//!
//! The assistant never touches the page directly. It scrolls through a
//! [`Navigator`] and switches the UI language through a [`LanguageSwitcher`].

use crate::error::VoiceNavError;
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Page sections reachable by voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Section {
    History,
    Achievements,
    ForwardService,
    Contact,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::History,
        Section::Achievements,
        Section::ForwardService,
        Section::Contact,
    ];

    /// Symbolic key used in keyword tables
    pub fn key(&self) -> &'static str {
        match self {
            Section::History => "history",
            Section::Achievements => "achievements",
            Section::ForwardService => "forwardService",
            Section::Contact => "contact",
        }
    }

    /// Element id of the section anchor on the page
    pub fn anchor_id(&self) -> &'static str {
        match self {
            Section::History => "history",
            Section::Achievements => "achievements",
            Section::ForwardService => "forward-service",
            Section::Contact => "contact",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = VoiceNavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.key() == s)
            .ok_or_else(|| VoiceNavError::UnknownAction(s.to_string()))
    }
}

impl TryFrom<String> for Section {
    type Error = VoiceNavError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Section> for String {
    fn from(section: Section) -> Self {
        section.key().to_string()
    }
}

/// Scrolls the page to a section.
///
/// A missing anchor is the navigator's problem; nothing is reported back.
pub trait Navigator: Send {
    fn navigate(&mut self, section: Section);
}

/// Reads and changes the active UI language
pub trait LanguageSwitcher: Send {
    fn current_language(&self) -> Language;

    fn change_language(&mut self, language: Language);
}

/// Navigator that only logs the scroll target (terminal front-end)
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&mut self, section: Section) {
        info!("📜 Scrolling to #{}", section.anchor_id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_ids() {
        assert_eq!(Section::ForwardService.anchor_id(), "forward-service");
        assert_eq!(Section::History.anchor_id(), "history");
    }

    #[test]
    fn test_parse_section_keys() {
        assert_eq!(
            "forwardService".parse::<Section>().unwrap(),
            Section::ForwardService
        );
        assert!("forward-service".parse::<Section>().is_err());
    }
}
