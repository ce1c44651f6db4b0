//! Keyword Tables
//!
//! Per-language, ordered phrase → action mappings. Order is the match
//! priority: the first phrase contained in a transcript wins, so longer and
//! more specific phrases must come before the generic ones they contain
//! (`發展歷史` before `歷史`, `forward service` before `service`).

use crate::error::VoiceNavError;
use crate::language::Language;
use crate::navigation::Section;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// What a recognized phrase asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    /// Scroll to a page section
    Navigate(Section),
    /// Switch the UI (and recognition) language
    SwitchLanguage(Language),
}

impl Action {
    pub fn is_navigation(&self) -> bool {
        matches!(self, Action::Navigate(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Navigate(section) => write!(f, "{}", section),
            Action::SwitchLanguage(lang) => write!(f, "{}", lang),
        }
    }
}

impl FromStr for Action {
    type Err = VoiceNavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(section) = s.parse::<Section>() {
            return Ok(Action::Navigate(section));
        }
        s.parse::<Language>()
            .map(Action::SwitchLanguage)
            .map_err(|_| VoiceNavError::UnknownAction(s.to_string()))
    }
}

impl TryFrom<String> for Action {
    type Error = VoiceNavError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

/// One phrase binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub phrase: String,
    pub action: Action,
}

/// Ordered phrase table for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<KeywordEntry>,
}

impl KeywordTable {
    /// Build a table, lowercasing every phrase. Empty phrases are rejected
    /// since they would match every transcript.
    pub fn new(entries: Vec<KeywordEntry>) -> Result<Self, VoiceNavError> {
        let mut table = Vec::with_capacity(entries.len());
        for entry in entries {
            let phrase = entry.phrase.trim().to_lowercase();
            if phrase.is_empty() {
                return Err(VoiceNavError::Keywords(format!(
                    "empty phrase bound to '{}'",
                    entry.action
                )));
            }
            table.push(KeywordEntry {
                phrase,
                action: entry.action,
            });
        }
        Ok(Self { entries: table })
    }

    fn from_static(pairs: &[(&str, &str)]) -> Self {
        let entries = pairs
            .iter()
            .filter_map(|(phrase, action)| {
                action.parse().ok().map(|action| KeywordEntry {
                    phrase: phrase.to_lowercase(),
                    action,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose phrase occurs in `normalized`
    pub fn find(&self, normalized: &str) -> Option<&KeywordEntry> {
        self.entries
            .iter()
            .find(|entry| normalized.contains(entry.phrase.as_str()))
    }

    /// Phrases listed in the help panel: every navigation phrase, in table order
    pub fn help_phrases(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.action.is_navigation())
            .map(|entry| entry.phrase.clone())
            .collect()
    }
}

const ZH_TW_KEYWORDS: &[(&str, &str)] = &[
    ("發展歷史", "history"),
    ("歷史", "history"),
    ("中衛成就", "achievements"),
    ("成就", "achievements"),
    ("前瞻服務部", "forwardService"),
    ("前瞻服務", "forwardService"),
    ("服務", "forwardService"),
    ("聯絡洽詢", "contact"),
    ("聯絡我們", "contact"),
    ("聯絡", "contact"),
    ("中文", "zh-TW"),
    ("英文", "en"),
    ("日文", "ja"),
];

const EN_KEYWORDS: &[(&str, &str)] = &[
    ("development history", "history"),
    ("history", "history"),
    ("achievements", "achievements"),
    ("forward service", "forwardService"),
    ("service", "forwardService"),
    ("contact", "contact"),
    ("chinese", "zh-TW"),
    ("english", "en"),
    ("japanese", "ja"),
];

const JA_KEYWORDS: &[(&str, &str)] = &[
    ("発展歴史", "history"),
    ("歴史", "history"),
    ("中衛の成果", "achievements"),
    ("成果", "achievements"),
    ("先見サービス部", "forwardService"),
    ("サービス", "forwardService"),
    ("連絡相談", "contact"),
    ("連絡", "contact"),
    ("中国語", "zh-TW"),
    ("英語", "en"),
    ("日本語", "ja"),
];

lazy_static! {
    static ref BUILTIN_TABLES: HashMap<Language, KeywordTable> = HashMap::from([
        (Language::ZhTw, KeywordTable::from_static(ZH_TW_KEYWORDS)),
        (Language::En, KeywordTable::from_static(EN_KEYWORDS)),
        (Language::Ja, KeywordTable::from_static(JA_KEYWORDS)),
    ]);
}

/// Keyword tables for every language, with a fallback language
#[derive(Debug, Clone)]
pub struct KeywordTables {
    tables: HashMap<Language, KeywordTable>,
    fallback: Language,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KeywordTables {
    /// The site's built-in tables
    pub fn builtin() -> Self {
        Self {
            tables: BUILTIN_TABLES.clone(),
            fallback: Language::default(),
        }
    }

    /// Empty set of tables; lookups fall back to `fallback`
    pub fn empty(fallback: Language) -> Self {
        Self {
            tables: HashMap::new(),
            fallback,
        }
    }

    /// Built-in tables with whole-table replacements from configuration
    pub fn with_overrides(
        overrides: &HashMap<Language, Vec<KeywordEntry>>,
    ) -> Result<Self, VoiceNavError> {
        let mut tables = Self::builtin();
        for (lang, entries) in overrides {
            let table = KeywordTable::new(entries.clone())?;
            info!(
                "🗂️ Keyword table for {} overridden ({} phrases)",
                lang,
                table.len()
            );
            tables.insert(*lang, table);
        }
        Ok(tables)
    }

    pub fn insert(&mut self, lang: Language, table: KeywordTable) {
        self.tables.insert(lang, table);
    }

    pub fn fallback(&self) -> Language {
        self.fallback
    }

    /// Table for `lang`, or the fallback language's table if there is none
    pub fn table_for(&self, lang: Language) -> Option<&KeywordTable> {
        match self.tables.get(&lang) {
            Some(table) => Some(table),
            None => {
                debug!("No keyword table for {}, using {}", lang, self.fallback);
                self.tables.get(&self.fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_keep_order() {
        let tables = KeywordTables::builtin();
        let zh = tables.table_for(Language::ZhTw).unwrap();
        assert_eq!(zh.len(), 13);
        assert_eq!(zh.entries()[0].phrase, "發展歷史");
        assert_eq!(zh.entries()[1].phrase, "歷史");
        assert_eq!(
            zh.entries()[11].action,
            Action::SwitchLanguage(Language::En)
        );
    }

    #[test]
    fn test_help_phrases_skip_language_entries() {
        let tables = KeywordTables::builtin();
        let en = tables.table_for(Language::En).unwrap();
        assert_eq!(
            en.help_phrases(),
            vec![
                "development history",
                "history",
                "achievements",
                "forward service",
                "service",
                "contact"
            ]
        );
    }

    #[test]
    fn test_new_lowercases_and_rejects_empty() {
        let table = KeywordTable::new(vec![KeywordEntry {
            phrase: "  Contact Us ".into(),
            action: Action::Navigate(Section::Contact),
        }])
        .unwrap();
        assert_eq!(table.entries()[0].phrase, "contact us");

        let err = KeywordTable::new(vec![KeywordEntry {
            phrase: "   ".into(),
            action: Action::Navigate(Section::Contact),
        }]);
        assert!(err.is_err());
    }

    #[test]
    fn test_fallback_table() {
        let mut tables = KeywordTables::empty(Language::ZhTw);
        tables.insert(Language::ZhTw, KeywordTable::from_static(ZH_TW_KEYWORDS));
        let table = tables.table_for(Language::Ja).unwrap();
        assert_eq!(table.entries()[0].phrase, "發展歷史");
    }

    #[test]
    fn test_action_serde() {
        let entry: KeywordEntry =
            serde_json::from_str(r#"{"phrase":"about us","action":"history"}"#).unwrap();
        assert_eq!(entry.action, Action::Navigate(Section::History));

        let entry: KeywordEntry =
            serde_json::from_str(r#"{"phrase":"nihongo","action":"ja"}"#).unwrap();
        assert_eq!(entry.action, Action::SwitchLanguage(Language::Ja));

        let bad: Result<KeywordEntry, _> =
            serde_json::from_str(r#"{"phrase":"x","action":"pricing"}"#);
        assert!(bad.is_err());
    }
}
