//! Supported UI languages

use crate::error::VoiceNavError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language the site (and the assistant) can be switched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    /// Traditional Chinese, the site default
    #[default]
    ZhTw,
    En,
    Ja,
}

impl Language {
    /// Every supported language, in selector order
    pub const ALL: [Language; 3] = [Language::ZhTw, Language::En, Language::Ja];

    /// Language code used by the translation layer
    pub fn code(&self) -> &'static str {
        match self {
            Language::ZhTw => "zh-TW",
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    /// Locale tag handed to the speech engine.
    ///
    /// The default language is region-qualified, the others are bare codes.
    pub fn engine_tag(&self) -> &'static str {
        self.code()
    }

    /// Name of the language written in itself
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::ZhTw => "繁體中文",
            Language::En => "English",
            Language::Ja => "日本語",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Language::ZhTw => "🇹🇼",
            Language::En => "🇺🇸",
            Language::Ja => "🇯🇵",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = VoiceNavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "zh-TW" | "zh-tw" | "zh_TW" => Ok(Language::ZhTw),
            "en" | "en-US" | "en-GB" => Ok(Language::En),
            "ja" | "ja-JP" => Ok(Language::Ja),
            other => Err(VoiceNavError::UnknownLanguage(other.to_string())),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = VoiceNavError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_tags() {
        assert_eq!(Language::ZhTw.engine_tag(), "zh-TW");
        assert_eq!(Language::En.engine_tag(), "en");
        assert_eq!(Language::Ja.engine_tag(), "ja");
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!("zh-TW".parse::<Language>().unwrap(), Language::ZhTw);
        assert_eq!(" en ".parse::<Language>().unwrap(), Language::En);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Language::ZhTw).unwrap();
        assert_eq!(json, "\"zh-TW\"");
        let lang: Language = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(lang, Language::Ja);
    }
}
