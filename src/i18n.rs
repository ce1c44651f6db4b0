//! Internationalization (i18n) Support
//!
//! String catalog for every user-visible assistant message, plus the shared
//! UI language cell the page and the assistant both read.

use crate::language::Language;
use crate::navigation::LanguageSwitcher;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

pub const KEY_LISTENING: &str = "voiceAssistant.listening";
pub const KEY_RECOGNIZED: &str = "voiceAssistant.recognized";
pub const KEY_NAVIGATING: &str = "voiceAssistant.navigating";
pub const KEY_LANGUAGE_CHANGED: &str = "voiceAssistant.languageChanged";
pub const KEY_UNKNOWN_COMMAND: &str = "voiceAssistant.unknownCommand";
pub const KEY_ERROR: &str = "voiceAssistant.error";
pub const KEY_HELP_TITLE: &str = "voiceAssistant.helpTitle";
pub const KEY_SUPPORTED_LANGUAGES: &str = "voiceAssistant.supportedLanguages";
pub const KEY_START_LISTENING: &str = "voiceAssistant.startListening";
pub const KEY_STOP_LISTENING: &str = "voiceAssistant.stopListening";

const ZH_TW_STRINGS: &[(&str, &str)] = &[
    (KEY_LISTENING, "正在聆聽"),
    (KEY_RECOGNIZED, "辨識結果"),
    (KEY_NAVIGATING, "正在前往"),
    (KEY_LANGUAGE_CHANGED, "語言已切換"),
    (KEY_UNKNOWN_COMMAND, "無法辨識的指令"),
    (KEY_ERROR, "語音辨識發生錯誤"),
    (KEY_HELP_TITLE, "您可以說"),
    (KEY_SUPPORTED_LANGUAGES, "支援的語言"),
    (KEY_START_LISTENING, "開始語音辨識"),
    (KEY_STOP_LISTENING, "停止語音辨識"),
];

const EN_STRINGS: &[(&str, &str)] = &[
    (KEY_LISTENING, "Listening"),
    (KEY_RECOGNIZED, "Recognized"),
    (KEY_NAVIGATING, "Navigating to"),
    (KEY_LANGUAGE_CHANGED, "Language changed"),
    (KEY_UNKNOWN_COMMAND, "Command not recognized"),
    (KEY_ERROR, "Speech recognition error"),
    (KEY_HELP_TITLE, "You can say"),
    (KEY_SUPPORTED_LANGUAGES, "Supported languages"),
    (KEY_START_LISTENING, "Start voice commands"),
    (KEY_STOP_LISTENING, "Stop voice commands"),
];

const JA_STRINGS: &[(&str, &str)] = &[
    (KEY_LISTENING, "聞き取り中"),
    (KEY_RECOGNIZED, "認識結果"),
    (KEY_NAVIGATING, "移動中"),
    (KEY_LANGUAGE_CHANGED, "言語を切り替えました"),
    (KEY_UNKNOWN_COMMAND, "コマンドを認識できません"),
    (KEY_ERROR, "音声認識エラー"),
    (KEY_HELP_TITLE, "話せるコマンド"),
    (KEY_SUPPORTED_LANGUAGES, "対応言語"),
    (KEY_START_LISTENING, "音声認識を開始"),
    (KEY_STOP_LISTENING, "音声認識を停止"),
];

lazy_static! {
    static ref BUILTIN_STRINGS: HashMap<Language, HashMap<String, String>> = {
        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>()
        };
        HashMap::from([
            (Language::ZhTw, to_map(ZH_TW_STRINGS)),
            (Language::En, to_map(EN_STRINGS)),
            (Language::Ja, to_map(JA_STRINGS)),
        ])
    };
}

/// Translation catalog (language -> key -> value)
#[derive(Debug, Clone)]
pub struct Catalog {
    translations: HashMap<Language, HashMap<String, String>>,
    fallback: Language,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            translations: BUILTIN_STRINGS.clone(),
            fallback: Language::default(),
        }
    }

    /// Translate a key. Falls back to the fallback language, then to the key itself.
    pub fn tr(&self, lang: Language, key: &str) -> String {
        if let Some(value) = self.translations.get(&lang).and_then(|t| t.get(key)) {
            return value.clone();
        }
        if let Some(value) = self
            .translations
            .get(&self.fallback)
            .and_then(|t| t.get(key))
        {
            return value.clone();
        }
        key.to_string()
    }

    /// Merge `<dir>/<lang>/voicenav.json` files over the built-in strings.
    ///
    /// The first directory holding a file for a language wins; unreadable or
    /// malformed files are skipped.
    pub fn load_overrides(&mut self, locale_dirs: &[PathBuf]) {
        for lang in Language::ALL {
            for dir in locale_dirs {
                let path = dir.join(lang.code()).join("voicenav.json");
                if let Some(strings) = read_locale_file(&path) {
                    debug!(
                        "Loaded {} translations for '{}' from {}",
                        strings.len(),
                        lang,
                        path.display()
                    );
                    self.translations.entry(lang).or_default().extend(strings);
                    break;
                }
            }
        }
    }
}

fn read_locale_file(path: &Path) -> Option<HashMap<String, String>> {
    if !path.exists() {
        return None;
    }
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str::<HashMap<String, String>>(&content) {
        Ok(map) => Some(map),
        Err(e) => {
            warn!("⚠️ Ignoring malformed locale file {}: {}", path.display(), e);
            None
        }
    }
}

/// Standard locale directories, most specific first
pub fn default_locale_dirs() -> Vec<PathBuf> {
    [
        dirs::data_local_dir().map(|p| p.join("voicenav/locale")),
        Some(PathBuf::from("/usr/local/share/voicenav/locale")),
        Some(PathBuf::from("locale")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Shared active UI language.
///
/// Clones share the same cell, so the page and the assistant see the same value.
#[derive(Debug, Clone, Default)]
pub struct UiLanguage {
    current: Arc<RwLock<Language>>,
}

impl UiLanguage {
    pub fn new(lang: Language) -> Self {
        Self {
            current: Arc::new(RwLock::new(lang)),
        }
    }

    pub fn get(&self) -> Language {
        match self.current.read() {
            Ok(lang) => *lang,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set(&self, lang: Language) {
        match self.current.write() {
            Ok(mut current) => *current = lang,
            Err(poisoned) => *poisoned.into_inner() = lang,
        }
        info!("🌐 Language set to: {}", lang);
    }
}

impl LanguageSwitcher for UiLanguage {
    fn current_language(&self) -> Language {
        self.get()
    }

    fn change_language(&mut self, language: Language) {
        self.set(language);
    }
}
