//! Command Interpreter
//!
//! Maps a final transcript onto at most one [`Action`].

use crate::keywords::{Action, KeywordTables};
use crate::language::Language;
use tracing::{debug, info};

/// A transcript that matched a keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMatch {
    pub action: Action,
    /// The table phrase that matched (lowercased)
    pub phrase: String,
}

/// Lowercase and trim a transcript before matching
pub fn normalize_transcript(transcript: &str) -> String {
    transcript.trim().to_lowercase()
}

/// Find the action for `transcript` in the table of `language`.
///
/// Scans the table in order and returns the first phrase that is a substring
/// of the normalized transcript. No scoring and no fuzzy matching.
pub fn interpret(
    transcript: &str,
    language: Language,
    tables: &KeywordTables,
) -> Option<CommandMatch> {
    let normalized = normalize_transcript(transcript);
    if normalized.is_empty() {
        return None;
    }

    let table = tables.table_for(language)?;
    match table.find(&normalized) {
        Some(entry) => {
            info!(
                "🎯 Matched keyword '{}' -> {} ({})",
                entry.phrase, entry.action, language
            );
            Some(CommandMatch {
                action: entry.action,
                phrase: entry.phrase.clone(),
            })
        }
        None => {
            debug!("No keyword matched for '{}' ({})", normalized, language);
            None
        }
    }
}
