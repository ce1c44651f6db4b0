//! VoiceNav Error Types
//!
//! Crate-wide error enum plus the recognition engine error taxonomy.

use thiserror::Error;

/// Errors raised while parsing identifiers and building keyword tables
#[derive(Error, Debug)]
pub enum VoiceNavError {
    #[error("Unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Keyword table error: {0}")]
    Keywords(String),
}

/// Errors reported by a speech recognition engine.
///
/// Codes follow the names continuous speech engines use on the wire
/// (`not-allowed`, `no-speech`, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("microphone permission denied")]
    NotAllowed,

    #[error("recognition service not allowed")]
    ServiceNotAllowed,

    #[error("no speech detected")]
    NoSpeech,

    #[error("recognition aborted")]
    Aborted,

    #[error("audio capture failed")]
    AudioCapture,

    #[error("network failure")]
    Network,

    #[error("language not supported")]
    LanguageNotSupported,

    #[error("engine is already started")]
    AlreadyStarted,

    #[error("{0}")]
    Other(String),
}

impl RecognitionError {
    /// Parse an engine error code
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "not-allowed" => Self::NotAllowed,
            "service-not-allowed" => Self::ServiceNotAllowed,
            "no-speech" => Self::NoSpeech,
            "aborted" => Self::Aborted,
            "audio-capture" => Self::AudioCapture,
            "network" => Self::Network,
            "language-not-supported" => Self::LanguageNotSupported,
            "invalid-state" => Self::AlreadyStarted,
            other => Self::Other(other.to_string()),
        }
    }

    /// Permission-class errors end the session; the user has to press start again.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NotAllowed | Self::ServiceNotAllowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_errors_are_fatal() {
        assert!(RecognitionError::from_code("not-allowed").is_fatal());
        assert!(RecognitionError::from_code("service-not-allowed").is_fatal());
        assert!(!RecognitionError::from_code("no-speech").is_fatal());
        assert!(!RecognitionError::from_code("network").is_fatal());
    }

    #[test]
    fn test_parse_errors_name_the_input() {
        let err = "klingon".parse::<crate::language::Language>().unwrap_err();
        assert!(matches!(err, VoiceNavError::UnknownLanguage(_)));
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn test_unknown_code_is_kept() {
        assert_eq!(
            RecognitionError::from_code("bad-grammar"),
            RecognitionError::Other("bad-grammar".to_string())
        );
    }
}
