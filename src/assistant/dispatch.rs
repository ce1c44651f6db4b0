//! Navigation/Language Dispatcher
//!
//! Executes the action the interpreter picked for a final transcript.

use super::timers::Timer;
use super::{CommandEcho, Feedback, StatusMessage, VoiceAssistant};
use crate::interpreter::CommandMatch;
use crate::keywords::Action;
use crate::language::Language;
use tracing::info;

impl VoiceAssistant {
    /// Run a matched command. Any successful command closes the help panel.
    pub(super) fn dispatch(&mut self, command: CommandMatch) {
        self.dismiss_help();
        self.show_feedback(Feedback::Success);
        self.show_echo(CommandEcho {
            text: command.phrase.clone(),
            feedback: Feedback::Success,
        });

        match command.action {
            Action::Navigate(section) => {
                info!("🧭 Navigating to {} ('{}')", section, command.phrase);
                self.navigator.navigate(section);
                self.show_status(StatusMessage::Navigating(command.phrase));
            }
            Action::SwitchLanguage(lang) => self.switch_language(lang, command.phrase),
        }
    }

    /// Change the UI language, then replace the session with one bound to
    /// the new language once the change has settled.
    fn switch_language(&mut self, lang: Language, phrase: String) {
        info!("🌐 Switching language to {} ('{}')", lang, phrase);
        self.language.change_language(lang);
        self.show_status(StatusMessage::LanguageChanged(phrase));
        self.rebuild_session(lang);
    }

    /// Nothing matched: acknowledge, then offer help after a delay unless the
    /// user dismisses it first.
    pub(super) fn dispatch_unknown(&mut self, transcript: &str) {
        let transcript = transcript.trim().to_string();
        info!("❓ No command in '{}'", transcript);
        self.show_feedback(Feedback::Unknown);
        self.show_echo(CommandEcho {
            text: transcript.clone(),
            feedback: Feedback::Unknown,
        });
        self.show_status(StatusMessage::UnknownCommand(transcript));

        let ticket = self.tickets.help;
        self.scheduler
            .schedule(self.timings.help_delay, Timer::OpenHelp { ticket });
    }
}
