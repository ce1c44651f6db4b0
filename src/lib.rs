//! VoiceNav Library
//!
//! Core modules for the VoiceNav voice-command navigation assistant.

pub mod assistant;
pub mod config;
pub mod engine;
pub mod error;
pub mod i18n;
pub mod interpreter;
pub mod keywords;
pub mod language;
pub mod navigation;
pub mod presenter;
pub mod runtime;
pub mod session;
