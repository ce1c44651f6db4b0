//! VoiceNav - voice-command navigation assistant
//!
//! Terminal front-end: typed lines stand in for speech.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voicenav::assistant::{AssistantEvent, VoiceAssistant};
use voicenav::config::Config;
use voicenav::engine::{TerminalEngineFactory, TerminalFeed};
use voicenav::i18n::{self, Catalog, UiLanguage};
use voicenav::keywords::KeywordTables;
use voicenav::language::Language;
use voicenav::navigation::LogNavigator;
use voicenav::presenter::View;
use voicenav::runtime::{self, AssistantRuntime, TokioScheduler};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial UI language (zh-TW, en, ja)
    #[arg(short, long)]
    language: Option<String>,

    /// Config file (defaults to the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds of silence before the capture ends by itself
    #[arg(long)]
    silence_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_or_init(path)?,
        None => Config::load()?,
    };

    // Setup logging
    let default_level = if args.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("🗣️ VoiceNav v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(code) = &args.language {
        config.ui_language = code.parse::<Language>()?;
    }
    if let Some(secs) = args.silence_timeout {
        config.silence_timeout_secs = secs;
    }

    let tables = KeywordTables::with_overrides(&config.keywords)?;
    let mut catalog = Catalog::builtin();
    let mut locale_dirs = i18n::default_locale_dirs();
    if let Some(dir) = &config.locale_dir {
        locale_dirs.insert(0, PathBuf::from(dir));
    }
    catalog.load_overrides(&locale_dirs);

    let ui_language = UiLanguage::new(config.ui_language);
    let (events, rx) = runtime::event_channel();
    let (speech, feed) = TerminalFeed::new();

    let factory = TerminalEngineFactory::new(
        feed,
        events.clone(),
        Duration::from_secs(config.silence_timeout_secs),
    );
    let assistant = VoiceAssistant::new(
        Box::new(factory),
        Box::new(LogNavigator),
        Box::new(ui_language.clone()),
        Box::new(TokioScheduler::new(events.clone())),
    )
    .with_timings(config.timings())
    .with_keyword_tables(tables);

    let runtime = AssistantRuntime::new(assistant, rx, catalog);
    let mut views = runtime.subscribe();
    let loop_handle = tokio::spawn(runtime.run());

    tokio::spawn(async move {
        let mut previous = views.borrow().clone();
        print_view(None, &previous);
        while views.changed().await.is_ok() {
            let view = views.borrow().clone();
            print_view(Some(&previous), &view);
            previous = view;
        }
    });

    println!("Commands: :start  :stop  :toggle  :close  :lang <code>  :quit");
    println!("Anything else is spoken text (~text = interim, !code = engine error)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        let event = match trimmed {
            ":start" => Some(AssistantEvent::StartListening),
            ":stop" => Some(AssistantEvent::StopListening),
            ":toggle" => Some(AssistantEvent::Toggle),
            ":close" => Some(AssistantEvent::CloseHelp),
            ":quit" | ":q" => break,
            _ => {
                if let Some(code) = trimmed.strip_prefix(":lang ") {
                    match code.parse::<Language>() {
                        Ok(lang) => {
                            ui_language.set(lang);
                            Some(AssistantEvent::UiLanguageChanged(lang))
                        }
                        Err(e) => {
                            warn!("{}", e);
                            None
                        }
                    }
                } else {
                    let _ = speech.send(trimmed.to_string());
                    None
                }
            }
        };
        if let Some(event) = event {
            if events.send(event).is_err() {
                break;
            }
        }
    }

    let _ = events.send(AssistantEvent::Shutdown);
    loop_handle.await?;
    Ok(())
}

fn print_view(previous: Option<&View>, view: &View) {
    if previous.map(|p| &p.toggle) != Some(&view.toggle) {
        println!("[{}] {}", view.toggle.glyph, view.toggle.title);
    }
    if previous.map(|p| &p.status_line) != Some(&view.status_line) {
        if let Some(status) = &view.status_line {
            println!("  {}", status);
        }
    }
    if previous.map(|p| &p.command_echo) != Some(&view.command_echo) {
        if let Some(echo) = &view.command_echo {
            println!("  {}", echo);
        }
    }
    if previous.map(|p| &p.help) != Some(&view.help) {
        if let Some(help) = &view.help {
            println!("  ── {} ──", help.title);
            for item in &help.items {
                println!("    {}", item);
            }
            println!("  {}: {}", help.languages_title, help.languages.join(" / "));
        }
    }
}
