mod table_engine;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use translit_ime_core::entry::ADDON_PREFIX;
use translit_ime_core::key::keysym;
use translit_ime_core::{
    Config, HostEvent, ImeEngine, InputMethodEntry, Key, KeyEvent, RecordingHost, SessionId,
};

use table_engine::TableEngine;

/// Replay key presses through a composition session and print every
/// commit and preedit update the host would receive.
#[derive(Parser)]
#[command(name = "ime-replay")]
struct Args {
    /// JSON rule table, keyed by script name
    #[arg(long)]
    table: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "deva")]
    script: String,

    /// Log session and engine activity at debug level
    #[arg(long, short)]
    verbose: bool,

    /// Literal text, or one of <bs> <esc> <ret> <shift> <space> <tab>
    keys: Vec<String>,
}

fn parse_token(token: &str) -> Result<Vec<KeyEvent>> {
    let key = match token {
        "<bs>" => Key::BackSpace,
        "<esc>" => Key::Escape,
        "<ret>" => Key::Return,
        "<shift>" => Key::ShiftLeft,
        "<space>" => Key::Space,
        "<tab>" => Key::from_keysym(keysym::TAB),
        _ if token.len() > 2 && token.starts_with('<') && token.ends_with('>') => {
            bail!("unknown key token {}", token)
        }
        _ => return Ok(token.chars().map(KeyEvent::press).collect()),
    };
    Ok(vec![KeyEvent::press(key)])
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let engine = TableEngine::from_json_file(&args.table)?;
    if !engine.has_script(&args.script) {
        bail!(
            "script {} not in {} (available: {})",
            args.script,
            args.table.display(),
            engine.scripts().join(", ")
        );
    }

    let config = match &args.config {
        Some(path) => Config::load_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    let mut events = Vec::new();
    for token in &args.keys {
        events.extend(parse_token(token)?);
    }

    let entry = InputMethodEntry::new(format!("{}{}", ADDON_PREFIX, args.script));
    let mut ime = ImeEngine::new(engine).with_config(config);
    let mut host = RecordingHost::new();
    let id = SessionId(1);
    ime.create_session(id);

    let mut committed = String::new();
    for event in events {
        let result = ime.process_key(&mut host, id, &entry, event);
        println!("{:?} -> {:?}", event.key, result);
        for callback in host.take_events() {
            match callback {
                HostEvent::Commit { text, .. } => {
                    println!("    commit  {:?}", text);
                    committed.push_str(&text);
                }
                HostEvent::Preedit { text, .. } => println!("    preedit {:?}", text),
            }
        }
    }

    if let Some(session) = ime.session(id) {
        println!();
        println!("raw keys:  {:?}", session.raw_keys());
        println!("preedit:   {:?}", session.preedit());
        println!("committed: {:?}", committed);
    }
    Ok(())
}
