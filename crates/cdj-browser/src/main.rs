//! CDJ Browser - browse a player's media catalog from the terminal
//!
//! This is the UI glue around the navigation engine. It:
//! 1. Loads the YAML config (writing defaults on first run) and a catalog fixture
//! 2. Starts the catalog service thread that answers queries
//! 3. Runs the owning-context loop, selecting on stdin lines and the
//!    mailbox wake-up channel
//!
//! ## Command line flags
//!
//! - `--config <path>`: config file (default ~/.config/cdj-browser/config.yaml)
//! - `--player <n>`: player to browse
//! - `--fixture <path>`: catalog fixture to serve

mod config;
mod repl;

use anyhow::Context;
use cdj_browser_core::browser::{drain_wakeups, BrowserEvent, ViewDescriptor};
use cdj_browser_core::catalog::{CatalogService, MemoryCatalog};
use cdj_browser_core::{
    Collaborators, ItemId, NavigationEngine, PlaybackDispatcher, PlayerNumber, RequestMailbox, Slot,
    UserAction,
};
use config::{load_or_create, CliArgs};
use crossbeam::channel::{Receiver, Sender};
use crossbeam::select;
use repl::{parse_command, Command, HELP};
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Dispatcher that only reports load requests
struct LoggingDispatcher;

impl PlaybackDispatcher for LoggingDispatcher {
    fn load_track(&self, target: PlayerNumber, source: PlayerNumber, slot: Slot, track_id: ItemId) {
        log::info!(
            "Dispatcher: Player {} loads track {} from player {} {}",
            target,
            track_id,
            source,
            slot
        );
        println!("Sent track {} to player {}", track_id, target);
    }
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = CliArgs::parse(std::env::args().skip(1))?;
    let config_path = cli.config_path();
    let mut config = load_or_create(&config_path);
    cli.apply(&mut config);

    log::info!("cdj-browser starting up, browsing player {}", config.player);

    let catalog = MemoryCatalog::load(&config.catalog_fixture)
        .with_context(|| format!("Failed to load catalog fixture {:?}", config.catalog_fixture))?;
    let registry = Arc::new(catalog.registry());
    log::info!(
        "Catalog fixture loaded: players {:?} online {:?}",
        catalog.players(),
        registry.players()
    );

    let client = CatalogService::spawn(
        Arc::new(catalog),
        Duration::from_millis(config.reply_delay_ms),
    )
    .map_err(anyhow::Error::msg)?;
    let client = Arc::new(client);

    let (mailbox, wake_rx) = RequestMailbox::with_wake_channel();
    let collaborators = Collaborators {
        gateway: client.clone(),
        registry,
        dispatcher: Arc::new(LoggingDispatcher),
    };
    let mut engine = NavigationEngine::new(
        config.player,
        config.browser.clone(),
        collaborators,
        Arc::new(mailbox),
    );

    println!("CDJ Browser - type 'help' for commands");
    println!();

    let (input_tx, input_rx) = crossbeam::channel::unbounded();
    spawn_stdin_reader(input_tx)?;

    let mut screen = Screen::default();
    screen.show(engine.start());
    run_loop(&mut engine, &mut screen, &input_rx, &wake_rx);

    client.shutdown();
    log::info!("cdj-browser stopped");
    Ok(())
}

fn spawn_stdin_reader(input_tx: Sender<String>) -> anyhow::Result<()> {
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if input_tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("Failed to spawn stdin reader thread")?;
    Ok(())
}

/// The owning context: the only place engine state is touched
fn run_loop(
    engine: &mut NavigationEngine,
    screen: &mut Screen,
    input_rx: &Receiver<String>,
    wake_rx: &Receiver<()>,
) {
    loop {
        select! {
            recv(input_rx) -> line => {
                let Ok(line) = line else {
                    log::info!("Input closed");
                    break;
                };
                match parse_command(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => execute(engine, screen, command),
                    Ok(None) => {}
                    Err(message) => println!("{}", message),
                }
            }
            recv(wake_rx) -> token => {
                // One drain covers every token queued so far
                if token.is_err() || !drain_wakeups(wake_rx) {
                    break;
                }
                screen.show(engine.drain());
            }
        }
    }
}

fn execute(engine: &mut NavigationEngine, screen: &mut Screen, command: Command) {
    let events = match command {
        Command::Show => {
            screen.reprint();
            return;
        }
        Command::Help => {
            println!("{}", HELP);
            return;
        }
        Command::Open(index) => match screen.view.as_ref().and_then(|v| v.row_tag(index)) {
            Some(tag) => engine.handle(UserAction::SelectRow(tag.clone())),
            None => {
                println!("No row {} to open", index + 1);
                return;
            }
        },
        Command::Back => engine.handle(UserAction::Back),
        Command::Sort(sort) => {
            println!("Sort order: {}", sort);
            engine.handle(UserAction::SetSort(sort))
        }
        Command::Load(target) => {
            if !engine.load_into_player(target) {
                println!("Open a track first");
            }
            return;
        }
        Command::Media(slot) => engine.handle(UserAction::MediaChanged(slot)),
        Command::Player(player) => engine.handle(UserAction::Retarget(player)),
        Command::Quit => return,
    };
    screen.show(events);
}

/// Last rendered output, kept for `open` and `ls`
#[derive(Default)]
struct Screen {
    view: Option<ViewDescriptor>,
    metadata: Option<String>,
}

impl Screen {
    fn show(&mut self, events: Vec<BrowserEvent>) {
        for event in events {
            print!("{}", repl::render_event(&event));
            match event {
                BrowserEvent::RenderView(view) => {
                    self.view = Some(view);
                    self.metadata = None;
                }
                BrowserEvent::RenderMetadata(fields) => {
                    self.metadata = Some(repl::render_metadata(&fields));
                }
                BrowserEvent::ButtonAvailability(_) => {}
            }
        }
    }

    fn reprint(&self) {
        match &self.view {
            Some(view) => print!("{}", repl::render_view(view)),
            None => println!("Nothing to show"),
        }
        if let Some(metadata) = &self.metadata {
            print!("{}", metadata);
        }
    }
}
