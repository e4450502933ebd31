// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Streaming Queue Player TUI.
//!
//! A terminal-based player for a remote music catalog: search, queue, and
//! listen continuously while stream URLs are resolved in the background
//! and playback advances automatically at end of track.
//!
//! This application coordinates a TUI frontend built with `ratatui` and a
//! background processing layer.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, UI rendering, and
//!   every state commit (it is the orchestrator's single writer).
//! * **Background Workers** handle persistence, catalog queries, and
//!   stream resolution via asynchronous task processing.
//! * **Event Loops** capture user input, engine observations, and system
//!   ticks to drive the playback state machine.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure
//! the terminal state is preserved even in the event of a crash.
//! Communication between the UI and background workers is handled via
//! `std::sync::mpsc` channels.

mod catalog;
mod commander;
mod components;
mod config;
mod error;
mod events;
mod model;
mod orchestrator;
mod player;
mod render;
mod resolver;
mod store;
mod tasks;
mod theme;
mod util;

use anyhow::{Context, Result};
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};

use crate::{
    catalog::CatalogClient,
    commander::Commander,
    components::TrackTable,
    config::AppConfig,
    events::{AppEvent, process_events},
    orchestrator::Orchestrator,
    player::AudioPlayer,
    resolver::StreamResolver,
    tasks::AppTask,
    theme::Theme,
};

/// Interval of the engine poll tick feeding the auto-advance transition.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Application state.
struct App {
    pub config: AppConfig,
    pub theme: Theme,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,
    pub task_tx: Sender<AppTask>,

    pub audio_player: AudioPlayer,
    pub catalog: CatalogClient,
    pub resolver: StreamResolver,

    pub orchestrator: Orchestrator,

    pub results_view: TrackTable,
    pub up_next_view: TrackTable,
    pub commander: Commander,

    // Last-known engine observations; polling reads degrade to these
    // defaults rather than querying the engine directly.
    pub engine_idle: bool,
    pub player_time: Option<f64>,
    pub player_duration: Option<u64>,
    pub volume: Option<u32>,

    pub status_line: Option<String>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig, task_tx: Sender<AppTask>) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        let audio_player_event_tx = event_tx.clone();

        let catalog = CatalogClient::new(&config.api_endpoint);
        let resolver = StreamResolver::new(&config.resolver_binary);

        Ok(Self {
            config,
            theme: Theme::default(),
            event_tx,
            event_rx,
            task_tx,
            audio_player: AudioPlayer::new(audio_player_event_tx)?,
            catalog,
            resolver,
            orchestrator: Orchestrator::new(),
            results_view: TrackTable::new(),
            up_next_view: TrackTable::new(),
            commander: Commander::new(),
            // The engine is idle until the first stream loads.
            engine_idle: true,
            player_time: None,
            player_duration: None,
            volume: None,
            status_line: Some("Type :f <query> or / to search".to_string()),
        })
    }

    fn focused_len(&self) -> usize {
        self.orchestrator.queue(self.orchestrator.focus()).len()
    }

    fn focused_view(&self) -> &TrackTable {
        match self.orchestrator.focus() {
            model::QueueId::Results => &self.results_view,
            model::QueueId::UpNext => &self.up_next_view,
        }
    }

    fn focused_view_mut(&mut self) -> &mut TrackTable {
        match self.orchestrator.focus() {
            model::QueueId::Results => &mut self.results_view,
            model::QueueId::UpNext => &mut self.up_next_view,
        }
    }
}

/// The entry point of the application.
///
/// Sets up logging and the communication channels, initializes the
/// application state, manages the terminal lifecycle, and returns an
/// error if any part of the execution fails.
fn main() -> Result<()> {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Warn);
    clog.init();

    let config = config::load_config();

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(config, task_tx).context("Failed to initalise application")?;

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app, task_rx);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background color based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate
/// screen cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd
    // get a thin black outline
    util::term::set_terminal_bg(&theme::Theme::to_hex(app.theme.background_colour));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including
/// disabling raw mode, leaving the alternate screen, and resetting the
/// background color.
///
/// This function is designed to be "best-effort" and does not return a
/// result, as it is typically called during cleanup or panic handling.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg();
    terminal.show_cursor().ok();
}

/// Starts the application's background workers and enters the main event
/// loop.
///
/// This function spawns several long-running background threads:
/// * A task worker to process asynchronous [`AppTask`]s against the store
///   and catalog.
/// * An input thread to poll for system keyboard events.
/// * A tick thread that drives the engine idle poll (and with it the
///   auto-advance transition).
///
/// After spawning the workers, it hands control to [`process_events`] to
/// manage the UI and state updates.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an
/// unrecoverable application error.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    task_rx: Receiver<AppTask>,
) -> Result<()> {
    // Spawn a background worker to process application tasks
    // asynchronously.
    let worker_event_tx = app.event_tx.clone();
    tasks::spawn_task_worker(&app.config, app.catalog.clone(), task_rx, worker_event_tx);

    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                tx_keys.send(AppEvent::Key(key)).ok();
            }
        }
    });

    // Spawn a thread to send a periodic tick application event; this both
    // refreshes the interface and feeds the idle poll.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            let _ = tx_tick.send(AppEvent::Tick);
            thread::sleep(TICK_INTERVAL);
        }
    });

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
