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

//! Application logic, event handling, and command dispatching.
//!
//! This module acts as the central hub for the "Controller" logic of the
//! application, and is the serialization point required by the playback
//! orchestrator: every event (keyboard input, background task result,
//! engine observation, periodic tick) is applied here, one at a time, in
//! arrival order. Background work is dispatched from here and only ever
//! reports back through the same channel.

mod handlers;
use handlers::*;

use std::io::Stdout;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{App, model::Track, render::draw};

const FINE_VOLUME_DELTA: i32 = 1;
const VOLUME_DELTA: i32 = 5;

const FINE_SEEK_DELTA: i32 = 5;
const SEEK_DELTA: i32 = 20;

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Tick,

    SearchRequested(String),
    SearchResultsReady { query: String, tracks: Vec<Track> },
    SearchFailed { query: String, message: String },

    RefreshRecommendations,
    RecommendationsReady(Vec<Track>),
    RecommendationsFailed(String),

    MixRequested,
    MixReady { query: String, tracks: Vec<Track> },

    PlaylistLoaded(Vec<Track>),
    HistoryLoaded(Vec<Track>),
    RemoveFinished { title: String, removed: bool },

    ResolutionReady { generation: u64, track: Track, url: String },
    ResolutionFailed { generation: u64, message: String },
    ArmAutoPlay(u64),

    EngineTime(f64),
    EngineDuration(u64),
    EnginePaused(bool),
    EngineIdle(bool),
    VolumeChanged(u32),
    TrackFinished,

    Status(String),
    Error(String),
    FatalError(String),

    ExitApplication,
}

/// Runs the main application loop, handling events and rendering the UI
/// in the terminal.
///
/// This function loops until a 'quit' event is received or the event
/// channel is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,
            AppEvent::Tick => handle_tick(app)?,

            AppEvent::SearchRequested(query) => handle_search_requested(app, query),
            AppEvent::SearchResultsReady { query, tracks } => {
                handle_search_results_ready(app, query, tracks)
            }
            AppEvent::SearchFailed { query, message } => handle_search_failed(app, query, message),

            AppEvent::RefreshRecommendations => handle_refresh_recommendations(app),
            AppEvent::RecommendationsReady(tracks) => handle_recommendations_ready(app, tracks),
            AppEvent::RecommendationsFailed(message) => {
                handle_recommendations_failed(app, message)
            }

            AppEvent::MixRequested => handle_mix_requested(app)?,
            AppEvent::MixReady { query, tracks } => handle_mix_ready(app, query, tracks),

            AppEvent::PlaylistLoaded(tracks) => handle_playlist_loaded(app, tracks),
            AppEvent::HistoryLoaded(tracks) => handle_history_loaded(app, tracks),
            AppEvent::RemoveFinished { title, removed } => {
                handle_remove_finished(app, title, removed)
            }

            AppEvent::ResolutionReady {
                generation,
                track,
                url,
            } => handle_resolution_ready(app, generation, track, url)?,
            AppEvent::ResolutionFailed {
                generation,
                message,
            } => handle_resolution_failed(app, generation, &message)?,
            AppEvent::ArmAutoPlay(generation) => handle_arm_auto_play(app, generation),

            AppEvent::EngineTime(seconds) => handle_engine_time(app, seconds),
            AppEvent::EngineDuration(duration) => handle_engine_duration(app, duration),
            AppEvent::EnginePaused(paused) => handle_engine_paused(app, paused),
            AppEvent::EngineIdle(idle) => handle_engine_idle(app, idle)?,
            AppEvent::VolumeChanged(volume) => handle_volume_changed(app, volume),
            AppEvent::TrackFinished => handle_track_finished(app)?,

            AppEvent::Status(message) => handle_status(app, message),
            AppEvent::Error(message) => handle_error(app, message),
            AppEvent::FatalError(message) => anyhow::bail!("fatal: {message}"),

            AppEvent::ExitApplication => {}
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

/// Maps keyboard input to application actions and playback commands.
///
/// The commander (the `:` command line) gets first refusal on every key;
/// the global bindings below only apply while it is inactive.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let handled = app
        .commander
        .handle_key(key, &app.task_tx, &app.event_tx);
    if handled {
        return Ok(());
    }

    process_global_key_event(app, key)
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => {
            app.event_tx.send(AppEvent::ExitApplication)?;
        }

        // Queue focus and navigation
        (KeyCode::Tab, _) => {
            app.orchestrator.toggle_focus();
        }
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => {
            let len = app.focused_len();
            app.focused_view_mut().goto_next(len);
        }
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => {
            let len = app.focused_len();
            app.focused_view_mut().goto_previous(len);
        }
        (KeyCode::Char('g'), _) => app.focused_view_mut().goto_first(),
        (KeyCode::Char('G'), _) => {
            let len = app.focused_len();
            app.focused_view_mut().goto_last(len);
        }

        // Selection intents
        (KeyCode::Enter, _) => handle_activate_selection(app)?,
        (KeyCode::Char('s'), _) => handle_save_selection(app)?,
        (KeyCode::Char('d'), _) => handle_remove_selection(app)?,

        // Playback controls
        (KeyCode::Char('n'), _) => handle_skip(app)?,
        (KeyCode::Char(' '), _) => app.audio_player.toggle_pause()?,
        (KeyCode::Char('r'), _) => app.event_tx.send(AppEvent::RefreshRecommendations)?,
        (KeyCode::Char('M'), KeyModifiers::SHIFT) => app.event_tx.send(AppEvent::MixRequested)?,

        (KeyCode::Char(','), _) => app.audio_player.seek(-FINE_SEEK_DELTA)?,
        (KeyCode::Char('.'), _) => app.audio_player.seek(FINE_SEEK_DELTA)?,
        (KeyCode::Char('<'), _) => app.audio_player.seek(-SEEK_DELTA)?,
        (KeyCode::Char('>'), _) => app.audio_player.seek(SEEK_DELTA)?,
        (KeyCode::Char('-'), _) => app.audio_player.adjust_volume(-FINE_VOLUME_DELTA)?,
        (KeyCode::Char('='), _) => app.audio_player.adjust_volume(FINE_VOLUME_DELTA)?,
        (KeyCode::Char('_'), _) => app.audio_player.adjust_volume(-VOLUME_DELTA)?,
        (KeyCode::Char('+'), _) => app.audio_player.adjust_volume(VOLUME_DELTA)?,
        (KeyCode::Char('m'), _) => app.audio_player.toggle_mute()?,

        _ => {}
    }

    Ok(())
}
