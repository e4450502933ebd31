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

use anyhow::Result;

use crate::{
    App,
    model::{QueueId, ResultsSource, Track},
    orchestrator::Effect,
    tasks::{self, AppTask},
};

/// Applies the side effects decided by the orchestrator.
///
/// This is the single bridge between the pure state machine and the
/// outside world: engine commands, background dispatch, store tasks, and
/// user-visible reports all pass through here.
pub(super) fn apply_effects(app: &mut App, effects: Vec<Effect>) -> Result<()> {
    for effect in effects {
        match effect {
            Effect::StopEngine => app.audio_player.stop()?,
            Effect::PlayStream(url) => {
                app.player_time = None;
                app.player_duration = None;
                app.audio_player.play_url(&url)?;
            }
            Effect::Resolve { generation, track } => tasks::spawn_resolve(
                app.resolver.clone(),
                generation,
                track,
                app.event_tx.clone(),
            ),
            Effect::FetchRecommendations { seed } => {
                tasks::spawn_radio(app.catalog.clone(), seed.id, app.event_tx.clone())
            }
            Effect::ArmAutoPlay { generation } => {
                tasks::spawn_settle_timer(generation, app.event_tx.clone())
            }
            Effect::RecordHistory(track) => app.task_tx.send(AppTask::RecordHistory(track))?,
            Effect::Report(message) => {
                log::warn!("{message}");
                app.status_line = Some(message);
            }
        }
    }

    Ok(())
}

pub(super) fn handle_tick(app: &mut App) -> Result<()> {
    let effects = app.orchestrator.engine_idle(app.engine_idle);
    apply_effects(app, effects)
}

pub(super) fn handle_search_requested(app: &mut App, query: String) {
    app.status_line = Some(format!("Searching for: {query}..."));
    tasks::spawn_search(
        app.catalog.clone(),
        query,
        app.config.search_limit,
        app.event_tx.clone(),
    );
}

pub(super) fn handle_search_results_ready(app: &mut App, query: String, tracks: Vec<Track>) {
    app.status_line = Some(if tracks.is_empty() {
        format!("No results for: {query}")
    } else {
        format!("{} results for: {query}", tracks.len())
    });
    app.orchestrator.load_results(tracks, ResultsSource::Search);
    app.results_view.reset(app.focused_len());
}

/// A failed search reports and yields an empty result set; it is never
/// fatal.
pub(super) fn handle_search_failed(app: &mut App, query: String, message: String) {
    log::warn!("search {query:?} failed: {message}");
    app.orchestrator.load_results(vec![], ResultsSource::Search);
    app.results_view.reset(0);
    app.status_line = Some(format!("Search failed: {message}"));
}

pub(super) fn handle_refresh_recommendations(app: &mut App) {
    match app.orchestrator.state().track() {
        Some(track) => {
            app.status_line = Some("Refreshing recommendations...".to_string());
            tasks::spawn_radio(app.catalog.clone(), track.id.clone(), app.event_tx.clone());
        }
        None => app.status_line = Some("Nothing playing to seed recommendations".to_string()),
    }
}

pub(super) fn handle_recommendations_ready(app: &mut App, tracks: Vec<Track>) {
    if tracks.is_empty() {
        app.status_line = Some("No recommendations".to_string());
    }
    app.orchestrator.load_up_next(tracks);
    let len = app.orchestrator.queue(QueueId::UpNext).len();
    app.up_next_view.reset(len);
}

/// A failed fetch empties the up-next queue rather than keeping stale
/// recommendations around.
pub(super) fn handle_recommendations_failed(app: &mut App, message: String) {
    log::warn!("radio fetch failed: {message}");
    app.orchestrator.load_up_next(vec![]);
    app.up_next_view.reset(0);
    app.status_line = Some(format!("Recommendations failed: {message}"));
}

pub(super) fn handle_mix_requested(app: &mut App) -> Result<()> {
    app.status_line = Some("Building your mix...".to_string());
    app.task_tx.send(AppTask::BuildMix)?;

    Ok(())
}

pub(super) fn handle_mix_ready(app: &mut App, query: String, tracks: Vec<Track>) {
    app.status_line = Some(format!("Mix seeded by: {query}"));
    app.orchestrator.load_results(tracks, ResultsSource::Mix);
    app.results_view.reset(app.focused_len());
}

pub(super) fn handle_playlist_loaded(app: &mut App, tracks: Vec<Track>) {
    app.status_line = Some(format!("Playlist: {} tracks", tracks.len()));
    app.orchestrator
        .load_results(tracks, ResultsSource::Playlist);
    app.results_view.reset(app.focused_len());
}

pub(super) fn handle_history_loaded(app: &mut App, tracks: Vec<Track>) {
    app.status_line = Some(format!("History: {} tracks", tracks.len()));
    app.orchestrator.load_results(tracks, ResultsSource::History);
    app.results_view.reset(app.focused_len());
}

pub(super) fn handle_remove_finished(app: &mut App, title: String, removed: bool) {
    app.status_line = Some(if removed {
        format!("Removed: {title}")
    } else {
        format!("Not found: {title}")
    });
}

pub(super) fn handle_resolution_ready(
    app: &mut App,
    generation: u64,
    track: Track,
    url: String,
) -> Result<()> {
    let effects = app.orchestrator.resolution_ready(generation, track, url);
    apply_effects(app, effects)
}

pub(super) fn handle_resolution_failed(
    app: &mut App,
    generation: u64,
    message: &str,
) -> Result<()> {
    log::warn!("resolution failed (generation {generation}): {message}");
    let effects = app.orchestrator.resolution_failed(generation, message);
    apply_effects(app, effects)
}

pub(super) fn handle_arm_auto_play(app: &mut App, generation: u64) {
    app.orchestrator.arm_auto_play(generation);
}

pub(super) fn handle_engine_time(app: &mut App, seconds: f64) {
    app.player_time = Some(seconds);
}

pub(super) fn handle_engine_duration(app: &mut App, duration: u64) {
    app.player_duration = Some(duration);
}

pub(super) fn handle_engine_paused(app: &mut App, paused: bool) {
    app.orchestrator.pause_changed(paused);
}

/// Records the engine's idle flag and feeds it straight into the state
/// machine; the gate decides whether anything happens.
pub(super) fn handle_engine_idle(app: &mut App, idle: bool) -> Result<()> {
    app.engine_idle = idle;
    let effects = app.orchestrator.engine_idle(idle);
    apply_effects(app, effects)
}

/// Natural end-of-file is just another idle observation: it funnels into
/// the same gated transition as the periodic poll, so the two can never
/// double-advance.
pub(super) fn handle_track_finished(app: &mut App) -> Result<()> {
    app.player_time = app.player_duration.map(|d| d as f64);
    handle_engine_idle(app, true)
}

pub(super) fn handle_volume_changed(app: &mut App, volume: u32) {
    app.volume = Some(volume);
}

pub(super) fn handle_status(app: &mut App, message: String) {
    app.status_line = Some(message);
}

pub(super) fn handle_error(app: &mut App, message: String) {
    log::error!("{message}");
    app.status_line = Some(message);
}

pub(super) fn handle_activate_selection(app: &mut App) -> Result<()> {
    let Some(index) = app.focused_view().selected() else {
        return Ok(());
    };
    let focus = app.orchestrator.focus();
    let effects = app.orchestrator.select_at(focus, index);
    apply_effects(app, effects)
}

pub(super) fn handle_skip(app: &mut App) -> Result<()> {
    let effects = app.orchestrator.skip();
    apply_effects(app, effects)
}

pub(super) fn handle_save_selection(app: &mut App) -> Result<()> {
    let Some(track) = selected_track(app) else {
        return Ok(());
    };
    app.task_tx.send(AppTask::SaveToPlaylist(track))?;

    Ok(())
}

/// Removes the selected entry from the focused queue and asks the store
/// to forget any persisted copy. Missing everywhere is a soft "not
/// found", never an error.
pub(super) fn handle_remove_selection(app: &mut App) -> Result<()> {
    let focus = app.orchestrator.focus();
    let Some(index) = app.focused_view().selected() else {
        return Ok(());
    };
    let Some(entry) = app.orchestrator.entry_at(focus, index) else {
        return Ok(());
    };
    let key = entry.key();
    let track = entry.track.clone();

    let was_queued = app.orchestrator.remove_focused(&key);
    let len = app.focused_len();
    app.focused_view_mut().clamp(len);

    app.task_tx
        .send(AppTask::RemoveTrack { track, was_queued })?;

    Ok(())
}

fn selected_track(app: &App) -> Option<Track> {
    let focus = app.orchestrator.focus();
    let index = app.focused_view().selected()?;
    app.orchestrator
        .entry_at(focus, index)
        .map(|entry| entry.track.clone())
}
