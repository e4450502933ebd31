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

//! Asynchronous application task processing.
//!
//! Two kinds of background work feed the event loop:
//!
//! * A persistent worker thread that owns the database connection and
//!   processes [`AppTask`]s (history, playlist, mix building) in order.
//! * Short-lived threads for the network-bound calls (search, radio,
//!   stream resolution) and the auto-advance settle timer, spawned per
//!   request so one slow call never queues behind another.
//!
//! Neither kind ever mutates application state: results are reported back
//! as [`AppEvent`]s and committed on the event-loop thread. A resolution
//! carries its generation tag so the control path can discard results
//! that were superseded while the work was in flight.

use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
    time::Duration,
};

use anyhow::Result;
use rusqlite::Connection;

use crate::{
    catalog::CatalogClient,
    config::AppConfig,
    events::AppEvent,
    model::Track,
    orchestrator::seed,
    resolver::StreamResolver,
    store,
};

const DATABASE_FILE: &str = "tuneq.db";

const HISTORY_SEED_LIMIT: usize = 50;

/// The engine's idle flag can still read true briefly after a new stream
/// starts while it buffers; arming the auto-advance gate is delayed by
/// this much to absorb the hysteresis.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug)]
pub(crate) enum AppTask {
    BuildMix,

    LoadPlaylist,
    LoadHistory,

    RecordHistory(Track),
    SaveToPlaylist(Track),
    RemoveTrack { track: Track, was_queued: bool },
}

/// Spawns a background thread to process application tasks.
///
/// This worker thread initializes its own database connection and enters
/// a blocking loop, listening for incoming [`AppTask`]s.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `catalog` - Catalog client used for mix building.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(
    config: &AppConfig,
    catalog: CatalogClient,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) {
    let config = config.clone();

    thread::spawn(move || {
        let conn = match store::init_db(DATABASE_FILE) {
            Ok(conn) => conn,
            Err(e) => {
                let _ = event_tx.send(AppEvent::FatalError(format!(
                    "Failed to initialise database: {e:?}"
                )));
                return;
            }
        };

        while let Ok(task) = task_rx.recv() {
            let mut ctx = TaskContext {
                config: &config,
                catalog: &catalog,
                event_tx: &event_tx,
                conn: &conn,
            };

            if let Err(e) = handle_task(task, &mut ctx) {
                let _ = event_tx.send(AppEvent::Error(e.to_string()));
            }
        }
    });
}

/// Bundles shared resources required by task handlers to simplify
/// resource passing when invoking those handler functions.
struct TaskContext<'a> {
    config: &'a AppConfig,
    catalog: &'a CatalogClient,
    event_tx: &'a Sender<AppEvent>,
    conn: &'a Connection,
}

fn handle_task(task: AppTask, ctx: &mut TaskContext) -> Result<()> {
    match task {
        AppTask::BuildMix => build_mix(ctx),

        AppTask::LoadPlaylist => load_playlist(ctx),
        AppTask::LoadHistory => load_history(ctx),

        AppTask::RecordHistory(track) => record_history(ctx, track),
        AppTask::SaveToPlaylist(track) => save_to_playlist(ctx, track),
        AppTask::RemoveTrack { track, was_queued } => remove_track(ctx, track, was_queued),
    }
}

/// Builds a "made for you" result set seeded on recent listening history.
fn build_mix(ctx: &mut TaskContext) -> Result<()> {
    let recent = store::recent_history(ctx.conn, HISTORY_SEED_LIMIT)?;
    let query = seed::mix_query(&recent, &ctx.config.fallback_mix_query, &mut rand::rng());

    log::debug!("building mix from seed query {query:?}");
    match ctx.catalog.search(&query, ctx.config.search_limit) {
        Ok(tracks) => ctx.event_tx.send(AppEvent::MixReady { query, tracks })?,
        Err(e) => ctx
            .event_tx
            .send(AppEvent::Error(format!("Mix fetch failed: {e}")))?,
    }

    Ok(())
}

fn load_playlist(ctx: &mut TaskContext) -> Result<()> {
    let tracks = store::playlist(ctx.conn)?;
    ctx.event_tx.send(AppEvent::PlaylistLoaded(tracks))?;

    Ok(())
}

fn load_history(ctx: &mut TaskContext) -> Result<()> {
    let tracks = store::recent_history(ctx.conn, HISTORY_SEED_LIMIT)?;
    ctx.event_tx.send(AppEvent::HistoryLoaded(tracks))?;

    Ok(())
}

fn record_history(ctx: &mut TaskContext, track: Track) -> Result<()> {
    if let Err(e) = store::append_history(ctx.conn, &track) {
        log::warn!("could not record history for {}: {e}", track.id);
        ctx.event_tx
            .send(AppEvent::Error("Could not record play history".to_string()))?;
    }

    Ok(())
}

fn save_to_playlist(ctx: &mut TaskContext, track: Track) -> Result<()> {
    match store::add_to_playlist(ctx.conn, &track) {
        Ok(()) => ctx
            .event_tx
            .send(AppEvent::Status(format!("Saved: {}", track.title)))?,
        Err(e) => {
            log::warn!("could not save {}: {e}", track.id);
            ctx.event_tx
                .send(AppEvent::Error("Could not save track".to_string()))?;
        }
    }

    Ok(())
}

/// Removes a track from the store, trying the identifier first and then
/// falling back to a title+artist match; either success counts.
fn remove_track(ctx: &mut TaskContext, track: Track, was_queued: bool) -> Result<()> {
    let mut removed = store::remove(ctx.conn, &track.id)?;
    if !removed {
        removed = store::remove_by_title_artist(ctx.conn, &track.title, &track.artist_line())?;
    }

    ctx.event_tx.send(AppEvent::RemoveFinished {
        title: track.title,
        removed: removed || was_queued,
    })?;

    Ok(())
}

/// Spawns a one-shot search against the catalog.
pub(crate) fn spawn_search(
    catalog: CatalogClient,
    query: String,
    limit: usize,
    event_tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        let event = match catalog.search(&query, limit) {
            Ok(tracks) => AppEvent::SearchResultsReady { query, tracks },
            Err(e) => AppEvent::SearchFailed {
                query,
                message: e.to_string(),
            },
        };
        let _ = event_tx.send(event);
    });
}

/// Spawns a one-shot recommendation fetch seeded on a track identifier.
pub(crate) fn spawn_radio(catalog: CatalogClient, seed_identifier: String, event_tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let event = match catalog.radio(&seed_identifier) {
            Ok(tracks) => AppEvent::RecommendationsReady(tracks),
            Err(e) => AppEvent::RecommendationsFailed(e.to_string()),
        };
        let _ = event_tx.send(event);
    });
}

/// Spawns a one-shot stream resolution for the given generation.
///
/// The result event carries the generation back so the control path can
/// tell whether this resolution is still the latest one dispatched.
pub(crate) fn spawn_resolve(
    resolver: StreamResolver,
    generation: u64,
    track: Track,
    event_tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        log::debug!("resolving stream for {} (generation {generation})", track.id);
        let event = match resolver.resolve(&track.id) {
            Ok(url) => AppEvent::ResolutionReady {
                generation,
                track,
                url,
            },
            Err(e) => AppEvent::ResolutionFailed {
                generation,
                message: e.to_string(),
            },
        };
        let _ = event_tx.send(event);
    });
}

/// Spawns the settle timer that re-arms the auto-advance gate.
pub(crate) fn spawn_settle_timer(generation: u64, event_tx: Sender<AppEvent>) {
    thread::spawn(move || {
        thread::sleep(SETTLE_DELAY);
        let _ = event_tx.send(AppEvent::ArmAutoPlay(generation));
    });
}
