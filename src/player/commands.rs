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

//! MPV-backed audio playback engine and event processing.
//!
//! This module provides the core audio playback logic, leveraging `libmpv`
//! for stream decoding and playback control. It manages a background
//! worker thread that bridges the application's command-based interface
//! and the low-level MPV property observation system.
//!
//! # Architecture
//!
//! The engine operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s to control
//!    playback (play, stop, pause, seek, volume).
//! 2. **Event Channel**: Broadcasts [`AppEvent`]s carrying observed engine
//!    state (elapsed time, duration, pause flag, idle flag, end-of-file).
//!
//! A failed engine command is reported and the worker keeps running; only
//! a failure to stand the engine up at all is fatal.

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use crate::events::AppEvent;

#[derive(Debug)]
pub(crate) enum AudioPlayerCommand {
    PlayUrl(String),
    Stop,
    TogglePause,
    Seek(i32),
    AdjustVolume(i32),
    ToggleMute,
}

/// Spawns the audio worker thread to process playback commands.
///
/// If the internal worker returns an error, it is caught here and
/// broadcast as a fatal application event.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = audio_player_worker(command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the audio player backend.
///
/// Initializes a local `libmpv` context (no video output), registers the
/// property observers the application depends on, and alternates between
/// draining pending commands and forwarding engine events.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or a property
/// observer cannot be registered.
fn audio_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<f64>("volume", 0)
        .context("Failed to observe volume")?;
    handler
        .observe_property::<bool>("idle-active", 0)
        .context("Failed to observe idle-active")?;

    loop {
        process_commands(&mut handler, &command_rx, &event_tx);
        process_mpv_events(&mut handler, &event_tx)?;
    }
}

/// Drains and executes all pending commands from the application channel.
///
/// Command failures are reported as error events; they never stop the
/// worker, so a single bad stream leaves the engine usable.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &mpsc::Receiver<AudioPlayerCommand>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    while let Ok(command) = command_rx.try_recv() {
        let result = match command {
            AudioPlayerCommand::PlayUrl(url) => handler
                .command(&["loadfile", &url, "replace"])
                .and_then(|_| handler.set_property("pause", false)),
            AudioPlayerCommand::Stop => handler.command(&["stop"]),
            AudioPlayerCommand::TogglePause => handler.command(&["cycle", "pause"]),
            AudioPlayerCommand::Seek(delta) => {
                handler.command(&["seek", &delta.to_string(), "relative"])
            }
            AudioPlayerCommand::AdjustVolume(delta) => {
                handler.command(&["add", "volume", &delta.to_string()])
            }
            AudioPlayerCommand::ToggleMute => handler.command(&["cycle", "mute"]),
        };

        if let Err(e) = result {
            log::warn!("engine command failed: {:?}", e);
            let _ = event_tx.send(AppEvent::Error(format!("Engine command failed: {:?}", e)));
        }
    }
}

/// Polls for MPV events and forwards observations to the application.
///
/// Waits for up to 50ms for an event from the MPV context, then maps
/// property changes and end-of-file notifications to [`AppEvent`]s.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    if let Some(mpv_event) = handler.wait_event(0.05) {
        let app_event = match mpv_event {
            mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
                ("duration", Format::Double(duration)) if duration >= 0.0 => {
                    Some(AppEvent::EngineDuration(duration as u64))
                }
                ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                    Some(AppEvent::EngineTime(seconds))
                }
                ("pause", Format::Flag(paused)) => Some(AppEvent::EnginePaused(paused)),
                ("idle-active", Format::Flag(idle)) => Some(AppEvent::EngineIdle(idle)),
                ("volume", Format::Double(volume)) => {
                    Some(AppEvent::VolumeChanged(volume.round() as u32))
                }
                _ => None,
            },
            mpv::Event::EndFile(result) => match result {
                Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => Some(AppEvent::TrackFinished),
                _ => None,
            },
            _ => None,
        };

        if let Some(event) = app_event {
            event_tx.send(event).context("Failed to send event")?;
        }
    }

    Ok(())
}
