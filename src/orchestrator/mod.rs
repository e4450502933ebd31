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

//! Playback queue orchestration.
//!
//! This module owns the now-playing state machine, both playback queues
//! and their cursors, the auto-advance gate, and the resolution generation
//! counter. It is the single decision point for what plays next under
//! concurrent triggers: explicit selection, skip, end-of-track detected by
//! the engine poll, and radio refill.
//!
//! # Architecture
//!
//! The orchestrator performs no I/O. Intent methods mutate state and
//! return [`Effect`] values; the event loop applies them (engine commands,
//! background dispatch, store tasks) and feeds completions back in. Every
//! mutation therefore happens on the event-loop thread, one event at a
//! time; background workers never touch this state directly.
//!
//! Each dispatched resolution carries a generation number. A completion or
//! settle-timer callback whose generation no longer matches the latest
//! dispatch is discarded, so a late result for a superseded selection can
//! never overwrite newer state.

pub(crate) mod seed;

use std::time::Instant;

use crate::model::{
    QueueId, ResultsSource, Track,
    queue::{QueueEntry, TrackQueue},
};

/// The authoritative playback state. Mutated only by the orchestrator.
#[derive(Debug, Clone)]
pub(crate) enum PlaybackState {
    Idle,
    Loading(Track),
    Playing { track: Track, started_at: Instant },
    Paused(Track),
}

impl PlaybackState {
    pub(crate) fn track(&self) -> Option<&Track> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Loading(track) => Some(track),
            PlaybackState::Playing { track, .. } => Some(track),
            PlaybackState::Paused(track) => Some(track),
        }
    }
}

/// A side effect decided by the orchestrator, applied by the event loop.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    /// Stop whatever stream the engine currently has.
    StopEngine,
    /// Hand a resolved stream URL to the engine.
    PlayStream(String),
    /// Dispatch a background stream resolution for `track`.
    Resolve { generation: u64, track: Track },
    /// Dispatch a background recommendation fetch keyed on `seed`.
    FetchRecommendations { seed: Track },
    /// Arm the auto-advance gate after the settle delay, if `generation`
    /// is still current when the timer fires.
    ArmAutoPlay { generation: u64 },
    /// Append `track` to the persistent play history.
    RecordHistory(Track),
    /// Surface a message to the user.
    Report(String),
}

pub(crate) struct Orchestrator {
    state: PlaybackState,
    auto_play_armed: bool,
    generation: u64,

    results: TrackQueue,
    results_source: ResultsSource,
    up_next: TrackQueue,
    focus: QueueId,

    /// The queue that produced the currently playing track; auto-advance
    /// always targets this queue, regardless of focus.
    playing_from: Option<QueueId>,
}

impl Orchestrator {
    pub(crate) fn new() -> Self {
        Self {
            state: PlaybackState::Idle,
            auto_play_armed: false,
            generation: 0,
            results: TrackQueue::new(),
            results_source: ResultsSource::Search,
            up_next: TrackQueue::new(),
            focus: QueueId::Results,
            playing_from: None,
        }
    }

    pub(crate) fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub(crate) fn focus(&self) -> QueueId {
        self.focus
    }

    pub(crate) fn results_source(&self) -> ResultsSource {
        self.results_source
    }

    pub(crate) fn playing_from(&self) -> Option<QueueId> {
        self.playing_from
    }

    pub(crate) fn queue(&self, id: QueueId) -> &TrackQueue {
        match id {
            QueueId::Results => &self.results,
            QueueId::UpNext => &self.up_next,
        }
    }

    fn queue_mut(&mut self, id: QueueId) -> &mut TrackQueue {
        match id {
            QueueId::Results => &mut self.results,
            QueueId::UpNext => &mut self.up_next,
        }
    }

    pub(crate) fn entry_at(&self, id: QueueId, index: usize) -> Option<&QueueEntry> {
        self.queue(id).entries().get(index)
    }

    pub(crate) fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            QueueId::Results => QueueId::UpNext,
            QueueId::UpNext => QueueId::Results,
        };
    }

    /// Replaces the results queue wholesale and focuses it.
    pub(crate) fn load_results(&mut self, tracks: Vec<Track>, source: ResultsSource) {
        self.results.load(tracks);
        self.results_source = source;
        self.focus = QueueId::Results;
    }

    /// Replaces the up-next queue wholesale.
    ///
    /// An empty list is loaded as-is: a fetch that yielded nothing leaves
    /// a visible empty queue rather than stale recommendations.
    pub(crate) fn load_up_next(&mut self, tracks: Vec<Track>) {
        self.up_next.load(tracks);
    }

    /// Selects the entry at `index` in `queue_id` and starts playing it.
    pub(crate) fn select_at(&mut self, queue_id: QueueId, index: usize) -> Vec<Effect> {
        if self.queue_mut(queue_id).seek(index).is_none() {
            return vec![];
        }
        self.select_current(queue_id)
    }

    /// Skips to the next track in the queue that produced the current one.
    ///
    /// With nothing playing yet, this starts the focused queue's current
    /// entry instead.
    pub(crate) fn skip(&mut self) -> Vec<Effect> {
        let queue_id = match self.playing_from {
            Some(id) => {
                if self.queue_mut(id).advance().is_none() {
                    return vec![];
                }
                id
            }
            None => self.focus,
        };
        self.select_current(queue_id)
    }

    /// Feeds the engine idle flag into the state machine.
    ///
    /// Called from the periodic tick and from engine end-of-file events.
    /// This is the only poll-driven transition: it advances exactly when
    /// the gate is armed, a track is nominally playing, and the engine
    /// reports idle (natural end of track).
    pub(crate) fn engine_idle(&mut self, is_idle: bool) -> Vec<Effect> {
        if !is_idle || !self.auto_play_armed {
            return vec![];
        }
        if !matches!(self.state, PlaybackState::Playing { .. }) {
            return vec![];
        }

        let queue_id = match self.playing_from {
            Some(id) => id,
            None => return vec![],
        };
        match self.queue_mut(queue_id).advance() {
            Some(entry) => {
                let track = entry.track.clone();
                self.begin_resolution(track)
            }
            None => {
                // Queue drained out from under us; nothing left to play.
                self.auto_play_armed = false;
                self.state = PlaybackState::Idle;
                vec![]
            }
        }
    }

    /// Commits a finished resolution, unless it has been superseded.
    pub(crate) fn resolution_ready(
        &mut self,
        generation: u64,
        track: Track,
        url: String,
    ) -> Vec<Effect> {
        if generation != self.generation {
            log::debug!("discarding superseded resolution for {}", track.id);
            return vec![];
        }
        self.state = PlaybackState::Playing {
            track: track.clone(),
            started_at: Instant::now(),
        };
        vec![
            Effect::PlayStream(url),
            Effect::RecordHistory(track),
            Effect::ArmAutoPlay { generation },
        ]
    }

    /// Handles a failed resolution, unless it has been superseded.
    ///
    /// No automatic retry: the error is surfaced and playback stays down.
    /// The gate is still re-armed after the settle delay so a later natural
    /// end-of-track on a subsequent selection is not missed.
    pub(crate) fn resolution_failed(&mut self, generation: u64, message: &str) -> Vec<Effect> {
        if generation != self.generation {
            return vec![];
        }
        self.state = PlaybackState::Idle;
        vec![
            Effect::Report(format!("Could not play track: {message}")),
            Effect::ArmAutoPlay { generation },
        ]
    }

    /// Arms the auto-advance gate once the settle delay has elapsed.
    ///
    /// A timer started for a superseded generation is ignored, so an old
    /// settle window can never open the gate inside a newer resolution's
    /// window.
    pub(crate) fn arm_auto_play(&mut self, generation: u64) {
        if generation == self.generation {
            self.auto_play_armed = true;
        }
    }

    /// Commits the Playing⇄Paused transition from the engine's pause flag.
    pub(crate) fn pause_changed(&mut self, paused: bool) {
        match (&self.state, paused) {
            (PlaybackState::Playing { track, .. }, true) => {
                self.state = PlaybackState::Paused(track.clone());
            }
            (PlaybackState::Paused(track), false) => {
                self.state = PlaybackState::Playing {
                    track: track.clone(),
                    started_at: Instant::now(),
                };
            }
            _ => {}
        }
    }

    /// Removes the entry with `key` from the focused queue.
    pub(crate) fn remove_focused(&mut self, key: &str) -> bool {
        let focus = self.focus;
        self.queue_mut(focus).remove(key)
    }

    fn select_current(&mut self, queue_id: QueueId) -> Vec<Effect> {
        let Some(entry) = self.queue(queue_id).current() else {
            return vec![];
        };
        let track = entry.track.clone();
        self.playing_from = Some(queue_id);

        let mut effects = self.begin_resolution(track.clone());
        // Manual selections from fresh search results reseed the radio.
        if queue_id == QueueId::Results && self.results_source == ResultsSource::Search {
            effects.push(Effect::FetchRecommendations { seed: track });
        }
        effects
    }

    /// Starts a new resolution generation for `track`.
    ///
    /// The gate drops before anything else: from here until the settle
    /// timer for this generation fires, idle polling must not trigger a
    /// second advance.
    fn begin_resolution(&mut self, track: Track) -> Vec<Effect> {
        self.auto_play_armed = false;
        self.generation += 1;
        self.state = PlaybackState::Loading(track.clone());
        vec![
            Effect::StopEngine,
            Effect::Resolve {
                generation: self.generation,
                track,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("title {id}"),
            artists: vec!["Artist".to_string()],
            duration: "3:00".to_string(),
        }
    }

    fn loaded(source: ResultsSource) -> Orchestrator {
        let mut orch = Orchestrator::new();
        orch.load_results(vec![track("a"), track("b"), track("c")], source);
        orch
    }

    fn resolve_generation(effects: &[Effect]) -> u64 {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Resolve { generation, .. } => Some(*generation),
                _ => None,
            })
            .expect("expected a Resolve effect")
    }

    fn commit_playing(orch: &mut Orchestrator, id: &str) -> u64 {
        let effects = orch.select_at(QueueId::Results, 0);
        let generation = resolve_generation(&effects);
        orch.resolution_ready(generation, track(id), format!("https://s/{id}"));
        orch.arm_auto_play(generation);
        generation
    }

    #[test]
    fn select_clears_gate_and_dispatches_stop_then_resolve() {
        let mut orch = loaded(ResultsSource::Playlist);
        let effects = orch.select_at(QueueId::Results, 1);

        assert_eq!(effects[0], Effect::StopEngine);
        assert!(matches!(effects[1], Effect::Resolve { generation: 1, .. }));
        assert!(matches!(orch.state(), PlaybackState::Loading(t) if t.id == "b"));
        assert!(!orch.auto_play_armed);
    }

    #[test]
    fn superseded_resolution_is_discarded() {
        let mut orch = loaded(ResultsSource::Playlist);
        let first = resolve_generation(&orch.select_at(QueueId::Results, 0));
        let second = resolve_generation(&orch.select_at(QueueId::Results, 1));

        // The stale completion must commit nothing.
        let effects = orch.resolution_ready(first, track("a"), "https://s/a".into());
        assert!(effects.is_empty());
        assert!(matches!(orch.state(), PlaybackState::Loading(t) if t.id == "b"));

        // The current one commits exactly once.
        let effects = orch.resolution_ready(second, track("b"), "https://s/b".into());
        assert!(matches!(effects[0], Effect::PlayStream(_)));
        assert!(matches!(orch.state(), PlaybackState::Playing { track, .. } if track.id == "b"));
    }

    #[test]
    fn stale_failure_is_discarded() {
        let mut orch = loaded(ResultsSource::Playlist);
        let first = resolve_generation(&orch.select_at(QueueId::Results, 0));
        let second = resolve_generation(&orch.select_at(QueueId::Results, 1));

        assert!(orch.resolution_failed(first, "gone").is_empty());
        assert!(matches!(orch.state(), PlaybackState::Loading(_)));

        let effects = orch.resolution_failed(second, "geo blocked");
        assert!(matches!(effects[0], Effect::Report(_)));
        assert!(matches!(effects[1], Effect::ArmAutoPlay { generation } if generation == second));
        assert!(matches!(orch.state(), PlaybackState::Idle));
    }

    #[test]
    fn idle_flicker_before_settle_never_advances() {
        let mut orch = loaded(ResultsSource::Playlist);
        let effects = orch.select_at(QueueId::Results, 0);
        let generation = resolve_generation(&effects);
        orch.resolution_ready(generation, track("a"), "https://s/a".into());

        // Stream committed but the settle timer has not fired: the engine
        // can still briefly read idle while buffering.
        assert!(orch.engine_idle(true).is_empty());
        assert!(orch.engine_idle(true).is_empty());

        orch.arm_auto_play(generation);
        let effects = orch.engine_idle(true);
        assert!(matches!(effects[1], Effect::Resolve { ref track, .. } if track.id == "b"));

        // The advance just decided dropped the gate again: flicker after a
        // decided advance is also inert.
        assert!(orch.engine_idle(true).is_empty());
    }

    #[test]
    fn stale_settle_timer_never_arms_a_newer_window() {
        let mut orch = loaded(ResultsSource::Playlist);
        let first = resolve_generation(&orch.select_at(QueueId::Results, 0));
        orch.resolution_ready(first, track("a"), "https://s/a".into());

        // A newer selection lands before the settle timer fires.
        let second = resolve_generation(&orch.select_at(QueueId::Results, 1));
        orch.arm_auto_play(first);
        assert!(!orch.auto_play_armed);

        orch.resolution_ready(second, track("b"), "https://s/b".into());
        orch.arm_auto_play(second);
        assert!(orch.auto_play_armed);
    }

    #[test]
    fn idle_while_paused_or_loading_never_advances() {
        let mut orch = loaded(ResultsSource::Playlist);
        commit_playing(&mut orch, "a");
        orch.pause_changed(true);
        assert!(orch.engine_idle(true).is_empty());
    }

    #[test]
    fn auto_advance_targets_the_producing_queue() {
        let mut orch = loaded(ResultsSource::Playlist);
        orch.load_up_next(vec![track("x"), track("y")]);

        let effects = orch.select_at(QueueId::UpNext, 0);
        let generation = resolve_generation(&effects);
        orch.resolution_ready(generation, track("x"), "https://s/x".into());
        orch.arm_auto_play(generation);

        // Focus moves elsewhere; natural end still follows the up-next set.
        orch.toggle_focus();
        let effects = orch.engine_idle(true);
        assert!(matches!(&effects[1], Effect::Resolve { track, .. } if track.id == "y"));
    }

    #[test]
    fn auto_advance_wraps_circularly() {
        let mut orch = Orchestrator::new();
        orch.load_results(vec![track("a"), track("b")], ResultsSource::Playlist);
        let generation = {
            let effects = orch.select_at(QueueId::Results, 1);
            resolve_generation(&effects)
        };
        orch.resolution_ready(generation, track("b"), "https://s/b".into());
        orch.arm_auto_play(generation);

        let effects = orch.engine_idle(true);
        assert!(matches!(&effects[1], Effect::Resolve { track, .. } if track.id == "a"));
    }

    #[test]
    fn refill_only_from_search_results() {
        let search_effects = loaded(ResultsSource::Search).select_at(QueueId::Results, 0);
        assert!(
            search_effects
                .iter()
                .any(|e| matches!(e, Effect::FetchRecommendations { .. }))
        );

        for source in [
            ResultsSource::Playlist,
            ResultsSource::History,
            ResultsSource::Mix,
        ] {
            let effects = loaded(source).select_at(QueueId::Results, 0);
            assert!(
                !effects
                    .iter()
                    .any(|e| matches!(e, Effect::FetchRecommendations { .. })),
                "{source:?} selection must not reseed the radio"
            );
        }

        let mut orch = loaded(ResultsSource::Search);
        orch.load_up_next(vec![track("x")]);
        let effects = orch.select_at(QueueId::UpNext, 0);
        assert!(
            !effects
                .iter()
                .any(|e| matches!(e, Effect::FetchRecommendations { .. }))
        );
    }

    #[test]
    fn skip_advances_the_producing_queue() {
        let mut orch = loaded(ResultsSource::Playlist);
        commit_playing(&mut orch, "a");

        let effects = orch.skip();
        assert!(matches!(&effects[1], Effect::Resolve { track, .. } if track.id == "b"));
        assert!(!orch.auto_play_armed);
    }

    #[test]
    fn skip_with_nothing_playing_starts_the_focused_queue() {
        let mut orch = loaded(ResultsSource::Playlist);
        let effects = orch.skip();
        assert!(matches!(&effects[1], Effect::Resolve { track, .. } if track.id == "a"));
    }

    #[test]
    fn skip_on_empty_queues_is_a_noop() {
        let mut orch = Orchestrator::new();
        assert!(orch.skip().is_empty());
        assert!(matches!(orch.state(), PlaybackState::Idle));
    }

    #[test]
    fn successful_resolution_records_history() {
        let mut orch = loaded(ResultsSource::Playlist);
        let effects = orch.select_at(QueueId::Results, 0);
        let generation = resolve_generation(&effects);
        let effects = orch.resolution_ready(generation, track("a"), "https://s/a".into());
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::RecordHistory(t) if t.id == "a"))
        );
    }

    #[test]
    fn pause_commits_follow_the_engine_flag() {
        let mut orch = loaded(ResultsSource::Playlist);
        commit_playing(&mut orch, "a");

        orch.pause_changed(true);
        assert!(matches!(orch.state(), PlaybackState::Paused(t) if t.id == "a"));
        orch.pause_changed(false);
        assert!(matches!(orch.state(), PlaybackState::Playing { track, .. } if track.id == "a"));

        // Pause flags with nothing loaded are ignored.
        let mut idle = Orchestrator::new();
        idle.pause_changed(true);
        assert!(matches!(idle.state(), PlaybackState::Idle));
    }

    #[test]
    fn empty_radio_fetch_replaces_up_next_with_empty() {
        let mut orch = Orchestrator::new();
        orch.load_up_next(vec![track("x"), track("y")]);
        orch.load_up_next(vec![]);
        assert!(orch.queue(QueueId::UpNext).is_empty());
    }
}
