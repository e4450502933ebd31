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

//! Playback queue management.
//!
//! This module provides the cursor-addressed track queue used for both the
//! result set and the up-next set. A queue is always replaced wholesale
//! (never merged), and its cursor stays within `[0, len)` whenever the
//! queue is non-empty, wrapping to the start past the end.

use std::collections::HashMap;

use crate::model::Track;

/// A track plus its occurrence index within the queue load.
///
/// Catalog responses can contain the same identifier twice, so the
/// identifier alone is not a valid key within one queue. `dup` counts
/// repeat occurrences at load time and [`QueueEntry::key`] folds it into
/// a key that is unique within the queue.
#[derive(Debug, Clone)]
pub(crate) struct QueueEntry {
    pub(crate) track: Track,
    pub(crate) dup: usize,
}

impl QueueEntry {
    /// Key unique within the owning queue.
    pub(crate) fn key(&self) -> String {
        if self.dup == 0 {
            self.track.id.clone()
        } else {
            format!("{}#{}", self.track.id, self.dup)
        }
    }

    /// Title with a disambiguation suffix for repeated identifiers.
    pub(crate) fn display_title(&self) -> String {
        if self.dup == 0 {
            self.track.title.clone()
        } else {
            format!("{} ({})", self.track.title, self.dup + 1)
        }
    }
}

/// An ordered, mutable sequence of tracks plus a playback cursor.
pub(crate) struct TrackQueue {
    entries: Vec<QueueEntry>,
    cursor: usize,
}

impl TrackQueue {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }

    /// Replaces the queue contents wholesale and resets the cursor to 0.
    pub(crate) fn load(&mut self, tracks: Vec<Track>) {
        let mut seen: HashMap<String, usize> = HashMap::new();
        self.entries = tracks
            .into_iter()
            .map(|track| {
                let dup = seen.entry(track.id.clone()).or_insert(0);
                let entry = QueueEntry { track, dup: *dup };
                *dup += 1;
                entry
            })
            .collect();
        self.cursor = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// The entry under the cursor, if any.
    pub(crate) fn current(&self) -> Option<&QueueEntry> {
        self.entries.get(self.cursor)
    }

    /// Moves the cursor forward one entry, wrapping to 0 past the end.
    ///
    /// Advancing an empty queue is a no-op.
    pub(crate) fn advance(&mut self) -> Option<&QueueEntry> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.entries.len();
        self.current()
    }

    /// Moves the cursor to `index` if it is in bounds.
    pub(crate) fn seek(&mut self, index: usize) -> Option<&QueueEntry> {
        if index < self.entries.len() {
            self.cursor = index;
            self.current()
        } else {
            None
        }
    }

    /// Removes the entry with the given queue key.
    ///
    /// Returns `false` when no entry matches; the queue is left unchanged.
    /// The cursor is re-clamped so the bounds invariant holds.
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.key() == key) else {
            return false;
        };
        self.entries.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        }
        if self.cursor >= self.entries.len() {
            self.cursor = 0;
        }
        true
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

    #[test]
    fn load_resets_cursor() {
        let mut queue = TrackQueue::new();
        queue.load(vec![track("a"), track("b"), track("c")]);
        queue.seek(2);
        queue.load(vec![track("d")]);
        assert_eq!(queue.cursor(), 0);
        assert_eq!(queue.current().unwrap().track.id, "d");
    }

    #[test]
    fn advance_wraps_past_the_end() {
        let mut queue = TrackQueue::new();
        queue.load(vec![track("a"), track("b")]);
        assert_eq!(queue.advance().unwrap().track.id, "b");
        assert_eq!(queue.advance().unwrap().track.id, "a");
        assert_eq!(queue.cursor(), 0);
    }

    #[test]
    fn advance_on_empty_queue_is_a_noop() {
        let mut queue = TrackQueue::new();
        assert!(queue.advance().is_none());
        assert_eq!(queue.cursor(), 0);
    }

    #[test]
    fn seek_out_of_bounds_leaves_cursor() {
        let mut queue = TrackQueue::new();
        queue.load(vec![track("a"), track("b")]);
        queue.seek(1);
        assert!(queue.seek(5).is_none());
        assert_eq!(queue.cursor(), 1);
    }

    #[test]
    fn duplicate_identifiers_get_distinct_keys() {
        let mut queue = TrackQueue::new();
        queue.load(vec![track("v1"), track("v1")]);
        let keys: Vec<String> = queue.entries().iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["v1".to_string(), "v1#1".to_string()]);

        // Each occurrence is independently removable.
        assert!(queue.remove("v1#1"));
        assert_eq!(queue.len(), 1);
        assert!(queue.remove("v1"));
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_missing_key_returns_false() {
        let mut queue = TrackQueue::new();
        queue.load(vec![track("a")]);
        assert!(!queue.remove("zzz"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn remove_before_cursor_shifts_cursor_back() {
        let mut queue = TrackQueue::new();
        queue.load(vec![track("a"), track("b"), track("c")]);
        queue.seek(2);
        assert!(queue.remove("a"));
        assert_eq!(queue.current().unwrap().track.id, "c");
    }

    #[test]
    fn remove_last_entry_under_cursor_wraps_to_start() {
        let mut queue = TrackQueue::new();
        queue.load(vec![track("a"), track("b")]);
        queue.seek(1);
        assert!(queue.remove("b"));
        assert_eq!(queue.cursor(), 0);
        assert_eq!(queue.current().unwrap().track.id, "a");
    }
}
