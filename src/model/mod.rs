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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application: catalog
//! tracks and the cursor-addressed playback queues built from them.

pub(crate) mod queue;

/// A playable catalog item.
///
/// The `id` is an opaque identifier assigned by the remote catalog. It is
/// unique within a result set, but the same track may legitimately appear
/// more than once in a single response (a song recommended twice, say);
/// queue-level keying handles that case, see [`queue::QueueEntry::key`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Track {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) artists: Vec<String>,
    pub(crate) duration: String,
}

impl Track {
    /// Artists joined for display and storage.
    pub(crate) fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

/// Which of the two playback queues an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueueId {
    Results,
    UpNext,
}

/// Where the current contents of the results queue came from.
///
/// Recommendation refill is keyed on this: only selections made from
/// `Search` results trigger a radio fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResultsSource {
    Search,
    Playlist,
    History,
    Mix,
}
