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

//! Interactive track table widget and state management.
//!
//! This module provides a reusable table component for browsing a queue
//! and picking the entry to act on. The table holds only view state (the
//! highlighted row); the queue itself, including the playback cursor,
//! lives in the orchestrator. Navigation is bounds-checked against the
//! queue length passed in by the caller.

mod render;

use ratatui::widgets::TableState;

pub(crate) struct TrackTable {
    table_state: TableState,
}

impl TrackTable {
    pub(crate) fn new() -> Self {
        Self {
            table_state: TableState::new(),
        }
    }

    /// The highlighted row, if any.
    pub(crate) fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Resets the highlight to the first row (or clears it when empty).
    pub(crate) fn reset(&mut self, len: usize) {
        let selection = if len == 0 { None } else { Some(0) };
        self.table_state.select(selection);
    }

    /// Re-clamps the highlight after the queue shrank.
    pub(crate) fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.table_state.select(None);
        } else if let Some(i) = self.table_state.selected()
            && i >= len
        {
            self.table_state.select(Some(len - 1));
        }
    }

    pub(crate) fn goto_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub(crate) fn goto_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub(crate) fn goto_first(&mut self) {
        self.table_state.select_first();
    }

    pub(crate) fn goto_last(&mut self, len: usize) {
        if len > 0 {
            self.table_state.select(Some(len - 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps_within_bounds() {
        let mut table = TrackTable::new();
        table.reset(3);
        assert_eq!(table.selected(), Some(0));

        table.goto_previous(3);
        assert_eq!(table.selected(), Some(2));
        table.goto_next(3);
        assert_eq!(table.selected(), Some(0));
    }

    #[test]
    fn navigation_on_empty_table_is_inert() {
        let mut table = TrackTable::new();
        table.reset(0);
        table.goto_next(0);
        table.goto_previous(0);
        assert_eq!(table.selected(), None);
    }

    #[test]
    fn clamp_pulls_selection_back_into_range() {
        let mut table = TrackTable::new();
        table.reset(5);
        table.goto_last(5);
        table.clamp(2);
        assert_eq!(table.selected(), Some(1));
        table.clamp(0);
        assert_eq!(table.selected(), None);
    }
}
