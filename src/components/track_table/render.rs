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

//! UI rendering logic for the track table.
//!
//! This module handles the visual representation of queue entries,
//! including the playing-row marker, column layout, and theme
//! application using the Ratatui widget system.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Cell, Row, Table},
};

use crate::{
    components::TrackTable, model::queue::QueueEntry, render::icons::ICON_PLAY, theme::Theme,
};

impl TrackTable {
    /// Renders the queue entries with the playback cursor marked.
    ///
    /// `playing_index` is the queue's playback cursor when this queue
    /// produced the current track, independent of the highlighted row.
    pub(crate) fn draw(
        &mut self,
        f: &mut Frame,
        area: Rect,
        entries: &[QueueEntry],
        playing_index: Option<usize>,
        theme: &Theme,
    ) {
        let rows = entries.iter().enumerate().map(|(i, entry)| {
            let marker = if playing_index == Some(i) {
                Line::from(ICON_PLAY).style(Style::default().fg(theme.table_playing_fg))
            } else {
                Line::from("")
            };

            Row::new(vec![
                Cell::from(marker),
                Cell::from(
                    Line::from(entry.track.duration.as_str())
                        .style(Style::default().fg(theme.table_time_fg))
                        .alignment(Alignment::Right),
                ),
                Cell::from(
                    Line::from(entry.track.artist_line())
                        .style(Style::default().fg(theme.table_artist_fg)),
                ),
                Cell::from(
                    Line::from(entry.display_title())
                        .style(Style::default().fg(theme.table_track_fg)),
                ),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(6),
                Constraint::Percentage(35),
                Constraint::Percentage(65),
            ],
        )
        .header(
            Row::new(vec![
                Cell::from(""),
                Cell::from(Line::from("Time").alignment(Alignment::Right)),
                Cell::from("Artist"),
                Cell::from("Title"),
            ])
            .style(Style::default().bold().fg(theme.accent_colour))
            .bottom_margin(1),
        )
        .row_highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .block(Block::default());

        f.render_stateful_widget(table, area, &mut self.table_state);
    }
}
