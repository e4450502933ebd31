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

//! Render the two queue panes.
//!
//! The results pane shows the current result set (search, playlist,
//! history, or mix) and the up-next pane shows the radio recommendations.
//! The focused pane carries the accent border; the playing row is marked
//! in whichever pane produced the current track.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Padding},
};

use crate::{
    App,
    model::{QueueId, ResultsSource},
};

pub(crate) fn draw_queues(f: &mut Frame, area: Rect, app: &mut App) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_queue_pane(f, panes[0], app, QueueId::Results);
    draw_queue_pane(f, panes[1], app, QueueId::UpNext);
}

fn draw_queue_pane(f: &mut Frame, area: Rect, app: &mut App, queue_id: QueueId) {
    let title = pane_title(app, queue_id);
    let focused = app.orchestrator.focus() == queue_id;
    let border_colour = if focused {
        app.theme.focus_border_colour
    } else {
        app.theme.border_colour
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_colour))
        .padding(Padding::horizontal(1))
        .title(title);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let queue = app.orchestrator.queue(queue_id);
    let playing_index = if app.orchestrator.playing_from() == Some(queue_id) {
        Some(queue.cursor())
    } else {
        None
    };

    // The table needs simultaneous access to the entries and its own view
    // state, so clone the entries out of the orchestrator borrow first.
    let entries = queue.entries().to_vec();
    let theme = app.theme;
    let view = match queue_id {
        QueueId::Results => &mut app.results_view,
        QueueId::UpNext => &mut app.up_next_view,
    };
    view.draw(f, inner_area, &entries, playing_index, &theme);
}

fn pane_title(app: &App, queue_id: QueueId) -> String {
    match queue_id {
        QueueId::Results => {
            let source = match app.orchestrator.results_source() {
                ResultsSource::Search => "Search",
                ResultsSource::Playlist => "Playlist",
                ResultsSource::History => "History",
                ResultsSource::Mix => "Made For You",
            };
            format!(" {source} ")
        }
        QueueId::UpNext => {
            if app.orchestrator.queue(QueueId::UpNext).is_empty() {
                " Up Next (no recommendations) ".to_string()
            } else {
                " Up Next ".to_string()
            }
        }
    }
}
