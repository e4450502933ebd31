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

//! Render the music player interface.
//!
//! This module renders the visual representation of the current track,
//! playback state, progress bar, and volume.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    orchestrator::PlaybackState,
    render::icons::{ICON_LOADING, ICON_PAUSE, ICON_PLAY, ICON_STOP},
    util,
};

/// Renders the main player widget including track info and progress.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(chunks[0]);

    if let Some(track) = app.orchestrator.state().track() {
        let icon = match app.orchestrator.state() {
            PlaybackState::Idle => ICON_STOP,
            PlaybackState::Loading(_) => ICON_LOADING,
            PlaybackState::Playing { .. } => ICON_PLAY,
            PlaybackState::Paused(_) => ICON_PAUSE,
        };

        let track_line = Line::from(vec![
            Span::styled(
                format!(" {} ", icon),
                Style::default().add_modifier(Modifier::BOLD),
            )
            .fg(Color::White),
            Span::styled(
                track.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )
            .fg(app.theme.accent_colour),
            Span::raw(" by "),
            Span::styled(
                track.artist_line(),
                Style::default().add_modifier(Modifier::BOLD),
            )
            .fg(app.theme.accent_colour),
        ]);
        f.render_widget(Paragraph::new(track_line), info_chunks[0]);

        let duration = app.player_duration.unwrap_or(0);
        let time = elapsed_seconds(app);
        let remaining = duration.saturating_sub(time);

        let time_line = Line::from(vec![
            Span::styled(
                util::format::format_time(time),
                Style::default().add_modifier(Modifier::BOLD),
            )
            .fg(app.theme.accent_colour),
            Span::styled(" / ", Style::default()).fg(Color::White),
            Span::styled(
                util::format::format_time(duration),
                Style::default().add_modifier(Modifier::BOLD),
            )
            .fg(app.theme.accent_colour),
            Span::styled(" (-", Style::default()).fg(Color::White),
            Span::styled(
                util::format::format_time(remaining),
                Style::default().add_modifier(Modifier::BOLD),
            )
            .fg(app.theme.accent_colour),
            Span::styled(")", Style::default()).fg(Color::White),
        ]);

        let time_p = Paragraph::new(time_line).alignment(Alignment::Right);
        f.render_widget(time_p, info_chunks[1]);
    }

    let control_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(26)])
        .split(chunks[2]);

    let volume = app.volume.unwrap_or(0);
    let vol_ratio = (volume as f64 / 100.0).clamp(0.0, 1.0);

    let volume_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(control_chunks[1]);

    let volume_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(vol_ratio)
        .label("")
        .use_unicode(true);
    f.render_widget(volume_gauge, volume_layout[0]);

    let volume_label = Paragraph::new(format!(" {}%", volume))
        .alignment(Alignment::Right)
        .fg(Color::White);
    f.render_widget(volume_label, volume_layout[1]);

    let position = progress_ratio(app);

    let position_gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(position)
        .label("")
        .use_unicode(true);

    f.render_widget(position_gauge, chunks[4]);
}

/// Elapsed seconds from the engine's last report, falling back to wall
/// clock since the stream started while the first report is pending.
fn elapsed_seconds(app: &App) -> u64 {
    match app.player_time {
        Some(seconds) => seconds as u64,
        None => match app.orchestrator.state() {
            PlaybackState::Playing { started_at, .. } => started_at.elapsed().as_secs(),
            _ => 0,
        },
    }
}

fn progress_ratio(app: &App) -> f64 {
    let duration = app.player_duration.unwrap_or(0);
    if duration == 0 {
        return 0.0;
    }
    (elapsed_seconds(app) as f64 / duration as f64).clamp(0.0, 1.0)
}
