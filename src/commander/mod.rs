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

//! Command-line input logic and state management.
//!
//! This module implements the `:` command line, handling a text input
//! component and dispatching the corresponding application event or task
//! when a command is submitted. `/` opens the same input pre-filled with
//! the search command.

use std::sync::mpsc::Sender;

use crossterm::event::{Event, KeyCode, KeyEvent};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::{events::AppEvent, tasks::AppTask};

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Offers a key event to the commander.
    ///
    /// Returns `true` when the key was consumed, either because the
    /// commander is active or because the key activates it.
    pub(crate) fn handle_key(
        &mut self,
        key_event: KeyEvent,
        task_tx: &Sender<AppTask>,
        event_tx: &Sender<AppEvent>,
    ) -> bool {
        if self.active {
            match key_event.code {
                KeyCode::Esc => {
                    self.active = false;
                    self.input.reset();
                    true
                }

                KeyCode::Enter => {
                    let buffer = self.input.value().trim().to_string();
                    if !buffer.is_empty() {
                        self.run_command(&buffer, task_tx, event_tx);
                    }
                    self.input.reset();
                    self.active = false;
                    true
                }

                _ => {
                    // Delegate all other key events to the managed input
                    // component.
                    self.input.handle_event(&Event::Key(key_event));
                    true
                }
            }
        } else {
            match key_event.code {
                KeyCode::Char(':') => {
                    self.active = true;
                    true
                }

                KeyCode::Char('/') => {
                    self.active = true;
                    self.input = Input::new("f ".to_string());
                    true
                }

                _ => false,
            }
        }
    }

    fn run_command(
        &self,
        buffer: &str,
        task_tx: &Sender<AppTask>,
        event_tx: &Sender<AppEvent>,
    ) {
        let parts: Vec<&str> = buffer.split_whitespace().collect();

        match parts.as_slice() {
            ["q"] => {
                let _ = event_tx.send(AppEvent::ExitApplication);
            }

            ["f", query_parts @ ..] if !query_parts.is_empty() => {
                let query = query_parts.join(" ");
                let _ = event_tx.send(AppEvent::SearchRequested(query));
            }

            ["mix"] => {
                let _ = event_tx.send(AppEvent::MixRequested);
            }

            ["radio"] => {
                let _ = event_tx.send(AppEvent::RefreshRecommendations);
            }

            ["pl"] => {
                let _ = task_tx.send(AppTask::LoadPlaylist);
            }

            ["hist"] => {
                let _ = task_tx.send(AppTask::LoadHistory);
            }

            _ => {
                let _ = event_tx.send(AppEvent::Status(format!("Unknown command: {buffer}")));
            }
        }
    }
}
