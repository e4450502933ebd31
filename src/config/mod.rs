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

//! Application configuration.
//!
//! This module manages the application configuration file.

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "tuneq";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub version: u32,
    /// Base URL of the Piped-compatible catalog API.
    pub api_endpoint: String,
    /// Stream extractor executable.
    pub resolver_binary: String,
    /// Catalog query used for the mix when history has no usable artists.
    pub fallback_mix_query: String,
    /// Maximum number of tracks requested per search.
    pub search_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            api_endpoint: "https://pipedapi.kavin.rocks".to_string(),
            resolver_binary: "yt-dlp".to_string(),
            fallback_mix_query: "lofi hip hop radio".to_string(),
            search_limit: 25,
        }
    }
}

pub fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}
