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

//! Remote catalog client.
//!
//! This module talks to a Piped-compatible JSON API to search the music
//! catalog and to fetch radio-style recommendations for a seed track. All
//! calls are blocking network I/O and must only run on background threads;
//! the event loop never calls in here directly.

use std::time::Duration;

use serde_json::Value;

use crate::{error::CatalogError, model::Track, util};

const SEARCH_FILTER: &str = "music_songs";

/// Client for the remote track catalog. Cheap to clone; clones share the
/// underlying HTTP agent.
#[derive(Clone)]
pub(crate) struct CatalogClient {
    agent: ureq::Agent,
    endpoint: String,
}

impl CatalogClient {
    pub(crate) fn new(endpoint: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .timeout_write(Duration::from_secs(15))
            .build();
        Self {
            agent,
            endpoint: endpoint.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Searches the catalog, returning at most `limit` tracks.
    pub(crate) fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>, CatalogError> {
        let url = format!(
            "{}/search?q={}&filter={}",
            self.endpoint,
            urlencoding::encode(query),
            SEARCH_FILTER
        );
        let payload = self.request_json(&url)?;

        let items = payload
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| CatalogError::Malformed("missing items array".to_string()))?;

        Ok(items.iter().filter_map(parse_item).take(limit).collect())
    }

    /// Fetches recommendations seeded on a track identifier.
    ///
    /// An empty list is a legitimate outcome ("no recommendations"), not
    /// an error.
    pub(crate) fn radio(&self, seed_identifier: &str) -> Result<Vec<Track>, CatalogError> {
        let url = format!(
            "{}/streams/{}",
            self.endpoint,
            urlencoding::encode(seed_identifier)
        );
        let payload = self.request_json(&url)?;

        let related = payload
            .get("relatedStreams")
            .and_then(Value::as_array)
            .ok_or_else(|| CatalogError::Malformed("missing relatedStreams".to_string()))?;

        Ok(related.iter().filter_map(parse_item).collect())
    }

    fn request_json(&self, url: &str) -> Result<Value, CatalogError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| CatalogError::Http(Box::new(e)))?;
        Ok(response.into_json::<Value>()?)
    }
}

/// Maps one catalog item to a [`Track`], skipping entries without a
/// usable identifier or title.
fn parse_item(item: &Value) -> Option<Track> {
    let id = item
        .get("url")
        .and_then(Value::as_str)
        .and_then(identifier_from_url)?;
    let title = item.get("title").and_then(Value::as_str)?;

    let artist = item
        .get("uploaderName")
        .and_then(Value::as_str)
        .map(strip_topic_suffix)
        .unwrap_or_default();
    let artists = if artist.is_empty() {
        vec![]
    } else {
        artist.split(", ").map(str::to_string).collect()
    };

    let duration = item
        .get("duration")
        .and_then(Value::as_u64)
        .map(util::format::format_time)
        .unwrap_or_else(|| "--:--".to_string());

    Some(Track {
        id: id.to_string(),
        title: title.to_string(),
        artists,
        duration,
    })
}

/// Extracts the opaque identifier from a `/watch?v=...` item URL.
fn identifier_from_url(url: &str) -> Option<&str> {
    let (_, id) = url.rsplit_once("v=")?;
    let id = id.split('&').next()?;
    if id.is_empty() { None } else { Some(id) }
}

// Auto-generated channels carry a " - Topic" suffix that is not part of
// the artist name.
fn strip_topic_suffix(name: &str) -> &str {
    name.trim_end_matches(" - Topic").trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_complete_item() {
        let item = json!({
            "url": "/watch?v=dQw4w9WgXcQ",
            "title": "Never Gonna Give You Up",
            "uploaderName": "Rick Astley - Topic",
            "duration": 213,
        });
        let track = parse_item(&item).unwrap();
        assert_eq!(track.id, "dQw4w9WgXcQ");
        assert_eq!(track.title, "Never Gonna Give You Up");
        assert_eq!(track.artists, vec!["Rick Astley".to_string()]);
        assert_eq!(track.duration, "03:33");
    }

    #[test]
    fn skips_items_without_identifier_or_title() {
        assert!(parse_item(&json!({ "title": "x" })).is_none());
        assert!(parse_item(&json!({ "url": "/watch?v=abc" })).is_none());
        assert!(parse_item(&json!({ "url": "/playlist?list=abc", "title": "x" })).is_none());
    }

    #[test]
    fn identifier_ignores_trailing_query_params() {
        assert_eq!(identifier_from_url("/watch?v=abc&list=RD123"), Some("abc"));
        assert_eq!(identifier_from_url("/watch?v="), None);
    }

    #[test]
    fn missing_duration_renders_as_unknown() {
        let item = json!({ "url": "/watch?v=abc", "title": "x" });
        let track = parse_item(&item).unwrap();
        assert_eq!(track.duration, "--:--");
        assert!(track.artists.is_empty());
    }

    #[test]
    fn splits_joined_uploader_names() {
        let item = json!({
            "url": "/watch?v=abc",
            "title": "x",
            "uploaderName": "A, B",
        });
        let track = parse_item(&item).unwrap();
        assert_eq!(track.artists, vec!["A".to_string(), "B".to_string()]);
    }
}
