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

//! "Made for you" seed derivation.
//!
//! Builds a catalog query from recent listening history: the most-played
//! artists are ranked and one of the top three is picked at random, so the
//! mix varies between refreshes instead of always seeding on the single
//! most frequent artist.

use rand::Rng;
use rand::RngExt;

use crate::model::Track;

/// Derives a mix seed query from recent history records.
///
/// Artist names are counted across `history` (most recent first); the top
/// three by frequency, with ties broken by first appearance, form the
/// candidate set, and one candidate is chosen uniformly at random. Empty
/// or artist-less history falls back to `fallback`, verbatim.
pub(crate) fn mix_query<R: Rng>(history: &[Track], fallback: &str, rng: &mut R) -> String {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in history {
        for artist in &record.artists {
            let name = artist.trim();
            if name.is_empty() {
                continue;
            }
            match counts.iter_mut().find(|entry| entry.0 == name) {
                Some(entry) => entry.1 += 1,
                None => counts.push((name.to_string(), 1)),
            }
        }
    }

    if counts.is_empty() {
        return fallback.to_string();
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(3);

    let pick = rng.random_range(0..counts.len());
    format!("{} radio", counts[pick].0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(artists: &[&str]) -> Track {
        Track {
            id: "id".to_string(),
            title: "title".to_string(),
            artists: artists.iter().map(|a| a.to_string()).collect(),
            duration: "3:00".to_string(),
        }
    }

    const FALLBACK: &str = "lofi mix";

    #[test]
    fn empty_history_uses_the_fallback_deterministically() {
        let mut rng = rand::rng();
        for _ in 0..10 {
            assert_eq!(mix_query(&[], FALLBACK, &mut rng), FALLBACK);
        }
    }

    #[test]
    fn artistless_history_uses_the_fallback() {
        let mut rng = rand::rng();
        let history = vec![record(&[""]), record(&["  "])];
        assert_eq!(mix_query(&history, FALLBACK, &mut rng), FALLBACK);
    }

    #[test]
    fn seed_is_always_drawn_from_the_top_artists() {
        let mut rng = rand::rng();
        let history = vec![record(&["A"]), record(&["A"]), record(&["B"])];
        for _ in 0..50 {
            let query = mix_query(&history, FALLBACK, &mut rng);
            assert!(
                query == "A radio" || query == "B radio",
                "unexpected seed query: {query}"
            );
        }
    }

    #[test]
    fn only_the_top_three_are_candidates() {
        let mut rng = rand::rng();
        let mut history = Vec::new();
        for _ in 0..4 {
            history.push(record(&["A"]));
        }
        for _ in 0..3 {
            history.push(record(&["B"]));
        }
        for _ in 0..2 {
            history.push(record(&["C"]));
        }
        history.push(record(&["D"]));

        for _ in 0..50 {
            let query = mix_query(&history, FALLBACK, &mut rng);
            assert_ne!(query, "D radio");
        }
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let mut rng = rand::rng();
        // Four artists, all with one play: only the first three seen
        // may become candidates.
        let history = vec![
            record(&["A"]),
            record(&["B"]),
            record(&["C"]),
            record(&["D"]),
        ];
        for _ in 0..50 {
            let query = mix_query(&history, FALLBACK, &mut rng);
            assert_ne!(query, "D radio");
        }
    }

    #[test]
    fn multi_artist_records_count_each_artist() {
        let mut rng = rand::rng();
        let history = vec![record(&["A", "B"]), record(&["B"])];
        // B outranks A but both are candidates.
        for _ in 0..50 {
            let query = mix_query(&history, FALLBACK, &mut rng);
            assert!(query == "A radio" || query == "B radio");
        }
    }
}
