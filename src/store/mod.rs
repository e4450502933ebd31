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

//! Persistent history and playlist store.
//!
//! This module handles all interactions with the SQLite database. Two
//! tables back it:
//!
//! * `history` - append-only play log, newest first on read.
//! * `playlist` - saved tracks with set semantics (saving an already
//!   saved track is a no-op).
//!
//! Most functions use [`rusqlite::Connection::prepare_cached`] to reduce
//! SQL parsing overhead.

use anyhow::{Context, Result};
use rusqlite::{Connection, Row, params};

use crate::{error::StoreError, model::Track};

/// Opens the SQLite database and configures performance settings.
///
/// Enables WAL mode, relaxes synchronous writes, and ensures the schema
/// exists.
///
/// # Errors
///
/// Returns an error if the database file cannot be opened, the PRAGMA
/// configuration fails, or the schema cannot be created.
pub(crate) fn init_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        anyhow::bail!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        );
    }

    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -64000; -- Use 64MB of RAM for cache
    ",
    )?;

    conn.set_prepared_statement_cache_capacity(100);

    create_schema(&conn)?;

    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            track_id TEXT NOT NULL,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            duration TEXT NOT NULL,
            played_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_history_track_id ON history (track_id);

        CREATE TABLE IF NOT EXISTS playlist (
            track_id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            duration TEXT NOT NULL
        );

        COMMIT;",
    )
    .context("Failed to create schema")
}

/// Appends a play record to the history log.
pub(crate) fn append_history(conn: &Connection, track: &Track) -> Result<(), StoreError> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO history (track_id, title, artist, duration) VALUES (?1, ?2, ?3, ?4)",
    )?;
    stmt.execute(params![
        track.id,
        track.title,
        track.artist_line(),
        track.duration
    ])?;

    Ok(())
}

/// Fetches the most recent history records, newest first.
pub(crate) fn recent_history(conn: &Connection, limit: usize) -> Result<Vec<Track>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT track_id, title, artist, duration
         FROM history
         ORDER BY id DESC
         LIMIT ?",
    )?;
    let results = stmt
        .query_map([limit as i64], track_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(results)
}

/// Saves a track to the playlist. Already saved tracks are left alone.
pub(crate) fn add_to_playlist(conn: &Connection, track: &Track) -> Result<(), StoreError> {
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO playlist (track_id, title, artist, duration)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    stmt.execute(params![
        track.id,
        track.title,
        track.artist_line(),
        track.duration
    ])?;

    Ok(())
}

/// Fetches the saved playlist.
pub(crate) fn playlist(conn: &Connection) -> Result<Vec<Track>, StoreError> {
    let mut stmt =
        conn.prepare_cached("SELECT track_id, title, artist, duration FROM playlist")?;
    let results = stmt
        .query_map([], track_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(results)
}

/// Deletes a track from both the playlist and the history log.
///
/// Returns `true` when at least one row was removed from either table.
pub(crate) fn remove(conn: &Connection, track_id: &str) -> Result<bool, StoreError> {
    let track_id = track_id.trim();

    let mut stmt = conn.prepare_cached("DELETE FROM playlist WHERE track_id = ?")?;
    let playlist_deleted = stmt.execute([track_id])?;

    let mut stmt = conn.prepare_cached("DELETE FROM history WHERE track_id = ?")?;
    let history_deleted = stmt.execute([track_id])?;

    Ok(playlist_deleted + history_deleted > 0)
}

/// Fallback removal matching on title and artist instead of identifier.
///
/// Returns `true` when at least one row was removed from either table.
pub(crate) fn remove_by_title_artist(
    conn: &Connection,
    title: &str,
    artist: &str,
) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare_cached("DELETE FROM playlist WHERE title = ? AND artist = ?")?;
    let playlist_deleted = stmt.execute([title, artist])?;

    let mut stmt = conn.prepare_cached("DELETE FROM history WHERE title = ? AND artist = ?")?;
    let history_deleted = stmt.execute([title, artist])?;

    Ok(playlist_deleted + history_deleted > 0)
}

fn track_from_row(row: &Row) -> rusqlite::Result<Track> {
    let artist: String = row.get(2)?;
    Ok(Track {
        id: row.get(0)?,
        title: row.get(1)?,
        artists: if artist.is_empty() {
            vec![]
        } else {
            artist.split(", ").map(str::to_string).collect()
        },
        duration: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        create_schema(&conn).expect("schema");
        conn
    }

    fn track(id: &str, title: &str, artists: &[&str]) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            artists: artists.iter().map(|a| a.to_string()).collect(),
            duration: "3:00".to_string(),
        }
    }

    #[test]
    fn history_reads_back_newest_first() {
        let conn = test_conn();
        append_history(&conn, &track("a", "first", &["X"])).unwrap();
        append_history(&conn, &track("b", "second", &["Y"])).unwrap();
        append_history(&conn, &track("c", "third", &["Z"])).unwrap();

        let recent = recent_history(&conn, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "c");
        assert_eq!(recent[1].id, "b");
    }

    #[test]
    fn artists_survive_the_joined_column() {
        let conn = test_conn();
        append_history(&conn, &track("a", "t", &["A", "B"])).unwrap();
        let recent = recent_history(&conn, 1).unwrap();
        assert_eq!(recent[0].artists, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn playlist_has_set_semantics() {
        let conn = test_conn();
        let t = track("a", "t", &["X"]);
        add_to_playlist(&conn, &t).unwrap();
        add_to_playlist(&conn, &t).unwrap();
        assert_eq!(playlist(&conn).unwrap().len(), 1);
    }

    #[test]
    fn remove_clears_both_tables() {
        let conn = test_conn();
        let t = track("a", "t", &["X"]);
        append_history(&conn, &t).unwrap();
        add_to_playlist(&conn, &t).unwrap();

        assert!(remove(&conn, "a").unwrap());
        assert!(playlist(&conn).unwrap().is_empty());
        assert!(recent_history(&conn, 10).unwrap().is_empty());
    }

    #[test]
    fn remove_missing_track_is_a_soft_failure() {
        let conn = test_conn();
        append_history(&conn, &track("a", "t", &["X"])).unwrap();

        assert!(!remove(&conn, "zzz").unwrap());
        assert_eq!(recent_history(&conn, 10).unwrap().len(), 1);
    }

    #[test]
    fn remove_from_a_single_table_still_succeeds() {
        let conn = test_conn();
        add_to_playlist(&conn, &track("p", "t", &["X"])).unwrap();
        assert!(remove(&conn, "p").unwrap());

        append_history(&conn, &track("h", "t", &["X"])).unwrap();
        assert!(remove(&conn, "h").unwrap());
    }

    #[test]
    fn remove_by_title_artist_matches_the_joined_artist_line() {
        let conn = test_conn();
        let t = track("a", "Song", &["A", "B"]);
        append_history(&conn, &t).unwrap();
        add_to_playlist(&conn, &t).unwrap();

        assert!(!remove_by_title_artist(&conn, "Song", "A").unwrap());
        assert!(remove_by_title_artist(&conn, "Song", "A, B").unwrap());
        assert!(playlist(&conn).unwrap().is_empty());
    }
}
