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

//! Stream URL resolution.
//!
//! Maps an opaque track identifier to a direct, time-limited audio stream
//! URL by invoking the extractor executable (`yt-dlp` by default) as a
//! subprocess. Extraction can take seconds and must only run on a
//! background thread.

use std::process::Command;

use crate::error::ResolutionError;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Clone)]
pub(crate) struct StreamResolver {
    binary: String,
}

impl StreamResolver {
    pub(crate) fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
        }
    }

    /// Resolves a track identifier to a playable stream URL.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::Spawn`] when the extractor executable
    /// cannot be started, and [`ResolutionError::Extraction`] when it
    /// exits unsuccessfully or produces no URL (removed, geo-blocked,
    /// network failure).
    pub(crate) fn resolve(&self, identifier: &str) -> Result<String, ResolutionError> {
        let watch_url = format!("{WATCH_URL}{identifier}");
        let output = Command::new(&self.binary)
            .args(["--no-warnings", "-f", "bestaudio/best", "-g", &watch_url])
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ResolutionError::Extraction(summarize_stderr(&stderr)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stream_url_from_output(&stdout) {
            Some(url) => Ok(url.to_string()),
            None => Err(ResolutionError::Extraction(
                "extractor returned no stream URL".to_string(),
            )),
        }
    }
}

/// The extractor prints one URL per requested format; the first non-empty
/// line is the audio stream.
fn stream_url_from_output(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Collapses extractor stderr to its last meaningful line for reporting.
fn summarize_stderr(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .next_back()
        .unwrap_or("extractor failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_first_nonempty_output_line() {
        let out = "\nhttps://cdn.example/audio.m4a\nhttps://cdn.example/video.mp4\n";
        assert_eq!(
            stream_url_from_output(out),
            Some("https://cdn.example/audio.m4a")
        );
    }

    #[test]
    fn empty_output_yields_none() {
        assert_eq!(stream_url_from_output("\n  \n"), None);
    }

    #[test]
    fn stderr_summary_is_the_last_meaningful_line() {
        let err = "WARNING: something\nERROR: Video unavailable\n\n";
        assert_eq!(summarize_stderr(err), "ERROR: Video unavailable");
        assert_eq!(summarize_stderr(""), "extractor failed");
    }
}
