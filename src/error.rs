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

//! Collaborator error taxonomy.
//!
//! Every collaborator call site converts its failure into one of these
//! kinds and continues; none of them may take down the event loop.

use thiserror::Error;

/// Catalog search or radio call failed, or returned malformed data.
#[derive(Debug, Error)]
pub(crate) enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("catalog response unreadable: {0}")]
    Read(#[from] std::io::Error),

    #[error("catalog response malformed: {0}")]
    Malformed(String),
}

/// Stream URL extraction failed (geo-block, removed, network).
#[derive(Debug, Error)]
pub(crate) enum ResolutionError {
    #[error("could not run resolver: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("extraction failed: {0}")]
    Extraction(String),
}

/// Persistence failure; the operation degrades to a reported no-op.
#[derive(Debug, Error)]
#[error("store operation failed: {0}")]
pub(crate) struct StoreError(#[from] rusqlite::Error);
