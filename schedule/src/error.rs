// TE-CCL Schedule Toolkit
// Copyright (C) 2026 TE-CCL Schedule Toolkit Contributors
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Fatal error types for schedule ingestion.
//!
//! Only conditions that abort loading live here (§7 "Input-unreadable",
//! "Malformed-document", "Missing-field"). Per-line parse failures
//! ("Malformed-line", "Value-out-of-range") are not represented as
//! [`Error`] variants: they are logged with [`log::warn!`] and the
//! offending item is skipped, so the loader keeps going and a caller gets
//! the most complete graph it can build.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort schedule/topology ingestion.
#[derive(Debug, Error)]
pub enum Error {
    /// A required input file could not be opened.
    #[error("cannot read '{path}': {source}")]
    Unreadable {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The top-level document is not valid JSON.
    #[error("malformed JSON in '{path}': {source}")]
    MalformedDocument {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// A required field or section is absent or has the wrong type.
    #[error("missing or invalid field '{field}' in '{path}'")]
    MissingField {
        /// Path of the offending document.
        path: PathBuf,
        /// Dotted field path, e.g. `TopologyParams.num_groups`.
        field: &'static str,
    },
}
