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

//! # TE-CCL Schedule
//!
//! The shared engine behind the TE-CCL schedule toolkit: a data model for
//! all-gather collective-communication schedules (hosts, switches, chunks,
//! epochs, hops, demands), the parsers for their textual encodings, and the
//! [`load`] functions that turn a topology/instance document and a schedule
//! document into a [`model::FlowGraph`].
//!
//! ## Structure
//! - [`model`] defines the core types: [`model::Hop`], [`model::Demand`],
//!   [`model::Flow`], [`model::Role`], and the aggregate [`model::FlowGraph`].
//! - [`parse`] parses demand-keys and path-strings.
//! - [`load`] ingests the two input documents and builds a [`model::FlowGraph`].
//! - [`error`] holds the fatal [`error::Error`] type.
//!
//! Validation, lowering, and simulation are downstream consumers of this
//! crate and live in the `teccl-toolkit` package.

#![deny(missing_docs, missing_debug_implementations)]

pub mod error;
pub mod load;
pub mod model;
pub mod parse;

pub use error::Error;
pub use load::{load_config, load_flow_graph, Config};
pub use model::{Chunk, Demand, Epoch, Flow, FlowGraph, Hop, Rank, RawId, Role};

#[cfg(test)]
mod test;
