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

//! The Validator (`spec.md` §4.2): decides whether a [`FlowGraph`] realizes
//! a correct all-gather — every host delivers every chunk to every other
//! host.

use std::fmt;

use teccl_schedule::{Chunk, FlowGraph, RawId};
use thiserror::Error;

/// One missing delivery: host `dst_host` never receives chunk `chunk` from
/// `src_host`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingDelivery {
    /// Origin host that owns the chunk.
    pub src_host: RawId,
    /// Host that should have, but never does, receive it.
    pub dst_host: RawId,
    /// The chunk that is never delivered.
    pub chunk: Chunk,
}

impl fmt::Display for MissingDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Missing chunk {} from src {} to dst {}",
            self.chunk, self.src_host, self.dst_host
        )
    }
}

/// The result of validating a schedule.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Every `(src, dst, chunk)` triple with no matching demand, ordered by
    /// `(src_rank, dst_rank, chunk)` (`spec.md` §4.2).
    pub missing: Vec<MissingDelivery>,
}

impl Report {
    /// Whether the schedule realizes a valid all-gather (no missing
    /// deliveries).
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Error produced while validating a schedule. The Validator itself has no
/// fatal failure modes beyond whatever the Loader already reports.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// Propagated from schedule ingestion.
    #[error(transparent)]
    Schedule(#[from] teccl_schedule::Error),
}

/// Check that `graph` realizes an all-gather over `num_chunks` chunks
/// (`spec.md` §4.2): for every ordered pair of distinct hosts `(a, b)` and
/// every chunk `c`, some demand `(requester=b, chunk=c, origin=a, ...)` must
/// exist.
///
/// `O(H^2 * num_chunks)` time and space, via the flat boolean tensor
/// `delivered[src_rank * H * num_chunks + dst_rank * num_chunks + chunk]`
/// the spec's design notes call out as the idiomatic replacement for the
/// original's hand-rolled 3-D array.
pub fn validate(graph: &FlowGraph, num_chunks: u32) -> Report {
    let h = graph.num_hosts();
    let nc = num_chunks as usize;
    let mut delivered = vec![false; h * h * nc];

    for demand in &graph.demands {
        let idx = demand.origin as usize * h * nc
            + demand.requester as usize * nc
            + demand.chunk as usize;
        delivered[idx] = true;
    }

    let hosts = graph.hosts();
    let mut missing = Vec::new();
    for src in 0..h {
        for dst in 0..h {
            if src == dst {
                continue;
            }
            for chunk in 0..nc {
                if !delivered[src * h * nc + dst * nc + chunk] {
                    missing.push(MissingDelivery {
                        src_host: hosts[src],
                        dst_host: hosts[dst],
                        chunk: chunk as Chunk,
                    });
                }
            }
        }
    }

    Report { missing }
}
