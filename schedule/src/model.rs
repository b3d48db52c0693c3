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

//! The data model shared by the Validator, Lowerer, and Simulator: hosts,
//! switches, chunks, epochs, hops, demands, and the deduplicated flow graph
//! derived from them (`spec.md` §3).

use std::collections::{BTreeSet, HashMap};

use petgraph::graphmap::DiGraphMap;

/// Dense, 0-based rank assigned to a host in order of first appearance.
pub type Rank = u32;

/// Raw integer id for a host or switch, as it appears in the input documents.
pub type RawId = i64;

/// Index of a chunk within `[0, num_chunks)`.
pub type Chunk = u32;

/// A synchronous round of the schedule.
pub type Epoch = u32;

/// One `(src_host, dst_host, epoch)` edge in the schedule — the atomic unit
/// the schedule is made of. Hosts are stored as dense ranks, not raw ids,
/// so that a `Hop` can serve directly as a map/graph key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hop {
    /// Sender rank.
    pub src: Rank,
    /// Receiver rank.
    pub dst: Rank,
    /// Epoch in which this hop is scheduled.
    pub epoch: Epoch,
}

impl Hop {
    /// Build a new hop.
    pub fn new(src: Rank, dst: Rank, epoch: Epoch) -> Self {
        Self { src, dst, epoch }
    }
}

/// The role of a [`Flow`] within the chains it participates in.
///
/// See the dominance rules in `spec.md` §3: a hop seen as a chain's sole
/// element is `Nodip` unless some other chain also routes through it, `Mid`
/// dominates once both a predecessor and a successor have been observed,
/// and `First` dominates over `Nodip` once a successor has been observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Unvisited placeholder; never observed by the end of loading.
    Unknown,
    /// Single-hop chain: no predecessor, no successor.
    Nodip,
    /// First hop of a multi-hop chain: no predecessor, has a successor.
    First,
    /// Interior hop of a multi-hop chain: has both predecessor and successor.
    Mid,
    /// Last hop of a multi-hop chain: has a predecessor, no successor.
    Last,
}

impl Default for Role {
    fn default() -> Self {
        Role::Unknown
    }
}

/// The deduplicated record for one distinct `(src, dst, epoch)` hop.
///
/// `role` is deliberately not a stored, imperatively-mutated field. The
/// original C implementation mutates a role field in place while walking
/// chains, and (per `spec.md`'s Open Questions) this goes subtly wrong when
/// the same hop is FIRST in one chain and LAST in another, depending on
/// which chain is processed first. Instead, `Flow` only accumulates the two
/// raw observations (`has_predecessor`, `has_successor`) and [`Flow::role`]
/// derives the role from them on demand — which makes the dominance rules
/// (MID whenever both are set, FIRST dominates NODIP) hold regardless of
/// chain processing order, by construction.
#[derive(Debug, Clone, Default)]
pub struct Flow {
    /// Number of demands whose chain contains this hop.
    pub demand_count: u32,
    /// Occurrence count read directly from the schedule's `"7-Flows"`
    /// section, if that section was present. Absent, the Lowerer falls
    /// back to `demand_count` (`spec.md` §4.3).
    pub flows7_count: Option<u32>,
    /// Predecessor hop in the chain, if any (set for `Mid`/`Last`).
    pub predecessor: Option<Hop>,
    /// Whether any chain observed a predecessor before this hop.
    pub has_predecessor: bool,
    /// Whether any chain observed a successor after this hop.
    pub has_successor: bool,
}

impl Flow {
    /// Derive this flow's role from the accumulated predecessor/successor
    /// observations (`spec.md` §3's dominance rules).
    pub fn role(&self) -> Role {
        if self.demand_count == 0 {
            return Role::Unknown;
        }
        match (self.has_predecessor, self.has_successor) {
            (true, true) => Role::Mid,
            (true, false) => Role::Last,
            (false, true) => Role::First,
            (false, false) => Role::Nodip,
        }
    }
}

/// One `(requesting_dst, chunk, origin_src, end_epoch)` need, together with
/// the ordered hop-chain that satisfies it.
#[derive(Debug, Clone)]
pub struct Demand {
    /// Host requesting the chunk.
    pub requester: Rank,
    /// Chunk index being requested.
    pub chunk: Chunk,
    /// Host that originally owns the chunk.
    pub origin: Rank,
    /// Epoch by which the schedule promises delivery.
    pub end_epoch: Epoch,
    /// Ordered chain of hops ferrying the chunk from `origin` to `requester`.
    pub chain: Vec<Hop>,
}

/// The aggregate derived from all demands in a schedule (`spec.md` §3).
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    /// Rank-to-host-id table, in order of first appearance.
    rank_to_host: Vec<RawId>,
    /// Reverse lookup from host id to rank.
    host_to_rank: HashMap<RawId, Rank>,
    /// All switch ids observed while parsing path-strings.
    switches: BTreeSet<RawId>,
    /// Every demand extracted from the schedule's `"Chunk paths"` section.
    pub demands: Vec<Demand>,
    /// Deduplicated `(src, dst, epoch) -> Flow` map.
    pub flows: HashMap<Hop, Flow>,
    /// Predecessor/successor edges between hops, keyed the same way as
    /// `flows`. Kept as a graph (rather than only the `predecessor` field on
    /// each [`Flow`]) so successor fan-out and reachability queries used by
    /// the Lowerer don't need a second linear pass over `flows`.
    dag: DiGraphMap<Hop, ()>,
}

impl FlowGraph {
    /// Look up the rank for a host id, assigning a fresh dense rank the
    /// first time a given id is seen.
    pub fn rank_of(&mut self, host_id: RawId) -> Rank {
        if let Some(rank) = self.host_to_rank.get(&host_id) {
            return *rank;
        }
        let rank = self.rank_to_host.len() as Rank;
        self.rank_to_host.push(host_id);
        self.host_to_rank.insert(host_id, rank);
        rank
    }

    /// Number of distinct hosts discovered so far.
    pub fn num_hosts(&self) -> usize {
        self.rank_to_host.len()
    }

    /// The rank-to-host-id table, in order of first appearance.
    pub fn hosts(&self) -> &[RawId] {
        &self.rank_to_host
    }

    /// Record a switch id observed on some hop.
    pub fn record_switch(&mut self, switch_id: RawId) {
        self.switches.insert(switch_id);
    }

    /// The set of distinct switch ids observed across all chains.
    pub fn switches(&self) -> &BTreeSet<RawId> {
        &self.switches
    }

    /// Get or create the [`Flow`] for a given hop, registering it in the
    /// dependency graph too.
    pub fn flow_mut(&mut self, hop: Hop) -> &mut Flow {
        self.dag.add_node(hop);
        self.flows.entry(hop).or_default()
    }

    /// Record that `successor` is causally chained after `predecessor`.
    pub fn link(&mut self, predecessor: Hop, successor: Hop) {
        self.dag.add_edge(predecessor, successor, ());
    }

    /// Whether `hop` is itself a known flow (invariant 3: every MID/LAST's
    /// predecessor must resolve to a Flow in the graph).
    pub fn contains_flow(&self, hop: &Hop) -> bool {
        self.flows.contains_key(hop)
    }

    /// Number of distinct successor hops recorded for `hop`.
    pub fn successor_count(&self, hop: Hop) -> usize {
        self.dag.neighbors(hop).count()
    }

    /// The maximum epoch appearing in any flow, or `None` for an empty graph.
    pub fn max_epoch(&self) -> Option<Epoch> {
        self.flows.keys().map(|hop| hop.epoch).max()
    }
}
