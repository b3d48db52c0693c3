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

//! The Lowerer (`spec.md` §4.3): turns a [`FlowGraph`] into a `.cm`
//! connection-list file for the downstream network simulator.

use std::io::{self, Write};

use teccl_schedule::{Config, FlowGraph, Hop, RawId, Role};
use thiserror::Error;

/// Exit codes preserved from the original `convertTecclSchedule` tool's
/// numbering, so operator tooling built against them keeps working
/// (`spec.md` §6, `DESIGN.md`).
pub mod exit_code {
    /// Wrong number of CLI arguments.
    pub const USAGE: i32 = 1;
    /// Topology document unreadable.
    pub const TOPOLOGY_UNREADABLE: i32 = 2;
    /// Topology document not valid JSON.
    pub const TOPOLOGY_MALFORMED: i32 = 3;
    /// `TopologyParams` missing or not an object.
    pub const MISSING_TOPOLOGY_PARAMS: i32 = 4;
    /// `InstanceParams` missing or not an object.
    pub const MISSING_INSTANCE_PARAMS: i32 = 5;
    /// `TopologyParams.num_groups` missing or not a number.
    pub const MISSING_NUM_GROUPS: i32 = 6;
    /// `TopologyParams.leaf_routers` missing or not a number.
    pub const MISSING_LEAF_ROUTERS: i32 = 7;
    /// `TopologyParams.hosts_per_router` missing or not a number.
    pub const MISSING_HOSTS_PER_ROUTER: i32 = 8;
    /// `TopologyParams.chunk_size`/`chunk_size_bytes` missing or not a number.
    pub const MISSING_CHUNK_SIZE: i32 = 9;
    /// `InstanceParams.num_chunks` missing or not a number.
    pub const MISSING_NUM_CHUNKS: i32 = 10;
    /// Schedule document unreadable.
    pub const SCHEDULE_UNREADABLE: i32 = 20;
    /// Schedule document not valid JSON.
    pub const SCHEDULE_MALFORMED: i32 = 21;
    /// `"7-Flows"` section present but malformed.
    pub const FLOWS7_MALFORMED: i32 = 22;
    /// `"Chunk paths"` section missing or malformed.
    pub const CHUNK_PATHS_MALFORMED: i32 = 23;
    /// Output path not writable.
    pub const OUTPUT_UNWRITABLE: i32 = 30;
}

/// Error produced while lowering a schedule.
#[derive(Debug, Error)]
pub enum LowerError {
    /// Propagated from schedule ingestion.
    #[error(transparent)]
    Schedule(#[from] teccl_schedule::Error),
    /// Failed to write the `.cm` output.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// One fully-resolved connection line, ready to be rendered.
#[derive(Debug, Clone)]
struct LoweredFlow {
    id: u32,
    src_host: RawId,
    dst_host: RawId,
    size: u64,
    role: Role,
    predecessor_id: u32,
    successor_count: u32,
}

/// Lower `graph` into the `.cm` text format and write it to `sink`.
///
/// Returns the `(connections, triggers)` counts that were written, so a
/// caller can cross-check them against the header it already wrote
/// (`spec.md` §8 property 4).
pub fn lower<W: Write>(
    graph: &FlowGraph,
    config: &Config,
    sink: &mut W,
) -> Result<(u32, u32), LowerError> {
    let hosts = graph.hosts();

    let mut order: Vec<Hop> = graph.flows.keys().copied().collect();
    order.sort_by_key(|hop| (hop.epoch, hosts[hop.src as usize], hosts[hop.dst as usize]));

    let mut id_of = std::collections::HashMap::with_capacity(order.len());
    for (idx, hop) in order.iter().enumerate() {
        id_of.insert(*hop, idx as u32 + 1);
    }

    let mut lowered = Vec::with_capacity(order.len());
    for hop in &order {
        let flow = &graph.flows[hop];
        let id = id_of[hop];
        let occurrence_count = flow.flows7_count.unwrap_or(flow.demand_count);
        let size = occurrence_count as u64 * config.num_chunks as u64 * config.bytes_per_chunk;
        let successor_count = graph.successor_count(*hop) as u32;

        let predecessor_id = match flow.predecessor {
            Some(pred) if graph.contains_flow(&pred) => *id_of.get(&pred).unwrap_or(&0),
            Some(pred) => {
                log::warn!(
                    "predecessor not found for {}->{} (epoch {}): {}->{} (epoch {})",
                    hosts[hop.src as usize],
                    hosts[hop.dst as usize],
                    hop.epoch,
                    hosts[pred.src as usize],
                    hosts[pred.dst as usize],
                    pred.epoch
                );
                0
            }
            None => 0,
        };

        lowered.push(LoweredFlow {
            id,
            src_host: hosts[hop.src as usize],
            dst_host: hosts[hop.dst as usize],
            size,
            role: flow.role(),
            predecessor_id,
            successor_count,
        });
    }

    let connections = lowered.len() as u32;
    let triggers = lowered.iter().filter(|f| f.successor_count > 0).count() as u32;

    writeln!(sink, "Nodes {}", config.total_hosts())?;
    writeln!(sink, "Connections {connections}")?;
    writeln!(sink, "Triggers {triggers}")?;

    for flow in &lowered {
        write_connection_line(sink, flow)?;
    }
    for flow in &lowered {
        if flow.successor_count > 0 {
            writeln!(sink, "trigger id {} oneshot", flow.id)?;
        }
    }

    Ok((connections, triggers))
}

fn write_connection_line<W: Write>(sink: &mut W, flow: &LoweredFlow) -> io::Result<()> {
    let LoweredFlow {
        id,
        src_host,
        dst_host,
        size,
        role,
        predecessor_id,
        successor_count,
    } = *flow;

    match role {
        Role::Nodip | Role::Unknown => {
            writeln!(sink, "{src_host}->{dst_host} id {id} start 0 size {size}")
        }
        Role::First => {
            if successor_count > 0 {
                writeln!(
                    sink,
                    "{src_host}->{dst_host} id {id} start 0 size {size} send_done_trigger {id}"
                )
            } else {
                writeln!(sink, "{src_host}->{dst_host} id {id} start 0 size {size}")
            }
        }
        Role::Mid => {
            if predecessor_id == 0 {
                log::warn!("MID without a resolvable predecessor: {src_host}->{dst_host}, degrading to start 0");
                if successor_count > 0 {
                    writeln!(
                        sink,
                        "{src_host}->{dst_host} id {id} start 0 size {size} send_done_trigger {id}"
                    )
                } else {
                    writeln!(sink, "{src_host}->{dst_host} id {id} start 0 size {size}")
                }
            } else if successor_count > 0 {
                writeln!(
                    sink,
                    "{src_host}->{dst_host} id {id} trigger {predecessor_id} size {size} send_done_trigger {id}"
                )
            } else {
                writeln!(
                    sink,
                    "{src_host}->{dst_host} id {id} trigger {predecessor_id} size {size}"
                )
            }
        }
        Role::Last => {
            if predecessor_id == 0 {
                log::warn!("LAST without a resolvable predecessor: {src_host}->{dst_host}, degrading to start 0");
                writeln!(sink, "{src_host}->{dst_host} id {id} start 0 size {size}")
            } else {
                writeln!(
                    sink,
                    "{src_host}->{dst_host} id {id} trigger {predecessor_id} size {size}"
                )
            }
        }
    }
}
