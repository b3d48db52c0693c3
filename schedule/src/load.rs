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

//! The Schedule Loader (`spec.md` §4.1): reads the topology/instance config
//! document and the schedule document, and produces a [`Config`] plus a
//! [`FlowGraph`].

use std::path::Path;

use serde_json::Value;

use crate::{
    error::Error,
    model::{FlowGraph, Hop},
    parse::{parse_demand_key, parse_flows7_line, parse_path_string},
};

/// Scalar configuration accompanying a [`FlowGraph`] (`spec.md` §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of chunks each host owns at the start.
    pub num_chunks: u32,
    /// Epoch count from `InstanceParams`, not used to bound the Simulator
    /// (see `DESIGN.md`'s resolution of the matching Open Question) but
    /// carried through for callers that want to cross-check it.
    pub num_epochs: u32,
    /// `TopologyParams.num_groups`.
    pub num_groups: u32,
    /// `TopologyParams.leaf_routers`.
    pub leaf_routers: u32,
    /// `TopologyParams.hosts_per_router`.
    pub hosts_per_router: u32,
    /// Resolved bytes-per-chunk, after the GB-vs-bytes disambiguation in
    /// `spec.md` §4.1 ("If `chunk_size < 1e6`, treat it as gigabytes;
    /// otherwise as bytes").
    pub bytes_per_chunk: u64,
}

impl Config {
    /// Total host count: `num_groups * leaf_routers * hosts_per_router`.
    pub fn total_hosts(&self) -> u32 {
        self.num_groups * self.leaf_routers * self.hosts_per_router
    }
}

fn get_object<'a>(doc: &'a Value, path: &Path, field: &'static str) -> Result<&'a Value, Error> {
    doc.get(field)
        .filter(|v| v.is_object())
        .ok_or_else(|| Error::MissingField {
            path: path.to_path_buf(),
            field,
        })
}

fn get_u32(obj: &Value, path: &Path, field: &'static str) -> Result<u32, Error> {
    obj.get(field)
        .and_then(Value::as_f64)
        .map(|v| v as u32)
        .ok_or_else(|| Error::MissingField {
            path: path.to_path_buf(),
            field,
        })
}

/// Parse `config.json`'s `InstanceParams`/`TopologyParams` into a [`Config`].
///
/// `path` is only used to attribute error messages; the document itself is
/// handed in already parsed (JSON lexing is the out-of-scope "opaque
/// structured document provider", `spec.md` §1).
pub fn load_config(doc: &Value, path: &Path) -> Result<Config, Error> {
    let instance = get_object(doc, path, "InstanceParams")?;
    let topology = get_object(doc, path, "TopologyParams")?;

    let num_chunks = get_u32(instance, path, "num_chunks")?;
    let num_epochs = get_u32(instance, path, "num_epochs")?;
    let num_groups = get_u32(topology, path, "num_groups")?;
    let leaf_routers = get_u32(topology, path, "leaf_routers")?;
    let hosts_per_router = get_u32(topology, path, "hosts_per_router")?;

    let chunk_size_bytes = topology.get("chunk_size_bytes").and_then(Value::as_f64);
    let bytes_per_chunk = match chunk_size_bytes {
        Some(bytes) => bytes.round() as u64,
        None => {
            let chunk_size = topology
                .get("chunk_size")
                .and_then(Value::as_f64)
                .ok_or_else(|| Error::MissingField {
                    path: path.to_path_buf(),
                    field: "chunk_size",
                })?;
            let gb_or_bytes = if chunk_size < 1e6 {
                chunk_size * 1e9
            } else {
                chunk_size
            };
            gb_or_bytes.round() as u64
        }
    };

    Ok(Config {
        num_chunks,
        num_epochs,
        num_groups,
        leaf_routers,
        hosts_per_router,
        bytes_per_chunk,
    })
}

/// Apply the dominance rules in `spec.md` §3 to one demand's ordered
/// hop-chain, registering every hop as a [`crate::model::Flow`] and linking
/// causal predecessor/successor pairs. `num_chunks` gates the
/// Value-out-of-range check on the caller's side; this function assumes
/// `chain` is already validated.
fn apply_chain(graph: &mut FlowGraph, chain: &[Hop]) {
    match chain.len() {
        0 => {}
        1 => {
            graph.flow_mut(chain[0]).demand_count += 1;
        }
        k => {
            // First hop: no predecessor, has a successor.
            {
                let first = graph.flow_mut(chain[0]);
                first.demand_count += 1;
                first.has_successor = true;
            }
            // Interior hops: both predecessor and successor.
            for i in 1..k - 1 {
                let pred = chain[i - 1];
                let hop = chain[i];
                graph.link(pred, hop);
                let flow = graph.flow_mut(hop);
                flow.demand_count += 1;
                flow.predecessor = Some(pred);
                flow.has_predecessor = true;
                flow.has_successor = true;
            }
            // Last hop: has a predecessor, no successor from this chain.
            {
                let pred = chain[k - 2];
                let last = chain[k - 1];
                graph.link(pred, last);
                let flow = graph.flow_mut(last);
                flow.demand_count += 1;
                flow.predecessor = Some(pred);
                flow.has_predecessor = true;
            }
        }
    }
}

/// Parse the schedule document's `"7-Flows"` section (optional) and
/// `"Chunk paths"` section (required) into a [`FlowGraph`].
pub fn load_flow_graph(doc: &Value, path: &Path, num_chunks: u32) -> Result<FlowGraph, Error> {
    let mut graph = FlowGraph::default();

    if let Some(flows7) = doc.get("7-Flows") {
        match flows7.as_array() {
            Some(lines) => {
                for line in lines {
                    let Some(text) = line.as_str() else {
                        log::warn!("'7-Flows' entry is not a string: {line}");
                        continue;
                    };
                    match parse_flows7_line(text) {
                        Some((src, dst, epoch)) => {
                            let src = graph.rank_of(src);
                            let dst = graph.rank_of(dst);
                            let hop = Hop::new(src, dst, epoch);
                            let flow = graph.flow_mut(hop);
                            flow.flows7_count = Some(flow.flows7_count.unwrap_or(0) + 1);
                        }
                        None => log::warn!("malformed '7-Flows' line: {text:?}"),
                    }
                }
            }
            None => log::warn!("'7-Flows' present but not an array; ignoring"),
        }
    }

    let chunk_paths = doc
        .get("Chunk paths")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::MissingField {
            path: path.to_path_buf(),
            field: "Chunk paths",
        })?;

    for (key, value) in chunk_paths {
        let Some(demand) = parse_demand_key(key) else {
            log::warn!("malformed demand key: {key:?}");
            continue;
        };
        if demand.chunk >= num_chunks {
            log::warn!(
                "demand {key:?}: chunk {} out of range [0, {num_chunks})",
                demand.chunk
            );
            continue;
        }
        if demand.src == demand.dst {
            log::warn!("demand {key:?}: src == dst, skipping");
            continue;
        }
        let Some(lines) = value.as_array() else {
            log::warn!("demand {key:?}: value is not an array");
            continue;
        };

        let mut chain = Vec::with_capacity(lines.len());
        for line in lines {
            let Some(text) = line.as_str() else {
                log::warn!("demand {key:?}: path-string entry is not a string");
                continue;
            };
            match parse_path_string(text) {
                Some(parsed) => {
                    let src = graph.rank_of(parsed.src);
                    let dst = graph.rank_of(parsed.dst);
                    for switch in &parsed.switches {
                        graph.record_switch(*switch);
                    }
                    chain.push(Hop::new(src, dst, parsed.epoch));
                }
                None => log::warn!("demand {key:?}: malformed path-string {text:?}"),
            }
        }

        if chain.is_empty() {
            log::warn!("demand {key:?}: no valid hops parsed, skipping");
            continue;
        }

        if let Some(max_chain_epoch) = chain.iter().map(|h| h.epoch).max() {
            if demand.end_epoch < max_chain_epoch {
                log::warn!(
                    "demand {key:?}: end_epoch {} precedes its own chain's max epoch {}",
                    demand.end_epoch,
                    max_chain_epoch
                );
            }
        }

        apply_chain(&mut graph, &chain);

        graph.demands.push(crate::model::Demand {
            requester: graph.rank_of(demand.dst),
            chunk: demand.chunk,
            origin: graph.rank_of(demand.src),
            end_epoch: demand.end_epoch,
            chain,
        });
    }

    Ok(graph)
}
