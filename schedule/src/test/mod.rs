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

//! Integration tests for schedule ingestion, covering the end-to-end
//! scenarios from `spec.md` §8 that exercise `load_flow_graph` in isolation
//! (the Validator/Lowerer-specific scenarios live in `teccl-toolkit`).

use std::path::Path;

use serde_json::json;

use crate::{
    load::load_flow_graph,
    model::{Hop, Role},
};

fn graph_of(doc: serde_json::Value, num_chunks: u32) -> crate::model::FlowGraph {
    load_flow_graph(&doc, Path::new("schedule.json"), num_chunks).unwrap()
}

/// S1 — minimal two-host single-chunk schedule.
#[test]
fn s1_two_host_single_chunk() {
    let doc = json!({
        "Chunk paths": {
            "Demand at 1 for chunk 0 from 0 met by epoch 0": [
                "0->1 in epoch 0 via switches"
            ],
            "Demand at 0 for chunk 0 from 1 met by epoch 0": [
                "1->0 in epoch 0 via switches"
            ],
        }
    });
    let graph = graph_of(doc, 1);
    assert_eq!(graph.num_hosts(), 2);
    assert_eq!(graph.flows.len(), 2);
    for flow in graph.flows.values() {
        assert_eq!(flow.role(), Role::Nodip);
    }
}

/// S2 — a chain of three hosts: `0->1` (epoch 0) then `1->2` (epoch 1).
#[test]
fn s2_chain_of_three() {
    let doc = json!({
        "Chunk paths": {
            "Demand at 2 for chunk 0 from 0 met by epoch 1": [
                "0->1 in epoch 0 via switches 10",
                "1->2 in epoch 1 via switches 20",
            ],
        }
    });
    let graph = graph_of(doc, 1);
    let h01 = Hop::new(0, 1, 0);
    let h12 = Hop::new(1, 2, 1);
    assert_eq!(graph.flows[&h01].role(), Role::First);
    assert_eq!(graph.flows[&h12].role(), Role::Last);
    pretty_assertions_sorted::assert_eq!(graph.flows[&h12].predecessor, Some(h01));
    assert_eq!(graph.switches().len(), 2);
}

/// S4 — a chain `0->1->2->3`: the middle hop `1->2` must be MID with both
/// a predecessor and a successor.
#[test]
fn s4_mid_with_successor() {
    let doc = json!({
        "Chunk paths": {
            "Demand at 3 for chunk 0 from 0 met by epoch 2": [
                "0->1 in epoch 0 via switches",
                "1->2 in epoch 1 via switches",
                "2->3 in epoch 2 via switches",
            ],
        }
    });
    let graph = graph_of(doc, 1);
    let h01 = Hop::new(0, 1, 0);
    let h12 = Hop::new(1, 2, 1);
    let h23 = Hop::new(2, 3, 2);
    assert_eq!(graph.flows[&h12].role(), Role::Mid);
    assert_eq!(graph.flows[&h12].predecessor, Some(h01));
    assert!(graph.successor_count(h12) > 0);
    assert_eq!(graph.flows[&h23].role(), Role::Last);
}

/// S6 — two distinct demands share the same `(u, v, e)` hop: the flow graph
/// deduplicates them into a single Flow whose `demand_count` is 2.
#[test]
fn s6_duplicate_hop_single_occurrence() {
    let doc = json!({
        "Chunk paths": {
            "Demand at 1 for chunk 0 from 0 met by epoch 0": [
                "0->1 in epoch 0 via switches"
            ],
            "Demand at 1 for chunk 1 from 0 met by epoch 0": [
                "0->1 in epoch 0 via switches"
            ],
        }
    });
    let graph = graph_of(doc, 2);
    assert_eq!(graph.flows.len(), 1);
    let flow = &graph.flows[&Hop::new(0, 1, 0)];
    assert_eq!(flow.demand_count, 2);
}

/// Same hop, observed as LAST in one demand and FIRST in another: the
/// combined role must be MID, regardless of which demand is processed
/// first (`serde_json`'s object map preserves insertion order).
#[test]
fn mixed_order_first_then_last_yields_mid() {
    let last_first_doc = json!({
        "Chunk paths": {
            "Demand at 2 for chunk 0 from 0 met by epoch 1": [
                "0->1 in epoch 0 via switches",
                "1->2 in epoch 1 via switches",
            ],
            "Demand at 9 for chunk 1 from 1 met by epoch 1": [
                "1->2 in epoch 1 via switches",
                "2->9 in epoch 2 via switches",
            ],
        }
    });
    let first_last_doc = json!({
        "Chunk paths": {
            "Demand at 9 for chunk 1 from 1 met by epoch 1": [
                "1->2 in epoch 1 via switches",
                "2->9 in epoch 2 via switches",
            ],
            "Demand at 2 for chunk 0 from 0 met by epoch 1": [
                "0->1 in epoch 0 via switches",
                "1->2 in epoch 1 via switches",
            ],
        }
    });
    for doc in [last_first_doc, first_last_doc] {
        let graph = graph_of(doc, 2);
        let h12 = Hop::new(1, 2, 1);
        assert_eq!(graph.flows[&h12].role(), Role::Mid);
    }
}

#[test]
fn chunk_out_of_range_is_skipped() {
    let doc = json!({
        "Chunk paths": {
            "Demand at 1 for chunk 5 from 0 met by epoch 0": [
                "0->1 in epoch 0 via switches"
            ],
        }
    });
    let graph = graph_of(doc, 1);
    assert!(graph.demands.is_empty());
}

#[test]
fn malformed_demand_key_is_skipped_not_fatal() {
    let doc = json!({
        "Chunk paths": {
            "this is not a demand key": [
                "0->1 in epoch 0 via switches"
            ],
        }
    });
    let graph = graph_of(doc, 1);
    assert!(graph.demands.is_empty());
}
