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

//! Parsers for the schedule's textual mini-languages: demand-keys and
//! path-strings (`spec.md` §3, §4.1).
//!
//! Deliberately hand-rolled rather than built on a regex crate: both
//! grammars are a handful of fixed literal separators around integers, the
//! same shape of parsing `bgpsim`'s own `topology_zoo` module does by hand
//! for GraphML-adjacent text.

use crate::model::{Chunk, Epoch, RawId};

/// One hop parsed out of a path-string, plus the switches it traverses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHop {
    /// Sender host id.
    pub src: RawId,
    /// Receiver host id.
    pub dst: RawId,
    /// Epoch of this hop.
    pub epoch: Epoch,
    /// Switch ids traversed by this hop, in path order.
    pub switches: Vec<RawId>,
}

/// A demand extracted from a `"Chunk paths"` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDemand {
    /// Host requesting the chunk.
    pub dst: RawId,
    /// Chunk index requested.
    pub chunk: Chunk,
    /// Host owning the chunk.
    pub src: RawId,
    /// Epoch by which the demand must be met.
    pub end_epoch: Epoch,
}

/// Parse a demand-key of the form:
/// `Demand at <dst> for chunk <chunk> from <src> met by epoch <end_epoch>`.
pub fn parse_demand_key(key: &str) -> Option<ParsedDemand> {
    let rest = key.strip_prefix("Demand at ")?;
    let (dst, rest) = rest.split_once(" for chunk ")?;
    let (chunk, rest) = rest.split_once(" from ")?;
    let (src, rest) = rest.split_once(" met by epoch ")?;

    Some(ParsedDemand {
        dst: dst.trim().parse().ok()?,
        chunk: chunk.trim().parse().ok()?,
        src: src.trim().parse().ok()?,
        end_epoch: rest.trim().parse().ok()?,
    })
}

/// Parse the `<src>-><dst> in epoch <e>` prefix shared by path-strings and
/// `"7-Flows"` lines (once the `"traveled over "` prefix of the latter has
/// been stripped).
fn parse_edge_epoch(s: &str) -> Option<(RawId, RawId, Epoch)> {
    let (edge, rest) = s.split_once(" in epoch ")?;
    let (src, dst) = edge.trim().split_once("->")?;
    // The epoch is followed either by end-of-string (a `"7-Flows"` line) or
    // by `" via switches ..."` (a path-string); take the leading digits.
    let epoch_str = rest.trim().split_whitespace().next()?;
    Some((
        src.trim().parse().ok()?,
        dst.trim().parse().ok()?,
        epoch_str.parse().ok()?,
    ))
}

/// Parse a full path-string: `<src>-><dst> in epoch <e> via switches <s1> ->
/// <s2> -> ... -> <sk>`. The switch list may be empty.
pub fn parse_path_string(s: &str) -> Option<ParsedHop> {
    let (src, dst, epoch) = parse_edge_epoch(s)?;
    let (_, switches_part) = s.split_once("via switches")?;
    let switches_part = switches_part.trim();
    let switches = if switches_part.is_empty() {
        Vec::new()
    } else {
        switches_part
            .split("->")
            .map(|tok| tok.trim().parse::<RawId>())
            .collect::<Result<Vec<_>, _>>()
            .ok()?
    };
    Some(ParsedHop {
        src,
        dst,
        epoch,
        switches,
    })
}

/// Parse one `"7-Flows"` entry: `traveled over <src>-><dst> in epoch <e>`.
/// Grammar recovered from `original_source/my-program/convertTecclSchedule.c`
/// (`parse_flow_line_7`), since `spec.md` leaves the line format implicit.
pub fn parse_flows7_line(s: &str) -> Option<(RawId, RawId, Epoch)> {
    let rest = s.strip_prefix("traveled over ")?;
    parse_edge_epoch(rest)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn demand_key() {
        let d = parse_demand_key("Demand at 1 for chunk 0 from 0 met by epoch 0").unwrap();
        assert_eq!(
            d,
            ParsedDemand {
                dst: 1,
                chunk: 0,
                src: 0,
                end_epoch: 0
            }
        );
    }

    #[test]
    fn demand_key_rejects_garbage() {
        assert!(parse_demand_key("not a demand key").is_none());
    }

    #[test]
    fn path_string_no_switches() {
        let h = parse_path_string("0->1 in epoch 0 via switches").unwrap();
        assert_eq!(h.src, 0);
        assert_eq!(h.dst, 1);
        assert_eq!(h.epoch, 0);
        assert!(h.switches.is_empty());
    }

    #[test]
    fn path_string_with_switches() {
        let h = parse_path_string("0->1 in epoch 0 via switches 10 -> 20 -> 30").unwrap();
        assert_eq!(h.switches, vec![10, 20, 30]);
    }

    #[test]
    fn path_string_single_switch() {
        let h = parse_path_string("1->2 in epoch 1 via switches 20").unwrap();
        assert_eq!(h.switches, vec![20]);
    }

    #[test]
    fn flows7_line() {
        let (s, d, e) = parse_flows7_line("traveled over 0->1 in epoch 0").unwrap();
        assert_eq!((s, d, e), (0, 1, 0));
    }

    #[test]
    fn rejects_malformed_path_string() {
        assert!(parse_path_string("garbage").is_none());
    }
}
