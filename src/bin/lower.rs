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

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use teccl_toolkit::lower::exit_code;
use teccl_toolkit::lower_schedule;

/// Lower a TE-CCL schedule into a `.cm` connection-list file.
#[derive(Debug, Parser)]
struct Cli {
    /// Topology/instance config document.
    topology: PathBuf,
    /// Schedule document.
    schedule: PathBuf,
    /// Output `.cm` path.
    output: PathBuf,
}

fn fail(code: i32, message: impl std::fmt::Display) -> ! {
    eprintln!("Errore: {message}");
    std::process::exit(code);
}

fn main() {
    pretty_env_logger::init_timed();

    let args = Cli::parse();

    let topology_text = match std::fs::read_to_string(&args.topology) {
        Ok(text) => text,
        Err(e) => fail(exit_code::TOPOLOGY_UNREADABLE, e),
    };
    let topology_doc: serde_json::Value = match serde_json::from_str(&topology_text) {
        Ok(doc) => doc,
        Err(e) => fail(exit_code::TOPOLOGY_MALFORMED, e),
    };
    let config = match teccl_schedule::load_config(&topology_doc, &args.topology) {
        Ok(config) => config,
        Err(teccl_schedule::Error::MissingField { field, .. }) => {
            let code = match field {
                "TopologyParams" => exit_code::MISSING_TOPOLOGY_PARAMS,
                "InstanceParams" => exit_code::MISSING_INSTANCE_PARAMS,
                "num_groups" => exit_code::MISSING_NUM_GROUPS,
                "leaf_routers" => exit_code::MISSING_LEAF_ROUTERS,
                "hosts_per_router" => exit_code::MISSING_HOSTS_PER_ROUTER,
                "chunk_size" => exit_code::MISSING_CHUNK_SIZE,
                "num_chunks" => exit_code::MISSING_NUM_CHUNKS,
                _ => exit_code::MISSING_TOPOLOGY_PARAMS,
            };
            fail(code, format!("missing or invalid field '{field}'"))
        }
        Err(e) => fail(exit_code::TOPOLOGY_MALFORMED, e),
    };

    let schedule_text = match std::fs::read_to_string(&args.schedule) {
        Ok(text) => text,
        Err(e) => fail(exit_code::SCHEDULE_UNREADABLE, e),
    };
    let schedule_doc: serde_json::Value = match serde_json::from_str(&schedule_text) {
        Ok(doc) => doc,
        Err(e) => fail(exit_code::SCHEDULE_MALFORMED, e),
    };
    let graph = match teccl_schedule::load_flow_graph(&schedule_doc, &args.schedule, config.num_chunks)
    {
        Ok(graph) => graph,
        Err(e) => fail(exit_code::CHUNK_PATHS_MALFORMED, e),
    };

    let output = match File::create(&args.output) {
        Ok(f) => f,
        Err(e) => fail(exit_code::OUTPUT_UNWRITABLE, e),
    };
    let mut sink = BufWriter::new(output);

    let (connections, triggers) = match lower_schedule(&graph, &config, &mut sink) {
        Ok(counts) => counts,
        Err(e) => fail(exit_code::OUTPUT_UNWRITABLE, e),
    };

    eprintln!("[OK] CM written to '{}'", args.output.display());
    eprintln!(
        "[INFO] Nodes={} Connections={} Triggers={} bytes/chunk={} (num_chunks={})",
        config.total_hosts(),
        connections,
        triggers,
        config.bytes_per_chunk,
        config.num_chunks
    );
}
