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

use std::path::PathBuf;

use clap::Parser;
use mpi::traits::*;
use teccl_toolkit::sim;

/// Simulate a TE-CCL schedule across one worker process per host and verify
/// it against a reference all-gather.
///
/// Launched via the message-passing runtime's process-launcher, e.g.
/// `mpirun -n 4 teccl-simulate config.json schedule.json`.
#[derive(Debug, Parser)]
struct Cli {
    /// Topology/instance config document.
    config: PathBuf,
    /// Schedule document.
    schedule: PathBuf,
}

fn main() {
    pretty_env_logger::init_timed();

    let universe = mpi::initialize().expect("failed to initialize the message-passing runtime");
    let world = universe.world();

    let args = Cli::parse();

    let (config, graph) = match sim::load(&args.config, &args.schedule) {
        Ok(loaded) => loaded,
        Err(e) => e.abort(&world),
    };

    match sim::run(&world, &graph, &config) {
        Ok((_, Some(verdict))) => println!("{verdict}"),
        Ok((_, None)) => {}
        Err(e) => e.abort(&world),
    }
}
