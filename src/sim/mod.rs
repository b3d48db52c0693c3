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

//! The Simulator (`spec.md` §4.4): distributes a [`FlowGraph`] across one
//! worker process per host and drives the epoch loop, verifying the result
//! against a reference all-gather.
//!
//! Gated behind the `mpi-runtime` feature, mirroring how the teacher gates
//! its own real-lab runtime behind `cisco-lab` rather than making it a hard
//! dependency of the default build.

mod executor;
mod message;

use std::path::Path;

use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use rand::Rng;
use teccl_schedule::{Config, FlowGraph};
use thiserror::Error;

pub use executor::{render_result, Comparison};
pub use message::MessageRecord;

/// Error produced while preparing or running the Simulator.
#[derive(Debug, Error)]
pub enum SimError {
    /// Propagated from schedule ingestion.
    #[error(transparent)]
    Schedule(#[from] teccl_schedule::Error),
    /// The message-passing runtime's worker count does not match the number
    /// of distinct hosts in the schedule (*Runtime-mismatch*, `spec.md` §7).
    #[error("worker count {workers} does not match host count {hosts}")]
    WorkerCountMismatch {
        /// Number of MPI ranks the runtime launched.
        workers: i32,
        /// Number of distinct hosts the schedule addresses.
        hosts: usize,
    },
    /// `chunk_size`/`chunk_size_bytes` does not divide evenly into a
    /// positive number of `i32` slots.
    #[error("chunk size {bytes} bytes does not yield a positive integer count")]
    InvalidChunkSize {
        /// The resolved bytes-per-chunk value.
        bytes: u64,
    },
}

impl SimError {
    /// Abort every rank in `world`, matching "Runtime-mismatch: fatal via
    /// runtime abort" (`spec.md` §7). Does not return.
    pub fn abort(&self, world: &SimpleCommunicator) -> ! {
        log::error!("{self}");
        world.abort(1)
    }
}

/// Run the full Simulator for this worker: build the per-worker message
/// lists from `graph`, seed this worker's local payload, drive the epoch
/// loop, and verify the result against a reference all-gather.
///
/// Returns this worker's [`Comparison`] and, only on rank 0, the overall
/// verdict rendered by [`render_result`].
pub fn run(
    world: &SimpleCommunicator,
    graph: &FlowGraph,
    config: &Config,
) -> Result<(Comparison, Option<&'static str>), SimError> {
    let hosts = graph.num_hosts();
    if world.size() as usize != hosts {
        return Err(SimError::WorkerCountMismatch {
            workers: world.size(),
            hosts,
        });
    }

    let chunk_ints = (config.bytes_per_chunk / std::mem::size_of::<i32>() as u64) as usize;
    if chunk_ints == 0 {
        return Err(SimError::InvalidChunkSize {
            bytes: config.bytes_per_chunk,
        });
    }

    let per_worker = message::build_message_records(graph);
    let my_rank = world.rank();
    let my_messages = &per_worker[my_rank as usize];

    let max_epoch = graph.max_epoch().unwrap_or(0) as i32;
    let num_chunks = config.num_chunks as usize;
    let data_per_host = num_chunks * chunk_ints;

    let mut rng = rand::thread_rng();
    let local: Vec<i32> = (0..data_per_host).map(|_| rng.gen()).collect();

    let mut gather_buf = vec![0i32; hosts * data_per_host];
    gather_buf[my_rank as usize * data_per_host..(my_rank as usize + 1) * data_per_host]
        .copy_from_slice(&local);

    executor::run_epoch_loop(world, my_messages, &mut gather_buf, num_chunks, chunk_ints, max_epoch);
    world.barrier();

    let reference = executor::reference_all_gather(world, &local);
    let comparison = Comparison::compare(&gather_buf, &reference, data_per_host);
    // [COMPARE] is result output every worker must print unconditionally
    // (`spec.md` §7), the same way the original prints it with `printf` —
    // not a `DBG` trace, so it goes to stdout rather than through `log`.
    println!("{}", comparison.render(my_rank));
    log::debug!("rank {my_rank}: comparison = {comparison:?}");

    let local_ok = if comparison.is_ok() { 1i32 } else { 0i32 };
    let mut all_ok = 0i32;
    world.all_reduce_into(&local_ok, &mut all_ok, &mpi::collective::SystemOperation::logical_and());

    let verdict = if my_rank == 0 {
        Some(render_result(all_ok != 0))
    } else {
        None
    };

    Ok((comparison, verdict))
}

/// Load the config and schedule documents needed to run the Simulator.
///
/// Every worker reads and parses both documents independently rather than
/// having rank 0 broadcast them: the two documents are small, parsing is
/// pure and deterministic, and every rank needs the full [`FlowGraph`]
/// anyway to derive its own slice of [`MessageRecord`]s, so a broadcast
/// would only add a round trip without avoiding any work.
pub fn load(config_path: &Path, schedule_path: &Path) -> Result<(Config, FlowGraph), SimError> {
    let config_text = std::fs::read_to_string(config_path)
        .map_err(|source| teccl_schedule::Error::Unreadable {
            path: config_path.to_path_buf(),
            source,
        })?;
    let config_doc: serde_json::Value =
        serde_json::from_str(&config_text).map_err(|source| teccl_schedule::Error::MalformedDocument {
            path: config_path.to_path_buf(),
            source,
        })?;
    let config = teccl_schedule::load_config(&config_doc, config_path)?;

    let schedule_text =
        std::fs::read_to_string(schedule_path).map_err(|source| teccl_schedule::Error::Unreadable {
            path: schedule_path.to_path_buf(),
            source,
        })?;
    let schedule_doc: serde_json::Value = serde_json::from_str(&schedule_text).map_err(|source| {
        teccl_schedule::Error::MalformedDocument {
            path: schedule_path.to_path_buf(),
            source,
        }
    })?;
    let graph = teccl_schedule::load_flow_graph(&schedule_doc, schedule_path, config.num_chunks)?;

    Ok((config, graph))
}
