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

//! The per-worker epoch loop and post-run verification (`spec.md` §4.4,
//! §5's posting/draining state machine).

use log::debug;
use mpi::request::{scope, WaitGuard};
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use super::message::MessageRecord;

/// Where a worker is within one epoch's processing. Exists purely so
/// `log::debug!` traces can pin down which phase a stuck run is in, the same
/// role the teacher's own multi-stage runtime state enums play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerPhase {
    Posting,
    Draining,
}

/// Run the epoch loop for worker `world.rank()`: for `ep` in `0..=max_epoch`,
/// post every receive this worker is `dst` for, then every send this worker
/// is `src` for, wait for all of them, then enter a global barrier.
///
/// `gather_buf` is the flat `W * num_chunks * chunk_ints` buffer; slot
/// `(origin, chunk)` begins at `origin * num_chunks * chunk_ints + chunk *
/// chunk_ints`.
pub fn run_epoch_loop(
    world: &SimpleCommunicator,
    messages: &[MessageRecord],
    gather_buf: &mut [i32],
    num_chunks: usize,
    chunk_ints: usize,
    max_epoch: i32,
) {
    let my_rank = world.rank();
    let data_per_host = num_chunks * chunk_ints;

    for ep in 0..=max_epoch {
        let this_epoch: Vec<&MessageRecord> = messages.iter().filter(|m| m.epoch == ep).collect();

        debug!("rank {my_rank}: epoch {ep} phase={:?}", WorkerPhase::Posting);

        // Sends read from slots that were already settled before this epoch
        // began, so snapshot their payloads now, before any receive this
        // epoch can mutate `gather_buf`.
        let send_payloads: Vec<(i32, i32, Vec<i32>)> = this_epoch
            .iter()
            .filter(|m| m.src == my_rank)
            .map(|m| {
                let offset = m.origin as usize * data_per_host + m.chunk as usize * chunk_ints;
                (m.dst, m.seq, gather_buf[offset..offset + chunk_ints].to_vec())
            })
            .collect();

        // Receives land into scratch buffers first; copying them into
        // `gather_buf` after `wait_all` keeps every receive slot disjoint
        // without needing unsafe aliasing of the shared buffer.
        let recv_specs: Vec<(i32, i32, usize)> = this_epoch
            .iter()
            .filter(|m| m.dst == my_rank)
            .map(|m| {
                let offset = m.origin as usize * data_per_host + m.chunk as usize * chunk_ints;
                (m.src, m.seq, offset)
            })
            .collect();
        let mut recv_bufs: Vec<Vec<i32>> = recv_specs.iter().map(|_| vec![0i32; chunk_ints]).collect();

        scope(|scope| {
            let mut recv_guards = Vec::with_capacity(recv_specs.len());
            for ((src, seq, _), buf) in recv_specs.iter().zip(recv_bufs.iter_mut()) {
                let req = world
                    .process_at_rank(*src)
                    .immediate_receive_into_with_tag(scope, buf.as_mut_slice(), *seq);
                recv_guards.push(WaitGuard::from(req));
            }

            debug!("rank {my_rank}: epoch {ep} phase={:?}", WorkerPhase::Posting);

            let mut send_guards = Vec::with_capacity(send_payloads.len());
            for (dst, seq, payload) in &send_payloads {
                let req = world
                    .process_at_rank(*dst)
                    .immediate_send_with_tag(scope, payload.as_slice(), *seq);
                send_guards.push(WaitGuard::from(req));
            }

            debug!("rank {my_rank}: epoch {ep} phase={:?}", WorkerPhase::Draining);
            // Guards drop here, blocking until every posted request lands.
        });

        for ((_, _, offset), buf) in recv_specs.iter().zip(recv_bufs.into_iter()) {
            gather_buf[*offset..*offset + chunk_ints].copy_from_slice(&buf);
        }

        world.barrier();
        debug!("rank {my_rank}: epoch {ep} done");
    }
}

/// Outcome of comparing this worker's simulated gather buffer against the
/// reference all-gather.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// The buffers matched in full.
    Ok,
    /// The buffers first diverge at flat index `global_i`.
    Mismatch {
        /// Flat index into the gather buffer of the first mismatch.
        global_i: usize,
        /// Which host's slice the mismatch falls in.
        slice: usize,
        /// Offset within that slice.
        pos: usize,
        /// Value produced by the simulated epoch loop.
        sim: i32,
        /// Value produced by the reference all-gather.
        mpi: i32,
    },
}

impl Comparison {
    /// Build a comparison from two equal-length buffers.
    pub fn compare(sim_global: &[i32], mpi_buf: &[i32], data_per_host: usize) -> Self {
        for (i, (&sim, &mpi)) in sim_global.iter().zip(mpi_buf.iter()).enumerate() {
            if sim != mpi {
                return Comparison::Mismatch {
                    global_i: i,
                    slice: i / data_per_host,
                    pos: i % data_per_host,
                    sim,
                    mpi,
                };
            }
        }
        Comparison::Ok
    }

    /// Render the exact `[COMPARE]` line `spec.md` §4.4/§7 requires.
    pub fn render(&self, proc: i32) -> String {
        match self {
            Comparison::Ok => format!("[COMPARE] proc {proc}: OK"),
            Comparison::Mismatch {
                global_i,
                slice,
                pos,
                sim,
                mpi,
            } => format!(
                "[COMPARE] proc {proc}: MISMATCH at global_i={global_i} (slice={slice}, pos={pos}) (sim={sim}, mpi={mpi})"
            ),
        }
    }

    /// Whether this worker's buffers matched.
    pub fn is_ok(&self) -> bool {
        matches!(self, Comparison::Ok)
    }
}

/// Compute the reference all-gather of `local` across `world` into a freshly
/// allocated `W * data_per_host`-length buffer.
pub fn reference_all_gather(world: &SimpleCommunicator, local: &[i32]) -> Vec<i32> {
    let size = world.size() as usize;
    let mut buf = vec![0i32; size * local.len()];
    world.all_gather_into(local, &mut buf);
    buf
}

/// Render the final `[RESULT]` verdict line, given the AND-reduction of
/// every worker's local pass/fail.
pub fn render_result(all_ok: bool) -> &'static str {
    if all_ok {
        "[RESULT] Tutti i rank hanno sim_global == MPI_Allgather"
    } else {
        "[RESULT] Almeno un rank NON ha sim_global == MPI_Allgather"
    }
}
