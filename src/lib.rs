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

//! # TE-CCL Schedule Toolkit
//!
//! Three components sharing the [`teccl_schedule`] data model, turning an
//! all-gather collective-communication schedule into a validity verdict, a
//! lowered connection-list file, or a simulated run:
//!
//! - [`validate`] — the Validator: does this schedule deliver every chunk to
//!   every host?
//! - [`lower`] — the Lowerer: emit a `.cm` connection-list file with trigger
//!   dependencies for the downstream network simulator.
//! - [`sim`] — the Simulator: replay the schedule across one worker process
//!   per host and check the result against a reference all-gather. Gated
//!   behind the `mpi-runtime` feature, since it is the only component that
//!   needs a message-passing runtime to run at all.

#![deny(missing_docs, missing_debug_implementations)]

pub mod lower;
#[cfg(feature = "mpi-runtime")]
pub mod sim;
pub mod validate;

#[cfg(test)]
mod test;

pub use lower::{lower as lower_schedule, LowerError};
pub use validate::{validate as validate_schedule, ValidateError};
