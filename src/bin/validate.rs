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
use teccl_toolkit::validate_schedule;

/// Check that a TE-CCL schedule realizes a complete all-gather.
#[derive(Debug, Parser)]
struct Cli {
    /// Topology/instance config document.
    config: PathBuf,
    /// Schedule document.
    schedule: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();

    let config_doc: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&args.config)?)?;
    let config = teccl_schedule::load_config(&config_doc, &args.config)?;

    let schedule_doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&args.schedule)?)?;
    let graph = teccl_schedule::load_flow_graph(&schedule_doc, &args.schedule, config.num_chunks)?;

    let report = validate_schedule(&graph, config.num_chunks);
    for missing in &report.missing {
        println!("{missing}");
    }
    if report.is_valid() {
        println!("valid all-gather");
    } else {
        println!("not a valid all-gather ({} missing)", report.missing.len());
    }

    Ok(())
}
