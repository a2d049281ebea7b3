//! # Status
//!
//! `lexgraph status <dir>` reports whether a batch directory is fully
//! loaded: every expected batch present and non-empty. Exit code 0 when
//! complete, 2 otherwise.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use lexgraph_build::{missing_collections, EXPECTED_COLLECTIONS};

use crate::io::load_batches;

/// Arguments for `lexgraph status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Batch directory.
    pub dir: PathBuf,
}

/// Execute `lexgraph status`.
pub fn run_status(args: &StatusArgs) -> Result<u8> {
    let batches = load_batches(&args.dir)?;
    let missing = missing_collections(&batches);

    for name in EXPECTED_COLLECTIONS {
        let rows = batches.get(name).map_or(0, Vec::len);
        let mark = if missing.contains(&name) { "MISSING" } else { "ok" };
        println!("  {name:<24} {rows:>8}  {mark}");
    }

    if missing.is_empty() {
        println!("complete");
        Ok(0)
    } else {
        println!(
            "incomplete: {} of {} batches missing or empty",
            missing.len(),
            EXPECTED_COLLECTIONS.len()
        );
        Ok(2)
    }
}
