//! # Prepare
//!
//! `lexgraph prepare <raw.json> --out <dir>` shapes raw regulation
//! documents into one batch file per collection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use lexgraph_build::shape;

use crate::io::{load_raw, write_batches};

/// Arguments for `lexgraph prepare`.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// JSON array of raw regulation documents.
    pub raw: PathBuf,

    /// Directory to write `<collection>.json` batch files into.
    #[arg(long)]
    pub out: PathBuf,
}

/// Execute `lexgraph prepare`.
pub fn run_prepare(args: &PrepareArgs) -> Result<u8> {
    let raw = load_raw(&args.raw)?;
    let batches = shape(&raw).context("failed to shape raw regulations")?;
    let written = write_batches(&args.out, &batches)?;
    info!(regulations = raw.len(), batches = written.len(), "prepared batches");

    for (name, rows) in &batches {
        println!("  {name:<24} {:>8} rows", rows.len());
    }
    println!("wrote {} batches to {}", written.len(), args.out.display());
    Ok(0)
}
