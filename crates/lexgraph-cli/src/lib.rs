//! # lexgraph-cli: Command-Line Tool
//!
//! Provides the `lexgraph` binary. All file I/O and configuration loading
//! in the workspace lives here; the library crates only see parsed
//! batches and typed options.
//!
//! ## Subcommands
//!
//! - `lexgraph prepare`: shape raw regulation documents into batch files.
//! - `lexgraph build`: build, annotate and optionally export the graph.
//! - `lexgraph inspect`: show one article's successions and current version.
//! - `lexgraph status`: check that every expected batch is present.
//!
//! ```bash
//! lexgraph prepare regulations.json --out batches/
//! lexgraph -v build batches/ --export graph.json
//! lexgraph inspect batches/ --article 10
//! ```

pub mod build;
pub mod config;
pub mod inspect;
pub mod io;
pub mod prepare;
pub mod status;
