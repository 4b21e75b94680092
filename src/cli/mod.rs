//! Command-line interface for fasta-validator.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **validate**: Validate a FASTA file and print a report
//! - **params**: Print or write a parameter file template
//!
//! ## Usage
//!
//! ```text
//! # Validate with default options
//! fasta-validator validate proteins.fasta
//!
//! # Allow stop codons and override options from a parameter file
//! fasta-validator validate proteins.fasta.gz --allow-asterisk --parameter-file params.json
//!
//! # JSON output for scripting
//! fasta-validator validate proteins.fasta --format json
//!
//! # Write a parameter file template
//! fasta-validator params --output params.json
//! ```

use clap::{Parser, Subcommand};

pub mod params;
pub mod validate;

#[derive(Parser)]
#[command(name = "fasta-validator")]
#[command(version)]
#[command(about = "Validate FASTA protein and nucleotide database files")]
#[command(
    long_about = "fasta-validator checks FASTA database files in a single streaming pass.\n\nIt reports:\n- Structural defects (text before the first entry, missing names, empty entries, blank lines)\n- Invalid residue characters and malformed headers\n- Duplicate protein names and duplicate sequences"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a FASTA file
    Validate(validate::ValidateArgs),

    /// Print or write a parameter file template
    Params(params::ParamsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
