//! Command-line argument definitions for the Wardley CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects the operation; global options control
//! configuration file selection and logging verbosity.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Wardley map tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

/// The operation to run on a map source.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a map and report every diagnostic
    Check {
        /// Path to the map source
        input: String,
    },

    /// Print the elements, links and regions of a map
    Show {
        /// Path to the map source
        input: String,
    },

    /// Move an element to a new position
    Move {
        #[command(flatten)]
        file: FileArgs,

        /// Name of the element
        name: String,

        visibility: f64,

        maturity: f64,

        /// Move the evolved variant instead of the base element
        #[arg(long)]
        evolved: bool,
    },

    /// Move the label of an element
    Label {
        #[command(flatten)]
        file: FileArgs,

        /// Name of the element
        name: String,

        /// Horizontal offset in pixels
        #[arg(allow_negative_numbers = true)]
        x: f64,

        /// Vertical offset in pixels
        #[arg(allow_negative_numbers = true)]
        y: f64,

        /// Move the label of the evolved variant
        #[arg(long)]
        evolved: bool,
    },

    /// Rename the element defined on a line
    Rename {
        #[command(flatten)]
        file: FileArgs,

        /// 1-based line of the definition
        line: usize,

        old: String,

        new: String,
    },

    /// Set or clear the context of the link on a line
    Context {
        #[command(flatten)]
        file: FileArgs,

        /// 1-based line of the link
        line: usize,

        /// New context; empty removes it
        #[arg(default_value = "")]
        context: String,
    },
}

/// Input and output of an editing subcommand.
#[derive(clap::Args, Debug)]
pub struct FileArgs {
    /// Path to the map source
    pub input: String,

    /// Where to write the edited source; stdout when omitted
    #[arg(short, long, conflicts_with = "in_place")]
    pub output: Option<String>,

    /// Overwrite the input file
    #[arg(short, long)]
    pub in_place: bool,
}
