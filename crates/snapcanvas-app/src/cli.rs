//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "snapcanvas", version, about = "Render and manage SnapCanvas documents")]
pub struct Cli {
    /// Editor configuration JSON (surface size, limits, tool defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render every panel of a document to PNG files
    Render {
        /// Document payload JSON
        document: PathBuf,

        /// Output directory, created if missing
        #[arg(long, short)]
        out: PathBuf,

        /// Also write all panels side by side as composite.png
        #[arg(long)]
        composite: bool,
    },

    /// Print a summary of a document
    Info {
        /// Document payload JSON
        document: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy a document into the document store
    Import {
        /// Document payload JSON
        document: PathBuf,

        /// Store id; defaults to the file stem
        #[arg(long)]
        id: Option<String>,

        /// Store directory; defaults to the platform data directory
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Remove a document from the document store
    Remove {
        /// Store id
        id: String,

        /// Store directory; defaults to the platform data directory
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// List documents in the document store
    List {
        /// Store directory; defaults to the platform data directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
}
