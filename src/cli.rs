use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moovmend")]
#[command(author, version, about = "Repair MP4/MOV captures cut short by an interrupted recording")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Repair every capture in a directory
    Repair {
        /// Directory holding the corrupted captures
        #[arg(required = true)]
        corrupted_dir: PathBuf,

        /// Known-good capture recorded by the same device
        #[arg(short, long)]
        reference: PathBuf,

        /// Output directory (default: <CORRUPTED_DIR>/Repaired)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep the temporary extension on repaired files
        #[arg(long)]
        keep_extension: bool,

        /// Leading bytes replaced by the synthesized header
        #[arg(long)]
        header_skip: Option<usize>,

        /// Device footer bytes trimmed from the end
        #[arg(long)]
        trailer_trim: Option<usize>,

        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a capture would be repaired without writing anything
    Inspect {
        /// Capture to analyze
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Write a config file populated with the defaults
    InitConfig {
        /// Destination path
        #[arg(default_value = "moovmend.toml")]
        path: PathBuf,
    },

    /// Display version information
    Version,
}
