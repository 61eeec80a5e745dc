use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print tag events as JSON lines
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embed a poster into a single MP4 or MKV file
    Write {
        /// Video file to tag
        #[arg(short, long)]
        video: PathBuf,

        /// Poster image (JPEG or PNG)
        #[arg(short, long)]
        poster: PathBuf,
    },

    /// Embed posters into every MP4/MKV file in a directory
    Batch {
        /// Directory searched recursively for video files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Maximum number of files tagged at once (overrides config)
        #[arg(short = 'j', long)]
        max_parallel: Option<usize>,
    },

    /// Show the container format detected for a file
    Detect {
        /// File to inspect
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Check that the MKV attachment editor is installed
    Check,

    /// Write the default configuration to a file
    InitConfig {
        /// Output TOML file
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}
