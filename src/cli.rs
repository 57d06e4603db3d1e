use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tonearm")]
#[command(author, version, about = "Audio streaming server with range requests and play counts")]
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
    /// Start the streaming server
    Start {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Register an audio file as a song
    Add {
        /// Audio file to register
        #[arg(required = true)]
        file: PathBuf,

        /// Song title (defaults to the file name)
        #[arg(long)]
        title: Option<String>,

        /// Album name
        #[arg(long)]
        album: Option<String>,

        /// Duration in seconds
        #[arg(long)]
        duration: Option<i64>,
    },

    /// List registered songs
    List,

    /// Show the play count of a song
    Plays {
        /// Song ID
        id: String,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
