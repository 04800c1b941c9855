use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codecfit")]
#[command(author, version, about = "Normalize transcode settings against container/codec rules")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Rule table JSON to use instead of the configured or bundled one
    #[arg(short, long, global = true)]
    pub rules: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a conversion config so it satisfies every rule
    Normalize {
        /// Conversion config JSON (reads stdin if omitted or "-")
        input: Option<PathBuf>,

        /// Source metadata JSON from the media prober
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Also print every adjustment that was made
        #[arg(long)]
        explain: bool,
    },

    /// List supported containers
    Containers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show admissible codecs for a container
    Codecs {
        /// Container id, e.g. mp4
        container: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show admissible encoder presets for a video codec
    Presets {
        /// Video codec id, e.g. h264_nvenc
        codec: String,
    },

    /// Validate a rule table file
    ValidateRules {
        /// Rule table to validate (uses the configured one if not specified)
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
