use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Override the music directory scanned by `scan`
    #[arg(long, global = true, value_name = "DIR")]
    pub music_dir: Option<PathBuf>,

    /// Increase log verbosity (overrides the configured level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scan the public music directory
    Scan,

    /// Pick a folder; URI stands in for the chooser's answer ("" = cancelled)
    Pick {
        #[arg(value_name = "URI")]
        uri: String,
    },

    /// Read a file as base64
    Read {
        #[arg(long, conflicts_with = "uri", required_unless_present = "uri")]
        path: Option<PathBuf>,

        #[arg(long)]
        uri: Option<String>,
    },

    /// Round-trip a message
    Echo {
        message: Option<String>,
    },
}
