use clap::{Parser, Subcommand};
use device_snapshot::constants::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

/// Command-line arguments for devinfo.
///
/// Every subcommand prints pretty JSON, to stdout or to `--output`. With no
/// subcommand the full `summary` report is printed.
#[derive(Parser, Debug)]
#[clap(name = "devinfo", about = "Snapshot of the device, operating system and hardware")]
pub struct Args {
    /// Verbose logging
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration YAML file
    #[clap(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Write the JSON output to this file instead of stdout
    #[clap(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// What to print
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Everything the snapshot can read, with a list of fields that failed
    Summary,

    /// Operating system identity, version, uptime and counts
    Os,

    /// Running processes
    Processes {
        /// Only these process ids
        #[clap(long, value_delimiter = ',')]
        pid: Vec<u32>,
    },

    /// A single process
    Process {
        /// Process id
        pid: u32,
    },

    /// System services
    Services,

    /// Logged-in user sessions
    Sessions,

    /// Desktop windows
    Windows {
        /// Only windows that are currently visible
        #[clap(long)]
        visible_only: bool,
    },

    /// Network parameters and interfaces
    Network,

    /// TCP/UDP statistics and open connections
    Protocols,

    /// Memory, graphics cards and partitions
    Hardware,

    /// Mobile device details (Android build or iOS device)
    Device,

    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}
