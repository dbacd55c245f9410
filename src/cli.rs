use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Bigfile Sweep - find, cache and page through large files
#[derive(Parser, Debug)]
#[command(name = "bigfile-sweep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding saved settings and cached results
    #[arg(long, global = true, value_name = "DIR", env = "BIGFILE_SWEEP_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List files above the size threshold, one page at a time
    Scan(ScanArgs),

    /// Show or change the size threshold
    Threshold(ThresholdArgs),

    /// Inspect or clear the cached scan result
    Cache(CacheArgs),

    /// Manage the IP reputation API key and cached reports
    Reputation(ReputationArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Print a man page to stdout
    Man,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to scan (defaults to scanner.root from the config)
    pub path: Option<PathBuf>,

    /// Page to show
    #[arg(short, long, default_value = "1", value_name = "N")]
    pub page: usize,

    /// Ignore the cached result and scan again
    #[arg(short, long)]
    pub refresh: bool,

    /// Paths to exclude, replacing the configured list (repeatable)
    #[arg(short, long, value_name = "PATTERN")]
    pub exclude: Option<Vec<String>>,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub follow_symlinks: bool,

    /// Don't cross filesystem boundaries
    #[arg(short = 'x', long)]
    pub one_file_system: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ThresholdArgs {
    #[command(subcommand)]
    pub action: Option<ThresholdAction>,
}

#[derive(Subcommand, Debug)]
pub enum ThresholdAction {
    /// Show the current threshold
    Show,

    /// Save a new threshold and drop the cached scan
    Set {
        /// Size value; anything below 1 is saved as 1
        #[arg(allow_negative_numbers = true)]
        value: i64,

        /// MB or GB; anything else is saved as MB
        #[arg(default_value = "MB")]
        unit: String,
    },
}

#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show whether a scan result is cached and for how long
    Status,

    /// Drop the cached scan result
    Clear,
}

#[derive(Args, Debug)]
pub struct ReputationArgs {
    #[command(subcommand)]
    pub action: ReputationAction,
}

#[derive(Subcommand, Debug)]
pub enum ReputationAction {
    /// Show, save or remove the API key
    Key {
        #[command(subcommand)]
        action: Option<KeyAction>,
    },

    /// Show the cached report for an address
    Status {
        /// IPv4 or IPv6 address
        ip: String,
    },

    /// Drop the cached report for an address
    Forget {
        /// IPv4 or IPv6 address
        ip: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Show whether a key is saved
    Show,

    /// Save the API key
    Set {
        /// Key issued by the reputation service
        key: String,
    },

    /// Remove the saved API key
    Reset,
}
