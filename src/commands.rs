//! CLI command definitions
//!
//! Defines the clap commands for thumbprobe.

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the scenario table against the target (the default)
    Run(RunArgs),

    /// Print the resolved scenario table without sending any request
    #[command(alias = "ls")]
    List {
        /// Endpoint base URL used to render request URLs
        base_url: Option<String>,

        #[command(flatten)]
        suite: SuiteArgs,
    },
}

impl Commands {
    pub fn verbose(&self) -> bool {
        match self {
            Commands::Run(args) => args.verbose,
            Commands::List { .. } => false,
        }
    }
}

/// Where scenarios and settings come from
#[derive(Args, Debug, Default, Clone)]
pub struct SuiteArgs {
    /// YAML suite file to run instead of the built-in table
    #[arg(long, value_name = "FILE")]
    pub suite: Option<PathBuf>,

    /// Configuration file (default: the platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Feature enabled on the target, e.g. webshot or allow_external.
    /// Can be specified multiple times
    #[arg(long = "feature", value_name = "NAME")]
    pub features: Vec<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Endpoint base URL (overrides TARGET_BASE_URL and the config file)
    pub base_url: Option<String>,

    #[command(flatten)]
    pub suite: SuiteArgs,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Results log path
    #[arg(long, value_name = "FILE", conflicts_with = "no_log")]
    pub log: Option<PathBuf>,

    /// Do not write the results log
    #[arg(long)]
    pub no_log: bool,

    /// Write an HTML report to FILE, or to stdout with '-'
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Abort before the first scenario if the target does not answer
    #[arg(long)]
    pub preflight: bool,

    /// Show request URLs and messages for passing scenarios too
    #[arg(long, short)]
    pub verbose: bool,
}
