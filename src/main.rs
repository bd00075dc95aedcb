//! thumbprobe - conformance checker for image resizing endpoints
//!
//! Sends a table of benign and hostile requests to a TimThumb-style
//! endpoint and checks the status codes it answers with.

use clap::Parser;
use thumbprobe::commands::{Commands, RunArgs};
use thumbprobe::{cli, common::logging};

#[derive(Parser)]
#[command(name = "thumbprobe", about = "Conformance checker for image resizing endpoints")]
#[command(version, long_about = None, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run(cli.run));

    logging::init_cli(command.verbose());

    match cli::dispatch(command).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
