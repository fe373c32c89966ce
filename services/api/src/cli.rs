use crate::demo::{run_demo, run_export, run_match, DemoArgs, ExportArgs, MatchArgs};
use crate::server;
use catalyst_hr::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Catalyst HR",
    about = "Run the Catalyst HR hiring pipeline and job matching service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk a seeded pipeline through a recruiting session and print the results
    Demo(DemoArgs),
    /// Rank job postings for a candidate
    Match(MatchArgs),
    /// Export the pipeline board as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Persist the pipeline to this JSON file instead of memory
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
    /// Register the demo candidates when the pipeline is empty
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Match(args) => run_match(args),
        Command::Export(args) => run_export(args),
    }
}
