use crate::demo::{run_allocation, run_analytics, AllocateArgs, AnalyticsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use road_triage::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Road Triage",
    about = "Prioritize reported road defects and allocate a repair budget",
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
    /// Rank defects and print a funding recommendation for a budget
    Allocate(AllocateArgs),
    /// Print defect counts, average repair cost, and the worst-affected areas
    Analytics(AnalyticsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Serve defects from this CSV export instead of the built-in Oxford dataset
    #[arg(long)]
    pub(crate) defects_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Allocate(args) => run_allocation(args),
        Command::Analytics(args) => run_analytics(args),
    }
}
