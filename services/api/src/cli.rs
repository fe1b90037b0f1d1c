use crate::commands::{
    run_dashboard, run_export, run_import, run_keywords, DashboardArgs, ExportArgs, ImportArgs,
    KeywordsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_tracker::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Job Tracker",
    about = "Track job applications and score resumes against job descriptions",
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
    /// Print application counts, the latest application, and tasks due this week
    Dashboard(DashboardArgs),
    /// Compare a resume against a job description
    Keywords(KeywordsArgs),
    /// Write the tracked applications to a JSON file
    Export(ExportArgs),
    /// Replace the tracked applications with the contents of a JSON file
    Import(ImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dashboard(args) => run_dashboard(args),
        Command::Keywords(args) => run_keywords(args),
        Command::Export(args) => run_export(args),
        Command::Import(args) => run_import(args),
    }
}
