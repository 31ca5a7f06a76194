use crate::commands::{
    clear_session, run_job_search, run_normalize, show_session, JobSearchArgs, NormalizeArgs,
};
use crate::server;
use careerlink::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "careerlink-cli",
    about = "Search CareerLink jobs, inspect backend payloads and run the mock backend",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the mock backend HTTP service (default command)
    Serve(ServeArgs),
    /// Work with job postings
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },
    /// Print the normalized form of a saved backend response
    Normalize(NormalizeArgs),
    /// Inspect or remove the persisted session record
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
}

#[derive(Subcommand, Debug)]
enum JobsCommand {
    /// Search jobs through the backend, falling back to mock data
    Search(JobSearchArgs),
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Show the signed-in user, if any
    Show,
    /// Sign out by deleting the session record
    Clear,
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
        Command::Jobs {
            command: JobsCommand::Search(args),
        } => run_job_search(args).await,
        Command::Normalize(args) => run_normalize(args),
        Command::Session {
            command: SessionCommand::Show,
        } => show_session(),
        Command::Session {
            command: SessionCommand::Clear,
        } => clear_session(),
    }
}
