use crate::demo::{run_analyze, run_demo, run_wheel, AnalyzeArgs, WheelArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use soriano::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Soriano Club",
    about = "Run the Soriano Mediadores coverage and club services from the command line",
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
    /// Analyze a profile JSON file and print the coverage report
    Analyze(AnalyzeArgs),
    /// Spin the prize wheel and print the observed distribution
    Wheel(WheelArgs),
    /// Walk through a sample customer: analysis, missions and a few spins
    Demo,
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
        Command::Analyze(args) => run_analyze(args),
        Command::Wheel(args) => run_wheel(args),
        Command::Demo => run_demo(),
    }
}
