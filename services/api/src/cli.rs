use crate::demo::{run_classify, run_demo, run_insights, ClassifyArgs, DemoArgs, InsightsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use claims_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Warranty Claims Assistant",
    about = "Triage warranty claims and produce retailer insight reports",
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
    /// Classify a single claim description and print the verdict as JSON
    Classify(ClassifyArgs),
    /// Build an insight report for one store from a claim export
    Insights(InsightsArgs),
    /// Seed a sample store, walk claims through review and print the report
    Demo(DemoArgs),
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
        Command::Classify(args) => run_classify(args).await,
        Command::Insights(args) => run_insights(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
