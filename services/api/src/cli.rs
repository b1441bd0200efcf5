use crate::demo::{run_assess, run_catalog, run_demo, AssessArgs, CatalogArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use compliance_checker::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Compliance Checker",
    about = "Run the bilingual compliance self-assessment service or score assessments from the command line",
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
    /// List the catalog's modules and activities
    Catalog(CatalogArgs),
    /// Score an answers file for the given activities
    Assess(AssessArgs),
    /// Walk through a scripted assessment end to end
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
        Command::Catalog(args) => run_catalog(args),
        Command::Assess(args) => run_assess(args),
        Command::Demo(args) => run_demo(args),
    }
}
