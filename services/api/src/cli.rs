use crate::demo::{
    run_demo, run_requirements_check, run_requirements_schema, run_screen, CheckArgs, DemoArgs,
    ScreenArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use vagas::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "vagas-api",
    about = "Configure job requirements, submit postings and screen candidates",
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
    /// Inspect the requirements schema or check a requirements document
    Requirements {
        #[command(subcommand)]
        command: RequirementsCommand,
    },
    /// Rank a candidate CSV export against a requirements document
    Screen(ScreenArgs),
    /// Walk through configuring, submitting and screening one job posting
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RequirementsCommand {
    /// Print the catalog of categories, requirements and accepted values
    Schema,
    /// Decode a requisitos_json file and report unusable requirements
    Check(CheckArgs),
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
        Command::Requirements {
            command: RequirementsCommand::Schema,
        } => run_requirements_schema(),
        Command::Requirements {
            command: RequirementsCommand::Check(args),
        } => run_requirements_check(args),
        Command::Screen(args) => run_screen(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
