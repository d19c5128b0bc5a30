use crate::demo::{run_demo, DemoArgs};
use crate::resolve::{run_resolve, ResolveArgs};
use clap::{Parser, Subcommand};
use enterprise_subsidy::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Enterprise Subsidy Portal",
    about = "Resolve course page outcomes and subsidy eligibility for enterprise learners",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a course page navigation against a recorded JSON scenario
    Resolve(ResolveArgs),
    /// Walk through built-in learner scenarios (default command)
    Demo(DemoArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Resolve(args) => run_resolve(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
