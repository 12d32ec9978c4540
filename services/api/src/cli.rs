use crate::demo::{print_contract_number, run_demo, ContractNumberArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use emploseek::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EmploSeek",
    about = "Run the EmploSeek contract service or walk through it from the command line",
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
    /// Seed an in-memory catalog and run a contract verification end to end
    Demo(DemoArgs),
    /// Print a freshly generated contract number
    ContractNumber(ContractNumberArgs),
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
        Command::Demo(args) => run_demo(args),
        Command::ContractNumber(args) => {
            print_contract_number(args);
            Ok(())
        }
    }
}
