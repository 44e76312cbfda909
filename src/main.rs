use clap::{Parser, Subcommand};

mod charts;
mod cmd;
mod context;
mod input;
mod money;
mod projection;
mod render;
mod scenarios;

use cmd::context::ContextCommand;
use cmd::generate::GenerateCommand;
use cmd::projection::ProjectionCommand;
use cmd::scenarios::ScenariosCommand;
use cmd::schema::SchemaCommand;
use cmd::service::ServiceCommand;

/// Solar proposal generator: 25-year financial projections, investment
/// comparisons and template contexts from loosely populated client data.
#[derive(Parser, Debug)]
#[command(name = "propgen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a proposal document from client data and a template
    Generate(GenerateCommand),
    /// Run one request of the stdin/stdout JSON protocol
    Service(ServiceCommand),
    /// Print the assembled template context as JSON
    Context(ContextCommand),
    /// Print the 25-year cash-flow projection
    Projection(ProjectionCommand),
    /// Print the solar vs poupança vs CDB comparison
    Scenarios(ScenariosCommand),
    /// Print expected input formats
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(cmd) => cmd.exec(),
        Command::Service(cmd) => cmd.exec(),
        Command::Context(cmd) => cmd.exec(),
        Command::Projection(cmd) => cmd.exec(),
        Command::Scenarios(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
