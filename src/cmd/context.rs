//! Context command - inspect the assembled template variables

use crate::cmd;
use crate::context::assemble_context;
use crate::money;
use crate::projection::{self, MilestonePolicy};
use crate::scenarios;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ContextCommand {
    /// JSON file with client data (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,
}

impl ContextCommand {
    /// Runs the whole computation without rendering a document and prints
    /// the context as pretty JSON. Chart entries appear as metadata.
    pub fn exec(&self) -> anyhow::Result<()> {
        let client = cmd::read_client(&self.input)?;
        let investment =
            money::resolve(client.valor_investimento.as_ref(), projection::DEFAULT_INVESTMENT);
        let projection = projection::project(investment, &client, MilestonePolicy::default());
        let rows = scenarios::compare_scenarios(
            investment,
            projection.first_year_monthly(),
            &projection.milestones,
        );
        let context = assemble_context(&client, investment, &projection, &rows, None, None);

        println!("{}", serde_json::to_string_pretty(&context.to_value())?);
        Ok(())
    }
}
