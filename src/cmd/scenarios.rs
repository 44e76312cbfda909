//! Scenarios command - solar vs poupança vs CDB comparison table

use crate::cmd;
use crate::input::ClientInput;
use crate::money;
use crate::projection::{self, MilestonePolicy};
use crate::scenarios::{self, ScenarioRow};
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ScenariosCommand {
    /// JSON file with client data (or "-" for stdin); defaults apply when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Override the investment amount
    #[arg(long)]
    investment: Option<Decimal>,
}

impl ScenariosCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let client = match &self.input {
            Some(path) => cmd::read_client(path)?,
            None => ClientInput::default(),
        };
        let investment = self.investment.unwrap_or_else(|| {
            money::resolve(client.valor_investimento.as_ref(), projection::DEFAULT_INVESTMENT)
        });

        let projection = projection::project(investment, &client, MilestonePolicy::default());
        let rows = scenarios::compare_scenarios(
            investment,
            projection.first_year_monthly(),
            &projection.milestones,
        );

        let rows: Vec<ComparisonRow> = rows.iter().map(ComparisonRow::from).collect();
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}

#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "Tipo")]
    kind: String,
    #[tabled(rename = "Investimento")]
    investment: String,
    #[tabled(rename = "Mensal")]
    monthly: String,
    #[tabled(rename = "1 ano")]
    year1: String,
    #[tabled(rename = "5 anos")]
    year5: String,
    #[tabled(rename = "10 anos")]
    year10: String,
    #[tabled(rename = "25 anos")]
    year25: String,
}

impl From<&ScenarioRow> for ComparisonRow {
    fn from(row: &ScenarioRow) -> Self {
        ComparisonRow {
            kind: row.kind.clone(),
            investment: row.investment.clone(),
            monthly: row.monthly.clone(),
            year1: row.year1.clone(),
            year5: row.year5.clone(),
            year10: row.year10.clone(),
            year25: row.year25.clone(),
        }
    }
}
