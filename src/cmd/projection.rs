//! Projection command - the 25-year cash-flow table

use crate::cmd;
use crate::cmd::generate::MilestoneMode;
use crate::input::ClientInput;
use crate::money;
use crate::projection::{self, ProjectionRow};
use clap::Args;
use rust_decimal::Decimal;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ProjectionCommand {
    /// JSON file with client data (or "-" for stdin); defaults apply when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Override the investment amount
    #[arg(long)]
    investment: Option<Decimal>,

    /// How milestone columns appear on early rows
    #[arg(long, value_enum, default_value = "as-computed")]
    milestones: MilestoneMode,

    /// Output as CSV instead of a formatted table
    #[arg(long)]
    csv: bool,
}

impl ProjectionCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let client = match &self.input {
            Some(path) => cmd::read_client(path)?,
            None => ClientInput::default(),
        };
        let investment = self.investment.unwrap_or_else(|| {
            money::resolve(client.valor_investimento.as_ref(), projection::DEFAULT_INVESTMENT)
        });

        let projection = projection::project(investment, &client, self.milestones.into());
        let rows = projection.rows();

        if self.csv {
            self.write_csv(&rows)
        } else {
            self.print_table(&rows);
            Ok(())
        }
    }

    fn print_table(&self, rows: &[ProjectionRow]) {
        let rows: Vec<FlowRow> = rows.iter().map(FlowRow::from).collect();
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    fn write_csv(&self, rows: &[ProjectionRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Condensed terminal view; the CSV output carries the full row.
#[derive(Tabled)]
struct FlowRow {
    #[tabled(rename = "Ano")]
    year: String,
    #[tabled(rename = "Tarifa")]
    tariff: String,
    #[tabled(rename = "Geração kWh")]
    generation: String,
    #[tabled(rename = "Consumo kWh")]
    consumption: String,
    #[tabled(rename = "Fatura s/ Solar")]
    bill_without: String,
    #[tabled(rename = "Fatura c/ Solar")]
    bill_with: String,
    #[tabled(rename = "Economia")]
    savings: String,
    #[tabled(rename = "Acumulado")]
    cumulative: String,
    #[tabled(rename = "Payback")]
    payback: String,
}

impl From<&ProjectionRow> for FlowRow {
    fn from(row: &ProjectionRow) -> Self {
        FlowRow {
            year: row.year.clone(),
            tariff: row.tariff.clone(),
            generation: row.generation_kwh.clone(),
            consumption: row.consumption_kwh.clone(),
            bill_without: row.bill_without_system.clone(),
            bill_with: row.bill_with_system.clone(),
            savings: row.savings.clone(),
            cumulative: row.cumulative_savings.clone(),
            payback: row.payback.clone(),
        }
    }
}
