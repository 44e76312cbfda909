//! Generate command - render one proposal document

use crate::cmd;
use crate::projection::MilestonePolicy;
use crate::render::svg::SvgCharts;
use crate::render::text::TextTemplate;
use crate::render::Generator;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// JSON file with client data (or "-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Template file to fill
    #[arg(short, long)]
    template: PathBuf,

    /// Output document path
    #[arg(short, long)]
    output: PathBuf,

    /// How milestone columns appear on early projection rows
    #[arg(long, value_enum, default_value = "as-computed")]
    milestones: MilestoneMode,

    /// Open the generated document when done
    #[arg(long)]
    open: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MilestoneMode {
    /// Rows show only milestones already reached by their year
    AsComputed,
    /// Every row carries all four final milestone values
    Backfilled,
}

impl From<MilestoneMode> for MilestonePolicy {
    fn from(mode: MilestoneMode) -> Self {
        match mode {
            MilestoneMode::AsComputed => MilestonePolicy::AsComputed,
            MilestoneMode::Backfilled => MilestonePolicy::Backfilled,
        }
    }
}

impl GenerateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let client = cmd::read_client(&self.input)?;
        let generator = Generator::new(&self.template, Box::new(TextTemplate), Box::new(SvgCharts))?
            .with_milestone_policy(self.milestones.into());
        let generated = generator.generate(&client, &self.output)?;

        println!(
            "Proposal written: {} ({} bytes)",
            generated.path.display(),
            generated.file_size
        );

        if self.open {
            opener::open(&generated.path)?;
        }
        Ok(())
    }
}
