//! Rendering seams and the generation pipeline
//!
//! The engine computes everything in memory and hands the result to two
//! collaborators: a [`TemplateRenderer`] that fills a document template,
//! and a [`ChartRenderer`] that turns prepared series into images. Plain
//! text and SVG implementations ship as defaults so the binary works end
//! to end; hosts with DOCX or raster needs plug in their own.

pub mod svg;
pub mod text;

use crate::charts;
use crate::context::{self, RenderContext};
use crate::input::ClientInput;
use crate::money;
use crate::projection::{self, MilestonePolicy};
use crate::scenarios;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// An in-memory chart image produced by a [`ChartRenderer`].
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub width_mm: u32,
    pub dpi: u32,
}

/// Error surfaced by renderer implementations.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Failed(String),
}

/// Fatal generation errors. Chart failures are deliberately absent: a
/// failed chart is logged and the document is produced without it.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("template not found: {}", path.display())]
    TemplateMissing { path: PathBuf },
    #[error("failed to render template {}: {source}", template.display())]
    Render {
        template: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("failed to verify output at {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("output file {} was written empty", path.display())]
    EmptyOutput { path: PathBuf },
}

/// Fills a document template from the assembled context. Implementations
/// must substitute the scalar variables and may expand the table entries
/// and embed the chart images.
pub trait TemplateRenderer {
    fn render(
        &self,
        template: &Path,
        context: &RenderContext,
        output: &Path,
    ) -> Result<(), RenderError>;
}

/// Turns prepared chart series into images at their fixed DPI and width.
pub trait ChartRenderer {
    fn comparative(&self, chart: &charts::ComparativeChart) -> Result<ChartImage, RenderError>;
    fn payback(&self, chart: &charts::ReturnChart) -> Result<ChartImage, RenderError>;
}

/// A successfully generated document.
#[derive(Debug, Clone, Serialize)]
pub struct Generated {
    pub path: PathBuf,
    pub file_size: u64,
}

/// Drives one proposal generation end to end. Holds no per-call state, so
/// a single instance can serve any number of sequential requests.
pub struct Generator {
    template: PathBuf,
    renderer: Box<dyn TemplateRenderer>,
    charts: Box<dyn ChartRenderer>,
    policy: MilestonePolicy,
}

impl Generator {
    /// Fails fast when the template is missing, before any computation.
    pub fn new(
        template: impl Into<PathBuf>,
        renderer: Box<dyn TemplateRenderer>,
        charts: Box<dyn ChartRenderer>,
    ) -> Result<Self, GenerateError> {
        let template = template.into();
        if !template.is_file() {
            return Err(GenerateError::TemplateMissing { path: template });
        }
        Ok(Generator {
            template,
            renderer,
            charts,
            policy: MilestonePolicy::default(),
        })
    }

    pub fn with_milestone_policy(mut self, policy: MilestonePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Compute projection, scenarios and charts, assemble the context,
    /// render the template and verify the written file.
    pub fn generate(&self, input: &ClientInput, output: &Path) -> Result<Generated, GenerateError> {
        let investment =
            money::resolve(input.valor_investimento.as_ref(), projection::DEFAULT_INVESTMENT);
        log::info!(
            "generating proposal: investment {} -> {}",
            investment,
            output.display()
        );

        let projection = projection::project(investment, input, self.policy);
        let scenario_rows = scenarios::compare_scenarios(
            investment,
            projection.first_year_monthly(),
            &projection.milestones,
        );

        let comparative =
            tolerate_chart("comparative", self.charts.comparative(&charts::comparative_chart(input)));
        let payback = tolerate_chart("return", self.charts.payback(&charts::return_chart(&projection)));

        let context = context::assemble_context(
            input,
            investment,
            &projection,
            &scenario_rows,
            comparative,
            payback,
        );

        self.renderer
            .render(&self.template, &context, output)
            .map_err(|source| GenerateError::Render {
                template: self.template.clone(),
                source,
            })?;

        let metadata = fs::metadata(output).map_err(|source| GenerateError::Save {
            path: output.to_path_buf(),
            source,
        })?;
        if metadata.len() == 0 {
            return Err(GenerateError::EmptyOutput {
                path: output.to_path_buf(),
            });
        }

        log::info!("proposal written: {} ({} bytes)", output.display(), metadata.len());
        Ok(Generated {
            path: output.to_path_buf(),
            file_size: metadata.len(),
        })
    }
}

/// A chart that fails to render degrades to a document without the image.
fn tolerate_chart(which: &str, result: Result<ChartImage, RenderError>) -> Option<ChartImage> {
    match result {
        Ok(image) => Some(image),
        Err(err) => {
            log::warn!("{} chart skipped: {}", which, err);
            None
        }
    }
}
