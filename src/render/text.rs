//! Plain-text template renderer
//!
//! Substitutes `{{KEY}}` placeholders with scalar context values. Table
//! loops and image embeds are template-engine concerns that vary by host;
//! this implementation covers smoke runs and text-based proposals.

use super::{RenderError, TemplateRenderer};
use crate::context::RenderContext;
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
pub struct TextTemplate;

impl TemplateRenderer for TextTemplate {
    fn render(
        &self,
        template: &Path,
        context: &RenderContext,
        output: &Path,
    ) -> Result<(), RenderError> {
        let mut body = fs::read_to_string(template)?;
        for (key, value) in context.scalars() {
            let tag = format!("{{{{{}}}}}", key);
            if body.contains(&tag) {
                body = body.replace(&tag, value);
            }
        }
        fs::write(output, body)?;
        Ok(())
    }
}
