// src/generator.rs
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::core::{load_template, FsOps};
use crate::error::{Result, SiteError};
use crate::loader::load_document;
use crate::shaper::shape;

pub struct SiteGenerator {
    pub config: SiteConfig,
}

impl SiteGenerator {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Load, shape and render without touching the output file
    pub fn render_to_string(&self, year: i32) -> Result<String> {
        let input = self.config.input_path();
        let template_path = self.config.template_path();

        let document = load_document(&input)?;
        let record = shape(&document, year, &self.config.shape);
        let template = load_template(&template_path)?;

        let data = serde_json::to_value(&record).map_err(|e| SiteError::Template {
            path: template_path.clone(),
            message: format!("resume data is not representable: {}", e),
        })?;
        let html = template.render(&data).map_err(|source| SiteError::Render {
            path: template_path.clone(),
            source,
        })?;

        debug!("Rendered {} bytes from {}", html.len(), template_path.display());
        Ok(html)
    }

    /// Full run: render and replace the output file
    pub fn generate(&self, year: i32) -> Result<PathBuf> {
        let html = self.render_to_string(year)?;
        let output = self.config.output_path();

        FsOps::write_atomic(&output, html.as_bytes()).map_err(|source| SiteError::Output {
            path: output.clone(),
            source,
        })?;

        info!("Wrote {} ({} bytes)", output.display(), html.len());
        Ok(output)
    }

    /// Dry run; returns the size of the page that would be written
    pub fn check(&self, year: i32) -> Result<usize> {
        let html = self.render_to_string(year)?;
        info!(
            "Check passed: {} would be {} bytes",
            self.config.output_path().display(),
            html.len()
        );
        Ok(html.len())
    }
}
