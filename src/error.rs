// src/error.rs
//! Failure taxonomy for the load → shape → render → write pipeline

use std::path::PathBuf;
use thiserror::Error;

use crate::core::template_engine::{RenderError, TemplateError};

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Resume document not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    #[error("Failed to read resume document {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Resume document {} does not match the expected schema: {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    #[error("Failed to load template {}: {message}", .path.display())]
    Template { path: PathBuf, message: String },

    #[error("Failed to render template {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("Failed to write output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SiteError {
    /// Short stage name used in log lines
    pub fn stage(&self) -> &'static str {
        match self {
            SiteError::InputNotFound { .. } | SiteError::InputUnreadable { .. } => "load",
            SiteError::Schema { .. } => "parse",
            SiteError::Template { .. } => "template",
            SiteError::Render { .. } => "render",
            SiteError::Output { .. } => "write",
            SiteError::Config(_) => "config",
        }
    }

    pub(crate) fn template(path: &std::path::Path, err: TemplateError) -> Self {
        SiteError::Template {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        let err = SiteError::InputNotFound {
            path: PathBuf::from("resume.yaml"),
        };
        assert_eq!(err.stage(), "load");
        assert!(err.to_string().contains("resume.yaml"));

        let err = SiteError::Schema {
            path: PathBuf::from("resume.yaml"),
            message: "invalid type".to_string(),
        };
        assert_eq!(err.stage(), "parse");
        assert!(err.to_string().contains("invalid type"));
    }
}
