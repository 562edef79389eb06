// src/loader.rs
//! Reads a resume document from disk into the canonical model

use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use crate::core::FsOps;
use crate::error::{Result, SiteError};
use crate::types::{RawResume, ResumeDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
    Json,
}

impl DocumentFormat {
    /// Pick the parser from the file extension; anything unknown is YAML
    pub fn from_path(path: &Path) -> Self {
        match FsOps::get_extension(path).as_deref() {
            Some("toml") => DocumentFormat::Toml,
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }

    fn parse(self, content: &str) -> std::result::Result<RawResume, String> {
        match self {
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

pub fn load_document(path: &Path) -> Result<ResumeDocument> {
    let content = FsOps::read_file_safe(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => SiteError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => SiteError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let document = parse_document(&content, DocumentFormat::from_path(path)).map_err(|message| {
        SiteError::Schema {
            path: path.to_path_buf(),
            message,
        }
    })?;

    info!(
        "Loaded resume for '{}' from {} ({} experience entries)",
        document.name,
        path.display(),
        document.experience.len()
    );
    Ok(document)
}

pub fn parse_document(
    content: &str,
    format: DocumentFormat,
) -> std::result::Result<ResumeDocument, String> {
    debug!("Parsing resume document as {:?}", format);
    format.parse(content).map(ResumeDocument::from_raw)
}
