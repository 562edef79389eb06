// src/config.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::FsOps;
use crate::error::{Result, SiteError};
use crate::shaper::{LinkFallback, ShapeOptions};

pub const DEFAULT_CONFIG_FILE: &str = "resumegen.yaml";
pub const CONFIG_ENV_VAR: &str = "RESUMEGEN_CONFIG";

/// Optional on-disk settings; every key may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    input: Option<PathBuf>,
    template: Option<PathBuf>,
    output: Option<PathBuf>,
    link_fallback: Option<String>,
    social_order: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub input: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub shape: ShapeOptions,
    pub root_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteConfig {
    pub fn new() -> Self {
        // Capture the current directory at creation time
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Self {
            input: PathBuf::from("resume.yaml"),
            template: PathBuf::from("template.html"),
            output: PathBuf::from("index.html"),
            shape: ShapeOptions::default(),
            root_dir: current_dir,
        }
    }

    /// Defaults overlaid with a config file. An explicitly named file must
    /// exist; otherwise `resumegen.yaml` in `root_dir` is used when present.
    pub fn discover(root_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config = Self::new().with_root_dir(root_dir.to_path_buf());

        let path = match explicit {
            Some(path) => {
                let path = FsOps::normalize_path(root_dir, path);
                if !path.exists() {
                    return Err(SiteError::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                path
            }
            None => {
                let path = root_dir.join(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    return Ok(config);
                }
                path
            }
        };

        info!("Loading configuration from {}", path.display());
        let content = FsOps::read_file_safe(&path).map_err(|e| {
            SiteError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| {
            SiteError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;

        Ok(config.apply_file(file))
    }

    fn apply_file(mut self, file: ConfigFile) -> Self {
        if let Some(input) = file.input {
            self.input = input;
        }
        if let Some(template) = file.template {
            self.template = template;
        }
        if let Some(output) = file.output {
            self.output = output;
        }
        if let Some(fallback) = file.link_fallback {
            self.shape.link_fallback = LinkFallback::from_setting(&fallback);
        }
        if let Some(order) = file.social_order {
            let mut keys: Vec<String> = Vec::with_capacity(order.len());
            for key in order.iter().map(|k| k.trim().to_lowercase()) {
                if !key.is_empty() && !keys.contains(&key) {
                    keys.push(key);
                }
            }
            self.shape.social_order = keys;
        }
        self
    }

    pub fn with_input(mut self, path: PathBuf) -> Self {
        self.input = path;
        self
    }

    pub fn with_template(mut self, path: PathBuf) -> Self {
        self.template = path;
        self
    }

    pub fn with_output(mut self, path: PathBuf) -> Self {
        self.output = path;
        self
    }

    pub fn with_link_fallback(mut self, fallback: LinkFallback) -> Self {
        self.shape.link_fallback = fallback;
        self
    }

    pub fn with_root_dir(mut self, dir: PathBuf) -> Self {
        self.root_dir = dir;
        self
    }

    pub fn input_path(&self) -> PathBuf {
        FsOps::normalize_path(&self.root_dir, &self.input)
    }

    pub fn template_path(&self) -> PathBuf {
        FsOps::normalize_path(&self.root_dir, &self.template)
    }

    pub fn output_path(&self) -> PathBuf {
        FsOps::normalize_path(&self.root_dir, &self.output)
    }
}
