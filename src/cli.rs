// src/cli.rs
use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{SiteConfig, CONFIG_ENV_VAR};
use crate::error::SiteError;
use crate::generator::SiteGenerator;
use crate::shaper::LinkFallback;

#[derive(Debug, Parser)]
#[command(name = "resumegen")]
#[command(about = "Render a resume document into a static HTML page")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Resume document (.yaml, .yml, .toml or .json)
    #[arg(long, global = true)]
    pub input: Option<PathBuf>,

    /// Page template
    #[arg(long, global = true)]
    pub template: Option<PathBuf>,

    /// Output page, replaced on every run
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Settings file (defaults to $RESUMEGEN_CONFIG, then ./resumegen.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Contact link used for experiences without their own url
    #[arg(long, global = true, value_name = "LABEL", conflicts_with = "no_link_fallback")]
    pub link_fallback: Option<String>,

    /// Leave experience links empty when the entry has no url
    #[arg(long, global = true)]
    pub no_link_fallback: bool,

    /// Year stamped into the page (defaults to the current year)
    #[arg(long, global = true)]
    pub year: Option<i32>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Render the page and write it (default)
    Build,
    /// Render without writing, to validate the document and template
    Check,
}

impl Cli {
    /// Resolve settings: defaults, then config file, then flags
    pub fn site_config(&self, root_dir: &Path) -> Result<SiteConfig> {
        let env_config = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        self.site_config_with_env(root_dir, env_config)
    }

    /// `env_config` is the value of `$RESUMEGEN_CONFIG`; `--config` wins over it
    pub fn site_config_with_env(
        &self,
        root_dir: &Path,
        env_config: Option<PathBuf>,
    ) -> Result<SiteConfig> {
        let explicit = self.config.clone().or(env_config);

        let mut config = SiteConfig::discover(root_dir, explicit.as_deref())?;

        if let Some(input) = &self.input {
            config = config.with_input(input.clone());
        }
        if let Some(template) = &self.template {
            config = config.with_template(template.clone());
        }
        if let Some(output) = &self.output {
            config = config.with_output(output.clone());
        }
        if self.no_link_fallback {
            config = config.with_link_fallback(LinkFallback::None);
        } else if let Some(label) = &self.link_fallback {
            config = config.with_link_fallback(LinkFallback::from_setting(label));
        }

        Ok(config)
    }

    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| chrono::Local::now().year())
    }
}

pub fn handle_command(cli: &Cli) -> Result<()> {
    let root_dir = std::env::current_dir().context("Failed to get current directory")?;
    let config = cli.site_config(&root_dir)?;
    let year = cli.year();
    let generator = SiteGenerator::new(config);

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let output = generator.generate(year).map_err(stage_failed)?;
            println!("Generated {} successfully.", output.display());
        }
        Command::Check => {
            let size = generator.check(year).map_err(stage_failed)?;
            info!("Template and document are valid");
            println!("OK: {} bytes would be written.", size);
        }
    }

    Ok(())
}

fn stage_failed(err: SiteError) -> anyhow::Error {
    let stage = err.stage();
    anyhow::Error::new(err).context(format!("{} stage failed", stage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_build() {
        let cli = Cli::try_parse_from(["resumegen"]).expect("parses");
        assert_eq!(cli.command, None);
        assert!(!cli.log_json);
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("site.yaml"), "input: cv.yaml\nlink_fallback: website\n")
            .expect("write config");

        let cli = Cli::try_parse_from([
            "resumegen",
            "check",
            "--config",
            "site.yaml",
            "--output",
            "out/index.html",
            "--no-link-fallback",
            "--year",
            "2030",
        ])
        .expect("parses");

        let config = cli.site_config(dir.path()).expect("resolves");
        assert_eq!(cli.command, Some(Command::Check));
        assert_eq!(cli.year(), 2030);
        assert_eq!(config.input_path(), dir.path().join("cv.yaml"));
        assert_eq!(config.output_path(), dir.path().join("out/index.html"));
        assert_eq!(config.shape.link_fallback, LinkFallback::None);
    }

    #[test]
    fn test_env_config_used_without_flag() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("env.yaml"), "output: from-env.html\n").expect("write config");

        let cli = Cli::try_parse_from(["resumegen"]).expect("parses");
        let config = cli
            .site_config_with_env(dir.path(), Some(PathBuf::from("env.yaml")))
            .expect("resolves");
        assert_eq!(config.output_path(), dir.path().join("from-env.html"));
    }

    #[test]
    fn test_config_flag_beats_env_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("env.yaml"), "output: from-env.html\n").expect("write config");
        std::fs::write(dir.path().join("flag.yaml"), "output: from-flag.html\n").expect("write config");

        let cli = Cli::try_parse_from(["resumegen", "--config", "flag.yaml"]).expect("parses");
        let config = cli
            .site_config_with_env(dir.path(), Some(PathBuf::from("env.yaml")))
            .expect("resolves");
        assert_eq!(config.output_path(), dir.path().join("from-flag.html"));
    }

    #[test]
    fn test_missing_env_config_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cli = Cli::try_parse_from(["resumegen"]).expect("parses");
        assert!(cli
            .site_config_with_env(dir.path(), Some(PathBuf::from("gone.yaml")))
            .is_err());
    }

    #[test]
    fn test_link_fallback_flags_conflict() {
        let result = Cli::try_parse_from([
            "resumegen",
            "--link-fallback",
            "github",
            "--no-link-fallback",
        ]);
        assert!(result.is_err());
    }
}
