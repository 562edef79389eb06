//! Renders a structured resume document into a static HTML page.
//!
//! The pipeline is load → shape → render → write. Every stage returns a
//! [`SiteError`]; only the binary decides how a failed run ends.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod generator;
pub mod loader;
pub mod shaper;
pub mod types;

pub use config::SiteConfig;
pub use error::SiteError;
pub use generator::SiteGenerator;
pub use loader::load_document;
pub use shaper::{format_period, shape, LinkFallback, ShapeOptions};
pub use types::{PresentationRecord, ResumeDocument};
