// src/core/mod.rs
//! File handling and template rendering shared by the pipeline

pub mod fs_ops;
pub mod template_engine;

pub use fs_ops::FsOps;
pub use template_engine::{load_template, Template};
