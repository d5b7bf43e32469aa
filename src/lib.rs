//! Demo Assembler - aggregates independently built frontend demos into one static site
//!
//! This crate provides functionality for:
//! - Discovering sub-projects and their build output directories
//! - Measuring raw and gzip sizes of every built file
//! - Publishing content-hashed shared assets
//! - Injecting a shared layout into each project's `index.html`

pub mod assets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod inject;
pub mod layout;
pub mod meta;
pub mod orchestrator;
pub mod stats;

// Re-export commonly used types
pub use config::Config;
pub use error::{AssembleError, Result};
pub use orchestrator::{Orchestrator, RunSummary};
