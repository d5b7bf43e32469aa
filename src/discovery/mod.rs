//! Sub-project discovery.
//!
//! This module provides:
//! - The `BuildOutput` capability every built sub-project exposes
//! - Locators that find a build output inside a project directory
//! - A scanner that walks the projects directory and reports what was found

mod output;
mod scanner;

pub use output::{BuildOutput, BuildOutputLocator, DirNameLocator, ENTRY_HTML};
pub use scanner::{DiscoveredProject, ProjectScanner, ScanReport, SkippedProject};
