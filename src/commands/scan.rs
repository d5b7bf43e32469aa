//! Scan command implementation

use anyhow::Result;
use rayon::prelude::*;

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::discovery::ProjectScanner;
use crate::stats::{format_json, format_size, format_table, ProjectRow, ProjectStats};

/// Run the scan command. Nothing is written to disk.
pub fn run(mut config: Config, args: ScanArgs) -> Result<()> {
    if let Some(dir) = &args.projects_dir {
        config.paths.projects_dir = dir.clone();
    }

    let projects_dir = config.projects_dir();
    tracing::info!(path = %projects_dir.display(), "Scanning projects");

    let report = ProjectScanner::from_config(&config.discovery).scan(&projects_dir)?;

    let rows = collect_rows(&config, &report.projects);

    if args.json {
        println!("{}", format_json(&rows, true)?);
        return Ok(());
    }

    print!("{}", format_table(&rows));

    let size: u64 = rows.iter().map(|r| r.size).sum();
    let compressed: u64 = rows.iter().map(|r| r.compressed_size).sum();
    println!();
    println!(
        "Total: {} ({} gzip) in {} project{}",
        format_size(size),
        format_size(compressed),
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    );

    for skipped in &report.skipped {
        eprintln!("  Skipped {}: {}", skipped.name, skipped.reason);
    }

    Ok(())
}

/// Measure every project. A project whose output cannot be read is left out
/// of the report.
fn collect_rows(config: &Config, projects: &[crate::discovery::DiscoveredProject]) -> Vec<ProjectRow> {
    let meta_file = &config.discovery.meta_file;
    let level = config.stats.compression_level;

    projects
        .par_iter()
        .filter_map(|project| match ProjectStats::gather(project, meta_file, level) {
            Ok(stats) => Some(ProjectRow::from(&stats)),
            Err(e) => {
                tracing::warn!(project = %project.name, error = %e, "Failed to collect stats");
                None
            }
        })
        .collect()
}
